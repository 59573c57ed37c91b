//! Exit-face resolution for a single tetrahedron.
//!
//! The ray is tested against the six edges of the tetrahedron with
//! Plücker-style triple products `[d, X - o, Y - o]`. Their signs say on
//! which side of each edge line the ray passes, and the face the ray leaves
//! through is the one whose three edges all wind the same way around it.
//!
//! Products for a shared edge are computed from the same two points in
//! every tetrahedron that contains it, so neighboring tetrahedra always
//! agree on the sign and a walk cannot bounce between them.

use tetwalk_math::{scalar_triple_product, signed_volume, Point3, Sign};
use tetwalk_mesh::{FaceId, TetId};

use crate::Ray;

/// Edge of a tetrahedron, by local corner letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pair {
    AB,
    BC,
    AC,
    AD,
    BD,
    CD,
}

impl Pair {
    const ALL: [Pair; 6] = [Pair::AB, Pair::BC, Pair::AC, Pair::AD, Pair::BD, Pair::CD];

    const fn corners(self) -> (usize, usize) {
        match self {
            Pair::AB => (0, 1),
            Pair::BC => (1, 2),
            Pair::AC => (0, 2),
            Pair::AD => (0, 3),
            Pair::BD => (1, 3),
            Pair::CD => (2, 3),
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

struct ExitRule {
    face: &'static str,
    slot: usize,
    signs: [(Pair, Sign); 3],
}

/// Sign patterns for a positively oriented tetrahedron. Slot `i` is the
/// face opposite local corner `i`.
const EXIT_TABLE: [ExitRule; 4] = [
    ExitRule {
        face: "ABC",
        slot: 3,
        signs: [
            (Pair::AB, Sign::Negative),
            (Pair::AC, Sign::Positive),
            (Pair::BC, Sign::Negative),
        ],
    },
    ExitRule {
        face: "BAD",
        slot: 2,
        signs: [
            (Pair::AB, Sign::Positive),
            (Pair::AD, Sign::Negative),
            (Pair::BD, Sign::Positive),
        ],
    },
    ExitRule {
        face: "CDA",
        slot: 1,
        signs: [
            (Pair::AD, Sign::Positive),
            (Pair::AC, Sign::Negative),
            (Pair::CD, Sign::Negative),
        ],
    },
    ExitRule {
        face: "DCB",
        slot: 0,
        signs: [
            (Pair::BC, Sign::Positive),
            (Pair::BD, Sign::Negative),
            (Pair::CD, Sign::Positive),
        ],
    },
];

/// Outcome of resolving the exit face of one tetrahedron.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitFace {
    /// The ray leaves through local face `slot`.
    Through {
        /// Local slot, i.e. the index of the opposite corner.
        slot: usize,
        /// Mesh face at that slot.
        face: FaceId,
        /// Tetrahedron across the face, `None` on the mesh boundary.
        neighbor: Option<TetId>,
    },
    /// The ray grazes an edge or vertex, or the tetrahedron is flat.
    Degenerate,
}

/// Signs of the six edge products, normalized to positive orientation.
///
/// `None` for a zero-volume tetrahedron.
fn edge_signs(ray: &Ray, corners: &[Point3; 4]) -> Option<[Sign; 6]> {
    let [a, b, c, d] = corners;
    let orientation = Sign::of(signed_volume(a, b, c, d));
    if orientation.is_zero() {
        return None;
    }

    let rel = corners.map(|p| p - ray.origin);
    let signs = Pair::ALL.map(|pair| {
        let (i, j) = pair.corners();
        let sign = Sign::of(scalar_triple_product(&ray.direction, &rel[i], &rel[j]));
        if orientation == Sign::Negative {
            sign.flip()
        } else {
            sign
        }
    });
    Some(signs)
}

/// Local slot of the face the ray leaves through, or `None` when no
/// pattern matches.
///
/// Only the line of the ray matters: any origin on the same line gives the
/// same answer.
pub fn exit_slot(ray: &Ray, corners: &[Point3; 4]) -> Option<usize> {
    let signs = edge_signs(ray, corners)?;
    let rule = EXIT_TABLE.iter().find(|rule| {
        rule.signs
            .iter()
            .all(|&(pair, required)| signs[pair.index()] == required)
    })?;
    tracing::trace!(face = rule.face, slot = rule.slot, "exit face");
    Some(rule.slot)
}

/// Resolve the exit face of a tetrahedron together with its mesh face and
/// neighbor.
pub fn resolve_exit(
    ray: &Ray,
    corners: &[Point3; 4],
    faces: &[FaceId; 4],
    neighbors: &[Option<TetId>; 4],
) -> ExitFace {
    match exit_slot(ray, corners) {
        Some(slot) => ExitFace::Through {
            slot,
            face: faces[slot],
            neighbor: neighbors[slot],
        },
        None => ExitFace::Degenerate,
    }
}

/// Point where the ray crosses the plane of local face `slot`.
///
/// Falls back to the ray origin if the ray is parallel to that plane,
/// which cannot happen for a slot returned by [`exit_slot`].
pub fn exit_point(ray: &Ray, corners: &[Point3; 4], slot: usize) -> Point3 {
    let mut others = (0..4).filter(|&i| i != slot).map(|i| &corners[i]);
    match (others.next(), others.next(), others.next()) {
        (Some(a), Some(b), Some(c)) => ray
            .plane_parameter(a, b, c)
            .map_or(ray.origin, |t| ray.at(t)),
        _ => ray.origin,
    }
}
