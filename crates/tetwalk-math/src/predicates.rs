//! Orientation and containment predicates.
//!
//! All tests reduce to the sign of a scalar triple product. Signs are
//! compared exactly: a zero only ever matches another zero, so a point
//! lying exactly on a face plane is "on the same side" only as a vertex
//! that is itself coplanar.

use serde::{Deserialize, Serialize};

use crate::{Point3, Vec3};

/// Sign of a scalar, with zero kept distinct from both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sign {
    /// Strictly less than zero.
    Negative,
    /// Exactly zero (also used for NaN).
    Zero,
    /// Strictly greater than zero.
    Positive,
}

impl Sign {
    /// Classify a value. NaN maps to [`Sign::Zero`].
    #[inline]
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Sign::Positive
        } else if value < 0.0 {
            Sign::Negative
        } else {
            Sign::Zero
        }
    }

    /// The opposite sign; zero stays zero.
    #[inline]
    pub fn flip(self) -> Self {
        match self {
            Sign::Negative => Sign::Positive,
            Sign::Zero => Sign::Zero,
            Sign::Positive => Sign::Negative,
        }
    }

    /// True for [`Sign::Zero`].
    #[inline]
    pub fn is_zero(self) -> bool {
        self == Sign::Zero
    }
}

/// Scalar triple product `a · (b × c)`.
#[inline]
pub fn scalar_triple_product(a: &Vec3, b: &Vec3, c: &Vec3) -> f64 {
    a.dot(&b.cross(c))
}

/// Six times the signed volume of tetrahedron `abcd`, divided back down.
///
/// Positive when `d` lies on the side of plane `abc` that `(b-a) × (c-a)`
/// points to.
pub fn signed_volume(a: &Point3, b: &Point3, c: &Point3, d: &Point3) -> f64 {
    scalar_triple_product(&(b - a), &(c - a), &(d - a)) / 6.0
}

/// True when `abcd` has positive orientation (the TetGen convention).
pub fn is_positively_oriented(a: &Point3, b: &Point3, c: &Point3, d: &Point3) -> bool {
    Sign::of(signed_volume(a, b, c, d)) == Sign::Positive
}

/// Test whether `p` and `v4` lie on the same side of the plane `v1 v2 v3`.
pub fn same_side(v1: &Point3, v2: &Point3, v3: &Point3, v4: &Point3, p: &Point3) -> bool {
    let normal = (v2 - v1).cross(&(v3 - v1));
    let side_v4 = Sign::of(normal.dot(&(v4 - v1)));
    let side_p = Sign::of(normal.dot(&(p - v1)));
    side_v4 == side_p
}

/// Test whether `p` lies inside tetrahedron `v1 v2 v3 v4`.
///
/// Each face is checked against its opposite vertex. Points exactly on a
/// face plane fail that face's test (the reference vertex is never
/// coplanar in a non-degenerate tetrahedron), so containment is strict on
/// faces and the result does not depend on vertex order.
pub fn point_in_tetrahedron(
    v1: &Point3,
    v2: &Point3,
    v3: &Point3,
    v4: &Point3,
    p: &Point3,
) -> bool {
    same_side(v1, v2, v3, v4, p)
        && same_side(v2, v3, v4, v1, p)
        && same_side(v3, v4, v1, v2, p)
        && same_side(v4, v1, v2, v3, p)
}
