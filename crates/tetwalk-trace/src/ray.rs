//! Ray representation and walk results.

use serde::{Deserialize, Serialize};
use tetwalk_math::{Point3, Vec3};
use tetwalk_mesh::{FaceId, TetId};

/// A ray in 3D space defined by origin and direction.
///
/// The direction is kept as given: the walk only looks at signs of triple
/// products, which do not depend on its length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    /// Origin point of the ray.
    pub origin: Point3,
    /// Direction of travel.
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray from origin and direction.
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Ray from `origin` aimed at `target`.
    pub fn towards(origin: Point3, target: &Point3) -> Self {
        Self::new(origin, target - origin)
    }

    /// Evaluate the ray at parameter `t`: `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + t * self.direction
    }

    /// Parameter where the ray meets the plane through `a`, `b`, `c`.
    ///
    /// `None` if the ray is parallel to the plane.
    pub fn plane_parameter(&self, a: &Point3, b: &Point3, c: &Point3) -> Option<f64> {
        let normal = (b - a).cross(&(c - a));
        let denom = self.direction.dot(&normal);
        if denom == 0.0 || !denom.is_finite() {
            return None;
        }
        Some((a - self.origin).dot(&normal) / denom)
    }
}

/// How a walk ended.
///
/// Exactly one outcome per walk; the in-progress state never leaves the
/// traversal engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terminal {
    /// Crossed a face flagged as an outer wall.
    Wall,
    /// Crossed a face flagged as an internal partition.
    Constrained,
    /// Left the mesh through an unflagged face with no neighbor.
    ExitedDomain,
    /// Ran out of steps (or time) before reaching any boundary.
    Dark,
    /// Reached the tetrahedron containing the requested target point.
    Found,
    /// Grazed an edge or vertex, so no exit face could be resolved.
    Degenerate,
}

impl Terminal {
    /// True for [`Terminal::Wall`] and [`Terminal::ExitedDomain`], which
    /// both mean the ray reached the outside of the mesh.
    pub fn is_wall_like(self) -> bool {
        matches!(self, Terminal::Wall | Terminal::ExitedDomain)
    }

    /// True if the walk stopped on a face (wall, constraint or mesh edge).
    pub fn is_surface_hit(self) -> bool {
        matches!(
            self,
            Terminal::Wall | Terminal::Constrained | Terminal::ExitedDomain
        )
    }
}

/// Result of walking a ray through a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    /// Where the walk stopped: the crossing point on the terminal face, the
    /// target for [`Terminal::Found`], or the entry point of the last
    /// tetrahedron when no face was resolved.
    pub position: Point3,
    /// Last tetrahedron visited.
    pub tet: TetId,
    /// Face the walk ended on, if one was resolved.
    pub face: Option<FaceId>,
    /// Number of tetrahedron-to-tetrahedron moves made.
    pub depth: usize,
    /// Outcome of the walk.
    pub terminal: Terminal,
}
