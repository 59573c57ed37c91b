#![warn(missing_docs)]

//! Math types for tetrahedral mesh traversal.
//!
//! Thin aliases over nalgebra plus the handful of exact-sign predicates
//! the mesh walker is built on:
//!
//! - [`scalar_triple_product`] - signed volume primitive `a · (b × c)`
//! - [`Sign`] - three-valued sign with an explicit zero
//! - [`same_side`] / [`point_in_tetrahedron`] - containment tests
//! - [`Aabb3`] - axis-aligned bounds over mesh nodes

mod bbox;
mod predicates;

use nalgebra::Vector3;

pub use bbox::Aabb3;
pub use predicates::{
    is_positively_oriented, point_in_tetrahedron, same_side, scalar_triple_product,
    signed_volume, Sign,
};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// Centroid of four points, e.g. the corners of a tetrahedron.
pub fn centroid4(a: &Point3, b: &Point3, c: &Point3, d: &Point3) -> Point3 {
    Point3::from((a.coords + b.coords + c.coords + d.coords) / 4.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_centroid_of_unit_corner() {
        let c = centroid4(
            &Point3::origin(),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(0.0, 1.0, 0.0),
            &Point3::new(0.0, 0.0, 1.0),
        );
        assert_relative_eq!(c, Point3::new(0.25, 0.25, 0.25));
    }
}
