//! Axis-aligned bounding box over mesh nodes.

use serde::{Deserialize, Serialize};

use crate::Point3;

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb3 {
    /// Create an AABB from min and max corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Create an empty (inverted) AABB suitable for expansion.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Fold a set of points into their bounding box.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3>) -> Self {
        let mut aabb = Self::empty();
        for p in points {
            aabb.include_point(p);
        }
        aabb
    }

    /// True if no point has been included yet.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Expand this AABB to include a point.
    pub fn include_point(&mut self, p: &Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Inclusive containment test.
    pub fn contains_point(&self, p: &Point3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Clamp `p` into `[min, max]` on each axis.
    ///
    /// An empty box returns the point unchanged.
    pub fn clamp_point(&self, p: &Point3) -> Point3 {
        if self.is_empty() {
            return *p;
        }
        Point3::new(
            p.x.clamp(self.min.x, self.max.x),
            p.y.clamp(self.min.y, self.max.y),
            p.z.clamp(self.min.z, self.max.z),
        )
    }

    /// Center of the box.
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }

    /// Length of the box diagonal.
    pub fn diagonal(&self) -> f64 {
        (self.max - self.min).norm()
    }
}

impl Default for Aabb3 {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> Aabb3 {
        Aabb3::from_points(&[
            Point3::new(1.0, -2.0, 0.5),
            Point3::new(-1.0, 3.0, 0.0),
            Point3::new(0.0, 0.0, 4.0),
        ])
    }

    #[test]
    fn test_from_points_folds_min_and_max() {
        let aabb = sample();
        assert_relative_eq!(aabb.min, Point3::new(-1.0, -2.0, 0.0));
        assert_relative_eq!(aabb.max, Point3::new(1.0, 3.0, 4.0));
        assert!(!aabb.is_empty());
    }

    #[test]
    fn test_empty() {
        let aabb = Aabb3::from_points(std::iter::empty());
        assert!(aabb.is_empty());
        assert!(!aabb.contains_point(&Point3::origin()));
        let p = Point3::new(9.0, 9.0, 9.0);
        assert_eq!(aabb.clamp_point(&p), p);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let aabb = sample();
        assert!(aabb.contains_point(&Point3::new(0.0, 0.0, 1.0)));
        assert!(aabb.contains_point(&Point3::new(1.0, 3.0, 4.0)));
        assert!(!aabb.contains_point(&Point3::new(1.0, 3.0, 4.1)));
    }

    #[test]
    fn test_clamp_point() {
        let aabb = sample();
        let clamped = aabb.clamp_point(&Point3::new(5.0, -10.0, 2.0));
        assert_relative_eq!(clamped, Point3::new(1.0, -2.0, 2.0));
        let inside = Point3::new(0.5, 0.5, 0.5);
        assert_eq!(aabb.clamp_point(&inside), inside);
    }

    #[test]
    fn test_center_and_diagonal() {
        let aabb = Aabb3::new(Point3::origin(), Point3::new(2.0, 2.0, 1.0));
        assert_relative_eq!(aabb.center(), Point3::new(1.0, 1.0, 0.5));
        assert_relative_eq!(aabb.diagonal(), 3.0);
    }
}
