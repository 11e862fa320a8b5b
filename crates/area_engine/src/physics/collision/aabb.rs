//! Axis-aligned bounding boxes
//!
//! Boxes are stored as min/max corners in world space with +y pointing down,
//! matching the top-left positioning used by level data.

use serde::{Serialize, Deserialize};

use crate::foundation::math::Vec2;
use super::manifold::CollisionManifold;

/// An axis-aligned box described by its min and max corners
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Top-left corner
    pub min: Vec2,
    /// Bottom-right corner
    pub max: Vec2,
}

impl Aabb {
    /// Create a box from its corners
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create a box from a top-left position and a size
    pub fn from_position_size(position: Vec2, size: Vec2) -> Self {
        Self {
            min: position,
            max: position + size,
        }
    }

    /// Width and height
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Inclusive overlap test: boxes that share an edge count as overlapping
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Overlap extent on each axis (negative when separated on that axis)
    pub fn overlap(&self, other: &Aabb) -> Vec2 {
        Vec2::new(
            self.max.x.min(other.max.x) - self.min.x.max(other.min.x),
            self.max.y.min(other.max.y) - self.min.y.max(other.min.y),
        )
    }

    /// Half-open point containment (`min <= p < max`)
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x < self.max.x && point.y >= self.min.y && point.y < self.max.y
    }

    /// Minimum-translation manifold against another box.
    ///
    /// Requires a strictly positive overlap on both axes. The axis with the
    /// smaller overlap is the separating axis; x is only chosen when its
    /// overlap is strictly smaller. The normal points from `self` toward
    /// `other` along that axis.
    pub fn manifold(&self, other: &Aabb) -> CollisionManifold {
        let overlap = self.overlap(other);
        if !(overlap.x > 0.0 && overlap.y > 0.0) {
            return CollisionManifold::none();
        }

        if overlap.x < overlap.y {
            let sign = if self.min.x + self.max.x < other.min.x + other.max.x { 1.0 } else { -1.0 };
            CollisionManifold::new(Vec2::new(sign, 0.0), overlap.x)
        } else {
            let sign = if self.min.y + self.max.y < other.min.y + other.max.y { 1.0 } else { -1.0 };
            CollisionManifold::new(Vec2::new(0.0, sign), overlap.y)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Aabb {
        Aabb::from_position_size(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_touching_edges_overlap() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(10.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(!a.manifold(&b).has_collision);
    }

    #[test]
    fn test_separated_boxes() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(20.0, 20.0, 5.0, 5.0);
        assert!(!a.overlaps(&b));
        assert!(!a.manifold(&b).has_collision);
    }

    #[test]
    fn test_manifold_picks_smaller_axis() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(8.0, 2.0, 10.0, 10.0);

        let manifold = a.manifold(&b);
        assert!(manifold.has_collision);
        assert_eq!(manifold.normal, Vec2::new(1.0, 0.0));
        assert_relative_eq!(manifold.penetration, 2.0);

        let reverse = b.manifold(&a);
        assert_eq!(reverse.normal, Vec2::new(-1.0, 0.0));
        assert_relative_eq!(reverse.penetration, 2.0);
    }

    #[test]
    fn test_manifold_tie_prefers_y() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(7.0, 7.0, 10.0, 10.0);

        let manifold = a.manifold(&b);
        assert_eq!(manifold.normal, Vec2::new(0.0, 1.0));
        assert_relative_eq!(manifold.penetration, 3.0);
    }

    #[test]
    fn test_contains_point_is_half_open() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        assert!(a.contains_point(Vec2::new(0.0, 0.0)));
        assert!(a.contains_point(Vec2::new(9.9, 9.9)));
        assert!(!a.contains_point(Vec2::new(10.0, 5.0)));
    }
}
