//! Collision query results

use crate::foundation::math::Vec2;

/// Result of a collision query.
///
/// Produced fresh for every query and never stored. When `has_collision` is
/// set, `normal` is a unit axis pointing from the queried shape toward the
/// other one and `penetration` is the overlap depth along it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionManifold {
    /// Whether the shapes overlap
    pub has_collision: bool,
    /// Separating axis, from the queried shape toward the other shape
    pub normal: Vec2,
    /// Overlap depth along `normal`
    pub penetration: f32,
}

impl CollisionManifold {
    /// A manifold for an actual contact
    pub fn new(normal: Vec2, penetration: f32) -> Self {
        Self {
            has_collision: true,
            normal,
            penetration,
        }
    }

    /// Empty manifold (no contact)
    pub fn none() -> Self {
        Self {
            has_collision: false,
            normal: Vec2::zeros(),
            penetration: 0.0,
        }
    }

    /// Translation that moves the queried shape out of the other one
    pub fn separation(&self) -> Vec2 {
        if self.has_collision {
            -self.normal * self.penetration
        } else {
            Vec2::zeros()
        }
    }
}

impl Default for CollisionManifold {
    fn default() -> Self {
        Self::none()
    }
}
