//! Math utilities and types
//!
//! Provides the 2D math types used by the collision and mechanism layers.

pub use nalgebra::{Vector2, Vector4};

/// 2D vector type (points, extents, directions)
pub type Vec2 = Vector2<f32>;

/// RGBA color used for mechanism feedback
pub type Color = Vector4<f32>;

/// Math utility functions
pub mod utils {
    use super::{Color, Vec2};

    /// Linear interpolation between two points
    pub fn lerp_vec2(a: Vec2, b: Vec2, t: f32) -> Vec2 {
        a + (b - a) * t
    }

    /// Linear interpolation between two colors
    pub fn lerp_color(a: Color, b: Color, t: f32) -> Color {
        a + (b - a) * t
    }

    /// Euclidean distance between two points
    pub fn distance(a: Vec2, b: Vec2) -> f32 {
        (b - a).magnitude()
    }

    /// True when every component is a finite number
    pub fn is_finite(v: Vec2) -> bool {
        v.x.is_finite() && v.y.is_finite()
    }
}
