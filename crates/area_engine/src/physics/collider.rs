//! Axis-aligned box collider with layer/mask filtering
//!
//! A collider is owned by exactly one mechanism or by an area's static list.
//! Writes that would break its bounds invariants are rejected and logged;
//! the collider keeps its previous value.

use serde::{Deserialize, Deserializer, Serialize};

use crate::foundation::math::Vec2;
use super::collision::{Aabb, CollisionManifold};
use super::collision_layers::CollisionLayers;

/// Smallest accepted width/height
pub const MIN_COLLIDER_SIZE: f32 = 0.1;

/// Largest accepted width/height
pub const MAX_COLLIDER_SIZE: f32 = 10_000.0;

/// Largest accepted absolute coordinate of the top-left corner
pub const MAX_COLLIDER_POSITION: f32 = 1_000_000.0;

/// Reasons a serialized collider is refused
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ColliderError {
    /// NaN or beyond ±[`MAX_COLLIDER_POSITION`]
    #[error("collider position ({0}, {1}) is out of range")]
    Position(f32, f32),

    /// NaN or outside [[`MIN_COLLIDER_SIZE`], [`MAX_COLLIDER_SIZE`]]
    #[error("collider size ({0}, {1}) is out of range")]
    Size(f32, f32),

    /// More than one layer bit
    #[error("collider layer {0:#x} has more than one bit set")]
    Layer(u32),
}

/// Box collider positioned by its top-left corner.
///
/// Deserialization applies the same bounds and layer checks as the setters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxCollider {
    position: Vec2,
    size: Vec2,
    layer: CollisionLayers,
    mask: CollisionLayers,
}

impl BoxCollider {
    /// Create an untagged collider: no layer, tests against everything.
    ///
    /// Out-of-range arguments are clamped into the valid range so the
    /// collider always starts valid.
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position: sanitize_position(position),
            size: sanitize_size(size),
            layer: CollisionLayers::NONE,
            mask: CollisionLayers::ALL,
        }
    }

    /// Create a collider on `layer` using the canonical mask for it
    pub fn with_layer(position: Vec2, size: Vec2, layer: CollisionLayers) -> Self {
        let mut collider = Self::new(position, size);
        collider.set_layer(layer);
        collider.mask = CollisionLayers::default_mask(collider.layer);
        collider
    }

    /// Builder: replace layer and mask
    pub fn with_layers(mut self, layer: CollisionLayers, mask: CollisionLayers) -> Self {
        self.set_layer(layer);
        self.mask = mask;
        self
    }

    /// Top-left corner
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Width and height
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Layer this collider belongs to
    pub fn layer(&self) -> CollisionLayers {
        self.layer
    }

    /// Layers this collider tests against
    pub fn mask(&self) -> CollisionLayers {
        self.mask
    }

    /// Move the collider. Returns false (and keeps the old position) for
    /// NaN or out-of-range coordinates.
    pub fn set_position(&mut self, position: Vec2) -> bool {
        if !position_in_range(position) {
            log::warn!(
                "Rejected collider position ({}, {}): outside ±{}",
                position.x, position.y, MAX_COLLIDER_POSITION
            );
            return false;
        }
        self.position = position;
        true
    }

    /// Resize the collider. Returns false (and keeps the old size) for NaN or
    /// out-of-range extents.
    pub fn set_size(&mut self, size: Vec2) -> bool {
        if !size_in_range(size) {
            log::warn!(
                "Rejected collider size ({}, {}): must be within [{}, {}]",
                size.x, size.y, MIN_COLLIDER_SIZE, MAX_COLLIDER_SIZE
            );
            return false;
        }
        self.size = size;
        true
    }

    /// Set the layer. Only empty or single-bit layers are accepted.
    pub fn set_layer(&mut self, layer: CollisionLayers) -> bool {
        if !layer.is_empty() && !layer.is_single_layer() {
            log::warn!("Rejected collider layer {:#x}: a collider sits on one layer", layer.bits());
            return false;
        }
        self.layer = layer;
        true
    }

    /// Set the mask (any union of layers)
    pub fn set_mask(&mut self, mask: CollisionLayers) {
        self.mask = mask;
    }

    /// Clear layer and mask so nothing collides with this collider
    pub fn disable_collision(&mut self) {
        self.layer = CollisionLayers::NONE;
        self.mask = CollisionLayers::NONE;
    }

    /// Whether the collider currently takes part in any collision
    pub fn is_collision_enabled(&self) -> bool {
        !self.layer.is_empty() || !self.mask.is_empty()
    }

    /// Whether position and size satisfy the bounds invariants
    pub fn is_valid(&self) -> bool {
        position_in_range(self.position) && size_in_range(self.size)
    }

    /// Top-left corner
    pub fn min(&self) -> Vec2 {
        self.position
    }

    /// Bottom-right corner
    pub fn max(&self) -> Vec2 {
        self.position + self.size
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    /// Bounds as an [`Aabb`]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_position_size(self.position, self.size)
    }

    /// Pure geometric overlap, ignoring layers and masks
    pub fn overlaps(&self, other: &BoxCollider) -> bool {
        self.aabb().overlaps(&other.aabb())
    }

    /// Whether this collider tests against `other`'s layer
    pub fn tests_against(&self, other: &BoxCollider) -> bool {
        self.mask.intersects(other.layer)
    }

    /// Filtered overlap test.
    ///
    /// Returns false without touching geometry when this mask does not
    /// include the other layer, or when either collider is out of bounds.
    pub fn is_colliding(&self, other: &BoxCollider) -> bool {
        if !self.tests_against(other) {
            return false;
        }
        if !self.is_valid() || !other.is_valid() {
            return false;
        }
        self.overlaps(other)
    }

    /// Filtered manifold query, with the normal pointing from this collider
    /// toward `other`
    pub fn check_collision(&self, other: &BoxCollider) -> CollisionManifold {
        if !self.tests_against(other) {
            return CollisionManifold::none();
        }
        if !self.is_valid() || !other.is_valid() {
            return CollisionManifold::none();
        }
        self.aabb().manifold(&other.aabb())
    }

    /// Translate by `offset`, subject to the same checks as [`set_position`](Self::set_position)
    pub fn translate(&mut self, offset: Vec2) -> bool {
        self.set_position(self.position + offset)
    }
}

/// Unchecked field image used for deserialization
#[derive(Deserialize)]
struct RawBoxCollider {
    position: Vec2,
    size: Vec2,
    layer: CollisionLayers,
    mask: CollisionLayers,
}

impl RawBoxCollider {
    fn validate(self) -> Result<BoxCollider, ColliderError> {
        if !position_in_range(self.position) {
            return Err(ColliderError::Position(self.position.x, self.position.y));
        }
        if !size_in_range(self.size) {
            return Err(ColliderError::Size(self.size.x, self.size.y));
        }
        if !self.layer.is_single_layer() {
            return Err(ColliderError::Layer(self.layer.bits()));
        }
        Ok(BoxCollider {
            position: self.position,
            size: self.size,
            layer: self.layer,
            mask: self.mask,
        })
    }
}

impl<'de> Deserialize<'de> for BoxCollider {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawBoxCollider::deserialize(deserializer)?
            .validate()
            .map_err(serde::de::Error::custom)
    }
}

fn position_in_range(position: Vec2) -> bool {
    position.iter().all(|v| !v.is_nan() && v.abs() <= MAX_COLLIDER_POSITION)
}

fn size_in_range(size: Vec2) -> bool {
    size.iter().all(|v| !v.is_nan() && (MIN_COLLIDER_SIZE..=MAX_COLLIDER_SIZE).contains(v))
}

fn sanitize_position(position: Vec2) -> Vec2 {
    position.map(|v| if v.is_nan() { 0.0 } else { v.clamp(-MAX_COLLIDER_POSITION, MAX_COLLIDER_POSITION) })
}

fn sanitize_size(size: Vec2) -> Vec2 {
    size.map(|v| if v.is_nan() { MIN_COLLIDER_SIZE } else { v.clamp(MIN_COLLIDER_SIZE, MAX_COLLIDER_SIZE) })
}
