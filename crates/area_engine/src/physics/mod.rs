//! Physics module for collision detection
//!
//! Axis-aligned boxes only. Colliders carry a single layer bit and a mask of
//! the layers they test against; queries go through [`CollisionIndex`].

pub mod collider;
pub mod collision;
pub mod collision_layers;
pub mod collision_system;

pub use collider::{BoxCollider, ColliderError, MAX_COLLIDER_POSITION, MAX_COLLIDER_SIZE, MIN_COLLIDER_SIZE};
pub use collision::{Aabb, CollisionManifold};
pub use collision_layers::{CollisionLayers, LayerMatrix};
pub use collision_system::{CollisionIndex, Contact};
