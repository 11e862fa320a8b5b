//! Collision geometry
//!
//! Box geometry and the manifold type returned by collision queries. These
//! types know nothing about layers; filtering lives on
//! [`BoxCollider`](crate::physics::BoxCollider).
//!
//! # Module Organization
//!
//! - [`aabb`] - Axis-aligned boxes and the minimum-overlap manifold
//! - [`manifold`] - Query result type

pub mod aabb;
pub mod manifold;

pub use aabb::Aabb;
pub use manifold::CollisionManifold;
