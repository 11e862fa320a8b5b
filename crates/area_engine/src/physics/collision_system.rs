//! Collision queries over box colliders
//!
//! `CollisionIndex` is the narrow-phase entry point used by mechanisms and by
//! movement resolution. It holds no per-frame state; the only configuration is
//! the layer matrix used as a cheap pre-check before the per-collider mask test.

use crate::foundation::math::Vec2;
use super::collider::BoxCollider;
use super::collision::CollisionManifold;
use super::collision_layers::LayerMatrix;

/// A positive contact between a mover and one collider from a list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Index of the collider in the list passed to the query
    pub index: usize,
    /// Manifold from the mover toward that collider
    pub manifold: CollisionManifold,
}

/// Stateless collision queries gated by a layer matrix
#[derive(Debug, Clone, Copy)]
pub struct CollisionIndex<'m> {
    matrix: &'m LayerMatrix,
}

impl<'m> CollisionIndex<'m> {
    /// Create an index over an explicit matrix
    pub fn new(matrix: &'m LayerMatrix) -> Self {
        Self { matrix }
    }

    /// Matrix used for the pre-check
    pub fn matrix(&self) -> &LayerMatrix {
        self.matrix
    }

    /// One-sided query: does `a` see `b`?
    ///
    /// Untagged colliders skip the matrix pre-check and rely on the mask alone.
    pub fn query(&self, a: &BoxCollider, b: &BoxCollider) -> CollisionManifold {
        let tagged = !a.layer().is_empty() && !b.layer().is_empty();
        if tagged && !self.matrix.can_interact(a.layer(), b.layer()) {
            return CollisionManifold::none();
        }
        a.check_collision(b)
    }

    /// Both sides must see each other
    pub fn mutual(&self, a: &BoxCollider, b: &BoxCollider) -> bool {
        self.query(a, b).has_collision && self.query(b, a).has_collision
    }

    /// Every positive manifold from `mover` against `colliders`
    pub fn contacts(&self, mover: &BoxCollider, colliders: &[&BoxCollider]) -> Vec<Contact> {
        colliders
            .iter()
            .enumerate()
            .filter_map(|(index, other)| {
                let manifold = self.query(mover, other);
                manifold.has_collision.then_some(Contact { index, manifold })
            })
            .collect()
    }

    /// Whether `mover` penetrates any collider it tests against
    pub fn is_blocked(&self, mover: &BoxCollider, colliders: &[&BoxCollider]) -> bool {
        colliders.iter().any(|other| self.query(mover, other).has_collision)
    }

    /// Push `mover` out of each collider it penetrates, in list order.
    ///
    /// Each contact is re-queried after the previous correction so a single
    /// push can clear several overlaps. Returns the number of corrections
    /// applied.
    pub fn resolve(&self, mover: &mut BoxCollider, colliders: &[&BoxCollider]) -> usize {
        let mut corrections = 0;
        for other in colliders {
            let manifold = self.query(mover, other);
            if !manifold.has_collision {
                continue;
            }
            let offset: Vec2 = manifold.separation();
            if mover.translate(offset) {
                corrections += 1;
            } else {
                log::warn!("Could not separate collider: correction would leave the valid range");
            }
        }
        corrections
    }
}

impl CollisionIndex<'static> {
    /// Index over the process-wide canonical matrix
    pub fn global() -> Self {
        Self::new(LayerMatrix::global())
    }
}

impl Default for CollisionIndex<'static> {
    fn default() -> Self {
        Self::global()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::CollisionLayers;
    use approx::assert_relative_eq;

    fn boxed(x: f32, y: f32, layer: CollisionLayers) -> BoxCollider {
        BoxCollider::with_layer(Vec2::new(x, y), Vec2::new(10.0, 10.0), layer)
    }

    #[test]
    fn test_query_respects_masks() {
        let index = CollisionIndex::global();
        let player = boxed(0.0, 0.0, CollisionLayers::PLAYER);
        let wall = boxed(5.0, 0.0, CollisionLayers::WALL);
        let item = boxed(5.0, 0.0, CollisionLayers::ITEM);

        assert!(index.query(&player, &wall).has_collision);
        assert!(index.mutual(&player, &wall));
        assert!(index.query(&player, &item).has_collision);
        assert!(index.query(&item, &player).has_collision);
    }

    #[test]
    fn test_matrix_pre_check_can_disable_pair() {
        let matrix = LayerMatrix::from_defaults().with_pair(CollisionLayers::PLAYER, CollisionLayers::WALL, false);
        let index = CollisionIndex::new(&matrix);
        let player = boxed(0.0, 0.0, CollisionLayers::PLAYER);
        let wall = boxed(5.0, 0.0, CollisionLayers::WALL);

        assert!(!index.query(&player, &wall).has_collision);
        assert!(player.check_collision(&wall).has_collision);
    }

    #[test]
    fn test_untagged_collider_uses_mask_only() {
        let index = CollisionIndex::global();
        let probe = BoxCollider::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let wall = boxed(5.0, 0.0, CollisionLayers::WALL);

        assert!(index.query(&probe, &wall).has_collision);
        assert!(!index.query(&wall, &probe).has_collision);
    }

    #[test]
    fn test_contacts_and_blocking() {
        let index = CollisionIndex::global();
        let player = boxed(0.0, 0.0, CollisionLayers::PLAYER);
        let near = boxed(8.0, 0.0, CollisionLayers::WALL);
        let far = boxed(100.0, 0.0, CollisionLayers::WALL);
        let touching = boxed(0.0, 10.0, CollisionLayers::WALL);

        let contacts = index.contacts(&player, &[&far, &near, &touching]);
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].index, 1);
        assert_relative_eq!(contacts[0].manifold.penetration, 2.0);

        assert!(index.is_blocked(&player, &[&near]));
        assert!(!index.is_blocked(&player, &[&far, &touching]));
    }

    #[test]
    fn test_resolve_pushes_out() {
        let index = CollisionIndex::global();
        let mut player = boxed(0.0, 0.0, CollisionLayers::PLAYER);
        let wall = boxed(7.0, -2.0, CollisionLayers::WALL);

        let corrections = index.resolve(&mut player, &[&wall]);
        assert_eq!(corrections, 1);
        assert_relative_eq!(player.position().x, -3.0);
        assert!(!index.is_blocked(&player, &[&wall]));
    }
}
