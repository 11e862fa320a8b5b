//! Collision layer system for filtering collision detection
//!
//! Every collider sits on at most one layer and carries a mask of the layers
//! it tests against. A query from A to B only proceeds when `A.mask & B.layer`
//! is non-zero, so the check is directional: A may see B while B ignores A.

use serde::{Serialize, Deserialize};
use std::sync::OnceLock;

bitflags::bitflags! {
    /// Collision layer bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CollisionLayers: u32 {
        /// Player character layer
        const PLAYER = 1 << 0;
        /// Trigger volumes (no physical response)
        const TRIGGER = 1 << 1;
        /// Door mechanisms
        const DOOR = 1 << 2;
        /// Area portals
        const PORTAL = 1 << 3;
        /// Static level geometry
        const WALL = 1 << 4;
        /// Pickups and collectibles
        const ITEM = 1 << 5;
        /// Enemy characters
        const ENEMY = 1 << 6;
        /// Weapon hitboxes
        const WEAPON = 1 << 7;
    }
}

impl Default for CollisionLayers {
    fn default() -> Self {
        Self::NONE
    }
}

impl CollisionLayers {
    /// No collision layer
    pub const NONE: Self = Self::empty();

    /// Every bit, including layers without a name
    pub const ALL: Self = Self::from_bits_retain(u32::MAX);

    /// Canonical mask for a layer: which categories it is expected to test against.
    ///
    /// Layers without a table entry test against everything; the empty layer
    /// tests against nothing.
    pub fn default_mask(layer: Self) -> Self {
        if layer == Self::PLAYER {
            Self::WALL | Self::DOOR | Self::PORTAL | Self::ITEM | Self::ENEMY | Self::TRIGGER
        } else if layer == Self::TRIGGER || layer == Self::PORTAL || layer == Self::ITEM {
            Self::PLAYER
        } else if layer == Self::DOOR {
            Self::PLAYER | Self::ENEMY
        } else if layer == Self::WALL {
            Self::PLAYER | Self::ENEMY | Self::WEAPON
        } else if layer == Self::ENEMY {
            Self::PLAYER | Self::WALL | Self::DOOR | Self::WEAPON
        } else if layer == Self::WEAPON {
            Self::ENEMY | Self::WALL
        } else if layer.is_empty() {
            Self::NONE
        } else {
            Self::ALL
        }
    }

    /// True when this value is usable as a collider layer (empty or a single bit)
    pub fn is_single_layer(self) -> bool {
        self.bits().count_ones() <= 1
    }

    /// Check if two entities should collide based on their layers and masks
    ///
    /// Both directions must agree: A's layer must be in B's mask AND B's
    /// layer must be in A's mask.
    pub fn should_collide(layer_a: Self, mask_a: Self, layer_b: Self, mask_b: Self) -> bool {
        layer_a.intersects(mask_b) && layer_b.intersects(mask_a)
    }

    /// Helper to create a mask from multiple layers
    pub fn mask(layers: &[Self]) -> Self {
        layers.iter().fold(Self::NONE, |acc, &layer| acc | layer)
    }
}

/// Layer-to-layer compatibility table.
///
/// Row `i` holds the mask of the layer with bit `i`. This is only a coarse
/// "can these categories ever interact" check in front of the per-collider mask
/// test, which stays authoritative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerMatrix {
    rows: [u32; 32],
}

impl LayerMatrix {
    /// Build the matrix from the canonical mask table
    pub fn from_defaults() -> Self {
        let mut rows = [0u32; 32];
        for (bit, row) in rows.iter_mut().enumerate() {
            let layer = CollisionLayers::from_bits_retain(1 << bit);
            *row = CollisionLayers::default_mask(layer).bits();
        }
        Self { rows }
    }

    /// Process-wide matrix built once from the canonical table
    pub fn global() -> &'static Self {
        static MATRIX: OnceLock<LayerMatrix> = OnceLock::new();
        MATRIX.get_or_init(Self::from_defaults)
    }

    /// Mask row for every bit set in `layers`, or-ed together
    pub fn row(&self, layers: CollisionLayers) -> CollisionLayers {
        let bits = (0..32)
            .filter(|&bit| layers.bits() & (1u32 << bit) != 0)
            .fold(0, |acc, bit| acc | self.rows[bit]);
        CollisionLayers::from_bits_retain(bits)
    }

    /// True when either layer's row names the other
    pub fn can_interact(&self, a: CollisionLayers, b: CollisionLayers) -> bool {
        self.row(a).intersects(b) || self.row(b).intersects(a)
    }

    /// Return a copy with the pair enabled or disabled in both directions
    pub fn with_pair(mut self, a: CollisionLayers, b: CollisionLayers, enabled: bool) -> Self {
        for bit in 0..32 {
            let flag = 1u32 << bit;
            if a.bits() & flag != 0 {
                self.set_row_bits(bit, b.bits(), enabled);
            }
            if b.bits() & flag != 0 {
                self.set_row_bits(bit, a.bits(), enabled);
            }
        }
        self
    }

    fn set_row_bits(&mut self, row: usize, bits: u32, enabled: bool) {
        if enabled {
            self.rows[row] |= bits;
        } else {
            self.rows[row] &= !bits;
        }
    }
}

impl Default for LayerMatrix {
    fn default() -> Self {
        Self::from_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_collide_mutual() {
        let player_mask = CollisionLayers::default_mask(CollisionLayers::PLAYER);
        let enemy_mask = CollisionLayers::default_mask(CollisionLayers::ENEMY);

        assert!(CollisionLayers::should_collide(
            CollisionLayers::PLAYER, player_mask,
            CollisionLayers::ENEMY, enemy_mask
        ));
    }

    #[test]
    fn test_should_not_collide_one_way() {
        // The weapon tests against items, items only test against the player
        assert!(!CollisionLayers::should_collide(
            CollisionLayers::WEAPON, CollisionLayers::ITEM,
            CollisionLayers::ITEM, CollisionLayers::PLAYER
        ));
    }

    #[test]
    fn test_layers_are_distinct_bits() {
        let all = [
            CollisionLayers::PLAYER,
            CollisionLayers::TRIGGER,
            CollisionLayers::DOOR,
            CollisionLayers::PORTAL,
            CollisionLayers::WALL,
            CollisionLayers::ITEM,
            CollisionLayers::ENEMY,
            CollisionLayers::WEAPON,
        ];
        for layer in all {
            assert!(layer.is_single_layer());
            assert_eq!(layer.bits().count_ones(), 1);
        }
        assert_eq!(CollisionLayers::mask(&all).bits().count_ones(), all.len() as u32);
    }

    #[test]
    fn test_player_default_mask() {
        let mask = CollisionLayers::default_mask(CollisionLayers::PLAYER);
        assert!(mask.contains(CollisionLayers::WALL | CollisionLayers::DOOR | CollisionLayers::TRIGGER));
        assert!(!mask.contains(CollisionLayers::WEAPON));
        assert_eq!(CollisionLayers::default_mask(CollisionLayers::NONE), CollisionLayers::NONE);
    }

    #[test]
    fn test_multi_bit_is_not_a_single_layer() {
        assert!(!(CollisionLayers::PLAYER | CollisionLayers::DOOR).is_single_layer());
        assert!(CollisionLayers::NONE.is_single_layer());
    }

    #[test]
    fn test_matrix_matches_table() {
        let matrix = LayerMatrix::global();
        assert!(matrix.can_interact(CollisionLayers::PLAYER, CollisionLayers::DOOR));
        assert!(matrix.can_interact(CollisionLayers::DOOR, CollisionLayers::PLAYER));
        assert!(!matrix.can_interact(CollisionLayers::TRIGGER, CollisionLayers::DOOR));
        assert!(!matrix.can_interact(CollisionLayers::NONE, CollisionLayers::PLAYER));
    }

    #[test]
    fn test_matrix_with_pair() {
        let matrix = LayerMatrix::from_defaults()
            .with_pair(CollisionLayers::TRIGGER, CollisionLayers::DOOR, true);
        assert!(matrix.can_interact(CollisionLayers::TRIGGER, CollisionLayers::DOOR));

        let matrix = matrix.with_pair(CollisionLayers::PLAYER, CollisionLayers::DOOR, false);
        assert!(!matrix.can_interact(CollisionLayers::DOOR, CollisionLayers::PLAYER));
        // Door still reacts to enemies
        assert!(matrix.can_interact(CollisionLayers::DOOR, CollisionLayers::ENEMY));
    }
}
