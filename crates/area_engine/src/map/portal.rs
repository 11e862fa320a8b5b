//! Portal checks
//!
//! Portal overlap is pure rectangle geometry; collision layers play no part.

use crate::physics::{Aabb, BoxCollider};
use super::types::{PortalConditionKind, PortalData};

/// Whether a portal may be used right now
pub fn check_portal_conditions(portal: &PortalData) -> bool {
    if portal.is_locked {
        return false;
    }
    match portal.condition.kind {
        PortalConditionKind::None => true,
        PortalConditionKind::Key
        | PortalConditionKind::Quest
        | PortalConditionKind::Level
        | PortalConditionKind::Custom => portal.condition.is_met,
    }
}

/// Whether the player overlaps the portal rectangle
pub fn is_in_portal_range(player: &BoxCollider, portal: &PortalData) -> bool {
    Aabb::from_position_size(portal.position, portal.size).overlaps(&player.aabb())
}

/// First usable portal the player overlaps.
///
/// Malformed portals are skipped with a warning; locked portals and portals
/// with unmet conditions are skipped silently.
pub fn check_portal_trigger<'p>(player: &BoxCollider, portals: &'p [PortalData]) -> Option<&'p PortalData> {
    portals.iter().find(|portal| {
        if !portal.is_well_formed() {
            log::warn!(
                "Skipping malformed portal to '{}' at ({}, {}) size ({}, {})",
                portal.target_area_id, portal.position.x, portal.position.y, portal.size.x, portal.size.y
            );
            return false;
        }
        check_portal_conditions(portal) && is_in_portal_range(player, portal)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;
    use crate::map::types::PortalCondition;
    use crate::physics::CollisionLayers;

    fn portal(x: f32, y: f32, target: &str) -> PortalData {
        PortalData::new(target, Vec2::new(x, y), Vec2::new(32.0, 32.0), Vec2::new(10.0, 10.0))
    }

    fn player(x: f32, y: f32) -> BoxCollider {
        BoxCollider::with_layer(Vec2::new(x, y), Vec2::new(16.0, 16.0), CollisionLayers::PLAYER)
    }

    #[test]
    fn test_first_overlapping_portal_wins() {
        let portals = vec![portal(500.0, 500.0, "far"), portal(100.0, 100.0, "b"), portal(110.0, 110.0, "c")];
        let hit = check_portal_trigger(&player(105.0, 105.0), &portals);
        assert_eq!(hit.map(|p| p.target_area_id.as_str()), Some("b"));
    }

    #[test]
    fn test_layers_do_not_matter() {
        let mut ghost = player(105.0, 105.0);
        ghost.disable_collision();
        let portals = vec![portal(100.0, 100.0, "b")];
        assert!(check_portal_trigger(&ghost, &portals).is_some());
    }

    #[test]
    fn test_locked_and_unmet_portals_skipped() {
        let mut locked = portal(100.0, 100.0, "locked");
        locked.is_locked = true;
        let mut keyed = portal(100.0, 100.0, "keyed");
        keyed.condition = PortalCondition {
            kind: PortalConditionKind::Key,
            required_id: "bronze_key".to_string(),
            ..Default::default()
        };
        let portals = vec![locked, keyed.clone()];
        assert!(check_portal_trigger(&player(105.0, 105.0), &portals).is_none());

        keyed.condition.is_met = true;
        assert!(check_portal_conditions(&keyed));
    }

    #[test]
    fn test_malformed_portal_skipped() {
        let mut broken = portal(100.0, 100.0, "broken");
        broken.size = Vec2::new(0.0, 32.0);
        let portals = vec![broken, portal(100.0, 100.0, "b")];
        let hit = check_portal_trigger(&player(105.0, 105.0), &portals);
        assert_eq!(hit.map(|p| p.target_area_id.as_str()), Some("b"));
    }
}
