//! Area: one loaded section of the world
//!
//! An area owns its static colliders, portals and mechanism table. The
//! renderer-facing layer stack is kept apart from the mechanism table so it
//! can be torn down and rebuilt on every visit while mechanism state
//! survives.

use std::collections::{HashMap, HashSet};

use crate::foundation::math::{utils, Vec2};
use crate::mechanism::{Mechanism, MechanismContext, MechanismKind, MechanismRequest, MechanismState, PresenceEdge};
use crate::physics::BoxCollider;
use super::types::{AreaBounds, AreaData, PortalData};

/// Upper bound on request resolution rounds per frame. Requests raised while
/// resolving (a completed sequence opening a door) are handled in the next
/// round; anything left after the last round is dropped.
pub const MAX_REQUEST_ROUNDS: usize = 8;

/// Kind of renderer layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderLayerKind {
    /// Background image
    Background,
    /// Static level geometry
    Geometry,
    /// Mechanism sprites
    Mechanisms,
    /// Portal effects
    Portals,
}

/// One renderer layer
#[derive(Debug, Clone, PartialEq)]
pub struct RenderLayer {
    /// Layer kind
    pub kind: RenderLayerKind,
    /// Resource key the renderer uses for this layer
    pub resource: String,
}

/// Rebuildable renderer layer stack
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderLayers {
    layers: Vec<RenderLayer>,
    generation: u32,
}

impl RenderLayers {
    /// Rebuild the stack for an area
    pub fn rebuild(&mut self, area_id: &str) {
        self.layers = vec![
            RenderLayer { kind: RenderLayerKind::Background, resource: format!("{}_bg", area_id) },
            RenderLayer { kind: RenderLayerKind::Geometry, resource: format!("{}_geometry", area_id) },
            RenderLayer { kind: RenderLayerKind::Mechanisms, resource: format!("{}_mechanisms", area_id) },
            RenderLayer { kind: RenderLayerKind::Portals, resource: format!("{}_portals", area_id) },
        ];
        self.generation += 1;
    }

    /// Drop every layer
    pub fn clear(&mut self) {
        self.layers.clear();
    }

    /// Current layers, back to front
    pub fn layers(&self) -> &[RenderLayer] {
        &self.layers
    }

    /// Whether layers are built
    pub fn is_initialized(&self) -> bool {
        !self.layers.is_empty()
    }

    /// Number of rebuilds so far
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// One section of the world
#[derive(Debug)]
pub struct Area {
    data: AreaData,
    portals: Vec<PortalData>,
    colliders: Vec<BoxCollider>,
    mechanisms: HashMap<String, Mechanism>,
    render_layers: RenderLayers,
}

impl Area {
    /// Create an empty area
    pub fn new(data: AreaData) -> Self {
        Self {
            data,
            portals: Vec::new(),
            colliders: Vec::new(),
            mechanisms: HashMap::new(),
            render_layers: RenderLayers::default(),
        }
    }

    /// Area id
    pub fn id(&self) -> &str {
        &self.data.id
    }

    /// Descriptive data
    pub fn data(&self) -> &AreaData {
        &self.data
    }

    /// Mutable descriptive data
    pub fn data_mut(&mut self) -> &mut AreaData {
        &mut self.data
    }

    /// Covered rectangle
    pub fn bounds(&self) -> AreaBounds {
        self.data.bounds
    }

    /// Add a portal
    pub fn add_portal(&mut self, portal: PortalData) {
        self.portals.push(portal);
    }

    /// Portals in insertion order
    pub fn portals(&self) -> &[PortalData] {
        &self.portals
    }

    /// Mutable portals (unlocking, condition updates)
    pub fn portals_mut(&mut self) -> &mut [PortalData] {
        &mut self.portals
    }

    /// Whether any portal leads to `area_id`
    pub fn has_portal_to(&self, area_id: &str) -> bool {
        self.portals.iter().any(|portal| portal.target_area_id == area_id)
    }

    /// Add a static collider. Invalid colliders are rejected.
    pub fn add_collider(&mut self, collider: BoxCollider) -> bool {
        if !collider.is_valid() {
            log::warn!("Area '{}': rejected invalid static collider", self.data.id);
            return false;
        }
        self.colliders.push(collider);
        true
    }

    /// Static colliders
    pub fn colliders(&self) -> &[BoxCollider] {
        &self.colliders
    }

    /// Everything that can block movement: static colliders plus door colliders
    pub fn solid_colliders(&self) -> Vec<&BoxCollider> {
        let doors = self
            .mechanisms
            .values()
            .filter(|mechanism| mechanism.kind() == MechanismKind::Door)
            .filter_map(Mechanism::collider);
        self.colliders.iter().chain(doors).collect()
    }

    /// Add a mechanism. A duplicate id is rejected and the existing one kept.
    pub fn add_mechanism(&mut self, mechanism: impl Into<Mechanism>) -> bool {
        let mechanism = mechanism.into();
        if self.mechanisms.contains_key(mechanism.id()) {
            log::warn!(
                "Area '{}': mechanism '{}' already exists, ignoring duplicate",
                self.data.id,
                mechanism.id()
            );
            return false;
        }
        self.mechanisms.insert(mechanism.id().to_string(), mechanism);
        true
    }

    /// Mechanism by id
    pub fn get_mechanism(&self, id: &str) -> Option<&Mechanism> {
        self.mechanisms.get(id)
    }

    /// Mutable mechanism by id
    pub fn get_mechanism_mut(&mut self, id: &str) -> Option<&mut Mechanism> {
        self.mechanisms.get_mut(id)
    }

    /// Mechanism table
    pub fn mechanisms(&self) -> &HashMap<String, Mechanism> {
        &self.mechanisms
    }

    /// Mechanism ids, sorted
    pub fn mechanism_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.mechanisms.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Update every mechanism once
    pub fn update_mechanisms(&mut self, delta_time: f32, ctx: &mut MechanismContext<'_>) {
        for mechanism in self.mechanisms.values_mut() {
            mechanism.update(delta_time, ctx);
        }
    }

    /// Check every trigger against the player and wire presence changes.
    ///
    /// Entering range fires proximity triggers and asks the trigger's target
    /// mechanism to activate. Leaving range asks the target to deactivate when
    /// the trigger needs the player present. Triggers whose effect already
    /// addresses a mechanism (gates, sequences) raise their own requests.
    pub fn track_trigger_presence(&mut self, ctx: &mut MechanismContext<'_>) {
        let player = ctx.player;
        for mechanism in self.mechanisms.values_mut() {
            let Some(trigger) = mechanism.as_trigger_mut() else {
                continue;
            };

            let in_range = player.is_some_and(|player| trigger.is_player_in_range(player));
            let edge = trigger.track_presence(in_range);
            let forwards_target = trigger.effect().has_target() && !trigger.effect().targets_mechanism();

            match edge {
                PresenceEdge::Entered => {
                    if trigger.condition().requires_interaction {
                        continue;
                    }
                    log::debug!("Player entered trigger '{}'", trigger.id());
                    trigger.activate(ctx);
                    if forwards_target {
                        ctx.request(MechanismRequest::Activate(trigger.effect().target_id.clone()));
                    }
                }
                PresenceEdge::Exited => {
                    log::debug!("Player left trigger '{}'", trigger.id());
                    if trigger.condition().requires_player_presence && forwards_target {
                        ctx.request(MechanismRequest::Deactivate(trigger.effect().target_id.clone()));
                    }
                }
                PresenceEdge::Unchanged => {}
            }
        }
    }

    /// Fire interaction triggers the player is in range of. Returns how many fired.
    pub fn interact(&mut self, ctx: &mut MechanismContext<'_>) -> usize {
        let mut fired = 0;
        for mechanism in self.mechanisms.values_mut() {
            let Some(trigger) = mechanism.as_trigger_mut() else {
                continue;
            };
            if trigger.interact(ctx) {
                fired += 1;
                if trigger.effect().has_target() && !trigger.effect().targets_mechanism() {
                    ctx.request(MechanismRequest::Activate(trigger.effect().target_id.clone()));
                }
            }
        }
        fired
    }

    /// Apply queued requests to their target mechanisms.
    ///
    /// Identical requests within a round are applied once. Unknown targets are
    /// a no-op. Returns the number of requests applied.
    pub fn resolve_requests(&mut self, ctx: &mut MechanismContext<'_>) -> usize {
        let mut applied = 0;

        for _ in 0..MAX_REQUEST_ROUNDS {
            let requests = ctx.outbox.take_requests();
            if requests.is_empty() {
                return applied;
            }

            let mut seen = HashSet::new();
            for request in requests {
                if !seen.insert(request.clone()) {
                    continue;
                }
                if self.apply_request(&request, ctx) {
                    applied += 1;
                }
            }
        }

        let dropped = ctx.outbox.take_requests();
        if !dropped.is_empty() {
            log::warn!(
                "Area '{}': dropped {} mechanism requests after {} rounds",
                self.data.id,
                dropped.len(),
                MAX_REQUEST_ROUNDS
            );
        }
        applied
    }

    fn apply_request(&mut self, request: &MechanismRequest, ctx: &mut MechanismContext<'_>) -> bool {
        let Some(mechanism) = self.mechanisms.get_mut(request.target()) else {
            log::debug!(
                "Area '{}': no mechanism '{}' for {:?}",
                self.data.id,
                request.target(),
                request
            );
            return false;
        };

        match request {
            MechanismRequest::Activate(_) => mechanism.activate(ctx),
            MechanismRequest::Deactivate(_) => mechanism.deactivate(ctx),
            MechanismRequest::SequenceStep { step_id, .. } => {
                let Some(sequence) = mechanism.as_sequence_mut() else {
                    log::warn!("Area '{}': '{}' is not a sequence", self.data.id, request.target());
                    return false;
                };
                match sequence.state() {
                    MechanismState::Finished => return false,
                    MechanismState::Active => {}
                    _ => sequence.activate(ctx),
                }
                sequence.activate_trigger(step_id, ctx);
            }
        }
        true
    }

    /// Activate every mechanism whose collider corner lies within `radius`
    /// of `position`. Returns how many were activated.
    pub fn activate_mechanisms_in_range(
        &mut self,
        position: Vec2,
        radius: f32,
        ctx: &mut MechanismContext<'_>,
    ) -> usize {
        let mut activated = 0;
        for mechanism in self.mechanisms.values_mut() {
            let in_range = mechanism
                .collider()
                .is_some_and(|collider| utils::distance(collider.position(), position) <= radius);
            if in_range {
                mechanism.activate(ctx);
                activated += 1;
            }
        }
        activated
    }

    /// Build the renderer layer stack. Mechanism state is untouched.
    pub fn initialize_renderer(&mut self) {
        self.render_layers.rebuild(&self.data.id);
        log::debug!(
            "Area '{}': renderer layers rebuilt ({} mechanisms kept)",
            self.data.id,
            self.mechanisms.len()
        );
    }

    /// Tear down the renderer layer stack. Mechanism state is untouched.
    pub fn unload_resources(&mut self) {
        self.render_layers.clear();
    }

    /// Renderer layer stack
    pub fn render_layers(&self) -> &RenderLayers {
        &self.render_layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mechanism::{
        Door, DoorState, EffectType, MechanismEffect, MechanismOutbox, NoEffectTargets, Sequence, Trigger,
        TriggerCondition,
    };
    use crate::physics::CollisionLayers;

    fn area() -> Area {
        Area::new(AreaData::new("hall", AreaBounds::new(Vec2::zeros(), Vec2::new(640.0, 480.0))))
    }

    fn door(id: &str) -> Door {
        Door::new(id, Vec2::new(200.0, 0.0), Vec2::new(16.0, 64.0))
    }

    #[test]
    fn test_duplicate_mechanism_rejected() {
        let mut area = area();
        assert!(area.add_mechanism(door("d1")));
        assert!(!area.add_mechanism(Sequence::new("d1", Vec::new())));
        assert_eq!(area.mechanisms().len(), 1);
        assert_eq!(area.get_mechanism("d1").map(Mechanism::kind), Some(MechanismKind::Door));
        assert_eq!(area.mechanism_ids(), vec!["d1"]);
    }

    #[test]
    fn test_flat_collider_never_reaches_area() {
        let mut area = area();
        let wall = BoxCollider::with_layer(Vec2::zeros(), Vec2::new(10.0, 10.0), CollisionLayers::WALL);
        assert!(area.add_collider(wall));

        let flat = ron::from_str::<BoxCollider>(
            "(position: (0.0, 0.0), size: (0.0, 5.0), layer: \"WALL\", mask: \"PLAYER\")",
        );
        assert!(flat.is_err());
        assert_eq!(area.colliders().len(), 1);
    }

    #[test]
    fn test_solid_colliders_include_doors_not_triggers() {
        let mut area = area();
        area.add_collider(BoxCollider::with_layer(Vec2::zeros(), Vec2::new(10.0, 10.0), CollisionLayers::WALL));
        area.add_mechanism(door("d1"));
        area.add_mechanism(
            Trigger::new("t1", TriggerCondition::proximity(20.0), MechanismEffect::default())
                .with_collider(BoxCollider::with_layer(Vec2::zeros(), Vec2::new(8.0, 8.0), CollisionLayers::TRIGGER)),
        );
        assert_eq!(area.solid_colliders().len(), 2);
    }

    #[test]
    fn test_requests_resolve_after_updates() {
        let mut area = area();
        area.add_mechanism(door("d1"));
        area.add_mechanism(Sequence::new("altar", vec!["rune".to_string()]).with_on_complete("d1"));

        let mut targets = NoEffectTargets;
        let mut outbox = MechanismOutbox::new();
        let mut ctx = MechanismContext::new(&mut targets, &mut outbox);
        ctx.request(MechanismRequest::SequenceStep {
            sequence_id: "altar".to_string(),
            step_id: "rune".to_string(),
        });
        ctx.request(MechanismRequest::Activate("missing".to_string()));

        let applied = area.resolve_requests(&mut ctx);
        assert_eq!(applied, 2);
        assert_eq!(area.get_mechanism("altar").map(Mechanism::state), Some(MechanismState::Finished));
        let door = area.get_mechanism("d1").and_then(Mechanism::as_door);
        assert_eq!(door.map(Door::door_state), Some(DoorState::Opening));
    }

    #[test]
    fn test_duplicate_requests_applied_once() {
        let mut area = area();
        area.add_mechanism(Sequence::new("altar", vec!["a".to_string(), "a".to_string()]));

        let mut targets = NoEffectTargets;
        let mut outbox = MechanismOutbox::new();
        let mut ctx = MechanismContext::new(&mut targets, &mut outbox);
        for _ in 0..2 {
            ctx.request(MechanismRequest::SequenceStep {
                sequence_id: "altar".to_string(),
                step_id: "a".to_string(),
            });
        }
        area.resolve_requests(&mut ctx);

        let sequence = area.get_mechanism("altar").and_then(Mechanism::as_sequence);
        assert_eq!(sequence.map(Sequence::current_step), Some(1));
    }

    #[test]
    fn test_presence_wiring_opens_and_closes_target() {
        let mut area = area();
        area.add_mechanism(door("d1"));
        area.add_mechanism(
            Trigger::new("plate", TriggerCondition::proximity(30.0), MechanismEffect::new(EffectType::None, "d1"))
                .with_collider(BoxCollider::with_layer(Vec2::new(100.0, 100.0), Vec2::new(10.0, 10.0), CollisionLayers::TRIGGER)),
        );

        let near = BoxCollider::with_layer(Vec2::new(100.0, 110.0), Vec2::new(10.0, 10.0), CollisionLayers::PLAYER);
        let far = BoxCollider::with_layer(Vec2::new(400.0, 400.0), Vec2::new(10.0, 10.0), CollisionLayers::PLAYER);
        let mut targets = NoEffectTargets;
        let mut outbox = MechanismOutbox::new();

        {
            let mut ctx = MechanismContext::new(&mut targets, &mut outbox).with_player(Some(&near));
            area.track_trigger_presence(&mut ctx);
            area.resolve_requests(&mut ctx);
        }
        let state = |area: &Area| area.get_mechanism("d1").and_then(Mechanism::as_door).map(Door::door_state);
        assert_eq!(state(&area), Some(DoorState::Opening));

        {
            let mut ctx = MechanismContext::new(&mut targets, &mut outbox).with_player(Some(&far));
            area.update_mechanisms(0.1, &mut ctx);
            area.track_trigger_presence(&mut ctx);
            area.resolve_requests(&mut ctx);
        }
        assert_eq!(state(&area), Some(DoorState::Closing));
    }

    #[test]
    fn test_activate_in_range_uses_collider_corner() {
        let mut area = area();
        area.add_mechanism(door("d1"));
        let mut targets = NoEffectTargets;
        let mut outbox = MechanismOutbox::new();
        let mut ctx = MechanismContext::new(&mut targets, &mut outbox);

        assert_eq!(area.activate_mechanisms_in_range(Vec2::new(0.0, 0.0), 100.0, &mut ctx), 0);
        assert_eq!(area.activate_mechanisms_in_range(Vec2::new(180.0, 0.0), 20.0, &mut ctx), 1);
    }

    #[test]
    fn test_renderer_rebuild_keeps_mechanisms() {
        let mut area = area();
        area.add_mechanism(door("d1"));
        area.initialize_renderer();
        assert!(area.render_layers().is_initialized());

        area.unload_resources();
        assert!(!area.render_layers().is_initialized());
        assert_eq!(area.mechanisms().len(), 1);

        area.initialize_renderer();
        assert_eq!(area.render_layers().generation(), 2);
        assert_eq!(area.render_layers().layers()[0].resource, "hall_bg");
    }
}
