//! Trigger mechanism
//!
//! Applies an effect when activated and keeps it running while its condition
//! holds. Proximity is a pure distance check between collider centers and
//! does not look at collision layers.

use crate::events::{Event, EventArg, EventType};
use crate::foundation::math::{utils, Vec2};
use crate::physics::BoxCollider;
use super::context::{MechanismContext, MechanismRequest};
use super::effect_target::EffectTarget;
use super::types::{EffectType, MechanismEffect, MechanismKind, MechanismState, TriggerCondition};

/// Paths shorter than this do not move
const MIN_PATH_LENGTH: f32 = 1e-4;

/// Change in player presence since the previous check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceEdge {
    /// The player just came into range
    Entered,
    /// The player just left range
    Exited,
    /// Same as last check
    Unchanged,
}

/// Condition-driven effect
#[derive(Debug)]
pub struct Trigger {
    id: String,
    state: MechanismState,
    condition: TriggerCondition,
    effect: MechanismEffect,
    collider: Option<BoxCollider>,
    effect_timer: f32,
    periodic_elapsed: f32,
    player_inside: bool,
}

impl Trigger {
    /// Create an inactive trigger without a collider
    pub fn new(id: impl Into<String>, condition: TriggerCondition, effect: MechanismEffect) -> Self {
        Self {
            id: id.into(),
            state: MechanismState::Inactive,
            condition,
            effect,
            collider: None,
            effect_timer: 0.0,
            periodic_elapsed: 0.0,
            player_inside: false,
        }
    }

    /// Builder: attach a collider
    pub fn with_collider(mut self, collider: BoxCollider) -> Self {
        self.collider = Some(collider);
        self
    }

    /// Mechanism id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Lifecycle state
    pub fn state(&self) -> MechanismState {
        self.state
    }

    /// Always [`MechanismKind::Trigger`]
    pub fn kind(&self) -> MechanismKind {
        MechanismKind::Trigger
    }

    /// Activation condition
    pub fn condition(&self) -> &TriggerCondition {
        &self.condition
    }

    /// Configured effect
    pub fn effect(&self) -> &MechanismEffect {
        &self.effect
    }

    /// Seconds since the last activation
    pub fn effect_timer(&self) -> f32 {
        self.effect_timer
    }

    /// Attached collider
    pub fn collider(&self) -> Option<&BoxCollider> {
        self.collider.as_ref()
    }

    /// Mutable access to the attached collider
    pub fn collider_mut(&mut self) -> Option<&mut BoxCollider> {
        self.collider.as_mut()
    }

    /// Fire the effect. No-op while already active.
    pub fn activate(&mut self, ctx: &mut MechanismContext<'_>) {
        if self.state == MechanismState::Active {
            return;
        }
        self.state = MechanismState::Active;
        self.effect_timer = 0.0;
        self.periodic_elapsed = 0.0;
        self.apply_effect(ctx);
        ctx.emit(EventType::TriggerFired, &self.id);
    }

    /// Stop and undo reversible effects. No-op unless active.
    pub fn deactivate(&mut self, ctx: &mut MechanismContext<'_>) {
        if self.state != MechanismState::Active {
            return;
        }
        self.state = MechanismState::Inactive;
        self.remove_effect(ctx);
        ctx.emit(EventType::TriggerReleased, &self.id);
    }

    /// Fire in response to an explicit interaction.
    ///
    /// Only triggers that require interaction react, and only when the player
    /// is in range. Returns whether the trigger fired.
    pub fn interact(&mut self, ctx: &mut MechanismContext<'_>) -> bool {
        if !self.condition.requires_interaction || self.state == MechanismState::Active {
            return false;
        }
        let in_range = ctx.player.is_some_and(|player| self.is_player_in_range(player));
        if in_range {
            self.activate(ctx);
        }
        in_range
    }

    /// Advance timers, periodic effects and platform movement, then drop out
    /// if the condition no longer holds
    pub fn update(&mut self, delta_time: f32, ctx: &mut MechanismContext<'_>) {
        if self.state != MechanismState::Active {
            return;
        }

        self.effect_timer += delta_time;
        if self.effect.duration > 0.0 && self.effect_timer >= self.effect.duration {
            self.deactivate(ctx);
            self.state = MechanismState::Finished;
            return;
        }

        if self.effect.timing.periodic {
            self.periodic_elapsed += delta_time;
            if self.periodic_elapsed >= self.effect.timing.interval {
                self.apply_effect(ctx);
                self.periodic_elapsed = 0.0;
            }
        }

        if self.effect.effect_type == EffectType::MovePlatform {
            self.advance_platform();
        }

        if !self.check_conditions(ctx.player) {
            self.deactivate(ctx);
        }
    }

    /// Back to inactive with timers cleared
    pub fn reset(&mut self, ctx: &mut MechanismContext<'_>) {
        self.deactivate(ctx);
        self.effect_timer = 0.0;
        self.periodic_elapsed = 0.0;
        self.player_inside = false;
        self.state = MechanismState::Inactive;
    }

    /// Center-to-center distance check against the trigger radius
    /// (inclusive). A trigger without a collider never sees the player.
    pub fn is_player_in_range(&self, player: &BoxCollider) -> bool {
        match &self.collider {
            Some(collider) => {
                utils::distance(collider.center(), player.center()) <= self.condition.trigger_radius
            }
            None => false,
        }
    }

    /// Record the latest presence reading and report how it changed
    pub fn track_presence(&mut self, in_range: bool) -> PresenceEdge {
        let edge = match (self.player_inside, in_range) {
            (false, true) => PresenceEdge::Entered,
            (true, false) => PresenceEdge::Exited,
            _ => PresenceEdge::Unchanged,
        };
        self.player_inside = in_range;
        edge
    }

    /// Whether the last presence reading was in range
    pub fn is_player_inside(&self) -> bool {
        self.player_inside
    }

    fn check_conditions(&self, player: Option<&BoxCollider>) -> bool {
        if let Some(custom) = &self.condition.custom {
            if !custom() {
                return false;
            }
        }
        if self.condition.requires_player_presence {
            return player.is_some_and(|player| self.is_player_in_range(player));
        }
        true
    }

    fn apply_effect(&mut self, ctx: &mut MechanismContext<'_>) {
        match self.effect.effect_type {
            EffectType::None => {}
            EffectType::Damage | EffectType::Heal => {
                let amount = if self.effect.effect_type == EffectType::Damage {
                    -self.effect.value
                } else {
                    self.effect.value
                };
                if let Some(target) = self.find_target(ctx) {
                    target.modify_health(amount);
                }
            }
            EffectType::Buff | EffectType::Debuff => {
                if let Some(target) = self.find_target(ctx) {
                    target.apply_status_effect(&self.effect);
                }
            }
            EffectType::Teleport => {
                let destination = self.effect.movement.end;
                if let Some(target) = self.find_target(ctx) {
                    target.set_position(destination);
                }
            }
            EffectType::MovePlatform => match &self.collider {
                Some(collider) => self.effect.movement.start = collider.position(),
                None => log::warn!("Trigger '{}' moves a platform but has no collider", self.id),
            },
            EffectType::OpenGate => {
                if self.effect.has_target() {
                    ctx.request(MechanismRequest::Activate(self.effect.target_id.clone()));
                }
            }
            EffectType::AdvanceSequence => {
                if self.effect.has_target() {
                    ctx.request(MechanismRequest::SequenceStep {
                        sequence_id: self.effect.target_id.clone(),
                        step_id: self.id.clone(),
                    });
                }
            }
            EffectType::SpawnEnemy => {
                let position = self.collider.as_ref().map_or_else(Vec2::zeros, BoxCollider::center);
                let event = Event::new(EventType::EnemySpawnRequested, ctx.time)
                    .with_mechanism(&self.id)
                    .with_arg("target_id", EventArg::TargetId(self.effect.target_id.clone()))
                    .with_arg("position", EventArg::Position(position.x, position.y))
                    .with_arg("value", EventArg::Value(self.effect.value));
                ctx.emit_event(event);
            }
        }
    }

    fn remove_effect(&mut self, ctx: &mut MechanismContext<'_>) {
        match self.effect.effect_type {
            EffectType::Buff | EffectType::Debuff => {
                if let Some(target) = self.find_target(ctx) {
                    target.remove_status_effect(&self.effect);
                }
            }
            EffectType::MovePlatform => {
                let start = self.effect.movement.start;
                if let Some(collider) = &mut self.collider {
                    collider.set_position(start);
                }
            }
            EffectType::OpenGate => {
                if self.effect.has_target() {
                    ctx.request(MechanismRequest::Deactivate(self.effect.target_id.clone()));
                }
            }
            _ => {}
        }
    }

    fn find_target<'c>(
        &self,
        ctx: &'c mut MechanismContext<'_>,
    ) -> Option<&'c mut dyn EffectTarget> {
        if !self.effect.has_target() {
            return None;
        }
        let target = ctx.targets.find_target(&self.effect.target_id);
        if target.is_none() {
            log::debug!(
                "Trigger '{}': effect target '{}' is not registered",
                self.id, self.effect.target_id
            );
        }
        target
    }

    fn advance_platform(&mut self) {
        let movement = self.effect.movement;
        let Some(collider) = &mut self.collider else {
            return;
        };

        let total_distance = utils::distance(movement.start, movement.end);
        if total_distance < MIN_PATH_LENGTH {
            return;
        }

        let mut progress = self.effect_timer * movement.speed / total_distance;
        progress = if movement.looping { progress % 1.0 } else { progress.min(1.0) };

        collider.set_position(utils::lerp_vec2(movement.start, movement.end, progress));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mechanism::{EffectTargetRegistry, MechanismOutbox, NoEffectTargets};
    use crate::mechanism::types::{EffectMovement, EffectTiming};
    use crate::physics::CollisionLayers;
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Dummy {
        health: f32,
        statuses: i32,
        position: Option<Vec2>,
    }

    struct SharedDummy(Rc<RefCell<Dummy>>);

    impl EffectTarget for SharedDummy {
        fn modify_health(&mut self, amount: f32) {
            self.0.borrow_mut().health += amount;
        }
        fn apply_status_effect(&mut self, _effect: &MechanismEffect) {
            self.0.borrow_mut().statuses += 1;
        }
        fn remove_status_effect(&mut self, _effect: &MechanismEffect) {
            self.0.borrow_mut().statuses -= 1;
        }
        fn set_position(&mut self, position: Vec2) {
            self.0.borrow_mut().position = Some(position);
        }
    }

    fn registry_with_dummy() -> (EffectTargetRegistry, Rc<RefCell<Dummy>>) {
        let dummy = Rc::new(RefCell::new(Dummy { health: 100.0, ..Default::default() }));
        let mut registry = EffectTargetRegistry::new();
        registry.register("hero", Box::new(SharedDummy(Rc::clone(&dummy))));
        (registry, dummy)
    }

    fn platform_x(trigger: &Trigger) -> f32 {
        trigger.collider().map_or(f32::NAN, |collider| collider.position().x)
    }

    fn plate(x: f32, y: f32) -> BoxCollider {
        BoxCollider::with_layer(Vec2::new(x, y), Vec2::new(10.0, 10.0), CollisionLayers::TRIGGER)
    }

    fn player(x: f32, y: f32) -> BoxCollider {
        BoxCollider::with_layer(Vec2::new(x, y), Vec2::new(10.0, 10.0), CollisionLayers::PLAYER)
    }

    #[test]
    fn test_range_boundary_is_inclusive() {
        let trigger = Trigger::new("t1", TriggerCondition::proximity(50.0), MechanismEffect::default())
            .with_collider(plate(0.0, 0.0));

        assert!(trigger.is_player_in_range(&player(50.0, 0.0)));
        assert!(!trigger.is_player_in_range(&player(50.01, 0.0)));
    }

    #[test]
    fn test_range_ignores_layers() {
        let mut collider = plate(0.0, 0.0);
        collider.disable_collision();
        let trigger = Trigger::new("t1", TriggerCondition::proximity(20.0), MechanismEffect::default())
            .with_collider(collider);

        assert!(trigger.is_player_in_range(&player(5.0, 5.0)));
    }

    #[test]
    fn test_no_collider_never_in_range() {
        let trigger = Trigger::new("t1", TriggerCondition::proximity(1000.0), MechanismEffect::default());
        assert!(!trigger.is_player_in_range(&player(0.0, 0.0)));
    }

    #[test]
    fn test_damage_and_heal_reach_target() {
        let (mut registry, dummy) = registry_with_dummy();
        let mut outbox = MechanismOutbox::new();
        let mut ctx = MechanismContext::new(&mut registry, &mut outbox);

        let mut trap = Trigger::new("trap", TriggerCondition::default(),
            MechanismEffect::new(EffectType::Damage, "hero").with_value(30.0));
        trap.activate(&mut ctx);
        trap.activate(&mut ctx);
        assert_relative_eq!(dummy.borrow().health, 70.0);

        let mut fountain = Trigger::new("fountain", TriggerCondition::default(),
            MechanismEffect::new(EffectType::Heal, "hero").with_value(10.0));
        fountain.activate(&mut ctx);
        assert_relative_eq!(dummy.borrow().health, 80.0);
    }

    #[test]
    fn test_unresolved_target_is_noop() {
        let mut targets = NoEffectTargets;
        let mut outbox = MechanismOutbox::new();
        let mut ctx = MechanismContext::new(&mut targets, &mut outbox);

        let mut trap = Trigger::new("trap", TriggerCondition::default(),
            MechanismEffect::new(EffectType::Damage, "nobody").with_value(30.0));
        trap.activate(&mut ctx);
        assert_eq!(trap.state(), MechanismState::Active);
    }

    #[test]
    fn test_buff_removed_on_deactivate() {
        let (mut registry, dummy) = registry_with_dummy();
        let mut outbox = MechanismOutbox::new();
        let mut ctx = MechanismContext::new(&mut registry, &mut outbox);

        let mut shrine = Trigger::new("shrine", TriggerCondition::default(),
            MechanismEffect::new(EffectType::Buff, "hero").with_value(5.0));
        shrine.activate(&mut ctx);
        assert_eq!(dummy.borrow().statuses, 1);
        shrine.deactivate(&mut ctx);
        assert_eq!(dummy.borrow().statuses, 0);
        assert_eq!(shrine.state(), MechanismState::Inactive);
    }

    #[test]
    fn test_duration_finishes_trigger() {
        let mut targets = NoEffectTargets;
        let mut outbox = MechanismOutbox::new();
        let mut ctx = MechanismContext::new(&mut targets, &mut outbox);

        let mut trigger = Trigger::new("timed", TriggerCondition::default(),
            MechanismEffect::default().with_duration(1.0));
        trigger.activate(&mut ctx);
        trigger.update(0.5, &mut ctx);
        assert_eq!(trigger.state(), MechanismState::Active);
        trigger.update(0.5, &mut ctx);
        assert_eq!(trigger.state(), MechanismState::Finished);
    }

    #[test]
    fn test_periodic_effect_reapplies() {
        let (mut registry, dummy) = registry_with_dummy();
        let mut outbox = MechanismOutbox::new();
        let mut ctx = MechanismContext::new(&mut registry, &mut outbox);

        let mut effect = MechanismEffect::new(EffectType::Damage, "hero").with_value(1.0);
        effect.timing = EffectTiming { periodic: true, interval: 0.5 };
        let mut spikes = Trigger::new("spikes", TriggerCondition::default(), effect);

        spikes.activate(&mut ctx);
        for _ in 0..4 {
            spikes.update(0.25, &mut ctx);
        }
        assert_relative_eq!(dummy.borrow().health, 97.0);
    }

    #[test]
    fn test_platform_moves_and_resets() {
        let mut targets = NoEffectTargets;
        let mut outbox = MechanismOutbox::new();
        let mut ctx = MechanismContext::new(&mut targets, &mut outbox);

        let movement = EffectMovement {
            start: Vec2::zeros(),
            end: Vec2::new(100.0, 0.0),
            speed: 50.0,
            looping: false,
        };
        let mut platform = Trigger::new("lift", TriggerCondition::default(),
            MechanismEffect::new(EffectType::MovePlatform, "").with_movement(movement))
            .with_collider(plate(0.0, 0.0));

        platform.activate(&mut ctx);
        platform.update(1.0, &mut ctx);
        assert_relative_eq!(platform_x(&platform), 50.0);

        for _ in 0..5 {
            platform.update(1.0, &mut ctx);
        }
        assert_relative_eq!(platform_x(&platform), 100.0);

        platform.deactivate(&mut ctx);
        assert_relative_eq!(platform_x(&platform), 0.0);
    }

    #[test]
    fn test_looping_platform_wraps() {
        let mut targets = NoEffectTargets;
        let mut outbox = MechanismOutbox::new();
        let mut ctx = MechanismContext::new(&mut targets, &mut outbox);

        let movement = EffectMovement {
            start: Vec2::zeros(),
            end: Vec2::new(100.0, 0.0),
            speed: 100.0,
            looping: true,
        };
        let mut platform = Trigger::new("ferry", TriggerCondition::default(),
            MechanismEffect::new(EffectType::MovePlatform, "").with_movement(movement))
            .with_collider(plate(0.0, 0.0));

        platform.activate(&mut ctx);
        platform.update(1.25, &mut ctx);
        assert_relative_eq!(platform_x(&platform), 25.0);
    }

    #[test]
    fn test_presence_condition_drops_trigger() {
        let far = player(500.0, 0.0);
        let near = player(5.0, 0.0);
        let mut targets = NoEffectTargets;
        let mut outbox = MechanismOutbox::new();

        let mut trigger = Trigger::new("plate", TriggerCondition::proximity(20.0),
            MechanismEffect::new(EffectType::OpenGate, "d1"))
            .with_collider(plate(0.0, 0.0));

        {
            let mut ctx = MechanismContext::new(&mut targets, &mut outbox).with_player(Some(&near));
            trigger.activate(&mut ctx);
            trigger.update(0.1, &mut ctx);
            assert_eq!(trigger.state(), MechanismState::Active);
        }
        {
            let mut ctx = MechanismContext::new(&mut targets, &mut outbox).with_player(Some(&far));
            trigger.update(0.1, &mut ctx);
            assert_eq!(trigger.state(), MechanismState::Inactive);
        }

        assert_eq!(outbox.requests(), &[
            MechanismRequest::Activate("d1".to_string()),
            MechanismRequest::Deactivate("d1".to_string()),
        ]);
    }

    #[test]
    fn test_custom_condition() {
        let mut targets = NoEffectTargets;
        let mut outbox = MechanismOutbox::new();
        let mut ctx = MechanismContext::new(&mut targets, &mut outbox);

        let mut never = Trigger::new("never", TriggerCondition::default().with_custom(|| false),
            MechanismEffect::default());
        never.activate(&mut ctx);
        never.update(0.1, &mut ctx);
        assert_eq!(never.state(), MechanismState::Inactive);
    }

    #[test]
    fn test_advance_sequence_and_spawn_requests() {
        let mut targets = NoEffectTargets;
        let mut outbox = MechanismOutbox::new();
        let mut ctx = MechanismContext::new(&mut targets, &mut outbox);

        let mut step = Trigger::new("rune_a", TriggerCondition::default(),
            MechanismEffect::new(EffectType::AdvanceSequence, "altar"));
        step.activate(&mut ctx);

        let mut spawner = Trigger::new("ambush", TriggerCondition::default(),
            MechanismEffect::new(EffectType::SpawnEnemy, "skeleton").with_value(3.0))
            .with_collider(plate(10.0, 10.0));
        spawner.activate(&mut ctx);

        assert_eq!(outbox.requests(), &[MechanismRequest::SequenceStep {
            sequence_id: "altar".to_string(),
            step_id: "rune_a".to_string(),
        }]);
        let spawn = outbox.events().iter()
            .find(|e| e.event_type == EventType::EnemySpawnRequested);
        assert_eq!(spawn.and_then(Event::get_target_id), Some("skeleton"));
        assert_eq!(spawn.and_then(Event::get_position), Some((15.0, 15.0)));
    }

    #[test]
    fn test_presence_edges() {
        let mut trigger = Trigger::new("t", TriggerCondition::proximity(10.0), MechanismEffect::default());
        assert_eq!(trigger.track_presence(false), PresenceEdge::Unchanged);
        assert_eq!(trigger.track_presence(true), PresenceEdge::Entered);
        assert_eq!(trigger.track_presence(true), PresenceEdge::Unchanged);
        assert_eq!(trigger.track_presence(false), PresenceEdge::Exited);
    }

    #[test]
    fn test_interaction_requires_range() {
        let near = player(0.0, 0.0);
        let far = player(300.0, 0.0);
        let mut targets = NoEffectTargets;
        let mut outbox = MechanismOutbox::new();

        let mut lever = Trigger::new("lever", TriggerCondition::proximity(30.0).with_interaction(),
            MechanismEffect::default())
            .with_collider(plate(0.0, 0.0));

        let mut ctx = MechanismContext::new(&mut targets, &mut outbox).with_player(Some(&far));
        assert!(!lever.interact(&mut ctx));
        ctx.player = Some(&near);
        assert!(lever.interact(&mut ctx));
        assert_eq!(lever.state(), MechanismState::Active);
    }
}
