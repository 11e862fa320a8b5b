//! Shared mechanism data types
//!
//! Plain data describing what a mechanism is and what its effect does.
//! Effect descriptions are serde-friendly so level files can embed them.

use serde::{Serialize, Deserialize};
use std::fmt;

use crate::foundation::math::Vec2;

/// Category of a mechanism
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MechanismKind {
    /// Proximity/condition driven effect
    Trigger,
    /// Ordered input puzzle
    Sequence,
    /// Door with an open/close animation
    Door,
    /// Destructible object
    Breakable,
    /// Platform following a path
    MovingPlatform,
    /// Damaging hazard
    Trap,
    /// Region applying a status effect
    BuffZone,
}

/// Coarse lifecycle state shared by every mechanism
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MechanismState {
    /// Idle
    #[default]
    Inactive,
    /// Running its behavior
    Active,
    /// Done, stays here until reset or re-activated
    Finished,
    /// Out of order (a malfunctioning door)
    Broken,
}

/// What a trigger does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EffectType {
    /// No effect of its own
    #[default]
    None,
    /// Lower the target's health by `value`
    Damage,
    /// Raise the target's health by `value`
    Heal,
    /// Apply a status effect, removed on deactivation
    Buff,
    /// Apply a negative status effect, removed on deactivation
    Debuff,
    /// Move the trigger's own collider along `movement`
    MovePlatform,
    /// Activate the target mechanism while the trigger is active
    OpenGate,
    /// Ask the spawner collaborator for an enemy
    SpawnEnemy,
    /// Move the target to `movement.end`
    Teleport,
    /// Feed this trigger's id as a step into the target sequence
    AdvanceSequence,
}

/// Periodic re-application settings
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectTiming {
    /// Re-apply the effect every `interval` seconds while active
    pub periodic: bool,
    /// Seconds between applications
    pub interval: f32,
}

/// Linear path for platform and teleport effects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectMovement {
    /// Path start; overwritten with the collider position when a platform starts
    pub start: Vec2,
    /// Path end (also the teleport destination)
    pub end: Vec2,
    /// Units per second
    pub speed: f32,
    /// Wrap back to the start instead of stopping at the end
    pub looping: bool,
}

impl Default for EffectMovement {
    fn default() -> Self {
        Self {
            start: Vec2::zeros(),
            end: Vec2::zeros(),
            speed: 0.0,
            looping: false,
        }
    }
}

/// Effect applied by a trigger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MechanismEffect {
    /// Effect kind
    pub effect_type: EffectType,
    /// Effect target or mechanism id; empty means no target
    pub target_id: String,
    /// Seconds before the trigger finishes on its own; 0 means unlimited
    pub duration: f32,
    /// Magnitude (health delta, buff strength, ...)
    pub value: f32,
    /// Direction hint for collaborators (knockback, spawn facing)
    pub direction: Vec2,
    /// Periodic re-application
    pub timing: EffectTiming,
    /// Path for movement and teleport effects
    pub movement: EffectMovement,
}

impl MechanismEffect {
    /// Effect of the given kind aimed at `target_id`
    pub fn new(effect_type: EffectType, target_id: impl Into<String>) -> Self {
        Self {
            effect_type,
            target_id: target_id.into(),
            ..Default::default()
        }
    }

    /// Builder: magnitude
    pub fn with_value(mut self, value: f32) -> Self {
        self.value = value;
        self
    }

    /// Builder: duration in seconds
    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    /// Builder: periodic re-application
    pub fn with_interval(mut self, interval: f32) -> Self {
        self.timing = EffectTiming { periodic: true, interval };
        self
    }

    /// Builder: movement path
    pub fn with_movement(mut self, movement: EffectMovement) -> Self {
        self.movement = movement;
        self
    }

    /// Whether the effect names a target
    pub fn has_target(&self) -> bool {
        !self.target_id.is_empty()
    }

    /// Whether the effect talks to another mechanism through requests
    pub fn targets_mechanism(&self) -> bool {
        matches!(self.effect_type, EffectType::OpenGate | EffectType::AdvanceSequence)
    }
}

impl Default for MechanismEffect {
    fn default() -> Self {
        Self {
            effect_type: EffectType::None,
            target_id: String::new(),
            duration: 0.0,
            value: 0.0,
            direction: Vec2::zeros(),
            timing: EffectTiming::default(),
            movement: EffectMovement::default(),
        }
    }
}

/// Extra activation predicate supplied by game code
pub type CustomCondition = Box<dyn Fn() -> bool>;

/// When a trigger is allowed to stay active
#[derive(Default)]
pub struct TriggerCondition {
    /// The player must stay within `trigger_radius`
    pub requires_player_presence: bool,
    /// Fires only on an explicit interaction, never on proximity alone
    pub requires_interaction: bool,
    /// Center-to-center distance at which the player counts as present
    pub trigger_radius: f32,
    /// Optional predicate; the trigger deactivates when it returns false
    pub custom: Option<CustomCondition>,
}

impl TriggerCondition {
    /// Presence condition with the given radius
    pub fn proximity(radius: f32) -> Self {
        Self {
            requires_player_presence: true,
            trigger_radius: radius,
            ..Default::default()
        }
    }

    /// Builder: custom predicate
    pub fn with_custom(mut self, custom: impl Fn() -> bool + 'static) -> Self {
        self.custom = Some(Box::new(custom));
        self
    }

    /// Builder: require an explicit interaction
    pub fn with_interaction(mut self) -> Self {
        self.requires_interaction = true;
        self
    }
}

impl fmt::Debug for TriggerCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggerCondition")
            .field("requires_player_presence", &self.requires_player_presence)
            .field("requires_interaction", &self.requires_interaction)
            .field("trigger_radius", &self.trigger_radius)
            .field("custom", &self.custom.is_some())
            .finish()
    }
}
