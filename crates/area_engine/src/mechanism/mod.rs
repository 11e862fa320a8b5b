//! Interactive level mechanisms
//!
//! Every mechanism is a small state machine with an id that is unique inside
//! its area. The concrete kinds are variants of [`Mechanism`] and share the
//! activate/deactivate/update interface through pattern matching.
//!
//! Mechanisms do not call each other. Cross-mechanism effects travel through
//! the [`MechanismOutbox`] in the [`MechanismContext`] and are resolved by the
//! owning area after every mechanism has been updated for the frame.
//!
//! # Module Organization
//!
//! - [`door`] - Door with a progress-coupled collider
//! - [`trigger`] - Proximity/condition driven effects
//! - [`sequence`] - Ordered step puzzles
//! - [`context`] - Per-frame context, requests and outbox
//! - [`effect_target`] - Capability used by trigger effects
//! - [`types`] - Shared enums and effect descriptions

pub mod context;
pub mod door;
pub mod effect_target;
pub mod sequence;
pub mod trigger;
pub mod types;

pub use context::{MechanismContext, MechanismOutbox, MechanismRequest};
pub use door::{Door, DoorState, COLLISION_DISABLE_THRESHOLD, DOOR_CLOSE_SPEED, DOOR_OPEN_SPEED};
pub use effect_target::{EffectTarget, EffectTargetRegistry, EffectTargets, NoEffectTargets};
pub use sequence::Sequence;
pub use trigger::{PresenceEdge, Trigger};
pub use types::{
    EffectMovement, EffectTiming, EffectType, MechanismEffect, MechanismKind, MechanismState,
    TriggerCondition,
};

use crate::physics::BoxCollider;

/// A mechanism of any kind
#[derive(Debug)]
pub enum Mechanism {
    /// Door
    Door(Door),
    /// Trigger
    Trigger(Trigger),
    /// Sequence
    Sequence(Sequence),
}

impl Mechanism {
    /// Unique id within the owning area
    pub fn id(&self) -> &str {
        match self {
            Self::Door(door) => door.id(),
            Self::Trigger(trigger) => trigger.id(),
            Self::Sequence(sequence) => sequence.id(),
        }
    }

    /// Mechanism category
    pub fn kind(&self) -> MechanismKind {
        match self {
            Self::Door(door) => door.kind(),
            Self::Trigger(trigger) => trigger.kind(),
            Self::Sequence(sequence) => sequence.kind(),
        }
    }

    /// Lifecycle state
    pub fn state(&self) -> MechanismState {
        match self {
            Self::Door(door) => door.state(),
            Self::Trigger(trigger) => trigger.state(),
            Self::Sequence(sequence) => sequence.state(),
        }
    }

    /// Currently active
    pub fn is_active(&self) -> bool {
        self.state() == MechanismState::Active
    }

    /// Finished
    pub fn is_finished(&self) -> bool {
        self.state() == MechanismState::Finished
    }

    /// Owned collider, if any
    pub fn collider(&self) -> Option<&BoxCollider> {
        match self {
            Self::Door(door) => Some(door.collider()),
            Self::Trigger(trigger) => trigger.collider(),
            Self::Sequence(_) => None,
        }
    }

    /// Mutable access to the owned collider
    pub fn collider_mut(&mut self) -> Option<&mut BoxCollider> {
        match self {
            Self::Door(door) => Some(door.collider_mut()),
            Self::Trigger(trigger) => trigger.collider_mut(),
            Self::Sequence(_) => None,
        }
    }

    /// Activate the mechanism
    pub fn activate(&mut self, ctx: &mut MechanismContext<'_>) {
        match self {
            Self::Door(door) => door.activate(ctx),
            Self::Trigger(trigger) => trigger.activate(ctx),
            Self::Sequence(sequence) => sequence.activate(ctx),
        }
    }

    /// Deactivate the mechanism
    pub fn deactivate(&mut self, ctx: &mut MechanismContext<'_>) {
        match self {
            Self::Door(door) => door.deactivate(ctx),
            Self::Trigger(trigger) => trigger.deactivate(ctx),
            Self::Sequence(sequence) => sequence.deactivate(ctx),
        }
    }

    /// Advance one frame
    pub fn update(&mut self, delta_time: f32, ctx: &mut MechanismContext<'_>) {
        match self {
            Self::Door(door) => door.update(delta_time, ctx),
            Self::Trigger(trigger) => trigger.update(delta_time, ctx),
            Self::Sequence(sequence) => sequence.update(delta_time, ctx),
        }
    }

    /// Return to the initial state
    pub fn reset(&mut self, ctx: &mut MechanismContext<'_>) {
        match self {
            Self::Door(door) => door.reset(),
            Self::Trigger(trigger) => trigger.reset(ctx),
            Self::Sequence(sequence) => sequence.reset(),
        }
    }

    /// Door view
    pub fn as_door(&self) -> Option<&Door> {
        match self {
            Self::Door(door) => Some(door),
            _ => None,
        }
    }

    /// Mutable door view
    pub fn as_door_mut(&mut self) -> Option<&mut Door> {
        match self {
            Self::Door(door) => Some(door),
            _ => None,
        }
    }

    /// Trigger view
    pub fn as_trigger(&self) -> Option<&Trigger> {
        match self {
            Self::Trigger(trigger) => Some(trigger),
            _ => None,
        }
    }

    /// Mutable trigger view
    pub fn as_trigger_mut(&mut self) -> Option<&mut Trigger> {
        match self {
            Self::Trigger(trigger) => Some(trigger),
            _ => None,
        }
    }

    /// Sequence view
    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Self::Sequence(sequence) => Some(sequence),
            _ => None,
        }
    }

    /// Mutable sequence view
    pub fn as_sequence_mut(&mut self) -> Option<&mut Sequence> {
        match self {
            Self::Sequence(sequence) => Some(sequence),
            _ => None,
        }
    }
}

impl From<Door> for Mechanism {
    fn from(door: Door) -> Self {
        Self::Door(door)
    }
}

impl From<Trigger> for Mechanism {
    fn from(trigger: Trigger) -> Self {
        Self::Trigger(trigger)
    }
}

impl From<Sequence> for Mechanism {
    fn from(sequence: Sequence) -> Self {
        Self::Sequence(sequence)
    }
}
