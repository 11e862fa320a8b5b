//! Per-frame mechanism context
//!
//! Mechanisms never reach into each other. Anything that affects another
//! mechanism is queued as a [`MechanismRequest`] and resolved by the owning
//! area once every mechanism has been updated.

use crate::events::{Event, EventType};
use crate::physics::BoxCollider;
use super::effect_target::EffectTargets;

/// Cross-mechanism request, addressed by mechanism id
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MechanismRequest {
    /// Call `activate` on the named mechanism
    Activate(String),
    /// Call `deactivate` on the named mechanism
    Deactivate(String),
    /// Feed `step_id` into the named sequence
    SequenceStep {
        /// Sequence mechanism id
        sequence_id: String,
        /// Step being recorded
        step_id: String,
    },
}

impl MechanismRequest {
    /// Id of the mechanism the request is addressed to
    pub fn target(&self) -> &str {
        match self {
            Self::Activate(id) | Self::Deactivate(id) => id,
            Self::SequenceStep { sequence_id, .. } => sequence_id,
        }
    }
}

/// Requests and events produced during a frame
#[derive(Debug, Default)]
pub struct MechanismOutbox {
    requests: Vec<MechanismRequest>,
    events: Vec<Event>,
}

impl MechanismOutbox {
    /// Create an empty outbox
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a request
    pub fn request(&mut self, request: MechanismRequest) {
        self.requests.push(request);
    }

    /// Queue an event
    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Pending requests
    pub fn requests(&self) -> &[MechanismRequest] {
        &self.requests
    }

    /// Pending events
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Remove and return all pending requests
    pub fn take_requests(&mut self) -> Vec<MechanismRequest> {
        std::mem::take(&mut self.requests)
    }

    /// Remove and return all pending events
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty() && self.events.is_empty()
    }
}

/// Everything a mechanism may read or produce during one call
pub struct MechanismContext<'a> {
    /// Player collider for this frame, if there is a player
    pub player: Option<&'a BoxCollider>,
    /// Effect target lookup
    pub targets: &'a mut dyn EffectTargets,
    /// Where requests and events go
    pub outbox: &'a mut MechanismOutbox,
    /// Simulation time in seconds, stamped on events
    pub time: f64,
}

impl<'a> MechanismContext<'a> {
    /// Context without a player
    pub fn new(targets: &'a mut dyn EffectTargets, outbox: &'a mut MechanismOutbox) -> Self {
        Self {
            player: None,
            targets,
            outbox,
            time: 0.0,
        }
    }

    /// Builder: player collider
    pub fn with_player(mut self, player: Option<&'a BoxCollider>) -> Self {
        self.player = player;
        self
    }

    /// Builder: simulation time
    pub fn with_time(mut self, time: f64) -> Self {
        self.time = time;
        self
    }

    /// Queue a request
    pub fn request(&mut self, request: MechanismRequest) {
        self.outbox.request(request);
    }

    /// Queue an event raised by `mechanism_id`
    pub fn emit(&mut self, event_type: EventType, mechanism_id: &str) {
        let event = Event::new(event_type, self.time).with_mechanism(mechanism_id);
        self.outbox.emit(event);
    }

    /// Queue a fully built event
    pub fn emit_event(&mut self, event: Event) {
        self.outbox.emit(event);
    }
}
