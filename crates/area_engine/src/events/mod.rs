//! Gameplay cue events
//!
//! Mechanisms and the area directory announce what happened (a door started
//! opening, a trigger fired, the current area changed) so that audio, visual
//! and UI collaborators can react. Delivery is fire-and-forget: handler
//! results never feed back into mechanism state.
//!
//! - Key-value arguments (no order dependency)
//! - Handler returns bool (true = consumed, stops forwarding)
//! - Registration per event type
//! - Queued delivery, flushed once per dispatch

use std::collections::HashMap;

/// Event type identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// A door started opening
    DoorOpening,
    /// A door finished opening
    DoorOpened,
    /// A door started closing
    DoorClosing,
    /// A door finished closing
    DoorClosed,
    /// A trigger became active and applied its effect
    TriggerFired,
    /// A trigger was deactivated
    TriggerReleased,
    /// A sequence received every step in order
    SequenceCompleted,
    /// A sequence was reset by a wrong step or its time limit
    SequenceFailed,
    /// The current area changed
    AreaChanged,
    /// A trigger asked for an enemy to be spawned
    EnemySpawnRequested,
}

/// Type-safe event argument values
#[derive(Debug, Clone, PartialEq)]
pub enum EventArg {
    /// Id of the mechanism that raised the event
    MechanismId(String),
    /// Id named by the mechanism's effect
    TargetId(String),
    /// Area identifier
    AreaId(String),
    /// World position
    Position(f32, f32),
    /// Free-form numeric payload (progress, effect value, ...)
    Value(f32),
}

/// Event with type ID and key-value arguments
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Type of event
    pub event_type: EventType,
    /// Simulation time when the event was raised (seconds)
    pub timestamp: f64,
    args: HashMap<&'static str, EventArg>,
}

impl Event {
    /// Create a new event with the given type and timestamp
    pub fn new(event_type: EventType, timestamp: f64) -> Self {
        Self {
            event_type,
            timestamp,
            args: HashMap::new(),
        }
    }

    /// Add an argument to the event (builder pattern)
    pub fn with_arg(mut self, key: &'static str, value: EventArg) -> Self {
        self.args.insert(key, value);
        self
    }

    /// Shorthand for the `mechanism_id` argument
    pub fn with_mechanism(self, id: &str) -> Self {
        self.with_arg("mechanism_id", EventArg::MechanismId(id.to_string()))
    }

    /// Get an argument by key
    pub fn get_arg(&self, key: &str) -> Option<&EventArg> {
        self.args.get(key)
    }

    /// Get mechanism id argument if present
    pub fn get_mechanism_id(&self) -> Option<&str> {
        match self.get_arg("mechanism_id") {
            Some(EventArg::MechanismId(id)) => Some(id),
            _ => None,
        }
    }

    /// Get target id argument if present
    pub fn get_target_id(&self) -> Option<&str> {
        match self.get_arg("target_id") {
            Some(EventArg::TargetId(id)) => Some(id),
            _ => None,
        }
    }

    /// Get area id argument if present
    pub fn get_area_id(&self) -> Option<&str> {
        match self.get_arg("area_id") {
            Some(EventArg::AreaId(id)) => Some(id),
            _ => None,
        }
    }

    /// Get position argument if present
    pub fn get_position(&self) -> Option<(f32, f32)> {
        if let Some(EventArg::Position(x, y)) = self.get_arg("position") {
            Some((*x, *y))
        } else {
            None
        }
    }

    /// Get value argument if present
    pub fn get_value(&self) -> Option<f32> {
        if let Some(EventArg::Value(value)) = self.get_arg("value") {
            Some(*value)
        } else {
            None
        }
    }
}

/// Event handler trait
/// Returns true if event was consumed (stops forwarding)
/// Returns false to allow forwarding to other handlers
pub trait EventHandler {
    /// Handle an event, return true if consumed
    fn on_event(&mut self, event: &Event) -> bool;
}

/// Event system with registration and queuing
pub struct EventSystem {
    immediate_queue: Vec<Event>,
    handlers: HashMap<EventType, Vec<Box<dyn EventHandler>>>,
}

impl EventSystem {
    /// Create a new empty event system
    pub fn new() -> Self {
        Self {
            immediate_queue: Vec::new(),
            handlers: HashMap::new(),
        }
    }

    /// Register a handler for a specific event type
    pub fn register_handler(&mut self, event_type: EventType, handler: Box<dyn EventHandler>) {
        self.handlers.entry(event_type).or_default().push(handler);
    }

    /// Queue an event for delivery on the next dispatch
    pub fn send(&mut self, event: Event) {
        self.immediate_queue.push(event);
    }

    /// Number of events waiting for delivery
    pub fn pending(&self) -> usize {
        self.immediate_queue.len()
    }

    /// Dispatch all pending events in the order they were sent
    pub fn dispatch(&mut self) {
        let immediate = std::mem::take(&mut self.immediate_queue);
        for event in immediate {
            self.dispatch_event(&event);
        }
    }

    /// Stops on first handler that returns true (consumed)
    fn dispatch_event(&mut self, event: &Event) {
        if let Some(handlers) = self.handlers.get_mut(&event.event_type) {
            for handler in handlers.iter_mut() {
                if handler.on_event(event) {
                    break;
                }
            }
        }
    }

    /// Clear all queued events (useful for area transitions)
    pub fn clear(&mut self) {
        self.immediate_queue.clear();
    }
}

impl Default for EventSystem {
    fn default() -> Self {
        Self::new()
    }
}
