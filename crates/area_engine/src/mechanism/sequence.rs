//! Sequence mechanism
//!
//! An ordered input puzzle: steps must arrive in exactly the configured
//! order, optionally within a time limit. Any wrong step or timeout resets
//! all progress.

use crate::events::EventType;
use super::context::{MechanismContext, MechanismRequest};
use super::types::{MechanismKind, MechanismState};

/// Ordered step puzzle
#[derive(Debug, Clone)]
pub struct Sequence {
    id: String,
    state: MechanismState,
    required_steps: Vec<String>,
    recorded_steps: Vec<String>,
    time_limit: f32,
    timer: f32,
    on_complete: Option<String>,
}

impl Sequence {
    /// Create an inactive sequence expecting `steps` in order
    pub fn new(id: impl Into<String>, steps: Vec<String>) -> Self {
        Self {
            id: id.into(),
            state: MechanismState::Inactive,
            required_steps: steps,
            recorded_steps: Vec::new(),
            time_limit: 0.0,
            timer: 0.0,
            on_complete: None,
        }
    }

    /// Builder: mechanism to activate once the sequence completes
    pub fn with_on_complete(mut self, target_id: impl Into<String>) -> Self {
        self.on_complete = Some(target_id.into());
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

    /// Always [`MechanismKind::Sequence`]
    pub fn kind(&self) -> MechanismKind {
        MechanismKind::Sequence
    }

    /// Seconds allowed from activation to completion; 0 disables the limit
    pub fn set_time_limit(&mut self, seconds: f32) {
        self.time_limit = seconds.max(0.0);
    }

    /// Configured time limit
    pub fn time_limit(&self) -> f32 {
        self.time_limit
    }

    /// Index of the next expected step
    pub fn current_step(&self) -> usize {
        self.recorded_steps.len()
    }

    /// Steps recorded so far
    pub fn recorded_steps(&self) -> &[String] {
        &self.recorded_steps
    }

    /// Steps expected, in order
    pub fn required_steps(&self) -> &[String] {
        &self.required_steps
    }

    /// Mechanism activated on completion
    pub fn on_complete(&self) -> Option<&str> {
        self.on_complete.as_deref()
    }

    /// Whether every step has been recorded in order
    pub fn is_sequence_complete(&self) -> bool {
        self.recorded_steps == self.required_steps
    }

    /// Start listening for steps with a fresh timer
    pub fn activate(&mut self, _ctx: &mut MechanismContext<'_>) {
        if self.state == MechanismState::Active {
            return;
        }
        self.state = MechanismState::Active;
        self.timer = 0.0;
        self.recorded_steps.clear();
    }

    /// Stop listening and drop progress
    pub fn deactivate(&mut self, _ctx: &mut MechanismContext<'_>) {
        if self.state == MechanismState::Active {
            self.clear_progress();
        }
    }

    /// Record a step. Ignored unless active; a wrong step resets the sequence.
    pub fn activate_trigger(&mut self, step_id: &str, ctx: &mut MechanismContext<'_>) {
        if self.state != MechanismState::Active {
            log::debug!("Sequence '{}' ignored step '{}' while {:?}", self.id, step_id, self.state);
            return;
        }

        let expected = self.required_steps.get(self.recorded_steps.len());
        if expected.is_some_and(|expected| expected == step_id) {
            self.recorded_steps.push(step_id.to_string());
            if self.is_sequence_complete() {
                self.complete(ctx);
            }
        } else {
            log::debug!("Sequence '{}' got '{}' out of order, resetting", self.id, step_id);
            self.fail(ctx);
        }
    }

    /// Advance the time limit
    pub fn update(&mut self, delta_time: f32, ctx: &mut MechanismContext<'_>) {
        if self.state != MechanismState::Active {
            return;
        }

        if self.time_limit > 0.0 {
            self.timer += delta_time;
            if self.timer >= self.time_limit {
                log::debug!("Sequence '{}' ran out of time", self.id);
                self.fail(ctx);
                return;
            }
        }

        if self.is_sequence_complete() {
            self.complete(ctx);
        }
    }

    /// Back to inactive with no progress
    pub fn reset(&mut self) {
        self.clear_progress();
    }

    fn complete(&mut self, ctx: &mut MechanismContext<'_>) {
        self.state = MechanismState::Finished;
        ctx.emit(EventType::SequenceCompleted, &self.id);
        if let Some(target) = &self.on_complete {
            ctx.request(MechanismRequest::Activate(target.clone()));
        }
    }

    fn fail(&mut self, ctx: &mut MechanismContext<'_>) {
        self.clear_progress();
        ctx.emit(EventType::SequenceFailed, &self.id);
    }

    fn clear_progress(&mut self) {
        self.recorded_steps.clear();
        self.timer = 0.0;
        self.state = MechanismState::Inactive;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mechanism::{MechanismOutbox, NoEffectTargets};

    fn steps(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_exact_order_completes() {
        let mut targets = NoEffectTargets;
        let mut outbox = MechanismOutbox::new();
        let mut ctx = MechanismContext::new(&mut targets, &mut outbox);

        let mut sequence = Sequence::new("altar", steps(&["red", "green", "blue"]))
            .with_on_complete("vault_door");
        sequence.activate(&mut ctx);
        for step in ["red", "green", "blue"] {
            sequence.activate_trigger(step, &mut ctx);
        }

        assert_eq!(sequence.state(), MechanismState::Finished);
        assert!(sequence.is_sequence_complete());
        assert_eq!(outbox.requests(), &[MechanismRequest::Activate("vault_door".to_string())]);
        assert!(outbox.events().iter().any(|e| e.event_type == EventType::SequenceCompleted));
    }

    #[test]
    fn test_wrong_step_resets_at_any_position() {
        let mut targets = NoEffectTargets;
        let mut outbox = MechanismOutbox::new();
        let mut ctx = MechanismContext::new(&mut targets, &mut outbox);

        for wrong_at in 0..3 {
            let mut sequence = Sequence::new("altar", steps(&["a", "b", "c"]));
            sequence.activate(&mut ctx);
            for (index, step) in ["a", "b", "c"].iter().enumerate() {
                if index == wrong_at {
                    sequence.activate_trigger("x", &mut ctx);
                    break;
                }
                sequence.activate_trigger(step, &mut ctx);
            }
            assert_eq!(sequence.current_step(), 0);
            assert!(sequence.recorded_steps().is_empty());
            assert_eq!(sequence.state(), MechanismState::Inactive);
        }
    }

    #[test]
    fn test_steps_ignored_while_inactive() {
        let mut targets = NoEffectTargets;
        let mut outbox = MechanismOutbox::new();
        let mut ctx = MechanismContext::new(&mut targets, &mut outbox);

        let mut sequence = Sequence::new("altar", steps(&["a"]));
        sequence.activate_trigger("a", &mut ctx);
        assert_eq!(sequence.current_step(), 0);
        assert_eq!(sequence.state(), MechanismState::Inactive);
    }

    #[test]
    fn test_time_limit_resets() {
        let mut targets = NoEffectTargets;
        let mut outbox = MechanismOutbox::new();
        let mut ctx = MechanismContext::new(&mut targets, &mut outbox);

        let mut sequence = Sequence::new("altar", steps(&["a", "b"]));
        sequence.set_time_limit(1.0);
        sequence.activate(&mut ctx);
        sequence.activate_trigger("a", &mut ctx);
        sequence.update(0.5, &mut ctx);
        assert_eq!(sequence.current_step(), 1);

        sequence.update(0.5, &mut ctx);
        assert_eq!(sequence.current_step(), 0);
        assert_eq!(sequence.state(), MechanismState::Inactive);
        assert!(outbox.events().iter().any(|e| e.event_type == EventType::SequenceFailed));
    }

    #[test]
    fn test_reactivation_starts_over() {
        let mut targets = NoEffectTargets;
        let mut outbox = MechanismOutbox::new();
        let mut ctx = MechanismContext::new(&mut targets, &mut outbox);

        let mut sequence = Sequence::new("altar", steps(&["a", "b"]));
        sequence.activate(&mut ctx);
        sequence.activate_trigger("a", &mut ctx);
        sequence.deactivate(&mut ctx);
        assert_eq!(sequence.current_step(), 0);

        sequence.activate(&mut ctx);
        sequence.activate_trigger("a", &mut ctx);
        sequence.activate_trigger("b", &mut ctx);
        assert_eq!(sequence.state(), MechanismState::Finished);
    }
}
