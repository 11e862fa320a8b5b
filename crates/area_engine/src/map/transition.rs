//! Area transition effect timing
//!
//! Tracks the progress of the visual effect shown while switching areas.
//! Drawing is left to the renderer; only the clock lives here.

use serde::{Serialize, Deserialize};

/// Visual style of a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TransitionKind {
    /// Fade through black
    #[default]
    Fade,
    /// Slide in from the right
    Slide,
    /// Cut without an effect
    None,
}

/// Running transition clock
#[derive(Debug, Clone, PartialEq)]
pub struct AreaTransition {
    kind: TransitionKind,
    duration: f32,
    progress: f32,
    finished: bool,
    target_area: Option<String>,
}

impl AreaTransition {
    /// Idle transition of the given kind
    pub fn new(kind: TransitionKind) -> Self {
        Self {
            kind,
            duration: 1.0,
            progress: 0.0,
            finished: true,
            target_area: None,
        }
    }

    /// Start running toward `target_area`. A non-positive duration finishes at once.
    pub fn start(&mut self, target_area: impl Into<String>, duration: f32) {
        self.target_area = Some(target_area.into());
        self.duration = duration;
        self.progress = 0.0;
        self.finished = duration <= 0.0;
        if self.finished {
            self.progress = 1.0;
        }
    }

    /// Advance the clock
    pub fn update(&mut self, delta_time: f32) {
        if self.finished {
            return;
        }
        self.progress += delta_time / self.duration;
        if self.progress >= 1.0 {
            self.progress = 1.0;
            self.finished = true;
        }
    }

    /// Visual style
    pub fn kind(&self) -> TransitionKind {
        self.kind
    }

    /// Progress in `[0, 1]`
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Whether the effect has completed
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether the effect is still running
    pub fn in_progress(&self) -> bool {
        !self.finished
    }

    /// Area the transition leads to
    pub fn target_area(&self) -> Option<&str> {
        self.target_area.as_deref()
    }
}

impl Default for AreaTransition {
    fn default() -> Self {
        Self::new(TransitionKind::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_runs_to_completion() {
        let mut transition = AreaTransition::new(TransitionKind::Slide);
        assert!(transition.is_finished());

        transition.start("crypt", 1.0);
        assert!(transition.in_progress());
        assert_eq!(transition.target_area(), Some("crypt"));

        transition.update(0.25);
        assert_relative_eq!(transition.progress(), 0.25);
        transition.update(1.0);
        assert!(transition.is_finished());
        assert_eq!(transition.progress(), 1.0);
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let mut transition = AreaTransition::default();
        transition.start("crypt", 0.0);
        assert!(transition.is_finished());
        assert_eq!(transition.progress(), 1.0);
    }
}
