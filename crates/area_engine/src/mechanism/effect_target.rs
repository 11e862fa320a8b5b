//! Effect target capability
//!
//! Combat and attribute systems live outside this crate. Triggers only see
//! them through [`EffectTarget`], looked up by id via [`EffectTargets`].

use std::collections::HashMap;

use crate::foundation::math::Vec2;
use super::types::MechanismEffect;

/// Something a trigger effect can act on
pub trait EffectTarget {
    /// Add `amount` to health (negative for damage)
    fn modify_health(&mut self, amount: f32);

    /// Start a buff or debuff
    fn apply_status_effect(&mut self, effect: &MechanismEffect);

    /// End a buff or debuff started by [`apply_status_effect`](Self::apply_status_effect)
    fn remove_status_effect(&mut self, effect: &MechanismEffect);

    /// Move the target
    fn set_position(&mut self, position: Vec2);
}

/// Lookup of effect targets by id
pub trait EffectTargets {
    /// Resolve `id`, or `None` if nothing is registered under it
    fn find_target(&mut self, id: &str) -> Option<&mut dyn EffectTarget>;
}

/// Registry owning its targets
#[derive(Default)]
pub struct EffectTargetRegistry {
    targets: HashMap<String, Box<dyn EffectTarget>>,
}

impl EffectTargetRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a target, replacing any previous one with the same id
    pub fn register(&mut self, id: impl Into<String>, target: Box<dyn EffectTarget>) {
        let id = id.into();
        if self.targets.insert(id.clone(), target).is_some() {
            log::debug!("Replaced effect target '{}'", id);
        }
    }

    /// Remove a target
    pub fn unregister(&mut self, id: &str) -> Option<Box<dyn EffectTarget>> {
        self.targets.remove(id)
    }

    /// Whether `id` is registered
    pub fn contains(&self, id: &str) -> bool {
        self.targets.contains_key(id)
    }

    /// Number of registered targets
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl EffectTargets for EffectTargetRegistry {
    fn find_target(&mut self, id: &str) -> Option<&mut dyn EffectTarget> {
        match self.targets.get_mut(id) {
            Some(target) => Some(&mut **target),
            None => None,
        }
    }
}

/// Empty lookup for simulations without combat systems attached
#[derive(Debug, Default, Clone, Copy)]
pub struct NoEffectTargets;

impl EffectTargets for NoEffectTargets {
    fn find_target(&mut self, _id: &str) -> Option<&mut dyn EffectTarget> {
        None
    }
}
