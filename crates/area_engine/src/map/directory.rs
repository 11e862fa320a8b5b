//! Area directory
//!
//! Session-wide owner of every loaded area. Exactly one area is current at
//! a time; switching it is the only place portals, camera bounds and the
//! transition effect change. Each frame the directory runs the current
//! area's mechanisms and resolves their cross-mechanism requests.

use std::collections::HashMap;

use crate::core::config::SimulationConfig;
use crate::events::{Event, EventArg, EventSystem, EventType};
use crate::foundation::math::Vec2;
use crate::mechanism::{EffectTargets, MechanismContext, MechanismOutbox};
use crate::physics::BoxCollider;
use super::area::Area;
use super::level::{LevelData, LevelError, LevelSource};
use super::portal::check_portal_trigger;
use super::transition::AreaTransition;
use super::types::CameraBounds;

/// Area directory errors
#[derive(thiserror::Error, Debug)]
pub enum DirectoryError {
    /// Another area change is still running
    #[error("Area transition already in progress, cannot enter '{target}'")]
    TransitionInProgress {
        /// Area that was requested
        target: String,
    },

    /// Unknown area and no way to load it
    #[error("Area '{0}' not found")]
    AreaNotFound(String),

    /// The area exists but is locked
    #[error("Area '{0}' is locked")]
    AreaLocked(String),

    /// The level source failed
    #[error("Failed to load area '{area}': {source}")]
    LoadFailed {
        /// Area being loaded
        area: String,
        /// Underlying error
        #[source]
        source: LevelError,
    },
}

/// Owner of all loaded areas and the current-area pointer
pub struct AreaDirectory {
    areas: HashMap<String, Area>,
    current_area: Option<String>,
    transition: AreaTransition,
    camera_bounds: Option<CameraBounds>,
    pending_spawn: Option<Vec2>,
    level_source: Option<Box<dyn LevelSource>>,
    events: EventSystem,
    outbox: MechanismOutbox,
    config: SimulationConfig,
    elapsed: f64,
}

impl AreaDirectory {
    /// Empty directory
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            areas: HashMap::new(),
            current_area: None,
            transition: AreaTransition::new(config.transitions.effect),
            camera_bounds: None,
            pending_spawn: None,
            level_source: None,
            events: EventSystem::new(),
            outbox: MechanismOutbox::new(),
            config,
            elapsed: 0.0,
        }
    }

    /// Builder: source used to load unknown areas on demand
    pub fn with_level_source(mut self, source: Box<dyn LevelSource>) -> Self {
        self.level_source = Some(source);
        self
    }

    /// Replace the level source
    pub fn set_level_source(&mut self, source: Box<dyn LevelSource>) {
        self.level_source = Some(source);
    }

    /// Active configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Event system, for registering cue handlers
    pub fn events_mut(&mut self) -> &mut EventSystem {
        &mut self.events
    }

    /// Load an area from level data.
    ///
    /// The first load builds the area. Loading an id that is already known
    /// only rebuilds its renderer layers; mechanism state is kept.
    pub fn load_area(&mut self, level: LevelData) -> Result<(), DirectoryError> {
        let id = level.area.id.clone();
        if let Some(area) = self.areas.get_mut(&id) {
            log::debug!("Area '{}' already loaded, rebuilding renderer only", id);
            area.initialize_renderer();
            return Ok(());
        }

        let mut area = level
            .build_area(&self.config.doors)
            .map_err(|source| DirectoryError::LoadFailed { area: id.clone(), source })?;
        area.initialize_renderer();
        log::info!("Loaded area '{}' with {} mechanisms", id, area.mechanisms().len());
        self.areas.insert(id, area);
        Ok(())
    }

    /// Insert a prebuilt area, returning any area it replaces
    pub fn insert_area(&mut self, area: Area) -> Option<Area> {
        self.areas.insert(area.id().to_string(), area)
    }

    /// Drop a loaded area. The current area cannot be unloaded.
    pub fn unload_area(&mut self, id: &str) -> Option<Area> {
        if self.current_area.as_deref() == Some(id) {
            log::warn!("Refusing to unload current area '{}'", id);
            return None;
        }
        self.areas.remove(id)
    }

    /// Whether `id` is loaded
    pub fn is_loaded(&self, id: &str) -> bool {
        self.areas.contains_key(id)
    }

    /// Loaded area by id
    pub fn area(&self, id: &str) -> Option<&Area> {
        self.areas.get(id)
    }

    /// Mutable loaded area by id
    pub fn area_mut(&mut self, id: &str) -> Option<&mut Area> {
        self.areas.get_mut(id)
    }

    /// Current area id
    pub fn current_area_id(&self) -> Option<&str> {
        self.current_area.as_deref()
    }

    /// Current area
    pub fn current_area(&self) -> Option<&Area> {
        self.current_area.as_deref().and_then(|id| self.areas.get(id))
    }

    /// Mutable current area
    pub fn current_area_mut(&mut self) -> Option<&mut Area> {
        let id = self.current_area.as_deref()?;
        self.areas.get_mut(id)
    }

    /// Camera limits of the current area
    pub fn camera_bounds(&self) -> Option<CameraBounds> {
        self.camera_bounds
    }

    /// Spawn point from the last area change, consumed by the caller
    pub fn take_spawn_position(&mut self) -> Option<Vec2> {
        self.pending_spawn.take()
    }

    /// Whether an area change is still running
    pub fn is_transitioning(&self) -> bool {
        self.transition.in_progress()
    }

    /// Transition clock
    pub fn transition(&self) -> &AreaTransition {
        &self.transition
    }

    /// Make `id` the current area with the player at `spawn`.
    ///
    /// Fails while another transition is running. Unknown ids are loaded from
    /// the level source. The previous area's renderer layers are torn down;
    /// mechanism state in both areas is kept.
    pub fn change_area(&mut self, id: &str, spawn: Vec2) -> Result<(), DirectoryError> {
        if self.transition.in_progress() {
            log::warn!("Area transition already in progress, ignoring change to '{}'", id);
            return Err(DirectoryError::TransitionInProgress { target: id.to_string() });
        }

        if !self.areas.contains_key(id) {
            let level = {
                let source = self
                    .level_source
                    .as_ref()
                    .ok_or_else(|| DirectoryError::AreaNotFound(id.to_string()))?;
                source
                    .load_level(id)
                    .map_err(|source| DirectoryError::LoadFailed { area: id.to_string(), source })?
            };
            if level.area.id != id {
                log::warn!("Level for '{}' declares id '{}'", id, level.area.id);
                return Err(DirectoryError::AreaNotFound(id.to_string()));
            }
            self.load_area(level)?;
        }

        let area = match self.areas.get_mut(id) {
            None => return Err(DirectoryError::AreaNotFound(id.to_string())),
            Some(area) if !area.data().is_unlocked => return Err(DirectoryError::AreaLocked(id.to_string())),
            Some(area) => area,
        };
        area.initialize_renderer();
        area.data_mut().is_discovered = true;
        let camera_bounds = area.data().camera_bounds();

        // The outgoing area only releases its resources once the new one is live
        let previous = self.current_area.replace(id.to_string());
        if let Some(previous) = previous.as_deref().filter(|previous| *previous != id) {
            if let Some(area) = self.areas.get_mut(previous) {
                area.unload_resources();
            }
        }
        self.camera_bounds = Some(camera_bounds);
        self.pending_spawn = Some(spawn);

        log::info!(
            "Changed area from '{}' to '{}'",
            previous.as_deref().unwrap_or("none"),
            id
        );

        let mut event = Event::new(EventType::AreaChanged, self.elapsed)
            .with_arg("area_id", EventArg::AreaId(id.to_string()))
            .with_arg("position", EventArg::Position(spawn.x, spawn.y));
        if let Some(previous) = previous {
            event = event.with_arg("previous_area_id", EventArg::AreaId(previous));
        }
        self.events.send(event);

        let duration = self.config.transitions.duration;
        if duration > 0.0 {
            self.transition = AreaTransition::new(self.config.transitions.effect);
            self.transition.start(id, duration);
        }
        Ok(())
    }

    /// Run one simulation frame for the current area.
    ///
    /// Order: transition clock, every mechanism update, trigger presence
    /// wiring, request resolution, event dispatch.
    pub fn update(&mut self, delta_time: f32, player: Option<&BoxCollider>, targets: &mut dyn EffectTargets) {
        self.elapsed += f64::from(delta_time);

        if self.transition.in_progress() {
            self.transition.update(delta_time);
            if self.transition.is_finished() {
                log::debug!("Area transition to '{}' finished", self.transition.target_area().unwrap_or(""));
            }
        }

        if let Some(area) = self.current_area.as_deref().and_then(|id| self.areas.get_mut(id)) {
            let mut ctx = MechanismContext::new(targets, &mut self.outbox)
                .with_player(player)
                .with_time(self.elapsed);
            area.update_mechanisms(delta_time, &mut ctx);
            area.track_trigger_presence(&mut ctx);
            area.resolve_requests(&mut ctx);
        }

        self.flush_events();
    }

    /// Forward an interaction to the current area. Returns how many triggers fired.
    pub fn interact(&mut self, player: &BoxCollider, targets: &mut dyn EffectTargets) -> usize {
        let mut fired = 0;
        if let Some(area) = self.current_area.as_deref().and_then(|id| self.areas.get_mut(id)) {
            let mut ctx = MechanismContext::new(targets, &mut self.outbox)
                .with_player(Some(player))
                .with_time(self.elapsed);
            fired = area.interact(&mut ctx);
            area.resolve_requests(&mut ctx);
        }
        self.flush_events();
        fired
    }

    /// Test the player against the current area's portals and switch areas on
    /// the first hit. Returns the new current area id on success.
    pub fn handle_portal_transition(&mut self, player: &BoxCollider) -> Option<String> {
        let (target, spawn) = {
            let area = self.current_area()?;
            let portal = check_portal_trigger(player, area.portals())?;
            (portal.target_area_id.clone(), portal.target_position)
        };

        match self.change_area(&target, spawn) {
            Ok(()) => Some(target),
            Err(error) => {
                log::debug!("Portal to '{}' not taken: {}", target, error);
                None
            }
        }
    }

    fn flush_events(&mut self) {
        for event in self.outbox.take_events() {
            self.events.send(event);
        }
        let pending = self.events.pending();
        if pending > 0 {
            log::trace!("Dispatching {} cue event(s)", pending);
        }
        self.events.dispatch();
    }
}
