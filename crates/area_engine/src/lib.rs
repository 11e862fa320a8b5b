//! # Area Engine
//!
//! Simulation core for a 2D area-based action game: box colliders with
//! layer filtering, interactive mechanisms and a directory of connected
//! areas joined by portals.
//!
//! ## Features
//!
//! - **Collision**: Axis-aligned boxes with single-bit layers, masks and a
//!   global layer interaction matrix
//! - **Mechanisms**: Doors, triggers and step sequences as small state machines
//! - **Areas**: Mechanisms, static geometry and portals owned per area
//! - **Area Directory**: Current-area tracking, lazy loading and transitions
//! - **Level Files**: RON or TOML level descriptions
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use area_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SimulationConfig::load_or_default("config.toml");
//!     let source = FileLevelSource::from_config(&config.levels);
//!     let mut directory = AreaDirectory::new(config).with_level_source(Box::new(source));
//!     directory.change_area("entrance", Vec2::new(64.0, 64.0))?;
//!
//!     let player = BoxCollider::with_layer(Vec2::new(64.0, 64.0), Vec2::new(16.0, 16.0), CollisionLayers::PLAYER);
//!     directory.update(1.0 / 60.0, Some(&player), &mut NoEffectTargets);
//!     directory.handle_portal_transition(&player);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;
pub mod config;

pub mod foundation;
pub mod physics;
pub mod events;
pub mod mechanism;
pub mod map;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        core::{Config, DoorConfig, LevelConfig, SimulationConfig, TransitionConfig},
        events::{Event, EventArg, EventHandler, EventSystem, EventType},
        foundation::math::{Color, Vec2},
        map::{
            Area, AreaData, AreaDirectory, DirectoryError, FileLevelSource, LevelData, LevelSource,
            MemoryLevelSource, PortalData, TransitionKind,
        },
        mechanism::{
            Door, DoorState, EffectTarget, EffectTargetRegistry, EffectTargets, EffectType, Mechanism,
            MechanismEffect, MechanismState, NoEffectTargets, Sequence, Trigger, TriggerCondition,
        },
        physics::{BoxCollider, CollisionIndex, CollisionLayers, LayerMatrix},
    };
}
