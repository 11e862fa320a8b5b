//! # Core Module
//!
//! Shared configuration for the simulation subsystems.
//!
//! ## Organization
//!
//! - **Config**: Unified configuration for doors, transitions, levels and logging

pub mod config;

pub use config::{
    SimulationConfig,
    DoorConfig,
    TransitionConfig,
    LevelConfig,
    LoggingConfig,
    Config,
    ConfigError,
};
