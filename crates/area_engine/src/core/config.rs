//! # Simulation Configuration
//!
//! Configuration structures for the area simulation: door tuning, area
//! transition timing, level file locations and logging defaults.
//!
//! ## Configuration Categories
//!
//! - **Door Config**: Default open/close speeds for door mechanisms
//! - **Transition Config**: Area transition effect and its duration
//! - **Level Config**: Where level files are looked up
//! - **Logging Config**: Default log filter

use serde::{Serialize, Deserialize};

pub use crate::config::{Config, ConfigError};
use crate::map::transition::TransitionKind;
use crate::mechanism::door::{DOOR_CLOSE_SPEED, DOOR_OPEN_SPEED};

/// # Door Configuration
///
/// Default progress speeds (in progress units per second) for doors created
/// from level data. A speed of 2.0 opens a door in half a second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoorConfig {
    /// Opening speed
    pub open_speed: f32,
    /// Closing speed
    pub close_speed: f32,
}

impl DoorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.open_speed.is_finite() && self.open_speed > 0.0) {
            return Err(format!("Door open speed must be positive, got {}", self.open_speed));
        }
        if !(self.close_speed.is_finite() && self.close_speed > 0.0) {
            return Err(format!("Door close speed must be positive, got {}", self.close_speed));
        }
        Ok(())
    }
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            open_speed: DOOR_OPEN_SPEED,
            close_speed: DOOR_CLOSE_SPEED,
        }
    }
}

/// # Transition Configuration
///
/// While a transition effect runs, further area changes are rejected.
/// A zero duration switches areas immediately without holding the flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    /// Effect duration in seconds
    pub duration: f32,
    /// Visual effect played by the renderer
    pub effect: TransitionKind,
}

impl TransitionConfig {
    /// Configuration for instant area switches
    pub fn immediate() -> Self {
        Self {
            duration: 0.0,
            effect: TransitionKind::None,
        }
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration: 1.0,
            effect: TransitionKind::Fade,
        }
    }
}

/// # Level Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Directory holding `<area_id>.ron` / `<area_id>.toml` level files
    pub root: String,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            root: "resources/maps".to_string(),
        }
    }
}

/// # Logging Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// # Complete Simulation Configuration
///
/// Top-level configuration that encompasses all simulation subsystems.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Door tuning
    pub doors: DoorConfig,
    /// Area transition behavior
    pub transitions: TransitionConfig,
    /// Level file lookup
    pub levels: LevelConfig,
    /// Logging defaults
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Set transition behavior
    pub fn with_transitions(mut self, transitions: TransitionConfig) -> Self {
        self.transitions = transitions;
        self
    }

    /// Set door tuning
    pub fn with_doors(mut self, doors: DoorConfig) -> Self {
        self.doors = doors;
        self
    }

    /// Set level root directory
    pub fn with_level_root(mut self, root: impl Into<String>) -> Self {
        self.levels.root = root.into();
        self
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), String> {
        self.doors.validate()?;
        if !(self.transitions.duration.is_finite() && self.transitions.duration >= 0.0) {
            return Err(format!(
                "Transition duration must be zero or positive, got {}",
                self.transitions.duration
            ));
        }
        Ok(())
    }
}

impl Config for SimulationConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_door_constants() {
        let config = SimulationConfig::default();
        assert_eq!(config.doors.open_speed, 2.0);
        assert_eq!(config.doors.close_speed, 1.5);
        assert_eq!(config.transitions.duration, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_speeds() {
        let config = SimulationConfig::default().with_doors(DoorConfig {
            open_speed: 0.0,
            close_speed: 1.0,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: SimulationConfig = toml::from_str("[doors]\nopen_speed = 4.0\n").unwrap();
        assert_eq!(config.doors.open_speed, 4.0);
        assert_eq!(config.doors.close_speed, 1.5);
        assert_eq!(config.levels.root, "resources/maps");
    }

    #[test]
    fn test_save_and_load_ron() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("simulation.ron");

        let config = SimulationConfig::default().with_level_root("levels");
        config.save_to_file(&path).unwrap();

        let loaded = SimulationConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = SimulationConfig::load_from_file("missing_simulation.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("simulation.json");
        std::fs::write(&path, "{}").unwrap();
        assert!(matches!(SimulationConfig::load_from_file(&path), Err(ConfigError::UnsupportedFormat(_))));
        assert!(matches!(SimulationConfig::default().save_to_file(&path), Err(ConfigError::UnsupportedFormat(_))));
    }
}
