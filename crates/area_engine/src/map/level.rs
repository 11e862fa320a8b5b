//! Level data and loading
//!
//! Level files are RON or TOML documents describing one area. Loading is
//! tolerant: bad portals, colliders and mechanisms are logged and skipped so
//! an authoring mistake costs one object, not the whole level.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};

use crate::config::{read_document, ConfigError};
use crate::core::config::{DoorConfig, LevelConfig};
use crate::foundation::math::Vec2;
use crate::mechanism::{Door, Mechanism, MechanismEffect, MechanismKind, Sequence, Trigger, TriggerCondition};
use crate::physics::{BoxCollider, CollisionLayers};
use super::area::Area;
use super::types::{AreaData, PortalData};

/// Level loading errors
#[derive(thiserror::Error, Debug)]
pub enum LevelError {
    /// No level file for the area
    #[error("No level data found for area '{0}'")]
    NotFound(String),

    /// Reading or parsing failed
    #[error("Level file error: {0}")]
    Config(#[from] ConfigError),

    /// Parsed, but unusable
    #[error("Invalid level: {0}")]
    Invalid(String),
}

/// Static collider rectangle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColliderData {
    /// Top-left corner
    pub position: Vec2,
    /// Width and height
    pub size: Vec2,
    /// Collision layer, walls by default
    #[serde(default = "default_collider_layer")]
    pub layer: CollisionLayers,
}

fn default_collider_layer() -> CollisionLayers {
    CollisionLayers::WALL
}

/// Kind-specific mechanism settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MechanismSpec {
    /// Door
    Door {
        /// Start locked
        #[serde(default)]
        locked: bool,
        /// Override the configured opening speed
        #[serde(default)]
        open_speed: Option<f32>,
        /// Override the configured closing speed
        #[serde(default)]
        close_speed: Option<f32>,
    },
    /// Trigger
    Trigger {
        /// Proximity radius
        radius: f32,
        /// Stay active only while the player is in range
        #[serde(default)]
        requires_player: bool,
        /// Fire only on interaction
        #[serde(default)]
        requires_interaction: bool,
        /// Effect applied when firing
        #[serde(default)]
        effect: MechanismEffect,
    },
    /// Sequence
    Sequence {
        /// Step ids in order
        steps: Vec<String>,
        /// Seconds to finish, 0 for no limit
        #[serde(default)]
        time_limit: f32,
        /// Mechanism activated on completion
        #[serde(default)]
        on_complete: Option<String>,
    },
    /// A kind this build has no implementation for
    Unsupported {
        /// Declared kind
        kind: MechanismKind,
    },
}

/// One mechanism entry in a level file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MechanismDescriptor {
    /// Unique id within the area
    pub id: String,
    /// Top-left corner of the mechanism collider
    pub position: Vec2,
    /// Size of the mechanism collider
    pub size: Vec2,
    /// Kind-specific settings
    pub spec: MechanismSpec,
}

impl MechanismDescriptor {
    /// Build the mechanism, or `None` (logged) when it cannot be built
    pub fn build(&self, doors: &DoorConfig) -> Option<Mechanism> {
        match &self.spec {
            MechanismSpec::Door { locked, open_speed, close_speed } => {
                validated_collider(&self.id, self.position, self.size, CollisionLayers::DOOR)?;
                let mut door = Door::new(self.id.as_str(), self.position, self.size).with_speeds(
                    open_speed.unwrap_or(doors.open_speed),
                    close_speed.unwrap_or(doors.close_speed),
                );
                if *locked {
                    door.set_locked(true);
                }
                Some(door.into())
            }
            MechanismSpec::Trigger { radius, requires_player, requires_interaction, effect } => {
                let collider = validated_collider(&self.id, self.position, self.size, CollisionLayers::TRIGGER)?;
                let condition = TriggerCondition {
                    requires_player_presence: *requires_player,
                    requires_interaction: *requires_interaction,
                    trigger_radius: *radius,
                    custom: None,
                };
                Some(Trigger::new(self.id.as_str(), condition, effect.clone()).with_collider(collider).into())
            }
            MechanismSpec::Sequence { steps, time_limit, on_complete } => {
                let mut sequence = Sequence::new(self.id.as_str(), steps.clone());
                sequence.set_time_limit(*time_limit);
                if let Some(target) = on_complete {
                    sequence = sequence.with_on_complete(target.as_str());
                }
                Some(sequence.into())
            }
            MechanismSpec::Unsupported { kind } => {
                log::warn!("Mechanism '{}': kind {:?} is not supported, skipping", self.id, kind);
                None
            }
        }
    }
}

fn validated_collider(id: &str, position: Vec2, size: Vec2, layer: CollisionLayers) -> Option<BoxCollider> {
    let mut collider = BoxCollider::with_layer(Vec2::zeros(), Vec2::new(1.0, 1.0), layer);
    if collider.set_position(position) && collider.set_size(size) {
        Some(collider)
    } else {
        log::warn!("'{}': invalid collider geometry, skipping", id);
        None
    }
}

/// Parsed contents of one level file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    /// Area description
    pub area: AreaData,
    /// Portals out of the area
    #[serde(default)]
    pub portals: Vec<PortalData>,
    /// Static geometry
    #[serde(default)]
    pub colliders: Vec<ColliderData>,
    /// Mechanisms
    #[serde(default)]
    pub mechanisms: Vec<MechanismDescriptor>,
}

impl LevelData {
    /// Level with no content besides the area itself
    pub fn new(area: AreaData) -> Self {
        Self {
            area,
            portals: Vec::new(),
            colliders: Vec::new(),
            mechanisms: Vec::new(),
        }
    }

    /// Read a `.ron` or `.toml` level file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        read_document(path).map_err(LevelError::from)
    }

    /// Build the area, skipping unusable entries
    pub fn build_area(&self, doors: &DoorConfig) -> Result<Area, LevelError> {
        if self.area.id.is_empty() {
            return Err(LevelError::Invalid("area id is empty".to_string()));
        }

        let mut area = Area::new(self.area.clone());

        for portal in &self.portals {
            if !portal.is_well_formed() {
                log::warn!("Area '{}': invalid portal to '{}', skipping", self.area.id, portal.target_area_id);
                continue;
            }
            area.add_portal(portal.clone());
        }

        for collider in &self.colliders {
            if let Some(collider) = validated_collider(&self.area.id, collider.position, collider.size, collider.layer) {
                area.add_collider(collider);
            }
        }

        for descriptor in &self.mechanisms {
            if let Some(mechanism) = descriptor.build(doors) {
                area.add_mechanism(mechanism);
            }
        }

        log::debug!(
            "Built area '{}': {} portals, {} colliders, {} mechanisms",
            self.area.id,
            area.portals().len(),
            area.colliders().len(),
            area.mechanisms().len()
        );
        Ok(area)
    }
}

/// Supplies level data by area id
pub trait LevelSource {
    /// Load the level for `area_id`
    fn load_level(&self, area_id: &str) -> Result<LevelData, LevelError>;
}

/// Loads `<root>/<area_id>.ron`, falling back to `<root>/<area_id>.toml`
#[derive(Debug, Clone)]
pub struct FileLevelSource {
    root: PathBuf,
}

impl FileLevelSource {
    /// Source rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Source rooted at the configured level directory
    pub fn from_config(config: &LevelConfig) -> Self {
        Self::new(&config.root)
    }

    /// Level directory
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl LevelSource for FileLevelSource {
    fn load_level(&self, area_id: &str) -> Result<LevelData, LevelError> {
        for extension in ["ron", "toml"] {
            let path = self.root.join(format!("{}.{}", area_id, extension));
            if path.is_file() {
                log::debug!("Loading level '{}' from {}", area_id, path.display());
                return LevelData::load_from_file(&path);
            }
        }
        Err(LevelError::NotFound(area_id.to_string()))
    }
}

/// In-memory level table
#[derive(Debug, Clone, Default)]
pub struct MemoryLevelSource {
    levels: HashMap<String, LevelData>,
}

impl MemoryLevelSource {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a level, keyed by its area id
    pub fn insert(&mut self, level: LevelData) {
        self.levels.insert(level.area.id.clone(), level);
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with_level(mut self, level: LevelData) -> Self {
        self.insert(level);
        self
    }
}

impl LevelSource for MemoryLevelSource {
    fn load_level(&self, area_id: &str) -> Result<LevelData, LevelError> {
        self.levels
            .get(area_id)
            .cloned()
            .ok_or_else(|| LevelError::NotFound(area_id.to_string()))
    }
}
