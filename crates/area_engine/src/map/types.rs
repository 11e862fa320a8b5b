//! Area and portal data
//!
//! Pure data as it arrives from level files.

use serde::{Serialize, Deserialize};

use crate::foundation::math::Vec2;

/// Gameplay flavor of an area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AreaType {
    /// Regular area
    #[default]
    Normal,
    /// No combat
    Safe,
    /// Combat encounter
    Battle,
    /// Boss arena
    Boss,
    /// Hidden area
    Secret,
}

/// World-space rectangle covered by an area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaBounds {
    /// Top-left corner
    pub position: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl AreaBounds {
    /// Create bounds from corner and size
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self { position, size }
    }

    /// Half-open containment test
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.position.x
            && point.x < self.position.x + self.size.x
            && point.y >= self.position.y
            && point.y < self.position.y + self.size.y
    }
}

impl Default for AreaBounds {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            size: Vec2::zeros(),
        }
    }
}

/// Camera clamp rectangle derived from area bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBounds {
    /// Top-left limit
    pub min: Vec2,
    /// Bottom-right limit
    pub max: Vec2,
}

/// Descriptive data for one area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaData {
    /// Unique area id
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Gameplay flavor
    #[serde(default)]
    pub area_type: AreaType,
    /// Covered rectangle
    pub bounds: AreaBounds,
    /// Whether the player has been here
    #[serde(default)]
    pub is_discovered: bool,
    /// Whether the area may be entered
    #[serde(default = "default_unlocked")]
    pub is_unlocked: bool,
}

fn default_unlocked() -> bool {
    true
}

impl AreaData {
    /// Area with the given id and bounds, unlocked and undiscovered
    pub fn new(id: impl Into<String>, bounds: AreaBounds) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            area_type: AreaType::Normal,
            bounds,
            is_discovered: false,
            is_unlocked: true,
        }
    }

    /// Camera limits for this area
    pub fn camera_bounds(&self) -> CameraBounds {
        CameraBounds {
            min: self.bounds.position,
            max: self.bounds.position + self.bounds.size,
        }
    }
}

/// What a portal condition checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PortalConditionKind {
    /// Always passable
    #[default]
    None,
    /// Needs an item
    Key,
    /// Needs a finished quest
    Quest,
    /// Needs a character level
    Level,
    /// Decided by game code
    Custom,
}

/// Requirement attached to a portal.
///
/// Game systems decide whether the requirement holds and record the answer
/// in `is_met`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalCondition {
    /// Requirement category
    pub kind: PortalConditionKind,
    /// Key or quest id
    pub required_id: String,
    /// Minimum level
    pub required_level: u32,
    /// Whether the requirement is currently satisfied
    pub is_met: bool,
}

/// Rectangle that moves the player to another area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalData {
    /// Destination area id
    pub target_area_id: String,
    /// Top-left corner
    pub position: Vec2,
    /// Width and height
    pub size: Vec2,
    /// Spawn point in the destination area
    pub target_position: Vec2,
    /// Locked portals never fire
    #[serde(default)]
    pub is_locked: bool,
    /// Extra requirement
    #[serde(default)]
    pub condition: PortalCondition,
}

impl PortalData {
    /// Unlocked portal without conditions
    pub fn new(target_area_id: impl Into<String>, position: Vec2, size: Vec2, target_position: Vec2) -> Self {
        Self {
            target_area_id: target_area_id.into(),
            position,
            size,
            target_position,
            is_locked: false,
            condition: PortalCondition::default(),
        }
    }

    /// Whether the rectangle is usable: non-negative corner, positive size
    pub fn is_well_formed(&self) -> bool {
        self.position.x >= 0.0 && self.position.y >= 0.0 && self.size.x > 0.0 && self.size.y > 0.0
    }
}
