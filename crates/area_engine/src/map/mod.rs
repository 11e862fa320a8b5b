//! Areas, portals and the area directory
//!
//! # Module Organization
//!
//! - [`types`] - Area and portal data
//! - [`area`] - One loaded area with its mechanisms and static geometry
//! - [`portal`] - Portal condition and overlap checks
//! - [`transition`] - Transition effect clock
//! - [`level`] - Level files and level sources
//! - [`directory`] - Current-area orchestration

pub mod area;
pub mod directory;
pub mod level;
pub mod portal;
pub mod transition;
pub mod types;

#[cfg(test)]
mod tests;

pub use area::{Area, RenderLayer, RenderLayerKind, RenderLayers, MAX_REQUEST_ROUNDS};
pub use directory::{AreaDirectory, DirectoryError};
pub use level::{
    ColliderData, FileLevelSource, LevelData, LevelError, LevelSource, MechanismDescriptor, MechanismSpec,
    MemoryLevelSource,
};
pub use portal::{check_portal_conditions, check_portal_trigger, is_in_portal_range};
pub use transition::{AreaTransition, TransitionKind};
pub use types::{
    AreaBounds, AreaData, AreaType, CameraBounds, PortalCondition, PortalConditionKind, PortalData,
};
