//! Door mechanism
//!
//! A door animates a progress value between 0 (closed) and 1 (open). Its
//! collider follows that progress: it stops blocking once an opening door is
//! far enough along, and blocks again as soon as a closing door drops below
//! that point.

use crate::events::EventType;
use crate::foundation::math::{utils, Color, Vec2};
use crate::physics::{BoxCollider, CollisionLayers};
use super::context::MechanismContext;
use super::types::{MechanismKind, MechanismState};

/// Default opening speed (progress per second)
pub const DOOR_OPEN_SPEED: f32 = 2.0;

/// Default closing speed (progress per second)
pub const DOOR_CLOSE_SPEED: f32 = 1.5;

/// Progress at which an opening door stops blocking movement
pub const COLLISION_DISABLE_THRESHOLD: f32 = 0.8;

const CLOSED_COLOR: [f32; 4] = [0.8, 0.2, 0.2, 1.0];
const OPEN_COLOR: [f32; 4] = [0.2, 0.8, 0.2, 0.5];
const LOCKED_COLOR: [f32; 4] = [0.5, 0.1, 0.1, 1.0];

/// Door animation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoorState {
    /// Fully closed and solid
    Closed,
    /// Moving toward open
    Opening,
    /// Fully open and passable
    Open,
    /// Moving toward closed
    Closing,
    /// Closed and ignoring activate/deactivate
    Locked,
    /// Jammed mid-animation, ignoring activate/deactivate
    Malfunction,
}

/// Door with an open/close animation and a progress-coupled collider
#[derive(Debug, Clone)]
pub struct Door {
    id: String,
    state: MechanismState,
    door_state: DoorState,
    progress: f32,
    open_speed: f32,
    close_speed: f32,
    collider: BoxCollider,
}

impl Door {
    /// Create a closed door covering the given rectangle
    pub fn new(id: impl Into<String>, position: Vec2, size: Vec2) -> Self {
        Self {
            id: id.into(),
            state: MechanismState::Inactive,
            door_state: DoorState::Closed,
            progress: 0.0,
            open_speed: DOOR_OPEN_SPEED,
            close_speed: DOOR_CLOSE_SPEED,
            collider: BoxCollider::with_layer(position, size, CollisionLayers::DOOR),
        }
    }

    /// Builder: animation speeds. Non-positive speeds keep the defaults.
    pub fn with_speeds(mut self, open_speed: f32, close_speed: f32) -> Self {
        if open_speed > 0.0 {
            self.open_speed = open_speed;
        } else {
            log::warn!("Door '{}': ignoring open speed {}", self.id, open_speed);
        }
        if close_speed > 0.0 {
            self.close_speed = close_speed;
        } else {
            log::warn!("Door '{}': ignoring close speed {}", self.id, close_speed);
        }
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

    /// Always [`MechanismKind::Door`]
    pub fn kind(&self) -> MechanismKind {
        MechanismKind::Door
    }

    /// Animation state
    pub fn door_state(&self) -> DoorState {
        self.door_state
    }

    /// Animation progress in `[0, 1]`
    pub fn transition_progress(&self) -> f32 {
        self.progress
    }

    /// The door's collider
    pub fn collider(&self) -> &BoxCollider {
        &self.collider
    }

    /// Mutable access to the collider
    pub fn collider_mut(&mut self) -> &mut BoxCollider {
        &mut self.collider
    }

    /// Fully open
    pub fn is_open(&self) -> bool {
        self.door_state == DoorState::Open
    }

    /// Locked
    pub fn is_locked(&self) -> bool {
        self.door_state == DoorState::Locked
    }

    /// Start opening. Ignored while locked or malfunctioning.
    pub fn activate(&mut self, ctx: &mut MechanismContext<'_>) {
        match self.door_state {
            DoorState::Locked | DoorState::Malfunction => {
                log::debug!("Door '{}' ignored activate while {:?}", self.id, self.door_state);
            }
            DoorState::Closed | DoorState::Closing => {
                self.door_state = DoorState::Opening;
                self.state = MechanismState::Active;
                ctx.emit(EventType::DoorOpening, &self.id);
            }
            DoorState::Opening | DoorState::Open => {}
        }
    }

    /// Start closing. Ignored while locked or malfunctioning.
    pub fn deactivate(&mut self, ctx: &mut MechanismContext<'_>) {
        match self.door_state {
            DoorState::Locked | DoorState::Malfunction => {
                log::debug!("Door '{}' ignored deactivate while {:?}", self.id, self.door_state);
            }
            DoorState::Open | DoorState::Opening => {
                self.door_state = DoorState::Closing;
                self.state = MechanismState::Inactive;
                ctx.emit(EventType::DoorClosing, &self.id);
            }
            DoorState::Closed | DoorState::Closing => {}
        }
    }

    /// Advance the animation and re-derive the collider
    pub fn update(&mut self, delta_time: f32, ctx: &mut MechanismContext<'_>) {
        self.update_progress(delta_time, ctx);
        self.update_collider();
    }

    fn update_progress(&mut self, delta_time: f32, ctx: &mut MechanismContext<'_>) {
        let (target, speed) = match self.door_state {
            DoorState::Opening => (1.0, self.open_speed),
            DoorState::Closing => (0.0, self.close_speed),
            _ => return,
        };

        let step = speed * delta_time;
        if (target - self.progress).abs() <= step {
            self.progress = target;
            if target >= 1.0 {
                self.door_state = DoorState::Open;
                ctx.emit(EventType::DoorOpened, &self.id);
            } else {
                self.door_state = DoorState::Closed;
                ctx.emit(EventType::DoorClosed, &self.id);
            }
        } else if target > self.progress {
            self.progress += step;
        } else {
            self.progress -= step;
        }
    }

    fn update_collider(&mut self) {
        let passable = self.door_state == DoorState::Open
            || (self.door_state == DoorState::Opening && self.progress >= COLLISION_DISABLE_THRESHOLD);

        if passable {
            self.collider.disable_collision();
        } else {
            self.collider.set_layer(CollisionLayers::DOOR);
            self.collider.set_mask(CollisionLayers::default_mask(CollisionLayers::DOOR));
        }
    }

    /// Lock or unlock the door.
    ///
    /// Locking snaps the door shut and makes it solid immediately. Unlocking
    /// leaves it closed.
    pub fn set_locked(&mut self, locked: bool) {
        if locked && self.door_state != DoorState::Locked {
            self.door_state = DoorState::Locked;
            self.state = MechanismState::Inactive;
            self.progress = 0.0;
            self.update_collider();
        } else if !locked && self.door_state == DoorState::Locked {
            self.door_state = DoorState::Closed;
        }
    }

    /// Jam or repair the door.
    ///
    /// A jammed door keeps its progress and stops reacting to
    /// activate/deactivate. Repair settles it to Open or Closed at the ends of
    /// its travel, otherwise it starts closing. Locked doors cannot jam.
    pub fn set_malfunction(&mut self, malfunction: bool) {
        if malfunction {
            if matches!(self.door_state, DoorState::Locked | DoorState::Malfunction) {
                return;
            }
            log::debug!("Door '{}' malfunctioned at progress {:.2}", self.id, self.progress);
            self.door_state = DoorState::Malfunction;
            self.state = MechanismState::Broken;
        } else if self.door_state == DoorState::Malfunction {
            self.door_state = if self.progress >= 1.0 {
                DoorState::Open
            } else if self.progress <= 0.0 {
                DoorState::Closed
            } else {
                DoorState::Closing
            };
            self.state = if self.door_state == DoorState::Open {
                MechanismState::Active
            } else {
                MechanismState::Inactive
            };
        }
        self.update_collider();
    }

    /// Back to closed, unlocked and solid
    pub fn reset(&mut self) {
        self.door_state = DoorState::Closed;
        self.state = MechanismState::Inactive;
        self.progress = 0.0;
        self.update_collider();
    }

    /// Feedback color: locked color, or a blend from closed to open by progress
    pub fn current_color(&self) -> Color {
        if self.door_state == DoorState::Locked {
            return Color::from(LOCKED_COLOR);
        }
        utils::lerp_color(Color::from(CLOSED_COLOR), Color::from(OPEN_COLOR), self.progress)
    }
}
