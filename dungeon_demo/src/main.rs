//! Headless dungeon walk driving the area engine with a scripted player

use std::path::{Path, PathBuf};

use area_engine::foundation::logging;
use area_engine::prelude::*;

// Player tuning
const PLAYER_SIZE: f32 = 16.0;
const PLAYER_SPEED: f32 = 120.0; // Units per second
const FRAME_TIME: f32 = 1.0 / 60.0;
const MAX_FRAMES: u32 = 60 * 120; // Give up after two simulated minutes
const ARRIVAL_DISTANCE: f32 = 1.0;

/// One step of the scripted walk
#[derive(Debug, Clone, Copy)]
enum Step {
    /// Walk until the player's top-left corner reaches the point
    MoveTo(f32, f32),
    /// Press the interaction key once
    Interact,
    /// Stand still for a number of seconds
    Wait(f32),
    /// Walk until the named area is current
    EnterArea(&'static str, f32, f32),
}

const SCRIPT: &[Step] = &[
    Step::MoveTo(120.0, 124.0),
    Step::Interact,
    Step::Wait(1.0),
    Step::MoveTo(262.0, 234.0),
    Step::Wait(1.0),
    Step::EnterArea("crypt", 610.0, 232.0),
    Step::Wait(0.6),
    Step::MoveTo(402.0, 122.0),
    Step::MoveTo(202.0, 122.0),
    Step::Wait(1.5),
    Step::MoveTo(316.0, 316.0),
    Step::Wait(2.0),
    Step::EnterArea("entrance", 2.0, 232.0),
];

/// The player as seen by trigger effects
#[derive(Debug)]
struct Hero {
    health: f32,
    max_health: f32,
    statuses: Vec<EffectType>,
    teleport: Option<Vec2>,
}

impl Hero {
    fn new(max_health: f32) -> Self {
        Self {
            health: max_health * 0.5,
            max_health,
            statuses: Vec::new(),
            teleport: None,
        }
    }
}

impl EffectTarget for Hero {
    fn modify_health(&mut self, amount: f32) {
        self.health = (self.health + amount).clamp(0.0, self.max_health);
        log::info!("Hero health {:+.1} -> {:.1}/{:.1}", amount, self.health, self.max_health);
    }

    fn apply_status_effect(&mut self, effect: &MechanismEffect) {
        self.statuses.push(effect.effect_type);
    }

    fn remove_status_effect(&mut self, effect: &MechanismEffect) {
        if let Some(index) = self.statuses.iter().position(|status| *status == effect.effect_type) {
            self.statuses.remove(index);
        }
    }

    fn set_position(&mut self, position: Vec2) {
        self.teleport = Some(position);
    }
}

/// Effect targets of the demo: just the hero
struct Party {
    hero: Hero,
}

impl EffectTargets for Party {
    fn find_target(&mut self, id: &str) -> Option<&mut dyn EffectTarget> {
        match id {
            "hero" => Some(&mut self.hero),
            _ => None,
        }
    }
}

/// Logs every event it sees
struct EventLog;

impl EventHandler for EventLog {
    fn on_event(&mut self, event: &Event) -> bool {
        match (event.get_mechanism_id(), event.get_area_id()) {
            (Some(id), _) => log::info!("[{:>6.2}s] {:?} '{}'", event.timestamp, event.event_type, id),
            (None, Some(area)) => log::info!("[{:>6.2}s] {:?} -> '{}'", event.timestamp, event.event_type, area),
            (None, None) => log::info!("[{:>6.2}s] {:?}", event.timestamp, event.event_type),
        }
        false
    }
}

const LOGGED_EVENTS: &[EventType] = &[
    EventType::DoorOpening,
    EventType::DoorOpened,
    EventType::DoorClosing,
    EventType::DoorClosed,
    EventType::TriggerFired,
    EventType::TriggerReleased,
    EventType::SequenceCompleted,
    EventType::SequenceFailed,
    EventType::AreaChanged,
];

fn demo_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn load_config(dir: &Path) -> SimulationConfig {
    let mut config = SimulationConfig::load_or_default(dir.join("config.toml"));
    let root = Path::new(&config.levels.root);
    if root.is_relative() {
        config.levels.root = dir.join(root).display().to_string();
    }
    config
}

/// Scripted walk state
struct Walk {
    directory: AreaDirectory,
    party: Party,
    player: BoxCollider,
    collisions: CollisionIndex<'static>,
    frames: u32,
}

impl Walk {
    fn frame(&mut self, velocity: Vec2, interact: bool) {
        let previous = self.player.position();
        if !self.player.set_position(previous + velocity * FRAME_TIME) {
            log::warn!("Player move rejected at {:?}", previous);
        }

        if let Some(area) = self.directory.current_area() {
            self.collisions.resolve(&mut self.player, &area.solid_colliders());
        }

        if interact {
            let fired = self.directory.interact(&self.player, &mut self.party);
            log::info!("Interacted with {} trigger(s)", fired);
        }

        self.directory.update(FRAME_TIME, Some(&self.player), &mut self.party);
        self.directory.handle_portal_transition(&self.player);

        let spawn = self.directory.take_spawn_position().or_else(|| self.party.hero.teleport.take());
        if let Some(spawn) = spawn {
            self.player.set_position(spawn);
        }
        self.frames += 1;
    }

    fn walk_towards(&mut self, target: Vec2) -> bool {
        let offset = target - self.player.position();
        let distance = offset.norm();
        if distance <= ARRIVAL_DISTANCE {
            return true;
        }
        let step = (PLAYER_SPEED * FRAME_TIME).min(distance);
        self.frame(offset / distance * (step / FRAME_TIME), false);
        false
    }

    fn run(&mut self, script: &[Step]) -> bool {
        for step in script {
            log::debug!("Script step {:?}", step);
            match *step {
                Step::MoveTo(x, y) => {
                    while !self.walk_towards(Vec2::new(x, y)) {
                        if self.frames >= MAX_FRAMES {
                            return false;
                        }
                    }
                }
                Step::Interact => self.frame(Vec2::zeros(), true),
                Step::Wait(seconds) => {
                    let frames = (seconds / FRAME_TIME).ceil() as u32;
                    for _ in 0..frames {
                        self.frame(Vec2::zeros(), false);
                    }
                }
                Step::EnterArea(area, x, y) => {
                    while self.directory.current_area_id() != Some(area) {
                        if self.walk_towards(Vec2::new(x, y)) || self.frames >= MAX_FRAMES {
                            log::warn!("Reached the portal spot without entering '{}'", area);
                            return false;
                        }
                    }
                }
            }
        }
        true
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = demo_dir();
    let config = load_config(&dir);
    logging::init_with_filter(&config.logging.filter);
    config.validate()?;

    log::info!("Loading levels from {}", config.levels.root);
    let source = FileLevelSource::from_config(&config.levels);
    let mut directory = AreaDirectory::new(config).with_level_source(Box::new(source));
    for event_type in LOGGED_EVENTS {
        directory.events_mut().register_handler(*event_type, Box::new(EventLog));
    }

    let start = Vec2::new(60.0, 232.0);
    directory.change_area("entrance", start)?;
    let _ = directory.take_spawn_position();

    let mut walk = Walk {
        directory,
        party: Party { hero: Hero::new(100.0) },
        player: BoxCollider::with_layer(start, Vec2::new(PLAYER_SIZE, PLAYER_SIZE), CollisionLayers::PLAYER),
        collisions: CollisionIndex::global(),
        frames: 0,
    };

    let finished = walk.run(SCRIPT);
    log::info!(
        "Walk {} after {} frames in '{}', hero health {:.1}",
        if finished { "finished" } else { "stopped" },
        walk.frames,
        walk.directory.current_area_id().unwrap_or("nowhere"),
        walk.party.hero.health
    );
    for id in ["entrance", "crypt"] {
        if let Some(area) = walk.directory.area(id) {
            let states: Vec<String> = area
                .mechanism_ids()
                .into_iter()
                .filter_map(|id| area.get_mechanism(id).map(|m| format!("{}={:?}", id, m.state())))
                .collect();
            log::info!("Area '{}': {}", id, states.join(", "));
        }
    }
    Ok(())
}
