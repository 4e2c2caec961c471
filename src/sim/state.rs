//! Simulation state and core entity types
//!
//! Everything a run needs lives in one owned `SimulationState`. Physical
//! fields (positions, velocities, timers) are kept apart from presentation
//! fields (tilt, bob) so the core can be tested without a renderer.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::track::Track;
use crate::consts::*;
use crate::tuning::Tuning;

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Waiting on the start screen
    Idle,
    /// Active gameplay
    Running,
    /// Vehicle crashed; waits for an explicit restart
    Ended,
}

/// The player's vehicle (physical state only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Lateral velocity (px per tick)
    pub vel_x: f32,
}

impl Player {
    /// Size and place the vehicle for a fresh run on `track`
    pub fn for_track(track: &Track, tuning: &Tuning) -> Self {
        let w = CAR_MAX_WIDTH.min(track.width * CAR_WIDTH_RATIO);
        let h = CAR_MAX_HEIGHT.min(track.height * CAR_HEIGHT_RATIO) * CAR_HEIGHT_SCALE;
        let x = (track.width - w) / 2.0;
        let y = track.height - h - CAR_BOTTOM_PADDING - tuning.car_vertical_offset;
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
            vel_x: 0.0,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Y coordinate of the bottom edge (obstacles score once past it)
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
}

/// Presentation-only vehicle state, derived from physics each tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerVisual {
    /// Body tilt in degrees (leans against the direction of travel)
    pub tilt: f32,
    /// Phase of the idle bobbing animation (radians)
    pub bob_phase: f32,
}

impl PlayerVisual {
    /// Vertical bob offset in pixels
    pub fn bob_offset(&self) -> f32 {
        self.bob_phase.sin() * CAR_BOB_AMPLITUDE
    }
}

/// Lateral motion variant of an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Motion {
    /// Holds its lane position
    Static,
    /// Sways around its anchor as a function of run time
    Sine {
        amplitude: f32,
        phase: f32,
        /// Radians per millisecond
        frequency: f32,
    },
    /// Glides between two lane anchors
    Patrol {
        x1: f32,
        x2: f32,
        /// Radians per millisecond
        speed: f32,
        /// Accumulated phase
        phase: f32,
    },
}

impl Motion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Motion::Static => "static",
            Motion::Sine { .. } => "sine",
            Motion::Patrol { .. } => "patrol",
        }
    }
}

/// An obstacle scrolling down the track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub lane: usize,
    /// Anchor top-left corner (lateral offsets are applied on top)
    pub pos: Vec2,
    pub size: Vec2,
    pub motion: Motion,
    /// Already counted toward the score
    pub passed: bool,
}

/// Fire-and-forget notifications for renderers, audio and effects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted,
    ObstacleSpawned { id: u32, lane: usize },
    /// No lane was safe; the spawner will retry early
    SpawnDeferred,
    ObstaclePassed { id: u32, score: u64 },
    /// Exhaust puff behind the vehicle
    Exhaust { pos: Vec2 },
    /// Hard lateral movement at the given wheel position
    Skid { pos: Vec2, vel_x: f32 },
    /// Vehicle hit an obstacle
    Crash { pos: Vec2, obstacle_id: u32 },
    RunEnded { score: u64 },
}

/// Complete simulation state for one session (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    /// Seed the RNG was created from
    pub seed: u64,
    /// Gameplay RNG (spawning and variant draws only)
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub track: Track,
    pub phase: RunPhase,
    pub score: u64,
    /// Scroll speed; also drives spawn cadence and handling
    pub speed: f32,
    /// Milliseconds since the last spawn (or backoff point)
    pub spawn_timer: f32,
    pub spawn_interval: f32,
    /// Run time in milliseconds
    pub elapsed_ms: f64,
    /// Run time of the last exhaust puff
    pub last_exhaust_ms: f64,
    pub player: Player,
    pub visual: PlayerVisual,
    /// Active obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Events produced since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl SimulationState {
    /// Create an idle session; call `start` to begin a run
    pub fn new(seed: u64, track: Track, tuning: Tuning) -> Self {
        let player = Player::for_track(&track, &tuning);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            speed: tuning.start_speed,
            spawn_interval: tuning.spawn_interval_start,
            tuning,
            track,
            phase: RunPhase::Idle,
            score: 0,
            spawn_timer: 0.0,
            elapsed_ms: 0.0,
            last_exhaust_ms: 0.0,
            player,
            visual: PlayerVisual::default(),
            obstacles: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Reset entities and timers and enter `Running`
    pub fn start(&mut self) {
        self.obstacles.clear();
        self.score = 0;
        self.speed = self.tuning.start_speed;
        self.spawn_timer = 0.0;
        self.spawn_interval = self.tuning.spawn_interval_start;
        self.elapsed_ms = 0.0;
        self.last_exhaust_ms = 0.0;
        self.player = Player::for_track(&self.track, &self.tuning);
        self.visual = PlayerVisual::default();
        self.phase = RunPhase::Running;
        self.events.push(GameEvent::RunStarted);
        log::info!("Run started (seed {}, speed {:.2})", self.seed, self.speed);
    }

    /// Leave the run and go back to the start screen
    pub fn return_to_menu(&mut self) {
        self.obstacles.clear();
        self.phase = RunPhase::Idle;
    }

    /// Replace the gameplay RNG so the next runs follow a new sequence
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
    }

    /// Track was resized. The vehicle keeps its row until the next start,
    /// but is pulled back inside the new road.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.track = Track::new(width, height);
        let (min_x, max_x) = self.track.player_bounds(self.player.size.x, self.tuning.road_margin);
        self.player.pos.x = crate::clamp_lenient(self.player.pos.x, min_x, max_x);
        log::info!("Track resized to {}x{}", width, height);
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
