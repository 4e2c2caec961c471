//! Lane Dodger - A three-lane arcade obstacle dodger
//!
//! Core modules:
//! - `sim`: Deterministic simulation (lanes, spawning, motion, collisions, run state)
//! - `input`: Raw input events folded into per-tick steering
//! - `audio`: Optional, best-effort sound handles
//! - `fx`: Presentation-only particle effects
//! - `game`: Fixed-timestep driver tying the pieces together
//! - `snapshot`: Read-only view handed to renderers
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod fx;
pub mod game;
pub mod input;
pub mod settings;
pub mod sim;
pub mod snapshot;
pub mod tuning;

pub use game::Game;
pub use settings::{ControlMode, QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (60 Hz)
    pub const SIM_DT_MS: f32 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the driver will integrate (ms)
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// Track layout
    pub const LANE_COUNT: usize = 3;
    pub const ROAD_WIDTH_RATIO: f32 = 0.7;
    pub const LANE_SIDE_PADDING: f32 = 10.0;

    /// Reference line new obstacles are measured against
    pub const SPAWN_Y: f32 = -10.0;
    /// Obstacles never get narrower than this
    pub const MIN_OBSTACLE_WIDTH: f32 = 12.0;
    /// Gap kept between a fresh obstacle and the top of the track
    pub const SPAWN_CLEARANCE: f32 = 8.0;

    /// Vehicle sizing (relative to track size, with absolute caps)
    pub const CAR_MAX_WIDTH: f32 = 64.0;
    pub const CAR_WIDTH_RATIO: f32 = 0.12;
    pub const CAR_MAX_HEIGHT: f32 = 100.0;
    pub const CAR_HEIGHT_RATIO: f32 = 0.16;
    pub const CAR_HEIGHT_SCALE: f32 = 0.5;
    /// Distance from the bottom of the track to the vehicle's bottom edge
    pub const CAR_BOTTOM_PADDING: f32 = 28.0;

    /// Vehicle presentation
    pub const CAR_TILT_MAX: f32 = 12.0; // degrees
    pub const CAR_TILT_VELOCITY_RANGE: f32 = 8.0;
    pub const CAR_BOB_AMPLITUDE: f32 = 3.0;
    pub const CAR_BOB_SPEED: f32 = 0.006; // radians per ms

    /// Effects
    pub const SKID_THRESHOLD: f32 = 14.0;
    pub const EXHAUST_INTERVAL_MS: f64 = 60.0;
    /// Obstacles start glowing when this close to the vehicle
    pub const PROXIMITY_GLOW_RANGE: f32 = 220.0;
}

/// Clamp without panicking when `min > max` (degenerate tracks).
///
/// The lower bound is applied first, then the upper bound, so an inverted
/// range resolves to `max`.
#[inline]
pub fn clamp_lenient(value: f32, min: f32, max: f32) -> f32 {
    let mut v = value;
    if v < min {
        v = min;
    }
    if v > max {
        v = max;
    }
    v
}
