//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only enters through the tick delta
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod motion;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod track;

pub use collision::{CollisionHit, Rect, find_collision, obstacle_rect};
pub use spawner::{plan_spawn, safe_lanes, try_spawn};
pub use state::{GameEvent, Motion, Obstacle, Player, PlayerVisual, RunPhase, SimulationState};
pub use tick::{TickInput, tick};
pub use track::Track;
