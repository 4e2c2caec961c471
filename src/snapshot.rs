//! Read-only frame view for renderers and HUDs
//!
//! Obstacle rectangles come from the same function the collision check
//! uses, so a renderer drawing this view draws exactly the hitboxes.

use serde::Serialize;

use crate::consts::PROXIMITY_GLOW_RANGE;
use crate::fx::Particle;
use crate::sim::{Rect, RunPhase, SimulationState, Track, obstacle_rect};

/// Vehicle as the renderer needs it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub rect: Rect,
    /// Degrees
    pub tilt: f32,
    /// Vertical draw offset in pixels
    pub bob_offset: f32,
}

/// One obstacle as the renderer needs it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObstacleView {
    pub id: u32,
    pub rect: Rect,
    /// "static", "sine" or "patrol"
    pub variant: &'static str,
    /// 0..1 highlight as the obstacle closes in on the vehicle
    pub pulse: f32,
}

/// Everything drawn in one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameView {
    pub track: Track,
    pub player: PlayerView,
    pub obstacles: Vec<ObstacleView>,
    pub particles: Vec<Particle>,
    pub score: u64,
    pub phase: RunPhase,
    pub elapsed_ms: f64,
}

impl FrameView {
    pub fn capture(state: &SimulationState, particles: &[Particle], bob: bool) -> Self {
        let player = &state.player;
        let obstacles = state
            .obstacles
            .iter()
            .map(|ob| {
                // Gap between the obstacle's bottom edge and the vehicle's top edge
                let distance = player.pos.y - (ob.pos.y + ob.size.y);
                ObstacleView {
                    id: ob.id,
                    rect: obstacle_rect(ob, state.elapsed_ms),
                    variant: ob.motion.as_str(),
                    pulse: (1.0 - distance / PROXIMITY_GLOW_RANGE).clamp(0.0, 1.0),
                }
            })
            .collect();

        Self {
            track: state.track.clone(),
            player: PlayerView {
                rect: player.rect(),
                tilt: state.visual.tilt,
                bob_offset: if bob { state.visual.bob_offset() } else { 0.0 },
            },
            obstacles,
            particles: particles.to_vec(),
            score: state.score,
            phase: state.phase,
            elapsed_ms: state.elapsed_ms,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
