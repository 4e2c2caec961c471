//! Simulation tick
//!
//! Advances one frame of a run: pace, spawning, steering, obstacle motion,
//! scoring and finally the collision check. Steps run in that fixed order
//! and nothing is rolled back if the tick ends in a crash.

use glam::Vec2;

use super::collision::find_collision;
use super::motion::{advance_obstacle, integrate_player, target_velocity, update_visual};
use super::spawner::try_spawn;
use super::state::{GameEvent, RunPhase, SimulationState};
use crate::consts::*;

/// Steering for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Steer left (key, button or left half of the screen)
    pub left: bool,
    /// Steer right
    pub right: bool,
    /// Desired vehicle left edge while a pointer is being followed.
    /// Overrides `left`/`right` when set.
    pub follow_target: Option<f32>,
}

/// Advance the run by one frame of `dt_ms` milliseconds.
///
/// Does nothing unless the run is `Running`.
pub fn tick(state: &mut SimulationState, input: &TickInput, dt_ms: f32) {
    if !state.is_running() {
        return;
    }

    state.elapsed_ms += dt_ms as f64;
    state.speed = state.tuning.cap_speed(state.speed + dt_ms * state.tuning.speed_gain_per_ms);

    // Spawn cadence tightens with score and speed
    state.spawn_interval = state.tuning.spawn_interval(state.score, state.speed);
    state.spawn_timer += dt_ms;
    if state.spawn_timer > state.spawn_interval {
        let spawned = try_spawn(state);
        state.spawn_timer = if spawned {
            0.0
        } else {
            state.spawn_interval - state.tuning.spawn_retry_backoff
        };
    }

    // Vehicle
    let target = target_velocity(input, &state.player, state.speed, &state.tuning);
    integrate_player(&mut state.player, target, &state.track, &state.tuning);
    update_visual(&mut state.visual, state.player.vel_x, dt_ms, &state.tuning);
    emit_vehicle_effects(state);

    // Obstacles: scroll, score once past the vehicle, drop once off-screen
    let player_bottom = state.player.bottom();
    let despawn_y = state.track.height + state.tuning.despawn_margin;
    for ob in state.obstacles.iter_mut() {
        advance_obstacle(ob, state.speed, dt_ms, &state.tuning);
        if !ob.passed && ob.pos.y > player_bottom {
            ob.passed = true;
            state.score += state.tuning.points_per_obstacle as u64;
            state.events.push(GameEvent::ObstaclePassed {
                id: ob.id,
                score: state.score,
            });
        }
    }
    state.obstacles.retain(|ob| ob.pos.y <= despawn_y);

    if let Some(hit) = find_collision(&state.player, &state.obstacles, state.elapsed_ms) {
        state.phase = RunPhase::Ended;
        state.events.push(GameEvent::Crash {
            pos: hit.point,
            obstacle_id: hit.obstacle_id,
        });
        state.events.push(GameEvent::RunEnded { score: state.score });
        log::info!(
            "Run ended: hit obstacle {} after {:.1}s, score {}",
            hit.obstacle_id,
            state.elapsed_ms / 1000.0,
            state.score
        );
    }
}

/// Exhaust puffs on a fixed cadence, skid marks on hard steering
fn emit_vehicle_effects(state: &mut SimulationState) {
    let player = &state.player;

    if state.elapsed_ms - state.last_exhaust_ms > EXHAUST_INTERVAL_MS {
        let pos = Vec2::new(player.pos.x + player.size.x / 2.0, player.bottom() + 6.0);
        state.events.push(GameEvent::Exhaust { pos });
        state.last_exhaust_ms = state.elapsed_ms;
    }

    if player.vel_x.abs() > SKID_THRESHOLD {
        // Outer rear wheel relative to the turn
        let x = if player.vel_x > 0.0 {
            player.pos.x + 6.0
        } else {
            player.pos.x + player.size.x - 6.0
        };
        let pos = Vec2::new(x, player.bottom() - 6.0);
        state.events.push(GameEvent::Skid {
            pos,
            vel_x: player.vel_x,
        });
    }
}
