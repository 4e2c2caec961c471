//! Obstacle spawning with per-lane spacing guarantees
//!
//! A spawn picks a random lane whose closest obstacle is far enough below
//! the spawn line, occasionally adds a second obstacle in another lane, and
//! never walls the vehicle in across all three lanes at once.

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;

use super::state::{GameEvent, Motion, Obstacle, SimulationState};
use super::track::Track;
use crate::consts::*;
use crate::tuning::Tuning;

/// An obstacle that has been placed but not yet given an id
#[derive(Debug, Clone, PartialEq)]
pub struct Blueprint {
    pub lane: usize,
    pub pos: Vec2,
    pub size: Vec2,
    pub motion: Motion,
}

impl Blueprint {
    pub fn into_obstacle(self, id: u32) -> Obstacle {
        Obstacle {
            id,
            lane: self.lane,
            pos: self.pos,
            size: self.size,
            motion: self.motion,
            passed: false,
        }
    }
}

/// Lanes whose nearest obstacle is at least `min_gap` below the spawn line,
/// in random order.
///
/// Distances are signed: an obstacle still above the spawn line counts as
/// too close.
pub fn safe_lanes<R: Rng + ?Sized>(rng: &mut R, obstacles: &[Obstacle], min_gap: f32) -> Vec<usize> {
    let mut lanes: Vec<usize> = (0..LANE_COUNT).collect();
    lanes.shuffle(rng);
    lanes.retain(|&lane| {
        obstacles
            .iter()
            .filter(|ob| ob.lane == lane)
            .map(|ob| ob.pos.y - SPAWN_Y)
            .fold(None, |nearest: Option<f32>, d| Some(nearest.map_or(d, |n| n.min(d))))
            .is_none_or(|nearest| nearest >= min_gap)
    });
    lanes
}

/// Whether a second obstacle in `candidate` next to `first` would leave the
/// vehicle no way through: the remaining lane already has an obstacle near
/// the spawn line.
fn walls_in(obstacles: &[Obstacle], first: usize, candidate: usize, window: f32) -> bool {
    obstacles
        .iter()
        .any(|ob| ob.lane != first && ob.lane != candidate && (ob.pos.y - SPAWN_Y).abs() < window)
}

/// Build an obstacle for `lane`, drawing its motion variant
fn place_in_lane<R: Rng + ?Sized>(
    rng: &mut R,
    track: &Track,
    tuning: &Tuning,
    lane: usize,
    base_width: f32,
    height: f32,
) -> Blueprint {
    let width = base_width.min(MIN_OBSTACLE_WIDTH.max(track.lane_width - LANE_SIDE_PADDING * 2.0));
    let x = track.centered_x(lane, width);
    // Start fully above the visible track
    let y = -height - SPAWN_CLEARANCE - height;

    let roll: f32 = rng.random();
    let motion = if roll < tuning.sine_chance {
        let amplitude = (track.lane_width * tuning.sine_amplitude_lane_ratio)
            .min(tuning.sine_amplitude_min + rng.random::<f32>() * tuning.sine_amplitude_range);
        let phase = rng.random::<f32>() * std::f32::consts::TAU;
        let frequency = tuning.sine_frequency_min + rng.random::<f32>() * tuning.sine_frequency_range;
        Motion::Sine {
            amplitude,
            phase,
            frequency,
        }
    } else if roll < tuning.sine_chance + tuning.patrol_chance {
        let other = if rng.random_bool(0.5) {
            lane.saturating_sub(1)
        } else {
            (lane + 1).min(LANE_COUNT - 1)
        };
        let speed = tuning.patrol_speed_min + rng.random::<f32>() * tuning.patrol_speed_range;
        Motion::Patrol {
            x1: x,
            x2: track.centered_x(other, width),
            speed,
            phase: 0.0,
        }
    } else {
        Motion::Static
    };

    Blueprint {
        lane,
        pos: Vec2::new(x, y),
        size: Vec2::new(width, height),
        motion,
    }
}

/// Decide what to spawn this attempt. Empty means no lane was safe.
pub fn plan_spawn<R: Rng + ?Sized>(
    rng: &mut R,
    track: &Track,
    tuning: &Tuning,
    car_height: f32,
    speed: f32,
    obstacles: &[Obstacle],
) -> Vec<Blueprint> {
    let height = tuning.obstacle_min_height + rng.random::<f32>() * tuning.obstacle_height_range;
    let base_width =
        track.lane_width * (tuning.obstacle_width_ratio + rng.random::<f32>() * tuning.obstacle_width_jitter);
    let min_gap = tuning.min_vertical_gap(car_height, speed);

    let safe = safe_lanes(rng, obstacles, min_gap);
    if safe.is_empty() {
        return Vec::new();
    }

    let first = safe[rng.random_range(0..safe.len())];
    let mut planned = vec![place_in_lane(rng, track, tuning, first, base_width, height)];

    if rng.random::<f32>() < tuning.second_obstacle_chance && safe.len() > 1 {
        let mut others: Vec<usize> = safe.iter().copied().filter(|&l| l != first).collect();
        others.shuffle(rng);
        let window = min_gap * tuning.wall_in_gap_ratio;
        let second = others.into_iter().find(|&candidate| {
            let adjacent = candidate.abs_diff(first) == 1;
            !(tuning.avoid_adjacent_second && adjacent && walls_in(obstacles, first, candidate, window))
        });
        if let Some(lane) = second {
            planned.push(place_in_lane(rng, track, tuning, lane, base_width, height));
        }
    }

    planned
}

/// Attempt a spawn, adding obstacles to the state. Returns false if every
/// lane was blocked; the caller retries early instead of waiting a full
/// interval.
pub fn try_spawn(state: &mut SimulationState) -> bool {
    let planned = plan_spawn(
        &mut state.rng,
        &state.track,
        &state.tuning,
        state.player.size.y,
        state.speed,
        &state.obstacles,
    );
    if planned.is_empty() {
        log::debug!("No safe lane at speed {:.2}; backing off", state.speed);
        state.events.push(GameEvent::SpawnDeferred);
        return false;
    }

    for blueprint in planned {
        let id = state.next_entity_id();
        let lane = blueprint.lane;
        log::debug!("Spawned obstacle {} in lane {} ({})", id, lane, blueprint.motion.as_str());
        state.obstacles.push(blueprint.into_obstacle(id));
        state.events.push(GameEvent::ObstacleSpawned { id, lane });
    }
    true
}
