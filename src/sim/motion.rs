//! Motion model for the vehicle and obstacles
//!
//! Vehicle steering is two-stage: input picks a target velocity, then the
//! actual velocity eases toward it. Obstacles scroll down at the run speed
//! and optionally sway (sine) or glide between lanes (patrol).

use super::state::{Motion, Obstacle, Player, PlayerVisual};
use super::tick::TickInput;
use super::track::Track;
use crate::clamp_lenient;
use crate::consts::*;
use crate::tuning::Tuning;

/// Target lateral velocity for this tick.
///
/// An active follow target overrides the discrete left/right flags.
pub fn target_velocity(input: &TickInput, player: &Player, speed: f32, tuning: &Tuning) -> f32 {
    let move_speed = tuning.move_speed(speed);

    if let Some(target_x) = input.follow_target {
        let derived = (target_x - player.pos.x) * tuning.follow_gain;
        let max_derived = move_speed * tuning.follow_max_factor;
        return clamp_lenient(derived, -max_derived, max_derived);
    }

    let mut target = 0.0;
    if input.left {
        target -= move_speed;
    }
    if input.right {
        target += move_speed;
    }
    target
}

/// Ease velocity toward `target`, integrate position and confine to the road.
///
/// Returns true if the vehicle hit a road edge this tick.
pub fn integrate_player(player: &mut Player, target_vel: f32, track: &Track, tuning: &Tuning) -> bool {
    player.vel_x += (target_vel - player.vel_x) * tuning.velocity_smoothing;
    player.pos.x += player.vel_x;
    confine_player(player, track, tuning.road_margin)
}

/// Hard-clamp the vehicle inside the road. Walls are inelastic.
pub fn confine_player(player: &mut Player, track: &Track, margin: f32) -> bool {
    let (min_x, max_x) = track.player_bounds(player.size.x, margin);
    let mut clamped = false;
    if player.pos.x < min_x {
        player.pos.x = min_x;
        player.vel_x = 0.0;
        clamped = true;
    }
    if player.pos.x > max_x {
        player.pos.x = max_x;
        player.vel_x = 0.0;
        clamped = true;
    }
    clamped
}

/// Refresh tilt and bob from the current physics
pub fn update_visual(visual: &mut PlayerVisual, vel_x: f32, dt_ms: f32, tuning: &Tuning) {
    visual.tilt = (-vel_x / (tuning.move_speed_base + CAR_TILT_VELOCITY_RANGE)) * CAR_TILT_MAX;
    visual.bob_phase = (visual.bob_phase + CAR_BOB_SPEED * dt_ms) % std::f32::consts::TAU;
}

/// Scroll an obstacle down and advance its own motion clock
pub fn advance_obstacle(obstacle: &mut Obstacle, speed: f32, dt_ms: f32, tuning: &Tuning) {
    obstacle.pos.y += speed * (1.0 + dt_ms * tuning.scroll_time_factor);
    if let Motion::Patrol { speed: rate, phase, .. } = &mut obstacle.motion {
        *phase += *rate * dt_ms;
    }
}

/// Instantaneous left edge of an obstacle at run time `elapsed_ms`
pub fn obstacle_x(obstacle: &Obstacle, elapsed_ms: f64) -> f32 {
    match obstacle.motion {
        Motion::Static => obstacle.pos.x,
        Motion::Sine {
            amplitude,
            phase,
            frequency,
        } => {
            let angle = elapsed_ms * frequency as f64 + phase as f64;
            obstacle.pos.x + angle.sin() as f32 * amplitude
        }
        Motion::Patrol { x1, x2, phase, .. } => {
            let progress = (phase.sin() + 1.0) / 2.0;
            x1 + (x2 - x1) * progress
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;

    fn track() -> Track {
        Track::new(400.0, 700.0)
    }

    fn player() -> Player {
        Player::for_track(&track(), &Tuning::default())
    }

    fn obstacle(motion: Motion) -> Obstacle {
        Obstacle {
            id: 1,
            lane: 1,
            pos: Vec2::new(180.0, -100.0),
            size: Vec2::new(45.0, 40.0),
            motion,
            passed: false,
        }
    }

    #[test]
    fn test_keys_produce_move_speed() {
        let tuning = Tuning::default();
        let p = player();
        let left = TickInput {
            left: true,
            ..Default::default()
        };
        let both = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(target_velocity(&left, &p, 2.2, &tuning), -17.0);
        assert_eq!(target_velocity(&both, &p, 2.2, &tuning), 0.0);
        assert_eq!(target_velocity(&TickInput::default(), &p, 2.2, &tuning), 0.0);
    }

    #[test]
    fn test_follow_overrides_keys_and_is_capped() {
        let tuning = Tuning::default();
        let p = player();
        let input = TickInput {
            left: true,
            follow_target: Some(p.pos.x + 200.0),
            ..Default::default()
        };
        // 0.18 * 200 = 36 exceeds 17 * 1.6 = 27.2
        let v = target_velocity(&input, &p, 2.2, &tuning);
        assert!((v - 27.2).abs() < 1e-4);

        let near = TickInput {
            follow_target: Some(p.pos.x + 10.0),
            ..Default::default()
        };
        assert!((target_velocity(&near, &p, 2.2, &tuning) - 1.8).abs() < 1e-4);
    }

    #[test]
    fn test_velocity_eases_toward_target() {
        let tuning = Tuning::default();
        let mut p = player();
        integrate_player(&mut p, 10.0, &track(), &tuning);
        assert!((p.vel_x - 2.2).abs() < 1e-5);
        assert!((p.pos.x - 178.2).abs() < 1e-4);
    }

    #[test]
    fn test_wall_zeroes_velocity() {
        let tuning = Tuning::default();
        let mut p = player();
        p.pos.x = 67.0;
        p.vel_x = -20.0;
        let clamped = integrate_player(&mut p, -20.0, &track(), &tuning);
        assert!(clamped);
        assert_eq!(p.vel_x, 0.0);
        assert!((p.pos.x - 66.0).abs() < 1e-4);
    }

    #[test]
    fn test_tilt_leans_against_motion() {
        let tuning = Tuning::default();
        let mut visual = PlayerVisual::default();
        update_visual(&mut visual, 20.0, 16.0, &tuning);
        assert!((visual.tilt + 12.0).abs() < 1e-5);
        assert!((visual.bob_phase - 0.096).abs() < 1e-6);

        update_visual(&mut visual, -10.0, 16.0, &tuning);
        assert!((visual.tilt - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_scroll_uses_speed_and_frame_time() {
        let tuning = Tuning::default();
        let mut ob = obstacle(Motion::Static);
        advance_obstacle(&mut ob, 2.0, 20.0, &tuning);
        // 2 * (1 + 20 * 0.0015)
        assert!((ob.pos.y - (-100.0 + 2.06)).abs() < 1e-4);
        assert_eq!(obstacle_x(&ob, 1234.0), 180.0);
    }

    #[test]
    fn test_sine_is_a_function_of_run_time() {
        let ob = obstacle(Motion::Sine {
            amplitude: 20.0,
            phase: 0.0,
            frequency: 0.002,
        });
        // Quarter period: sin(pi/2) = 1
        let t = std::f64::consts::FRAC_PI_2 / 0.002;
        assert!((obstacle_x(&ob, t) - 200.0).abs() < 1e-3);
        // Same time, same answer regardless of call history
        assert_eq!(obstacle_x(&ob, 500.0), obstacle_x(&ob, 500.0));
    }

    #[test]
    fn test_patrol_accumulates_phase() {
        let tuning = Tuning::default();
        let mut ob = obstacle(Motion::Patrol {
            x1: 100.0,
            x2: 200.0,
            speed: 0.05,
            phase: 0.0,
        });
        assert!((obstacle_x(&ob, 0.0) - 150.0).abs() < 1e-4);
        advance_obstacle(&mut ob, 2.2, 10.0, &tuning);
        match ob.motion {
            Motion::Patrol { phase, .. } => assert!((phase - 0.5).abs() < 1e-6),
            _ => unreachable!(),
        }
    }

    proptest! {
        #[test]
        fn prop_patrol_stays_between_anchors(
            x1 in 0.0f32..400.0,
            x2 in 0.0f32..400.0,
            rate in 0.03f32..0.09,
            steps in 1usize..400,
            dt in 1.0f32..50.0,
        ) {
            let tuning = Tuning::default();
            let mut ob = obstacle(Motion::Patrol { x1, x2, speed: rate, phase: 0.0 });
            let (lo, hi) = (x1.min(x2), x1.max(x2));
            for _ in 0..steps {
                advance_obstacle(&mut ob, 2.2, dt, &tuning);
                let x = obstacle_x(&ob, 0.0);
                prop_assert!(x >= lo - 1e-3 && x <= hi + 1e-3);
            }
        }

        #[test]
        fn prop_player_stays_on_road(
            targets in proptest::collection::vec(-100.0f32..100.0, 1..200),
        ) {
            let tuning = Tuning::default();
            let t = track();
            let mut p = player();
            let (min_x, max_x) = t.player_bounds(p.size.x, tuning.road_margin);
            for target in targets {
                let clamped = integrate_player(&mut p, target, &t, &tuning);
                prop_assert!(p.pos.x >= min_x && p.pos.x <= max_x);
                if clamped {
                    prop_assert_eq!(p.vel_x, 0.0);
                }
            }
        }
    }
}
