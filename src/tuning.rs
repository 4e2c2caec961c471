//! Data-driven game balance
//!
//! Every number that shapes difficulty lives here so a run can be replayed
//! or rebalanced from JSON without touching the simulation code.

use serde::{Deserialize, Serialize};

/// Gameplay balance knobs. Times are milliseconds, distances pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Pace ===
    /// Scroll speed at the start of a run (px per tick)
    pub start_speed: f32,
    /// Speed gained per elapsed millisecond
    pub speed_gain_per_ms: f32,
    /// Optional speed ceiling (None = unbounded difficulty curve)
    pub max_speed: Option<f32>,
    /// Extra scroll per tick proportional to frame delta
    pub scroll_time_factor: f32,

    // === Spawn cadence ===
    /// Spawn interval before the first cadence update
    pub spawn_interval_start: f32,
    pub spawn_interval_base: f32,
    /// Asymptotic floor of the spawn interval
    pub spawn_interval_floor: f32,
    /// Interval reduction per point of score
    pub spawn_score_factor: f32,
    /// Interval reduction per unit of speed (floored)
    pub spawn_speed_factor: f32,
    /// How far before the next interval a failed spawn retries
    pub spawn_retry_backoff: f32,

    // === Lane safety ===
    pub min_gap_base: f32,
    /// Gap multiplier on the vehicle height
    pub min_gap_car_factor: f32,
    pub min_gap_speed_factor: f32,
    pub min_gap_speed_cap: f32,
    /// Chance of a second obstacle in the same spawn
    pub second_obstacle_chance: f32,
    /// Skip adjacent second obstacles that would wall the vehicle in
    pub avoid_adjacent_second: bool,
    /// Fraction of the gap used for the wall-in check
    pub wall_in_gap_ratio: f32,

    // === Obstacle shapes ===
    pub obstacle_min_height: f32,
    pub obstacle_height_range: f32,
    /// Obstacle width as a fraction of lane width (before random widening)
    pub obstacle_width_ratio: f32,
    pub obstacle_width_jitter: f32,

    // === Obstacle motion variants ===
    pub sine_chance: f32,
    pub patrol_chance: f32,
    /// Sine amplitude cap as a fraction of lane width
    pub sine_amplitude_lane_ratio: f32,
    pub sine_amplitude_min: f32,
    pub sine_amplitude_range: f32,
    pub sine_frequency_min: f32,
    pub sine_frequency_range: f32,
    pub patrol_speed_min: f32,
    pub patrol_speed_range: f32,

    // === Vehicle handling ===
    pub move_speed_base: f32,
    pub move_speed_factor: f32,
    /// Proportional gain of the touch-follow controller
    pub follow_gain: f32,
    /// Follow velocity cap as a multiple of move speed
    pub follow_max_factor: f32,
    /// Fraction of the velocity error removed per tick
    pub velocity_smoothing: f32,
    /// Distance kept between the vehicle and the road edges
    pub road_margin: f32,
    /// Vertical lift of the vehicle above its default position
    pub car_vertical_offset: f32,

    // === Scoring / cleanup ===
    pub points_per_obstacle: u32,
    /// Obstacles are dropped this far below the track
    pub despawn_margin: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            start_speed: 2.2,
            speed_gain_per_ms: 0.00005,
            max_speed: None,
            scroll_time_factor: 0.0015,

            spawn_interval_start: 1000.0,
            spawn_interval_base: 1100.0,
            spawn_interval_floor: 520.0,
            spawn_score_factor: 4.0,
            spawn_speed_factor: 18.0,
            spawn_retry_backoff: 220.0,

            min_gap_base: 160.0,
            min_gap_car_factor: 1.2,
            min_gap_speed_factor: 9.0,
            min_gap_speed_cap: 200.0,
            second_obstacle_chance: 0.14,
            avoid_adjacent_second: true,
            wall_in_gap_ratio: 0.9,

            obstacle_min_height: 28.0,
            obstacle_height_range: 48.0,
            obstacle_width_ratio: 0.46,
            obstacle_width_jitter: 0.12,

            sine_chance: 0.18,
            patrol_chance: 0.16,
            sine_amplitude_lane_ratio: 0.28,
            sine_amplitude_min: 24.0,
            sine_amplitude_range: 28.0,
            sine_frequency_min: 0.0015,
            sine_frequency_range: 0.0025,
            patrol_speed_min: 0.03,
            patrol_speed_range: 0.06,

            move_speed_base: 12.0,
            move_speed_factor: 2.2,
            follow_gain: 0.18,
            follow_max_factor: 1.6,
            velocity_smoothing: 0.22,
            road_margin: 6.0,
            car_vertical_offset: 60.0,

            points_per_obstacle: 10,
            despawn_margin: 240.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Spawn interval for the current score and speed
    pub fn spawn_interval(&self, score: u64, speed: f32) -> f32 {
        let shrink = score as f32 * self.spawn_score_factor + (speed * self.spawn_speed_factor).floor();
        (self.spawn_interval_base - shrink).max(self.spawn_interval_floor)
    }

    /// Minimum vertical distance between obstacles sharing a lane
    pub fn min_vertical_gap(&self, car_height: f32, speed: f32) -> f32 {
        let base = (car_height * self.min_gap_car_factor).floor().max(self.min_gap_base);
        base + (speed * self.min_gap_speed_factor).floor().min(self.min_gap_speed_cap)
    }

    /// Lateral speed of the vehicle for the current scroll speed
    pub fn move_speed(&self, speed: f32) -> f32 {
        self.move_speed_base + (speed * self.move_speed_factor).round()
    }

    /// Apply the optional speed ceiling
    pub fn cap_speed(&self, speed: f32) -> f32 {
        match self.max_speed {
            Some(max) => speed.min(max),
            None => speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_interval_start_of_run() {
        let tuning = Tuning::default();
        // 1100 - 0 - floor(2.2 * 18) = 1100 - 39
        assert_eq!(tuning.spawn_interval(0, 2.2), 1061.0);
    }

    #[test]
    fn test_spawn_interval_has_floor() {
        let tuning = Tuning::default();
        assert_eq!(tuning.spawn_interval(10_000, 2.2), 520.0);
        assert_eq!(tuning.spawn_interval(0, 1.0e6), 520.0);
    }

    #[test]
    fn test_min_vertical_gap() {
        let tuning = Tuning::default();
        // Small vehicle: base wins; speed term floors 2.2 * 9 = 19.8 to 19
        assert_eq!(tuning.min_vertical_gap(40.0, 2.2), 179.0);
        // Tall vehicle: 150 * 1.2 = 180 beats the base
        assert_eq!(tuning.min_vertical_gap(150.0, 2.2), 199.0);
        // Speed contribution is capped
        assert_eq!(tuning.min_vertical_gap(40.0, 100.0), 360.0);
    }

    #[test]
    fn test_move_speed_rounds() {
        let tuning = Tuning::default();
        // round(2.2 * 2.2 = 4.84) = 5
        assert_eq!(tuning.move_speed(2.2), 17.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "start_speed": 3.0, "max_speed": 9.0 }"#).unwrap();
        assert_eq!(tuning.start_speed, 3.0);
        assert_eq!(tuning.max_speed, Some(9.0));
        assert_eq!(tuning.points_per_obstacle, 10);
        assert_eq!(tuning.cap_speed(12.0), 9.0);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Tuning::from_json("{ start_speed: }").is_err());
    }
}
