//! Track geometry: road placement and lane layout
//!
//! The road is a centered band covering 70% of the track width, split into
//! equal-width lanes. Everything here is a pure function of the track size.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Track dimensions and the lane layout derived from them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub width: f32,
    pub height: f32,
    /// Width of the drivable road
    pub road_width: f32,
    /// X coordinate of the road's left edge
    pub road_left: f32,
    pub lane_width: f32,
    /// Lane center x coordinates, left to right
    pub lane_centers: [f32; LANE_COUNT],
}

impl Track {
    pub fn new(width: f32, height: f32) -> Self {
        let road_width = width * ROAD_WIDTH_RATIO;
        let road_left = (width - road_width) / 2.0;
        let lane_width = road_width / LANE_COUNT as f32;
        let lane_centers = std::array::from_fn(|i| road_left + i as f32 * lane_width + lane_width / 2.0);
        Self {
            width,
            height,
            road_width,
            road_left,
            lane_width,
            lane_centers,
        }
    }

    /// X coordinate of the road's right edge
    #[inline]
    pub fn road_right(&self) -> f32 {
        self.road_left + self.lane_width * LANE_COUNT as f32
    }

    /// X coordinate of a lane's left edge
    #[inline]
    pub fn lane_left(&self, lane: usize) -> f32 {
        self.road_left + lane as f32 * self.lane_width
    }

    /// Allowed range for the vehicle's left edge.
    ///
    /// On very narrow tracks `min > max`; callers must clamp leniently.
    pub fn player_bounds(&self, player_width: f32, margin: f32) -> (f32, f32) {
        (self.road_left + margin, self.road_right() - margin - player_width)
    }

    /// Left x that centers an object of `width` inside `lane`
    pub fn centered_x(&self, lane: usize, width: f32) -> f32 {
        self.lane_left(lane) + (self.lane_width - width) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_road_is_centered() {
        let track = Track::new(400.0, 700.0);
        assert!((track.road_width - 280.0).abs() < 1e-4);
        assert!((track.road_left - 60.0).abs() < 1e-4);
        assert!((track.road_right() - 340.0).abs() < 1e-3);
        // Equal margins on both sides
        assert!((track.road_left - (track.width - track.road_right())).abs() < 1e-3);
    }

    #[test]
    fn test_lane_centers_partition_road() {
        let track = Track::new(400.0, 700.0);
        let lane = track.lane_width;
        for (i, center) in track.lane_centers.iter().enumerate() {
            let expected = track.road_left + lane * (i as f32 + 0.5);
            assert!((center - expected).abs() < 1e-3);
        }
        // Consecutive centers are one lane apart
        assert!((track.lane_centers[1] - track.lane_centers[0] - lane).abs() < 1e-3);
        assert!((track.lane_centers[2] - track.lane_centers[1] - lane).abs() < 1e-3);
    }

    #[test]
    fn test_player_bounds() {
        let track = Track::new(400.0, 700.0);
        let (min, max) = track.player_bounds(48.0, 6.0);
        assert!((min - 66.0).abs() < 1e-3);
        assert!((max - 286.0).abs() < 1e-3);
    }

    #[test]
    fn test_zero_width_track_is_degenerate_not_broken() {
        let track = Track::new(0.0, 0.0);
        assert_eq!(track.road_width, 0.0);
        assert_eq!(track.lane_width, 0.0);
        assert!(track.lane_centers.iter().all(|c| c.is_finite()));
        let (min, max) = track.player_bounds(10.0, 6.0);
        assert!(min > max);
    }
}
