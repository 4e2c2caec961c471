//! Collision detection between the vehicle and obstacles
//!
//! Obstacle rectangles are rebuilt from the same lateral formulas the
//! renderer uses, so what you see is what you hit.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::motion::obstacle_x;
use super::state::{Obstacle, Player};

/// Axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Overlap test with inclusive edges: touching rectangles intersect.
    ///
    /// Only a strict gap on either axis separates them.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.right() < other.x
            || self.x > other.right()
            || self.bottom() < other.y
            || self.y > other.bottom())
    }
}

/// Instantaneous rectangle of an obstacle at run time `elapsed_ms`
pub fn obstacle_rect(obstacle: &Obstacle, elapsed_ms: f64) -> Rect {
    Rect::new(
        obstacle_x(obstacle, elapsed_ms),
        obstacle.pos.y,
        obstacle.size.x,
        obstacle.size.y,
    )
}

/// A detected hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionHit {
    pub obstacle_id: u32,
    /// Where effects should burst from (vehicle center)
    pub point: Vec2,
}

/// Find the first obstacle touching the vehicle.
///
/// Obstacles are checked in collection (spawn) order and the scan stops at
/// the first hit; simultaneous overlaps report only that one.
pub fn find_collision(player: &Player, obstacles: &[Obstacle], elapsed_ms: f64) -> Option<CollisionHit> {
    let player_rect = player.rect();
    obstacles
        .iter()
        .find(|ob| player_rect.intersects(&obstacle_rect(ob, elapsed_ms)))
        .map(|ob| CollisionHit {
            obstacle_id: ob.id,
            point: player.center(),
        })
}
