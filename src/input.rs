//! Raw input events folded into per-tick steering
//!
//! Keys and on-screen buttons set discrete direction flags. Pointer input
//! either drives the touch-follow controller or, in half-screen mode, acts
//! like a held key for whichever half of the canvas was pressed.

use crate::settings::ControlMode;
use crate::sim::{TickInput, Track};

/// Steering direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// Map a keyboard key name to a direction (arrows and A/D)
pub fn key_direction(key: &str) -> Option<Direction> {
    match key {
        "ArrowLeft" | "a" | "A" => Some(Direction::Left),
        "ArrowRight" | "d" | "D" => Some(Direction::Right),
        _ => None,
    }
}

/// Convert a pointer's client x into the vehicle left edge that centers the
/// vehicle under it, clamped to the drivable road.
pub fn pointer_target_x(client_x: f32, canvas_left: f32, player_width: f32, track: &Track, margin: f32) -> f32 {
    let local_x = client_x - canvas_left;
    let (min_x, max_x) = track.player_bounds(player_width, margin);
    crate::clamp_lenient(local_x - player_width / 2.0, min_x, max_x)
}

/// Current state of every input channel
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    pub mode: ControlMode,
    /// Keyboard / button flags
    pub left: bool,
    pub right: bool,
    /// Follow target (desired vehicle left edge) while a pointer is tracked
    pub follow_target: Option<f32>,
    /// The one pointer being followed
    pub pointer_id: Option<i32>,
    /// Half-screen mode: side currently pressed
    pub touch_side: Option<Direction>,
}

impl InputState {
    pub fn new(mode: ControlMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Key pressed. Returns true if the key steers.
    pub fn key_down(&mut self, key: &str) -> bool {
        match key_direction(key) {
            Some(dir) => {
                self.press(dir);
                true
            }
            None => false,
        }
    }

    /// Key released. Returns true if the key steers.
    pub fn key_up(&mut self, key: &str) -> bool {
        match key_direction(key) {
            Some(dir) => {
                self.release(dir);
                true
            }
            None => false,
        }
    }

    /// Direction key or on-screen button pressed
    pub fn press(&mut self, dir: Direction) {
        match dir {
            Direction::Left => self.left = true,
            Direction::Right => self.right = true,
        }
    }

    /// Direction key or on-screen button released (or pointer left the button)
    pub fn release(&mut self, dir: Direction) {
        match dir {
            Direction::Left => self.left = false,
            Direction::Right => self.right = false,
        }
        if self.mode == ControlMode::HalfScreen {
            self.touch_side = None;
        }
    }

    /// Pointer pressed on the canvas. In follow mode a second pointer is
    /// ignored while the first is still down.
    #[allow(clippy::too_many_arguments)]
    pub fn pointer_down(
        &mut self,
        pointer_id: i32,
        client_x: f32,
        canvas_left: f32,
        canvas_width: f32,
        player_width: f32,
        track: &Track,
        margin: f32,
    ) {
        match self.mode {
            ControlMode::Follow => {
                if self.pointer_id.is_some_and(|id| id != pointer_id) {
                    return;
                }
                self.pointer_id = Some(pointer_id);
                self.follow_target = Some(pointer_target_x(client_x, canvas_left, player_width, track, margin));
                self.touch_side = None;
            }
            ControlMode::HalfScreen => {
                let local_x = client_x - canvas_left;
                self.touch_side = Some(if local_x < canvas_width / 2.0 {
                    Direction::Left
                } else {
                    Direction::Right
                });
            }
        }
    }

    /// Pointer moved; only the tracked pointer updates the follow target
    pub fn pointer_move(
        &mut self,
        pointer_id: i32,
        client_x: f32,
        canvas_left: f32,
        player_width: f32,
        track: &Track,
        margin: f32,
    ) {
        if self.mode != ControlMode::Follow || self.pointer_id != Some(pointer_id) {
            return;
        }
        self.follow_target = Some(pointer_target_x(client_x, canvas_left, player_width, track, margin));
    }

    /// Pointer released or cancelled
    pub fn pointer_up(&mut self, pointer_id: i32) {
        match self.mode {
            ControlMode::Follow => {
                if self.pointer_id == Some(pointer_id) {
                    self.clear_pointer();
                }
            }
            ControlMode::HalfScreen => self.touch_side = None,
        }
    }

    /// Stop following any pointer
    pub fn clear_pointer(&mut self) {
        self.pointer_id = None;
        self.follow_target = None;
    }

    /// Steering for the next tick
    pub fn tick_input(&self) -> TickInput {
        let mut input = TickInput {
            left: self.left,
            right: self.right,
            follow_target: None,
        };
        match self.mode {
            ControlMode::Follow => input.follow_target = self.follow_target,
            ControlMode::HalfScreen => match self.touch_side {
                Some(Direction::Left) => input.left = true,
                Some(Direction::Right) => input.right = true,
                None => {}
            },
        }
        input
    }
}
