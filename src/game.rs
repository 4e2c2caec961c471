//! Fixed-timestep game driver
//!
//! Owns the simulation plus everything around it (input, settings, effects,
//! audio) and turns variable frame timestamps into fixed simulation ticks.

use crate::audio::{AudioHandles, SoundCue};
use crate::clamp_lenient;
use crate::consts::*;
use crate::fx::ParticleField;
use crate::input::{Direction, InputState};
use crate::settings::Settings;
use crate::sim::{GameEvent, RunPhase, SimulationState, Track, tick};
use crate::snapshot::FrameView;
use crate::tuning::Tuning;

/// Offsets the effects RNG from the gameplay RNG
const FX_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Game instance holding all state
#[derive(Debug)]
pub struct Game {
    pub state: SimulationState,
    pub input: InputState,
    pub settings: Settings,
    pub particles: ParticleField,
    audio: AudioHandles,
    accumulator: f32,
    last_time: Option<f64>,
}

impl Game {
    pub fn new(seed: u64, width: f32, height: f32, tuning: Tuning, settings: Settings) -> Self {
        Self {
            state: SimulationState::new(seed, Track::new(width, height), tuning),
            input: InputState::new(settings.control_mode),
            particles: ParticleField::new(settings.max_particles(), seed ^ FX_SEED_SALT),
            settings,
            audio: AudioHandles::silent(),
            accumulator: 0.0,
            last_time: None,
        }
    }

    /// Attach sound handles (either may be absent)
    pub fn with_audio(mut self, audio: AudioHandles) -> Self {
        self.audio = audio;
        self.apply_settings();
        self
    }

    /// Replace settings and push them to input, effects and audio
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.apply_settings();
    }

    fn apply_settings(&mut self) {
        if self.input.mode != self.settings.control_mode {
            self.input = InputState::new(self.settings.control_mode);
        }
        self.particles.set_max(self.settings.max_particles());
        self.audio
            .set_volumes(self.settings.effective_music_volume(), self.settings.effective_hit_volume());
    }

    /// Start (or restart) a run
    pub fn start(&mut self) -> Vec<GameEvent> {
        self.state.start();
        self.input.clear_pointer();
        self.accumulator = 0.0;
        self.last_time = None;
        self.dispatch_events()
    }

    /// Back to the start screen
    pub fn return_to_menu(&mut self) {
        self.state.return_to_menu();
        self.particles.clear();
    }

    pub fn phase(&self) -> RunPhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    /// Track resized: the vehicle and any follow target are pulled back
    /// inside the new road
    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.resize(width, height);
        if let Some(target) = self.input.follow_target {
            let (min_x, max_x) = self
                .state
                .track
                .player_bounds(self.state.player.size.x, self.state.tuning.road_margin);
            self.input.follow_target = Some(clamp_lenient(target, min_x, max_x));
        }
    }

    /// Advance to frame timestamp `now_ms`, running as many fixed ticks as
    /// fit. Returns the events those ticks produced.
    pub fn frame(&mut self, now_ms: f64) -> Vec<GameEvent> {
        let dt = match self.last_time {
            Some(last) => ((now_ms - last) as f32).clamp(0.0, MAX_FRAME_MS),
            None => 0.0,
        };
        self.last_time = Some(now_ms);
        self.accumulator += dt;

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
            events.extend(self.step());
            self.accumulator -= SIM_DT_MS;
            substeps += 1;
        }
        events
    }

    /// Run exactly one fixed tick
    pub fn step(&mut self) -> Vec<GameEvent> {
        let input = self.input.tick_input();
        tick(&mut self.state, &input, SIM_DT_MS);
        self.particles.update(SIM_DT_MS);
        self.dispatch_events()
    }

    /// Route simulation events to effects and audio, then hand them on
    fn dispatch_events(&mut self) -> Vec<GameEvent> {
        let events = self.state.drain_events();
        for event in &events {
            self.particles.handle(event);
            match event {
                GameEvent::RunStarted => self.audio.cue(SoundCue::RunStarted),
                GameEvent::Crash { .. } => self.audio.cue(SoundCue::Crash),
                GameEvent::RunEnded { score } => log::info!("Final score: {}", score),
                _ => {}
            }
        }
        events
    }

    /// Snapshot for rendering
    pub fn view(&self) -> FrameView {
        FrameView::capture(&self.state, &self.particles.particles, self.settings.bob_enabled())
    }

    // === Input forwarding ===

    pub fn key_down(&mut self, key: &str) -> bool {
        self.input.key_down(key)
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        self.input.key_up(key)
    }

    pub fn button_down(&mut self, dir: Direction) {
        self.input.press(dir);
    }

    /// Button released or pointer left it
    pub fn button_up(&mut self, dir: Direction) {
        self.input.release(dir);
    }

    pub fn pointer_down(&mut self, pointer_id: i32, client_x: f32, canvas_left: f32) {
        let player_width = self.state.player.size.x;
        let margin = self.state.tuning.road_margin;
        self.input.pointer_down(
            pointer_id,
            client_x,
            canvas_left,
            self.state.track.width,
            player_width,
            &self.state.track,
            margin,
        );
    }

    pub fn pointer_move(&mut self, pointer_id: i32, client_x: f32, canvas_left: f32) {
        let player_width = self.state.player.size.x;
        let margin = self.state.tuning.road_margin;
        self.input
            .pointer_move(pointer_id, client_x, canvas_left, player_width, &self.state.track, margin);
    }

    /// Pointer released or cancelled
    pub fn pointer_up(&mut self, pointer_id: i32) {
        self.input.pointer_up(pointer_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::RecordingSound;
    use crate::settings::ControlMode;
    use crate::sim::{Motion, Obstacle};
    use glam::Vec2;

    fn game() -> Game {
        Game::new(42, 400.0, 700.0, Tuning::default(), Settings::default())
    }

    #[test]
    fn test_first_frame_runs_no_ticks() {
        let mut g = game();
        g.start();
        g.frame(1000.0);
        assert_eq!(g.state.elapsed_ms, 0.0);
    }

    #[test]
    fn test_frames_become_fixed_ticks() {
        let mut g = game();
        g.start();
        g.frame(0.0);
        g.frame(50.0);
        // Three whole 16.67 ms ticks fit in 50 ms
        assert!((g.state.elapsed_ms - 3.0 * SIM_DT_MS as f64).abs() < 1e-3);
    }

    #[test]
    fn test_long_frames_are_capped() {
        let mut g = game();
        g.start();
        g.frame(0.0);
        g.frame(5000.0);
        assert!(g.state.elapsed_ms <= (MAX_SUBSTEPS as f32 * SIM_DT_MS) as f64 + 1e-3);
    }

    #[test]
    fn test_crash_plays_hit_and_stops_music() {
        let hit = RecordingSound::default();
        let music = RecordingSound::default();
        let mut g = game().with_audio(AudioHandles::new(
            Some(Box::new(hit.clone())),
            Some(Box::new(music.clone())),
        ));
        g.start();
        assert!(music.calls.borrow().contains(&"play".to_string()));

        let id = g.state.next_entity_id();
        let player = g.state.player.clone();
        g.state.obstacles.push(Obstacle {
            id,
            lane: 1,
            pos: player.pos,
            size: Vec2::new(40.0, 40.0),
            motion: Motion::Static,
            passed: false,
        });
        let events = g.step();
        assert_eq!(g.phase(), RunPhase::Ended);
        assert!(events.iter().any(|e| matches!(e, GameEvent::Crash { .. })));
        assert!(hit.calls.borrow().ends_with(&["rewind".to_string(), "play".to_string()]));
        assert_eq!(music.calls.borrow().last().map(String::as_str), Some("pause"));
        // Crash debris
        assert!(g.particles.len() >= 28);
    }

    #[test]
    fn test_pointer_follow_steers_vehicle() {
        let mut g = game();
        g.start();
        let start_x = g.state.player.pos.x;
        g.pointer_down(1, 300.0, 0.0);
        for _ in 0..30 {
            g.step();
        }
        assert!(g.state.player.pos.x > start_x + 50.0);
        g.pointer_up(1);
        assert_eq!(g.input.follow_target, None);
    }

    #[test]
    fn test_resize_reclamps_follow_target() {
        let mut g = game();
        g.start();
        g.pointer_down(1, 390.0, 0.0);
        assert!((g.input.follow_target.unwrap() - 286.0).abs() < 1e-3);

        g.resize(200.0, 700.0);
        let (_, max_x) = g.state.track.player_bounds(g.state.player.size.x, g.state.tuning.road_margin);
        assert!(g.input.follow_target.unwrap() <= max_x + 1e-4);
        for _ in 0..30 {
            g.step();
        }
        assert!(g.state.player.pos.x <= max_x + 1e-4);
        assert_eq!(g.input.pointer_id, Some(1));
    }

    #[test]
    fn test_restart_clears_pointer_tracking() {
        let mut g = game();
        g.start();
        g.pointer_down(1, 300.0, 0.0);
        g.start();
        assert_eq!(g.input.follow_target, None);
    }

    #[test]
    fn test_switching_control_mode_resets_input() {
        let mut g = game();
        g.key_down("ArrowLeft");
        g.set_settings(Settings {
            control_mode: ControlMode::HalfScreen,
            ..Settings::default()
        });
        assert_eq!(g.input.mode, ControlMode::HalfScreen);
        assert!(!g.input.left);
    }

    #[test]
    fn test_particles_disabled_by_settings() {
        let mut g = Game::new(
            1,
            400.0,
            700.0,
            Tuning::default(),
            Settings {
                particles: false,
                ..Settings::default()
            },
        );
        g.start();
        for _ in 0..60 {
            g.step();
        }
        assert!(g.particles.is_empty());
        assert!(g.view().particles.is_empty());
    }

    #[test]
    fn test_return_to_menu_goes_idle() {
        let mut g = game();
        g.start();
        g.return_to_menu();
        assert_eq!(g.phase(), RunPhase::Idle);
        g.step();
        assert_eq!(g.state.elapsed_ms, 0.0);
    }
}
