//! Best-effort audio hooks
//!
//! The game owns no decoder or mixer. Whoever loads sound assets hands over
//! `SoundHandle`s; either handle may be missing (asset failed to load, no
//! audio device) and every call is allowed to fail without stopping a run.

use std::fmt;

/// Failure reported by a sound backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// Playback was refused (e.g. no user gesture yet)
    Blocked(String),
    /// The backend or device is gone
    Unavailable(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::Blocked(reason) => write!(f, "playback blocked: {}", reason),
            AudioError::Unavailable(reason) => write!(f, "audio unavailable: {}", reason),
        }
    }
}

impl std::error::Error for AudioError {}

/// A loaded sound that can be started, paused and rewound
pub trait SoundHandle {
    fn play(&mut self) -> Result<(), AudioError>;
    fn pause(&mut self) -> Result<(), AudioError>;
    /// Jump back to the start
    fn rewind(&mut self) -> Result<(), AudioError>;
    fn set_volume(&mut self, volume: f32);
    fn set_looping(&mut self, looping: bool);
}

/// Sound cues the game triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Run started: background music
    RunStarted,
    /// Vehicle crashed: hit sound, music stops
    Crash,
}

/// Optional sound handles; absent handles turn calls into no-ops
#[derive(Default)]
pub struct AudioHandles {
    pub hit: Option<Box<dyn SoundHandle>>,
    pub music: Option<Box<dyn SoundHandle>>,
}

impl fmt::Debug for AudioHandles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioHandles")
            .field("hit", &self.hit.is_some())
            .field("music", &self.music.is_some())
            .finish()
    }
}

impl AudioHandles {
    /// No sounds at all
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn new(hit: Option<Box<dyn SoundHandle>>, music: Option<Box<dyn SoundHandle>>) -> Self {
        let mut handles = Self { hit, music };
        if let Some(music) = handles.music.as_mut() {
            music.set_looping(true);
        }
        handles
    }

    /// Apply volumes from settings
    pub fn set_volumes(&mut self, music_volume: f32, hit_volume: f32) {
        if let Some(music) = self.music.as_mut() {
            music.set_volume(music_volume);
        }
        if let Some(hit) = self.hit.as_mut() {
            hit.set_volume(hit_volume);
        }
    }

    /// Trigger a cue. Failures are logged and swallowed.
    pub fn cue(&mut self, cue: SoundCue) {
        match cue {
            SoundCue::RunStarted => {
                if let Some(music) = self.music.as_mut() {
                    report("music play", music.play());
                }
            }
            SoundCue::Crash => {
                if let Some(hit) = self.hit.as_mut() {
                    report("hit rewind", hit.rewind());
                    report("hit play", hit.play());
                }
                if let Some(music) = self.music.as_mut() {
                    report("music pause", music.pause());
                }
            }
        }
    }
}

fn report(action: &str, result: Result<(), AudioError>) {
    if let Err(e) = result {
        log::warn!("Audio {} failed: {}", action, e);
    }
}
