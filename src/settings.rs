//! Player settings and preferences
//!
//! Loaded separately from tuning; these never change gameplay outcomes
//! except for which steering model is active.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// How pointer/touch input steers the vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ControlMode {
    /// Vehicle follows the pointer's x position through a proportional controller
    #[default]
    Follow,
    /// Pressing the left/right half of the canvas acts like a held arrow key
    HalfScreen,
}

impl ControlMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlMode::Follow => "Follow",
            ControlMode::HalfScreen => "HalfScreen",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "follow" | "touch-follow" => Some(ControlMode::Follow),
            "halfscreen" | "half-screen" | "sides" => Some(ControlMode::HalfScreen),
            _ => None,
        }
    }
}

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 40,
            QualityPreset::Medium => 120,
            QualityPreset::High => 240,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Steering model for pointer input
    pub control_mode: ControlMode,
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Exhaust, skid and crash particles
    pub particles: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Crash sound volume (0.0 - 1.0)
    pub hit_volume: f32,
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (no vehicle bobbing)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            control_mode: ControlMode::Follow,
            quality: QualityPreset::Medium,

            particles: true,

            master_volume: 1.0,
            music_volume: 0.35,
            hit_volume: 0.9,
            muted: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Effective music volume (respects master volume and mute)
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.music_volume).clamp(0.0, 1.0)
        }
    }

    /// Effective crash sound volume (respects master volume and mute)
    pub fn effective_hit_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.hit_volume).clamp(0.0, 1.0)
        }
    }

    /// Whether the vehicle bob animation should run
    pub fn bob_enabled(&self) -> bool {
        !self.reduced_motion
    }

    /// Parse settings from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::info!("Using default settings ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_mode_parsing() {
        assert_eq!(ControlMode::from_str("FOLLOW"), Some(ControlMode::Follow));
        assert_eq!(ControlMode::from_str("half-screen"), Some(ControlMode::HalfScreen));
        assert_eq!(ControlMode::from_str("joystick"), None);
    }

    #[test]
    fn test_quality_parsing() {
        assert_eq!(QualityPreset::from_str("med"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("HIGH").map(|q| q.max_particles()), Some(240));
        assert_eq!(QualityPreset::from_str("ultra"), None);
        assert_eq!(QualityPreset::Low.as_str(), "Low");
        assert_eq!(ControlMode::HalfScreen.as_str(), "HalfScreen");
    }

    #[test]
    fn test_particles_toggle_zeroes_cap() {
        let mut settings = Settings::default();
        assert_eq!(settings.max_particles(), 120);
        settings.particles = false;
        assert_eq!(settings.max_particles(), 0);
    }

    #[test]
    fn test_mute_silences_everything() {
        let mut settings = Settings::default();
        assert!((settings.effective_music_volume() - 0.35).abs() < 1e-6);
        settings.muted = true;
        assert_eq!(settings.effective_music_volume(), 0.0);
        assert_eq!(settings.effective_hit_volume(), 0.0);
    }

    #[test]
    fn test_settings_from_partial_json() {
        let settings = Settings::from_json(r#"{ "control_mode": "HalfScreen" }"#).unwrap();
        assert_eq!(settings.control_mode, ControlMode::HalfScreen);
        assert_eq!(settings.quality, QualityPreset::Medium);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let settings = Settings::load(Path::new("/definitely/not/here/settings.json"));
        assert_eq!(settings, Settings::default());
    }
}
