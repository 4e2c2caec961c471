//! Presentation-only particle effects
//!
//! Particles react to simulation events but never feed back into gameplay,
//! and they draw from their own RNG so enabling or disabling effects leaves
//! spawn sequences untouched.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::sim::GameEvent;

/// Downward pull on particles (px/ms²)
const PARTICLE_GRAVITY: f32 = 0.0006;
const EXHAUST_LIFETIME_MS: f32 = 600.0;
const SKID_CHANCE: f64 = 0.22;
const CRASH_PARTICLES: usize = 28;

/// What a particle came from (renderers pick colors from this)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Exhaust,
    Skid,
    Debris,
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub kind: ParticleKind,
    pub pos: Vec2,
    /// Pixels per millisecond
    pub vel: Vec2,
    pub size: f32,
    pub life_ms: f32,
    pub age_ms: f32,
    /// 1 when fresh, fading to 0 at end of life
    pub alpha: f32,
}

/// Live particles with a hard cap
#[derive(Debug, Clone)]
pub struct ParticleField {
    pub particles: Vec<Particle>,
    max: usize,
    rng: Pcg32,
}

impl ParticleField {
    pub fn new(max: usize, seed: u64) -> Self {
        Self {
            particles: Vec::with_capacity(max),
            max,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn set_max(&mut self, max: usize) {
        self.max = max;
        self.particles.truncate(max);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    fn spawn(&mut self, kind: ParticleKind, pos: Vec2, vel: Vec2, size: f32, life_ms: f32) {
        if self.particles.len() >= self.max {
            return;
        }
        self.particles.push(Particle {
            kind,
            pos,
            vel,
            size,
            life_ms,
            age_ms: 0.0,
            alpha: 1.0,
        });
    }

    /// React to a simulation event
    pub fn handle(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::Exhaust { pos } => {
                let jitter = (self.rng.random::<f32>() - 0.5) * 6.0;
                let vel = Vec2::new((self.rng.random::<f32>() - 0.5) * 0.03, 0.02);
                let size = 6.0 + self.rng.random::<f32>() * 6.0;
                self.spawn(ParticleKind::Exhaust, pos + Vec2::new(jitter, 0.0), vel, size, EXHAUST_LIFETIME_MS);
            }
            GameEvent::Skid { pos, .. } => {
                if self.rng.random_bool(SKID_CHANCE) {
                    let vel = Vec2::new((self.rng.random::<f32>() - 0.5) * 0.12, -0.02);
                    let size = 4.0 + self.rng.random::<f32>() * 4.0;
                    let life = 420.0 + self.rng.random::<f32>() * 240.0;
                    self.spawn(ParticleKind::Skid, pos, vel, size, life);
                }
            }
            GameEvent::Crash { pos, .. } => {
                for _ in 0..CRASH_PARTICLES {
                    let angle = self.rng.random::<f32>() * std::f32::consts::TAU;
                    let speed = 0.06 + self.rng.random::<f32>() * 0.28;
                    let vel = Vec2::new(angle.cos(), angle.sin()) * speed;
                    let size = 6.0 + self.rng.random::<f32>() * 6.0;
                    let life = 600.0 + self.rng.random::<f32>() * 600.0;
                    self.spawn(ParticleKind::Debris, pos, vel, size, life);
                }
            }
            GameEvent::RunStarted => self.clear(),
            _ => {}
        }
    }

    /// Integrate, fade and expire particles
    pub fn update(&mut self, dt_ms: f32) {
        for p in self.particles.iter_mut() {
            p.vel.y += PARTICLE_GRAVITY * dt_ms;
            p.pos += p.vel * dt_ms;
            p.age_ms += dt_ms;
            p.alpha = (1.0 - p.age_ms / p.life_ms).max(0.0);
        }
        self.particles.retain(|p| p.age_ms <= p.life_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crash() -> GameEvent {
        GameEvent::Crash {
            pos: Vec2::new(100.0, 500.0),
            obstacle_id: 1,
        }
    }

    #[test]
    fn test_crash_bursts_from_contact_point() {
        let mut field = ParticleField::new(120, 1);
        field.handle(&crash());
        assert_eq!(field.len(), 28);
        assert!(field.particles.iter().all(|p| p.pos == Vec2::new(100.0, 500.0)));
        assert!(field.particles.iter().all(|p| p.kind == ParticleKind::Debris));
    }

    #[test]
    fn test_cap_is_respected() {
        let mut field = ParticleField::new(30, 1);
        field.handle(&crash());
        field.handle(&crash());
        assert_eq!(field.len(), 30);

        let mut disabled = ParticleField::new(0, 1);
        disabled.handle(&crash());
        assert!(disabled.is_empty());
    }

    #[test]
    fn test_particles_fade_and_expire() {
        let mut field = ParticleField::new(120, 1);
        field.handle(&GameEvent::Exhaust {
            pos: Vec2::new(50.0, 50.0),
        });
        field.update(300.0);
        let p = &field.particles[0];
        assert!((p.alpha - 0.5).abs() < 1e-5);
        // Gravity pulls it down
        assert!(p.pos.y > 50.0);
        field.update(301.0);
        assert!(field.is_empty());
    }

    #[test]
    fn test_run_start_clears() {
        let mut field = ParticleField::new(120, 1);
        field.handle(&crash());
        field.handle(&GameEvent::RunStarted);
        assert!(field.is_empty());
    }

    #[test]
    fn test_skid_is_occasional() {
        let mut field = ParticleField::new(1000, 42);
        let skid = GameEvent::Skid {
            pos: Vec2::new(10.0, 10.0),
            vel_x: 16.0,
        };
        for _ in 0..500 {
            field.handle(&skid);
        }
        // ~22% of 500
        assert!((70..150).contains(&field.len()), "skids {}", field.len());
    }
}
