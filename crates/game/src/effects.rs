//! Particle effects: engine exhaust, finish sparkle and wreck debris.

use engine_core::ParticleSink;
use glam::Vec3;

/// One live particle.
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub life: f32,
}

/// Emission parameters.
#[derive(Debug, Clone, Copy)]
pub struct EmitterSettings {
    /// Particles per second while emitting.
    pub rate: f32,
    /// Base direction of travel, in the emitter's local frame.
    pub direction: Vec3,
    pub speed: f32,
    /// Random velocity added on each axis, ± this amount.
    pub spread: f32,
    pub lifetime: f32,
    pub gravity: f32,
    pub max_particles: usize,
    /// Stop by itself after this many seconds (bursts). `None` runs until stopped.
    pub duration: Option<f32>,
}

impl EmitterSettings {
    /// Downward exhaust plume under the vehicle.
    pub fn engine_exhaust() -> Self {
        Self {
            rate: 120.0,
            direction: -Vec3::Y,
            speed: 6.0,
            spread: 1.0,
            lifetime: 0.5,
            gravity: 0.0,
            max_particles: 200,
            duration: None,
        }
    }

    /// Upward sparkle when the finish pad is reached.
    pub fn success_burst() -> Self {
        Self {
            rate: 300.0,
            direction: Vec3::Y,
            speed: 8.0,
            spread: 3.0,
            lifetime: 1.5,
            gravity: 6.0,
            max_particles: 400,
            duration: Some(0.4),
        }
    }

    /// Debris thrown out when the vehicle is wrecked.
    pub fn death_burst() -> Self {
        Self {
            rate: 500.0,
            direction: Vec3::ZERO,
            speed: 0.0,
            spread: 10.0,
            lifetime: 2.0,
            gravity: 9.81,
            max_particles: 400,
            duration: Some(0.2),
        }
    }
}

/// CPU particle emitter following a moving origin.
pub struct ParticleEmitter {
    pub particles: Vec<Particle>,
    settings: EmitterSettings,
    origin: Vec3,
    orientation: glam::Quat,
    emitting: bool,
    spawn_timer: f32,
    emit_time: f32,
}

impl ParticleEmitter {
    pub fn new(settings: EmitterSettings) -> Self {
        Self {
            particles: Vec::new(),
            settings,
            origin: Vec3::ZERO,
            orientation: glam::Quat::IDENTITY,
            emitting: false,
            spawn_timer: 0.0,
            emit_time: 0.0,
        }
    }

    /// Move the emitter; new particles spawn here, existing ones keep flying.
    pub fn set_pose(&mut self, origin: Vec3, orientation: glam::Quat) {
        self.origin = origin;
        self.orientation = orientation;
    }

    pub fn update(&mut self, dt: f32) {
        if self.emitting {
            self.emit_time += dt;
            self.spawn_timer += dt;
            let interval = 1.0 / self.settings.rate.max(f32::EPSILON);
            while self.spawn_timer >= interval {
                self.spawn_timer -= interval;
                if self.particles.len() < self.settings.max_particles {
                    self.spawn();
                }
            }
            if self.settings.duration.is_some_and(|d| self.emit_time >= d) {
                self.emitting = false;
            }
        }

        let gravity = Vec3::new(0.0, -self.settings.gravity, 0.0);
        for p in &mut self.particles {
            p.velocity += gravity * dt;
            p.position += p.velocity * dt;
            p.life -= dt;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    fn spawn(&mut self) {
        let s = &self.settings;
        let jitter = Vec3::new(
            (rand::random::<f32>() - 0.5) * 2.0 * s.spread,
            (rand::random::<f32>() - 0.5) * 2.0 * s.spread,
            (rand::random::<f32>() - 0.5) * 2.0 * s.spread,
        );
        self.particles.push(Particle {
            position: self.origin,
            velocity: self.orientation * (s.direction * s.speed) + jitter,
            life: s.lifetime * (0.75 + rand::random::<f32>() * 0.5),
        });
    }
}

impl ParticleSink for ParticleEmitter {
    fn start(&mut self) {
        self.emitting = true;
        self.emit_time = 0.0;
    }

    fn stop(&mut self) {
        self.emitting = false;
        self.spawn_timer = 0.0;
    }

    fn is_emitting(&self) -> bool {
        self.emitting
    }
}
