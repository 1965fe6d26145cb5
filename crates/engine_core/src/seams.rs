//! Traits through which flight logic reaches the engine.
//!
//! The flight controller and session coordinator never touch rapier, kira
//! or the scene graph directly. Each collaborator is one of these traits, so
//! tests can swap in recording fakes.

use glam::Quat;
use thiserror::Error;

use crate::transform::Transform;

/// Rigid body of the player vehicle.
pub trait VehicleBody {
    fn transform(&self) -> Transform;
    fn set_rotation(&mut self, rotation: Quat);
    fn set_height(&mut self, y: f32);
    /// Push the body along its local up axis.
    fn add_upward_force(&mut self, magnitude: f32);
}

/// Single audio voice (engine loop, one-shots, music).
pub trait AudioSink {
    fn is_playing(&self) -> bool;
    fn play_loop(&mut self, clip: &str);
    fn play_one_shot(&mut self, clip: &str);
    fn stop(&mut self);
    fn set_pitch(&mut self, pitch: f32);
    /// Length of a loaded clip in seconds, `None` if it is not loaded.
    fn clip_duration(&self, clip: &str) -> Option<f32>;
}

/// Particle emitter that can be switched on and off.
pub trait ParticleSink {
    fn start(&mut self);
    fn stop(&mut self);
    fn is_emitting(&self) -> bool;
}

/// Visual rotor children of a vehicle.
pub trait RotorSink {
    fn set_spin_rate(&mut self, rate: f32);
}

/// Errors raised by scene loads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("scene index {index} out of range ({count} scenes configured)")]
    OutOfRange { index: usize, count: usize },
    #[error("no scenes configured")]
    Empty,
}

/// Loads scenes by build index.
pub trait SceneLoader {
    fn load_scene(&mut self, index: usize) -> Result<(), SceneError>;
    fn active_scene_index(&self) -> usize;
    fn scene_count(&self) -> usize;
}
