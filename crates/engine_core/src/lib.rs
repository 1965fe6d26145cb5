//! Core engine types and utilities for Rotorlift.
//!
//! This crate provides the foundational types used across all engine systems:
//! - Transform and Euler-angle helpers
//! - Simulation time and deferred task scheduling
//! - Rotor components for the ECS
//! - Seam traits the flight logic uses to reach engine collaborators

pub mod components;
pub mod seams;
pub mod schedule;
pub mod time;
pub mod transform;

pub use components::*;
pub use seams::*;
pub use schedule::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{EulerRot, Quat, Vec2, Vec3};
pub use hecs::{Entity, World};
