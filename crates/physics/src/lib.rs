//! Physics system using Rapier3D for Rotorlift.

pub mod body;
pub mod collision;
pub mod physics_world;

pub use body::*;
pub use collision::*;
pub use physics_world::*;

// Re-export Rapier for downstream crates
pub use rapier3d;

// Re-export common Rapier types
pub use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};
