//! Transform component and utilities for spatial positioning.

use glam::{EulerRot, Quat, Vec3};

/// A 3D transform representing position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform from a position and XYZ Euler angles in degrees.
    pub fn from_euler_degrees(position: Vec3, x: f32, y: f32, z: f32) -> Self {
        Self {
            position,
            rotation: euler_degrees_to_quat(x, y, z),
            ..Default::default()
        }
    }

    /// Rotation as XYZ Euler angles in degrees.
    pub fn euler_degrees(&self) -> Vec3 {
        let (x, y, z) = self.rotation.to_euler(EulerRot::XYZ);
        Vec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
    }

    /// Replace the rotation with XYZ Euler angles in degrees.
    pub fn set_euler_degrees(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = euler_degrees_to_quat(x, y, z);
    }

    /// Get the up direction (positive Y).
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Clamp the vertical position into `[min, max]`.
    /// Returns true if the height changed.
    pub fn clamp_height(&mut self, min: f32, max: f32) -> bool {
        let clamped = self.position.y.clamp(min, max);
        let changed = clamped != self.position.y;
        self.position.y = clamped;
        changed
    }
}

/// Build a quaternion from XYZ Euler angles given in degrees.
pub fn euler_degrees_to_quat(x: f32, y: f32, z: f32) -> Quat {
    Quat::from_euler(EulerRot::XYZ, x.to_radians(), y.to_radians(), z.to_radians())
}
