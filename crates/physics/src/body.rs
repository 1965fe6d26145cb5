//! Vehicle body adapter: lets flight logic push a rapier body through [`VehicleBody`].

use engine_core::{Quat, Transform, VehicleBody};
use rapier3d::prelude::RigidBodyHandle;

use crate::physics_world::PhysicsWorld;

/// Mutable view of one rigid body inside a [`PhysicsWorld`].
pub struct BodyMut<'w> {
    world: &'w mut PhysicsWorld,
    handle: RigidBodyHandle,
}

impl<'w> BodyMut<'w> {
    pub fn new(world: &'w mut PhysicsWorld, handle: RigidBodyHandle) -> Self {
        Self { world, handle }
    }
}

impl VehicleBody for BodyMut<'_> {
    fn transform(&self) -> Transform {
        self.world.get_body_transform(self.handle).unwrap_or_default()
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.world.set_body_rotation(self.handle, rotation);
    }

    fn set_height(&mut self, y: f32) {
        self.world.set_body_height(self.handle, y);
    }

    fn add_upward_force(&mut self, magnitude: f32) {
        let up = self.transform().up();
        self.world.add_force(self.handle, up * magnitude);
    }
}
