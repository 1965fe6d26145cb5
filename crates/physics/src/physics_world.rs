//! Physics world management with Rapier3D.

use crate::collision::{Category, CategoryMap, CollisionGroup};
use engine_core::{Transform, Vec3};
use rapier3d::na::{Quaternion, UnitQuaternion};
use rapier3d::prelude::*;
use std::sync::Mutex;

/// Contact that started during the last step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactStart {
    pub collider1: ColliderHandle,
    pub collider2: ColliderHandle,
}

impl ContactStart {
    /// The collider on the other side of `collider`, if it is part of this contact.
    pub fn other(&self, collider: ColliderHandle) -> Option<ColliderHandle> {
        if self.collider1 == collider {
            Some(self.collider2)
        } else if self.collider2 == collider {
            Some(self.collider1)
        } else {
            None
        }
    }
}

/// Collects contact-start events raised by the pipeline during a step.
#[derive(Default)]
struct ContactLog {
    started: Mutex<Vec<ContactStart>>,
}

impl EventHandler for ContactLog {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if !event.started() {
            return;
        }
        if let Ok(mut started) = self.started.lock() {
            started.push(ContactStart {
                collider1: event.collider1(),
                collider2: event.collider2(),
            });
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

/// Main physics world containing all simulation state.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub gravity: Vector<Real>,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub query_pipeline: QueryPipeline,
    /// Outcome category of every registered collider.
    pub categories: CategoryMap,
    contacts: ContactLog,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Create a new physics world with default gravity.
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            gravity: vector![0.0, -9.81, 0.0],
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            categories: CategoryMap::new(),
            contacts: ContactLog::default(),
        }
    }

    /// Step the simulation by `dt` seconds.
    ///
    /// Forces added since the previous step are consumed by this step and
    /// then cleared, so callers add their per-tick force every tick.
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt.max(f32::EPSILON);
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.contacts,
        );
        for (_, body) in self.rigid_body_set.iter_mut() {
            body.reset_forces(false);
        }
    }

    /// Take the contact starts recorded since the last call.
    pub fn drain_contact_starts(&mut self) -> Vec<ContactStart> {
        let started = match self.contacts.started.get_mut() {
            Ok(started) => std::mem::take(started),
            Err(poisoned) => std::mem::take(poisoned.into_inner()),
        };
        if !started.is_empty() {
            log::debug!("{} contact(s) started this step", started.len());
        }
        started
    }

    /// Add a dynamic rigid body and return its handle.
    pub fn add_dynamic_body(&mut self, transform: &Transform) -> RigidBodyHandle {
        let p = transform.position;
        let rigid_body = RigidBodyBuilder::dynamic()
            .translation(vector![p.x, p.y, p.z])
            .ccd_enabled(true)
            .build();
        let handle = self.rigid_body_set.insert(rigid_body);
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_rotation(to_unit_quaternion(transform.rotation), false);
        }
        handle
    }

    /// Add a static rigid body (for terrain, pads, obstacles).
    pub fn add_static_body(&mut self, position: Vec3) -> RigidBodyHandle {
        let rigid_body = RigidBodyBuilder::fixed()
            .translation(vector![position.x, position.y, position.z])
            .build();
        self.rigid_body_set.insert(rigid_body)
    }

    /// Add the vehicle's box collider. It reports contact events.
    pub fn add_vehicle_collider(
        &mut self,
        body_handle: RigidBodyHandle,
        half_extents: Vec3,
        mass: f32,
    ) -> ColliderHandle {
        let (membership, filter) = CollisionGroup::vehicle();
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .mass(mass)
            .collision_groups(InteractionGroups::new(membership, filter))
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        self.collider_set.insert_with_parent(collider, body_handle, &mut self.rigid_body_set)
    }

    /// Add a static box of the given category and register it for classification.
    pub fn add_prop(&mut self, position: Vec3, half_extents: Vec3, category: Category) -> ColliderHandle {
        let body = self.add_static_body(position);
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .collision_groups(CollisionGroup::for_category(category))
            .build();
        let handle = self.collider_set.insert_with_parent(collider, body, &mut self.rigid_body_set);
        self.categories.insert(handle, category);
        handle
    }

    /// Add a ground plane collider (flat Y=0 half-space). The ground is hostile.
    pub fn add_ground_plane(&mut self) -> ColliderHandle {
        let collider = ColliderBuilder::halfspace(Vector::y_axis())
            .collision_groups(CollisionGroup::for_category(Category::Hostile))
            .build();
        let handle = self.collider_set.insert(collider);
        self.categories.insert(handle, Category::Hostile);
        handle
    }

    /// Get the transform of a rigid body.
    pub fn get_body_transform(&self, handle: RigidBodyHandle) -> Option<Transform> {
        self.rigid_body_set.get(handle).map(|body| {
            let pos = body.translation();
            let rot = body.rotation();
            Transform {
                position: Vec3::new(pos.x, pos.y, pos.z),
                rotation: glam::Quat::from_xyzw(rot.i, rot.j, rot.k, rot.w),
                scale: Vec3::ONE,
            }
        })
    }

    /// Set a body's rotation, keeping its position.
    pub fn set_body_rotation(&mut self, handle: RigidBodyHandle, rotation: glam::Quat) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_rotation(to_unit_quaternion(rotation), true);
            // Rotation is driven by input, not by the solver.
            body.set_angvel(Vector::zeros(), true);
        }
    }

    /// Move a body to height `y`, keeping x and z.
    pub fn set_body_height(&mut self, handle: RigidBodyHandle, y: f32) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            let mut t = *body.translation();
            t.y = y;
            body.set_translation(t, true);
        }
    }

    /// Add a force for the next step.
    pub fn add_force(&mut self, handle: RigidBodyHandle, force: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.add_force(vector![force.x, force.y, force.z], true);
        }
    }

    /// Remove a rigid body and its colliders.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) {
        let removed = self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
        if let Some(body) = removed {
            for collider in body.colliders() {
                self.categories.remove(*collider);
            }
        }
    }
}

fn to_unit_quaternion(q: glam::Quat) -> UnitQuaternion<Real> {
    UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn body_falls_under_gravity() {
        let mut world = PhysicsWorld::new();
        let body = world.add_dynamic_body(&Transform::from_position(Vec3::new(0.0, 10.0, 0.0)));
        world.add_vehicle_collider(body, Vec3::splat(0.5), 1.0);
        for _ in 0..30 {
            world.step(DT);
        }
        let y = world.get_body_transform(body).map(|t| t.position.y).unwrap_or(10.0);
        assert!(y < 10.0);
    }

    #[test]
    fn landing_on_prop_reports_contact() {
        let mut world = PhysicsWorld::new();
        let pad = world.add_prop(Vec3::ZERO, Vec3::new(2.0, 0.25, 2.0), Category::Finish);
        let body = world.add_dynamic_body(&Transform::from_position(Vec3::new(0.0, 1.5, 0.0)));
        let hull = world.add_vehicle_collider(body, Vec3::splat(0.5), 1.0);

        let mut seen = Vec::new();
        for _ in 0..120 {
            world.step(DT);
            seen.extend(world.drain_contact_starts());
        }
        let hit = seen.iter().find_map(|c| c.other(hull));
        assert_eq!(hit, Some(pad));
        assert_eq!(world.categories.classify(pad), Category::Finish);
    }

    #[test]
    fn set_height_keeps_horizontal_position() {
        let mut world = PhysicsWorld::new();
        let body = world.add_dynamic_body(&Transform::from_position(Vec3::new(3.0, 90.0, -2.0)));
        world.set_body_height(body, 80.0);
        let p = world.get_body_transform(body).map(|t| t.position);
        assert_eq!(p, Some(Vec3::new(3.0, 80.0, -2.0)));
    }

    #[test]
    fn removing_body_forgets_categories() {
        let mut world = PhysicsWorld::new();
        world.add_prop(Vec3::ZERO, Vec3::ONE, Category::Friendly);
        assert_eq!(world.categories.len(), 1);
        let handles: Vec<_> = world.rigid_body_set.iter().map(|(h, _)| h).collect();
        for h in handles {
            world.remove_body(h);
        }
        assert!(world.categories.is_empty());
    }
}
