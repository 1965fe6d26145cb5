//! Building a playable world from a scene definition.

use engine_core::{Entity, Rotor, Transform, Vec3, Vehicle, World};
use physics::{Category, PhysicsBody, PhysicsWorld};

use crate::config::{FlightConfig, SceneDef, SceneKind};
use crate::effects::{EmitterSettings, ParticleEmitter};
use crate::flight::FlightController;

/// The player vehicle: ECS entity, rigid body, controller and effects.
pub struct VehicleRig {
    pub entity: Entity,
    pub body: PhysicsBody,
    pub controller: FlightController,
    pub engine_particles: Option<ParticleEmitter>,
    pub success_particles: Option<ParticleEmitter>,
    pub death_particles: Option<ParticleEmitter>,
}

impl VehicleRig {
    /// Point every emitter at the vehicle's current pose and advance them.
    pub fn update_effects(&mut self, transform: &Transform, dt: f32) {
        let exhaust_origin = transform.position - transform.up() * 0.5;
        let emitters = [
            (self.engine_particles.as_mut(), exhaust_origin),
            (self.success_particles.as_mut(), transform.position),
            (self.death_particles.as_mut(), transform.position),
        ];
        for (emitter, origin) in emitters {
            if let Some(emitter) = emitter {
                emitter.set_pose(origin, transform.rotation);
                emitter.update(dt);
            }
        }
    }
}

/// One loaded scene.
pub struct Level {
    pub index: usize,
    pub name: String,
    pub kind: SceneKind,
    pub physics: PhysicsWorld,
    pub world: World,
    pub vehicle: Option<VehicleRig>,
}

impl Level {
    pub fn build(index: usize, def: &SceneDef, flight: &FlightConfig) -> Self {
        let mut physics = PhysicsWorld::new();
        let mut world = World::new();

        if def.ground {
            physics.add_ground_plane();
        }
        for prop in &def.props {
            physics.add_prop(
                Vec3::from_array(prop.position),
                Vec3::from_array(prop.half_extents),
                Category::from_tag(&prop.tag),
            );
        }

        let vehicle = match def.kind {
            SceneKind::Menu => None,
            SceneKind::Level => Some(spawn_vehicle(&mut physics, &mut world, def, flight)),
        };

        log::debug!(
            "Built scene {} '{}' with {} props",
            index,
            def.name,
            def.props.len()
        );

        Self {
            index,
            name: def.name.clone(),
            kind: def.kind,
            physics,
            world,
            vehicle,
        }
    }
}

fn spawn_vehicle(physics: &mut PhysicsWorld, world: &mut World, def: &SceneDef, flight: &FlightConfig) -> VehicleRig {
    let [rx, ry, rz] = def.spawn_rotation;
    let spawn = Transform::from_euler_degrees(Vec3::from_array(def.spawn), rx, ry, rz);

    let rigid_body = physics.add_dynamic_body(&spawn);
    let hull = physics.add_vehicle_collider(rigid_body, Vec3::from_array(flight.hull_half_extents), flight.vehicle_mass);
    let body = PhysicsBody::with_collider(rigid_body, hull);

    let entity = world.spawn((Vehicle, spawn, body));
    for _ in 0..flight.rotor_count {
        world.spawn((Rotor::new(entity, Vec3::Y),));
    }

    let emitter = |enabled: bool, settings: fn() -> EmitterSettings| enabled.then(|| ParticleEmitter::new(settings()));

    VehicleRig {
        entity,
        body,
        controller: FlightController::new(flight, &spawn),
        engine_particles: emitter(flight.engine_particles, EmitterSettings::engine_exhaust),
        success_particles: emitter(flight.success_particles, EmitterSettings::success_burst),
        death_particles: emitter(flight.death_particles, EmitterSettings::death_burst),
    }
}
