//! Common ECS components used across the engine.

use glam::Vec3;
use hecs::{Entity, World};

use crate::seams::RotorSink;

/// Degrees of rotor travel per second for one unit of spin rate (1 rpm = 6 deg/s).
const DEGREES_PER_SECOND_PER_RPM: f32 = 6.0;

/// Cosmetic rotor attached to a vehicle. Spins about `axis`; has no physical effect.
#[derive(Debug, Clone, Copy)]
pub struct Rotor {
    /// Vehicle entity this rotor belongs to.
    pub vehicle: Entity,
    /// Spin rate in rpm-equivalent units.
    pub spin_rate: f32,
    /// Current angle in degrees, kept in [0, 360).
    pub angle: f32,
    pub axis: Vec3,
}

impl Rotor {
    pub fn new(vehicle: Entity, axis: Vec3) -> Self {
        Self {
            vehicle,
            spin_rate: 0.0,
            angle: 0.0,
            axis,
        }
    }

    pub fn spin(&mut self, dt: f32) {
        self.angle = (self.angle + self.spin_rate * DEGREES_PER_SECOND_PER_RPM * dt).rem_euclid(360.0);
    }
}

/// Tag component for the player vehicle.
#[derive(Debug, Clone, Copy, Default)]
pub struct Vehicle;

/// Advance every rotor in the world by `dt`.
pub fn spin_rotors(world: &mut World, dt: f32) {
    for (_, rotor) in world.query_mut::<&mut Rotor>() {
        rotor.spin(dt);
    }
}

/// The rotors of one vehicle, addressed as a group.
pub struct VehicleRotors<'w> {
    world: &'w mut World,
    vehicle: Entity,
}

impl<'w> VehicleRotors<'w> {
    pub fn new(world: &'w mut World, vehicle: Entity) -> Self {
        Self { world, vehicle }
    }
}

impl RotorSink for VehicleRotors<'_> {
    fn set_spin_rate(&mut self, rate: f32) {
        let vehicle = self.vehicle;
        for (_, rotor) in self.world.query_mut::<&mut Rotor>() {
            if rotor.vehicle == vehicle {
                rotor.spin_rate = rate;
            }
        }
    }
}
