//! Vehicle state and the arithmetic behind thrust, fuel and tilt.

use glam::Vec3;

/// Effective exhaust velocity of the main engine, m/s.
pub const EXHAUST_VELOCITY: f32 = 4462.0;
/// Rotor spin rate while the engine is firing.
pub const ROTOR_RATE_FAST: f32 = 100.0;
/// Rotor spin rate at idle.
pub const ROTOR_RATE_SLOW: f32 = 30.0;
/// Engine voice pitch while the engine is firing.
pub const ENGINE_PITCH_LOUD: f32 = 0.8;
/// Engine voice pitch at idle.
pub const ENGINE_PITCH_IDLE: f32 = 0.4;
/// Lowest allowed vehicle height, world units.
pub const MIN_HEIGHT: f32 = 0.0;
/// Highest allowed vehicle height, world units.
pub const MAX_HEIGHT: f32 = 80.0;

/// Mutable per-vehicle flight state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleState {
    /// Remaining fuel in kg. May dip below zero by at most one tick's burn.
    pub fuel_mass: f32,
    /// Euler angles in degrees. Only `x` is driven by input.
    pub rotation: Vec3,
    /// Share of maximum thrust in use, [0, 1].
    pub thrust_fraction: f32,
    /// Thrust produced during the last tick, in newtons. Zero when idle.
    pub current_thrust_newtons: f32,
    /// An outcome sequence is running; flight input is ignored.
    pub transitioning: bool,
    /// Debug toggle: collision events are dropped.
    pub collisions_disabled: bool,
}

impl VehicleState {
    /// Fresh state at spawn: full tank, orientation captured from the spawn pose.
    pub fn spawn(max_fuel_mass: f32, thrust_fraction: f32, rotation: Vec3) -> Self {
        Self {
            fuel_mass: max_fuel_mass,
            rotation,
            thrust_fraction,
            current_thrust_newtons: 0.0,
            transitioning: false,
            collisions_disabled: false,
        }
    }

    pub fn has_fuel(&self) -> bool {
        self.fuel_mass > 0.0
    }
}

/// Thrust and fuel burn for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Burn {
    /// Thrust produced, newtons.
    pub thrust_newtons: f32,
    /// Fuel consumed this tick, kg.
    pub fuel: f32,
}

/// Fuel burn for one tick of `dt` seconds with `main_thrust` scaled by `thrust_fraction`.
pub fn burn(thrust_fraction: f32, main_thrust: f32, dt: f32) -> Burn {
    let thrust_newtons = thrust_fraction * main_thrust * 1000.0;
    let exhaust_mass_flow = thrust_newtons / EXHAUST_VELOCITY;
    Burn {
        thrust_newtons,
        fuel: exhaust_mass_flow * dt,
    }
}

/// Fold an angle back once if it left [-360, 360], then clamp to ±`limit`.
///
/// Only one fold is applied; an angle more than a full turn past ±360 is
/// still clamped, so the result is always inside the limit.
pub fn wrap_and_clamp_angle(angle: f32, limit: f32) -> f32 {
    let mut angle = angle;
    if angle > 360.0 {
        angle -= 360.0;
    } else if angle < -360.0 {
        angle += 360.0;
    }
    angle.max(-limit).min(limit)
}
