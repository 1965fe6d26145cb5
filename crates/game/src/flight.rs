//! Flight controller: per-tick thrust, fuel and tilt, and the collision
//! outcome state machine.
//!
//! The controller owns no engine objects. Each tick it is handed a
//! [`FlightContext`] with the body, rotors, audio voice, particle emitters and
//! the session request queue, and it talks to them only through the
//! `engine_core` seam traits.

use engine_core::{
    AudioSink, ParticleSink, RotorSink, Scheduler, Transform, Vec2, VehicleBody,
};
use input::InputState;
use physics::Category;

use crate::config::FlightConfig;
use crate::session::SessionRequest;
use crate::vehicle::{
    burn, wrap_and_clamp_angle, VehicleState, ENGINE_PITCH_IDLE, ENGINE_PITCH_LOUD, MAX_HEIGHT, MIN_HEIGHT,
    ROTOR_RATE_FAST, ROTOR_RATE_SLOW,
};

/// Flight phase. `Transitioning` is terminal: the scene load that follows replaces the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightPhase {
    Flying,
    Transitioning,
}

/// What a collision did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// Dropped: already transitioning, or collisions disabled.
    Ignored,
    /// Touched something friendly; nothing changes.
    Friendly,
    /// Reached the finish; next level loads at `fire_at`.
    Success { fire_at: f64 },
    /// Crashed; first level reloads at `fire_at`.
    Failure { fire_at: f64 },
}

/// Pointer held on screen, compared against the vehicle's projected position.
/// Both in window coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerAim {
    pub pointer_y: f32,
    pub vehicle_screen_y: f32,
}

impl PointerAim {
    /// -1 when the pointer is above the vehicle, +1 below, 0 level with it.
    pub fn direction(&self) -> f32 {
        if self.pointer_y < self.vehicle_screen_y {
            -1.0
        } else if self.pointer_y > self.vehicle_screen_y {
            1.0
        } else {
            0.0
        }
    }
}

/// Development shortcuts, read only in debug builds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugActions {
    pub next_level: bool,
    pub toggle_collisions: bool,
    pub refuel: bool,
}

/// Input snapshot for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlightInput {
    pub thrust: bool,
    pub roll_decrease: bool,
    pub roll_increase: bool,
    pub pointer: Option<PointerAim>,
    pub debug: DebugActions,
}

impl FlightInput {
    /// Read the tick's input, given where the vehicle currently appears on screen.
    pub fn read(input: &InputState, vehicle_screen: Vec2) -> Self {
        Self {
            thrust: input.is_thrust_held(),
            roll_decrease: input.is_roll_decrease_held(),
            roll_increase: input.is_roll_increase_held(),
            pointer: input.held_pointer().map(|p| PointerAim {
                pointer_y: p.y,
                vehicle_screen_y: vehicle_screen.y,
            }),
            debug: read_debug_actions(input),
        }
    }
}

#[cfg(debug_assertions)]
fn read_debug_actions(input: &InputState) -> DebugActions {
    DebugActions {
        next_level: input.is_key_pressed(input::DEBUG_NEXT_LEVEL_KEY),
        toggle_collisions: input.is_key_pressed(input::DEBUG_COLLISIONS_KEY),
        refuel: input.is_key_pressed(input::DEBUG_REFUEL_KEY),
    }
}

#[cfg(not(debug_assertions))]
fn read_debug_actions(_input: &InputState) -> DebugActions {
    DebugActions::default()
}

/// The three optional particle emitters on a vehicle.
#[derive(Default)]
pub struct Emitters<'a> {
    pub engine: Option<&'a mut dyn ParticleSink>,
    pub success: Option<&'a mut dyn ParticleSink>,
    pub death: Option<&'a mut dyn ParticleSink>,
}

/// Collaborators the controller drives during one call.
pub struct FlightContext<'a> {
    pub body: &'a mut dyn VehicleBody,
    pub rotors: &'a mut dyn RotorSink,
    pub audio: Option<&'a mut dyn AudioSink>,
    pub particles: Emitters<'a>,
    pub requests: &'a mut Scheduler<SessionRequest>,
    /// Simulation time of this call, seconds.
    pub now: f64,
}

/// Clip names the controller plays; `None` skips the sound.
#[derive(Debug, Clone, Default, PartialEq)]
struct Clips {
    engine: Option<String>,
    success: Option<String>,
    death: Option<String>,
}

/// Thrust, fuel and tilt for one vehicle, plus its outcome state machine.
#[derive(Debug, Clone)]
pub struct FlightController {
    main_thrust: f32,
    rcs_thrust: f32,
    rotation_limit: f32,
    max_fuel_mass: f32,
    level_load_delay: f32,
    clips: Clips,
    state: VehicleState,
    fuel_indicator: f32,
}

impl FlightController {
    /// Spawn a controller for a vehicle starting at `spawn`. The spawn
    /// orientation's y and z angles are held for the vehicle's lifetime.
    pub fn new(config: &FlightConfig, spawn: &Transform) -> Self {
        let rotation = spawn.euler_degrees();
        Self {
            main_thrust: config.main_thrust,
            rcs_thrust: config.rcs_thrust,
            rotation_limit: config.rotation_limit_degree,
            max_fuel_mass: config.max_fuel_mass,
            level_load_delay: config.level_load_delay,
            clips: Clips {
                engine: config.engine_clip.clone(),
                success: config.success_clip.clone(),
                death: config.death_clip.clone(),
            },
            state: VehicleState::spawn(config.max_fuel_mass, config.thrust_fraction, rotation),
            fuel_indicator: 1.0,
        }
    }

    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    pub fn phase(&self) -> FlightPhase {
        if self.state.transitioning {
            FlightPhase::Transitioning
        } else {
            FlightPhase::Flying
        }
    }

    /// Fuel gauge value in [0, 1], refreshed every tick.
    pub fn fuel_indicator(&self) -> f32 {
        self.fuel_indicator
    }

    /// Advance one tick of `dt` seconds.
    pub fn tick(&mut self, dt: f32, input: &FlightInput, ctx: &mut FlightContext<'_>) {
        #[cfg(debug_assertions)]
        self.respond_to_debug(&input.debug, ctx);

        if !self.state.transitioning {
            self.respond_to_thrust(input.thrust, dt, ctx);
            self.respond_to_rotation(input, dt, ctx);
        }
        clamp_height(ctx.body);
        self.fuel_indicator = (self.state.fuel_mass / self.max_fuel_mass).clamp(0.0, 1.0);
    }

    /// Handle the start of a contact with an object of `category`.
    pub fn on_collision(&mut self, category: Category, ctx: &mut FlightContext<'_>) -> Outcome {
        if self.state.transitioning || self.state.collisions_disabled {
            return Outcome::Ignored;
        }
        match category {
            Category::Friendly => Outcome::Friendly,
            Category::Finish => self.start_success_sequence(ctx),
            Category::Hostile => self.start_death_sequence(ctx),
        }
    }

    fn respond_to_thrust(&mut self, held: bool, dt: f32, ctx: &mut FlightContext<'_>) {
        if held && self.state.has_fuel() {
            self.apply_thrust(dt, ctx);
        } else {
            self.stop_thrust(ctx);
        }
    }

    fn apply_thrust(&mut self, dt: f32, ctx: &mut FlightContext<'_>) {
        let b = burn(self.state.thrust_fraction, self.main_thrust, dt);
        self.state.current_thrust_newtons = b.thrust_newtons;
        self.state.fuel_mass -= b.fuel;

        ctx.body.add_upward_force(self.main_thrust * dt);
        ctx.rotors.set_spin_rate(ROTOR_RATE_FAST);
        if let Some(audio) = ctx.audio.as_deref_mut() {
            self.run_engine_loop(audio);
            audio.set_pitch(ENGINE_PITCH_LOUD);
        }
        if let Some(engine) = ctx.particles.engine.as_deref_mut() {
            if !engine.is_emitting() {
                engine.start();
            }
        }
    }

    fn stop_thrust(&mut self, ctx: &mut FlightContext<'_>) {
        self.state.current_thrust_newtons = 0.0;
        ctx.rotors.set_spin_rate(ROTOR_RATE_SLOW);
        if let Some(audio) = ctx.audio.as_deref_mut() {
            self.run_engine_loop(audio);
            audio.set_pitch(ENGINE_PITCH_IDLE);
        }
        if let Some(engine) = ctx.particles.engine.as_deref_mut() {
            engine.stop();
        }
    }

    /// The engine idles from the first tick, so the loop runs whether or not thrust is held.
    fn run_engine_loop(&self, audio: &mut dyn AudioSink) {
        if audio.is_playing() {
            return;
        }
        if let Some(clip) = &self.clips.engine {
            audio.play_loop(clip);
        }
    }

    fn respond_to_rotation(&mut self, input: &FlightInput, dt: f32, ctx: &mut FlightContext<'_>) {
        let step = self.rcs_thrust * dt;
        let mut x = self.state.rotation.x;
        if input.roll_decrease {
            x -= step;
        }
        if input.roll_increase {
            x += step;
        }
        if let Some(aim) = input.pointer {
            x += aim.direction() * step;
        }
        x = wrap_and_clamp_angle(x, self.rotation_limit);
        self.state.rotation.x = x;

        let r = self.state.rotation;
        let mut pose = ctx.body.transform();
        pose.set_euler_degrees(r.x, r.y, r.z);
        ctx.body.set_rotation(pose.rotation);
    }

    fn start_success_sequence(&mut self, ctx: &mut FlightContext<'_>) -> Outcome {
        self.state.transitioning = true;
        let clip_length = self.play_stinger(self.clips.success.clone(), ctx);
        if let Some(success) = ctx.particles.success.as_deref_mut() {
            success.start();
        }
        let fire_at = ctx.now + f64::from(clip_length + self.level_load_delay);
        ctx.requests.schedule_at(fire_at, SessionRequest::AdvanceLevel);
        log::info!("Landed on the finish pad; next level at t={:.2}", fire_at);
        Outcome::Success { fire_at }
    }

    fn start_death_sequence(&mut self, ctx: &mut FlightContext<'_>) -> Outcome {
        self.stop_thrust(ctx);
        self.state.transitioning = true;
        self.play_stinger(self.clips.death.clone(), ctx);
        if let Some(death) = ctx.particles.death.as_deref_mut() {
            death.start();
        }
        let fire_at = ctx.now + f64::from(self.level_load_delay);
        ctx.requests.schedule_at(fire_at, SessionRequest::RestartLevel);
        log::info!("Vehicle destroyed; restarting at t={:.2}", fire_at);
        Outcome::Failure { fire_at }
    }

    /// Replace the engine sound with a one-shot clip. Returns the clip length, 0 when absent.
    fn play_stinger(&self, clip: Option<String>, ctx: &mut FlightContext<'_>) -> f32 {
        let Some(audio) = ctx.audio.as_deref_mut() else {
            return 0.0;
        };
        audio.stop();
        let Some(clip) = clip else {
            return 0.0;
        };
        audio.play_one_shot(&clip);
        audio.clip_duration(&clip).unwrap_or(0.0)
    }

    #[cfg(debug_assertions)]
    fn respond_to_debug(&mut self, actions: &DebugActions, ctx: &mut FlightContext<'_>) {
        if actions.next_level {
            log::debug!("[DEBUG] Skipping to next level");
            ctx.requests.schedule_at(ctx.now, SessionRequest::AdvanceLevel);
        }
        if actions.toggle_collisions {
            self.state.collisions_disabled = !self.state.collisions_disabled;
            log::debug!("[DEBUG] Collisions disabled: {}", self.state.collisions_disabled);
        }
        if actions.refuel {
            self.state.fuel_mass = self.max_fuel_mass;
            log::debug!("[DEBUG] Refueled");
        }
    }
}

fn clamp_height(body: &mut dyn VehicleBody) {
    let mut t = body.transform();
    if t.clamp_height(MIN_HEIGHT, MAX_HEIGHT) {
        body.set_height(t.position.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::{Quat, Vec3};

    #[derive(Default)]
    struct FakeBody {
        transform: Transform,
        forces: Vec<f32>,
    }

    impl VehicleBody for FakeBody {
        fn transform(&self) -> Transform {
            self.transform
        }
        fn set_rotation(&mut self, rotation: Quat) {
            self.transform.rotation = rotation;
        }
        fn set_height(&mut self, y: f32) {
            self.transform.position.y = y;
        }
        fn add_upward_force(&mut self, magnitude: f32) {
            self.forces.push(magnitude);
        }
    }

    #[derive(Default)]
    struct FakeRotors {
        rate: Option<f32>,
    }

    impl RotorSink for FakeRotors {
        fn set_spin_rate(&mut self, rate: f32) {
            self.rate = Some(rate);
        }
    }

    #[derive(Default)]
    struct FakeAudio {
        playing: Option<String>,
        one_shots: Vec<String>,
        pitch: Option<f32>,
        stops: usize,
    }

    impl AudioSink for FakeAudio {
        fn is_playing(&self) -> bool {
            self.playing.is_some()
        }
        fn play_loop(&mut self, clip: &str) {
            self.playing = Some(clip.to_string());
        }
        fn play_one_shot(&mut self, clip: &str) {
            self.playing = Some(clip.to_string());
            self.one_shots.push(clip.to_string());
        }
        fn stop(&mut self) {
            self.playing = None;
            self.stops += 1;
        }
        fn set_pitch(&mut self, pitch: f32) {
            self.pitch = Some(pitch);
        }
        fn clip_duration(&self, clip: &str) -> Option<f32> {
            match clip {
                "success" => Some(1.5),
                "death" => Some(3.0),
                _ => None,
            }
        }
    }

    #[derive(Default)]
    struct FakeEmitter {
        emitting: bool,
        starts: usize,
    }

    impl ParticleSink for FakeEmitter {
        fn start(&mut self) {
            self.emitting = true;
            self.starts += 1;
        }
        fn stop(&mut self) {
            self.emitting = false;
        }
        fn is_emitting(&self) -> bool {
            self.emitting
        }
    }

    #[derive(Default)]
    struct Rig {
        body: FakeBody,
        rotors: FakeRotors,
        audio: FakeAudio,
        engine: FakeEmitter,
        success: FakeEmitter,
        death: FakeEmitter,
        requests: Scheduler<SessionRequest>,
    }

    impl Rig {
        fn at_height(y: f32) -> Self {
            let mut rig = Self::default();
            rig.body.transform = Transform::from_position(Vec3::new(0.0, y, 0.0));
            rig
        }

        fn ctx(&mut self, now: f64) -> FlightContext<'_> {
            FlightContext {
                body: &mut self.body,
                rotors: &mut self.rotors,
                audio: Some(&mut self.audio),
                particles: Emitters {
                    engine: Some(&mut self.engine),
                    success: Some(&mut self.success),
                    death: Some(&mut self.death),
                },
                requests: &mut self.requests,
                now,
            }
        }
    }

    fn config() -> FlightConfig {
        FlightConfig {
            main_thrust: 1000.0,
            rcs_thrust: 100.0,
            rotation_limit_degree: 30.0,
            max_fuel_mass: 2000.0,
            thrust_fraction: 0.5,
            level_load_delay: 2.0,
            ..FlightConfig::default()
        }
    }

    fn controller(rig: &Rig) -> FlightController {
        FlightController::new(&config(), &rig.body.transform)
    }

    const THRUST: FlightInput = FlightInput {
        thrust: true,
        roll_decrease: false,
        roll_increase: false,
        pointer: None,
        debug: DebugActions {
            next_level: false,
            toggle_collisions: false,
            refuel: false,
        },
    };

    #[test]
    fn thrust_burns_fuel_at_exhaust_rate() {
        let mut rig = Rig::at_height(10.0);
        let mut fc = controller(&rig);
        let dt = 0.02;
        let before = fc.state().fuel_mass;
        fc.tick(dt, &THRUST, &mut rig.ctx(0.0));

        let expected = before - (0.5 * 1000.0 * 1000.0 / 4462.0) * dt;
        assert!((fc.state().fuel_mass - expected).abs() < 1e-3);
        assert_eq!(fc.state().current_thrust_newtons, 500_000.0);
        assert_eq!(rig.body.forces, vec![1000.0 * dt]);
        assert_eq!(rig.rotors.rate, Some(ROTOR_RATE_FAST));
        assert_eq!(rig.audio.pitch, Some(ENGINE_PITCH_LOUD));
        assert_eq!(rig.audio.playing.as_deref(), Some("engine"));
        assert!(rig.engine.emitting);
    }

    #[test]
    fn releasing_thrust_idles_engine() {
        let mut rig = Rig::at_height(10.0);
        let mut fc = controller(&rig);
        fc.tick(0.02, &THRUST, &mut rig.ctx(0.0));
        fc.tick(0.02, &FlightInput::default(), &mut rig.ctx(0.02));

        assert_eq!(rig.body.forces.len(), 1);
        assert_eq!(fc.state().current_thrust_newtons, 0.0);
        assert_eq!(rig.rotors.rate, Some(ROTOR_RATE_SLOW));
        assert_eq!(rig.audio.pitch, Some(ENGINE_PITCH_IDLE));
        assert!(!rig.engine.emitting);
    }

    #[test]
    fn last_burn_may_overshoot_then_engine_stops() {
        let mut rig = Rig::at_height(10.0);
        let mut cfg = config();
        cfg.max_fuel_mass = 1.0;
        let mut fc = FlightController::new(&cfg, &rig.body.transform);

        // One 0.1 s burn uses ~11.2 kg, far more than the tank holds.
        fc.tick(0.1, &THRUST, &mut rig.ctx(0.0));
        assert!(fc.state().fuel_mass < 0.0);
        assert_eq!(fc.fuel_indicator(), 0.0);

        fc.tick(0.1, &THRUST, &mut rig.ctx(0.1));
        assert_eq!(rig.body.forces.len(), 1);
        assert_eq!(rig.rotors.rate, Some(ROTOR_RATE_SLOW));
        assert!(!rig.engine.emitting);
    }

    #[test]
    fn fuel_indicator_tracks_tank() {
        let mut rig = Rig::at_height(10.0);
        let mut fc = controller(&rig);
        fc.tick(1.0, &THRUST, &mut rig.ctx(0.0));
        let expected = (2000.0 - 500_000.0 / 4462.0) / 2000.0;
        assert!((fc.fuel_indicator() - expected).abs() < 1e-5);
    }

    #[test]
    fn roll_inputs_accumulate() {
        let mut rig = Rig::at_height(10.0);
        let mut fc = controller(&rig);
        let input = FlightInput {
            roll_increase: true,
            pointer: Some(PointerAim {
                pointer_y: 600.0,
                vehicle_screen_y: 300.0,
            }),
            ..FlightInput::default()
        };
        fc.tick(0.1, &input, &mut rig.ctx(0.0));
        // Key and pointer-below each add 10 degrees.
        assert!((fc.state().rotation.x - 20.0).abs() < 1e-4);
    }

    #[test]
    fn opposite_inputs_cancel() {
        let mut rig = Rig::at_height(10.0);
        let mut fc = controller(&rig);
        let input = FlightInput {
            roll_decrease: true,
            roll_increase: true,
            ..FlightInput::default()
        };
        fc.tick(0.1, &input, &mut rig.ctx(0.0));
        assert!(fc.state().rotation.x.abs() < 1e-6);
    }

    #[test]
    fn pointer_above_vehicle_tilts_negative() {
        let mut rig = Rig::at_height(10.0);
        let mut fc = controller(&rig);
        let input = FlightInput {
            pointer: Some(PointerAim {
                pointer_y: 100.0,
                vehicle_screen_y: 300.0,
            }),
            ..FlightInput::default()
        };
        fc.tick(0.05, &input, &mut rig.ctx(0.0));
        assert!((fc.state().rotation.x + 5.0).abs() < 1e-4);
    }

    #[test]
    fn rotation_never_leaves_limit() {
        let mut rig = Rig::at_height(10.0);
        let mut fc = controller(&rig);
        let input = FlightInput {
            roll_increase: true,
            pointer: Some(PointerAim {
                pointer_y: 900.0,
                vehicle_screen_y: 0.0,
            }),
            ..FlightInput::default()
        };
        for i in 0..200 {
            fc.tick(0.05, &input, &mut rig.ctx(i as f64 * 0.05));
            assert!(fc.state().rotation.x <= 30.0);
        }
        assert_eq!(fc.state().rotation.x, 30.0);
        let e = rig.body.transform.euler_degrees();
        assert!((e.x - 30.0).abs() < 1e-3);
    }

    #[test]
    fn spawn_yaw_and_roll_are_held() {
        let mut rig = Rig::default();
        rig.body.transform = Transform::from_euler_degrees(Vec3::new(0.0, 5.0, 0.0), 0.0, 20.0, 10.0);
        let mut fc = controller(&rig);
        let input = FlightInput {
            roll_decrease: true,
            ..FlightInput::default()
        };
        fc.tick(0.1, &input, &mut rig.ctx(0.0));
        let e = rig.body.transform.euler_degrees();
        assert!((e.x + 10.0).abs() < 1e-3);
        assert!((e.y - 20.0).abs() < 1e-3);
        assert!((e.z - 10.0).abs() < 1e-3);
    }

    #[test]
    fn height_clamped_even_while_transitioning() {
        let mut rig = Rig::at_height(10.0);
        let mut fc = controller(&rig);
        fc.on_collision(Category::Hostile, &mut rig.ctx(0.0));

        rig.body.transform.position.y = 95.0;
        fc.tick(0.02, &FlightInput::default(), &mut rig.ctx(0.02));
        assert_eq!(rig.body.transform.position.y, 80.0);

        rig.body.transform.position.y = -3.0;
        fc.tick(0.02, &FlightInput::default(), &mut rig.ctx(0.04));
        assert_eq!(rig.body.transform.position.y, 0.0);
    }

    #[test]
    fn friendly_contact_changes_nothing() {
        let mut rig = Rig::at_height(1.0);
        let mut fc = controller(&rig);
        let before = *fc.state();
        assert_eq!(fc.on_collision(Category::Friendly, &mut rig.ctx(0.0)), Outcome::Friendly);
        assert_eq!(*fc.state(), before);
        assert_eq!(fc.phase(), FlightPhase::Flying);
        assert!(rig.requests.is_empty());
    }

    #[test]
    fn finish_schedules_next_level_after_clip_and_delay() {
        let mut rig = Rig::at_height(1.0);
        let mut fc = controller(&rig);
        let outcome = fc.on_collision(Category::Finish, &mut rig.ctx(10.0));

        assert_eq!(outcome, Outcome::Success { fire_at: 13.5 });
        assert_eq!(fc.phase(), FlightPhase::Transitioning);
        assert_eq!(rig.audio.one_shots, vec!["success".to_string()]);
        assert_eq!(rig.audio.stops, 1);
        assert_eq!(rig.success.starts, 1);
        assert!(rig.requests.drain_due(13.49).is_empty());
        assert_eq!(rig.requests.drain_due(13.5), vec![SessionRequest::AdvanceLevel]);
    }

    #[test]
    fn crash_stops_thrust_and_schedules_restart() {
        let mut rig = Rig::at_height(10.0);
        let mut fc = controller(&rig);
        fc.tick(0.02, &THRUST, &mut rig.ctx(0.0));
        assert!(rig.engine.emitting);

        let outcome = fc.on_collision(Category::Hostile, &mut rig.ctx(4.0));
        assert_eq!(outcome, Outcome::Failure { fire_at: 6.0 });
        assert!(!rig.engine.emitting);
        assert_eq!(rig.rotors.rate, Some(ROTOR_RATE_SLOW));
        assert_eq!(fc.state().current_thrust_newtons, 0.0);
        assert_eq!(rig.audio.one_shots, vec!["death".to_string()]);
        assert_eq!(rig.death.starts, 1);
        assert_eq!(rig.requests.drain_due(6.0), vec![SessionRequest::RestartLevel]);

        // Thrust input no longer reaches the body.
        fc.tick(0.02, &THRUST, &mut rig.ctx(4.02));
        assert_eq!(rig.body.forces.len(), 1);
    }

    #[test]
    fn collisions_after_transition_are_ignored() {
        let mut rig = Rig::at_height(1.0);
        let mut fc = controller(&rig);
        fc.on_collision(Category::Finish, &mut rig.ctx(0.0));
        let before = *fc.state();

        assert_eq!(fc.on_collision(Category::Hostile, &mut rig.ctx(0.1)), Outcome::Ignored);
        assert_eq!(fc.on_collision(Category::Finish, &mut rig.ctx(0.2)), Outcome::Ignored);
        assert_eq!(*fc.state(), before);
        assert_eq!(rig.requests.len(), 1);
        assert_eq!(rig.death.starts, 0);
    }

    #[test]
    fn missing_audio_and_particles_are_skipped() {
        let mut rig = Rig::at_height(1.0);
        let mut fc = controller(&rig);
        let mut ctx = FlightContext {
            body: &mut rig.body,
            rotors: &mut rig.rotors,
            audio: None,
            particles: Emitters::default(),
            requests: &mut rig.requests,
            now: 1.0,
        };
        fc.tick(0.02, &THRUST, &mut ctx);
        // No clip length to wait for: only the load delay.
        assert_eq!(fc.on_collision(Category::Finish, &mut ctx), Outcome::Success { fire_at: 3.0 });
    }

    #[test]
    fn configured_thrust_fraction_scales_burn() {
        let mut rig = Rig::at_height(10.0);
        let mut cfg = config();
        cfg.thrust_fraction = 1.0;
        let mut fc = FlightController::new(&cfg, &rig.body.transform);
        fc.tick(1.0, &THRUST, &mut rig.ctx(0.0));

        assert_eq!(fc.state().current_thrust_newtons, 1_000_000.0);
        let expected = 2000.0 - 1_000_000.0 / 4462.0;
        assert!((fc.state().fuel_mass - expected).abs() < 1e-2);
    }

    #[test]
    fn engine_idles_from_first_tick() {
        let mut rig = Rig::at_height(10.0);
        let mut fc = controller(&rig);
        fc.tick(0.02, &FlightInput::default(), &mut rig.ctx(0.0));

        assert_eq!(rig.audio.playing.as_deref(), Some("engine"));
        assert_eq!(rig.audio.pitch, Some(ENGINE_PITCH_IDLE));

        // Thrust raises the pitch of the same loop without restarting it.
        fc.tick(0.02, &THRUST, &mut rig.ctx(0.02));
        assert_eq!(rig.audio.stops, 0);
        assert_eq!(rig.audio.pitch, Some(ENGINE_PITCH_LOUD));
    }

    #[cfg(debug_assertions)]
    #[test]
    fn debug_toggle_disables_collisions() {
        let mut rig = Rig::at_height(1.0);
        let mut fc = controller(&rig);
        let toggle = FlightInput {
            debug: DebugActions {
                toggle_collisions: true,
                ..DebugActions::default()
            },
            ..FlightInput::default()
        };
        fc.tick(0.02, &toggle, &mut rig.ctx(0.0));
        assert!(fc.state().collisions_disabled);
        assert_eq!(fc.on_collision(Category::Hostile, &mut rig.ctx(0.1)), Outcome::Ignored);
        assert_eq!(fc.phase(), FlightPhase::Flying);
    }

    #[cfg(debug_assertions)]
    #[test]
    fn debug_refuel_and_skip() {
        let mut rig = Rig::at_height(10.0);
        let mut fc = controller(&rig);
        fc.tick(1.0, &THRUST, &mut rig.ctx(0.0));
        assert!(fc.state().fuel_mass < 2000.0);

        let debug = FlightInput {
            debug: DebugActions {
                refuel: true,
                next_level: true,
                ..DebugActions::default()
            },
            ..FlightInput::default()
        };
        fc.tick(0.02, &debug, &mut rig.ctx(1.0));
        assert_eq!(fc.state().fuel_mass, 2000.0);
        assert_eq!(rig.requests.drain_due(1.0), vec![SessionRequest::AdvanceLevel]);
    }
}
