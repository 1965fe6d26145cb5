//! Driver loop: one call per simulation tick, in a fixed order.
//!
//! 1. advance the simulation clock
//! 2. fire due session requests (scene changes)
//! 3. rebuild the level if a scene load is pending
//! 4. flight controller tick
//! 5. physics step, then feed the vehicle's new contacts to the controller
//! 6. effects and rotors

use engine_core::{
    spin_rotors, AudioSink, ParticleSink, Scheduler, SceneError, SceneLoader, SimClock, Transform, VehicleRotors,
};
use input::InputState;
use physics::{BodyMut, Category};

use crate::config::{FlightConfig, GameConfig, SceneKind};
use crate::flight::{Emitters, FlightContext, FlightInput, Outcome};
use crate::level::Level;
use crate::scene::SceneCatalog;
use crate::session::{Session, SessionRequest, SessionSlot};
use crate::view::SideView;

/// Owns the session, the request queue and the active level.
pub struct GameLoop {
    flight: FlightConfig,
    slot: SessionSlot<SceneCatalog>,
    requests: Scheduler<SessionRequest>,
    clock: SimClock,
    level: Level,
    view: SideView,
    scene_loads: u64,
}

impl GameLoop {
    /// Activate the session, start the music and load scene 0.
    pub fn new(config: &GameConfig, music: Option<&mut dyn AudioSink>) -> Result<Self, SceneError> {
        let mut slot = SessionSlot::new();
        let candidate = Session::new(SceneCatalog::new(config.scenes.clone()), config.audio.music_clip.clone());
        let session = slot.activate(candidate, music);

        let catalog = session.loader_mut();
        catalog.load_scene(0)?;
        catalog.take_pending_load();
        let def = catalog.scene(0).cloned().ok_or(SceneError::Empty)?;
        let level = Level::build(0, &def, &config.flight);
        log::info!("Loaded scene 0 '{}'", def.name);

        Ok(Self {
            flight: config.flight.clone(),
            slot,
            requests: Scheduler::new(),
            clock: SimClock::new(),
            level,
            view: SideView::default(),
            scene_loads: 1,
        })
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn session(&self) -> Option<&Session<SceneCatalog>> {
        self.slot.get()
    }

    /// Number of scene loads so far, including the initial one.
    pub fn scene_loads(&self) -> u64 {
        self.scene_loads
    }

    pub fn pending_requests(&self) -> usize {
        self.requests.len()
    }

    /// One-line summary for the window title.
    pub fn status_line(&self) -> String {
        match &self.level.vehicle {
            Some(rig) => {
                let c = &rig.controller;
                let mut line = format!(
                    "Rotorlift - {} | fuel {:.0}%",
                    self.level.name,
                    c.fuel_indicator() * 100.0
                );
                if c.state().collisions_disabled {
                    line.push_str(" | collisions off");
                }
                line
            }
            None => format!("Rotorlift - {} | press Space to fly", self.level.name),
        }
    }

    /// Advance the game by `dt` seconds. `audio` is the vehicle's engine voice.
    pub fn tick(&mut self, dt: f32, input: &InputState, mut audio: Option<&mut dyn AudioSink>) {
        let now = self.clock.advance(dt);
        self.run_due_requests(now);
        if self.reload_if_requested(&mut audio) {
            return;
        }
        match self.level.kind {
            SceneKind::Menu => {
                if input.is_confirm_pressed() {
                    self.requests.schedule_at(now, SessionRequest::AdvanceLevel);
                }
            }
            SceneKind::Level => self.fly(dt, now, input, audio),
        }
    }

    fn run_due_requests(&mut self, now: f64) {
        let Some(session) = self.slot.get_mut() else {
            return;
        };
        for request in self.requests.drain_due(now) {
            match session.handle(request) {
                // Anything else queued belonged to the scene being replaced.
                Ok(_) => break,
                Err(e) => log::error!("{:?} failed: {}", request, e),
            }
        }
    }

    fn reload_if_requested(&mut self, audio: &mut Option<&mut dyn AudioSink>) -> bool {
        let Some(session) = self.slot.get_mut() else {
            return false;
        };
        let catalog = session.loader_mut();
        let Some(index) = catalog.take_pending_load() else {
            return false;
        };
        let Some(def) = catalog.scene(index).cloned() else {
            log::error!("Scene {} vanished before it could load", index);
            return false;
        };

        if let Some(audio) = audio.as_deref_mut() {
            audio.stop();
        }
        self.requests.clear();
        self.level = Level::build(index, &def, &self.flight);
        self.scene_loads += 1;
        log::info!("Loaded scene {} '{}'", index, def.name);
        true
    }

    fn fly(&mut self, dt: f32, now: f64, input: &InputState, mut audio: Option<&mut dyn AudioSink>) {
        let level = &mut self.level;
        let Some(rig) = level.vehicle.as_mut() else {
            return;
        };
        let handle = rig.body.rigid_body;

        let pose = level.physics.get_body_transform(handle).unwrap_or_default();
        let on_screen = self.view.project(pose.position, pose.position.z, input.screen_size());
        let flight_input = FlightInput::read(input, on_screen);

        {
            let mut body = BodyMut::new(&mut level.physics, handle);
            let mut rotors = VehicleRotors::new(&mut level.world, rig.entity);
            let mut ctx = FlightContext {
                body: &mut body,
                rotors: &mut rotors,
                audio: reborrow(&mut audio),
                particles: Emitters {
                    engine: rig.engine_particles.as_mut().map(|p| p as &mut dyn ParticleSink),
                    success: rig.success_particles.as_mut().map(|p| p as &mut dyn ParticleSink),
                    death: rig.death_particles.as_mut().map(|p| p as &mut dyn ParticleSink),
                },
                requests: &mut self.requests,
                now,
            };
            rig.controller.tick(dt, &flight_input, &mut ctx);
        }

        level.physics.step(dt);

        let hits: Vec<Category> = match rig.body.collider {
            Some(hull) => level
                .physics
                .drain_contact_starts()
                .iter()
                .filter_map(|contact| contact.other(hull))
                .map(|other| level.physics.categories.classify(other))
                .collect(),
            None => Vec::new(),
        };
        if !hits.is_empty() {
            let mut body = BodyMut::new(&mut level.physics, handle);
            let mut rotors = VehicleRotors::new(&mut level.world, rig.entity);
            let mut ctx = FlightContext {
                body: &mut body,
                rotors: &mut rotors,
                audio: reborrow(&mut audio),
                particles: Emitters {
                    engine: rig.engine_particles.as_mut().map(|p| p as &mut dyn ParticleSink),
                    success: rig.success_particles.as_mut().map(|p| p as &mut dyn ParticleSink),
                    death: rig.death_particles.as_mut().map(|p| p as &mut dyn ParticleSink),
                },
                requests: &mut self.requests,
                now,
            };
            for category in hits {
                let outcome = rig.controller.on_collision(category, &mut ctx);
                if outcome != Outcome::Ignored {
                    log::debug!("Contact with {:?}: {:?}", category, outcome);
                }
            }
        }

        let pose = level.physics.get_body_transform(handle).unwrap_or_default();
        if let Ok(mut t) = level.world.get::<&mut Transform>(rig.entity) {
            *t = pose;
        }
        rig.update_effects(&pose, dt);
        spin_rotors(&mut level.world, dt);
    }
}

fn reborrow<'s>(audio: &'s mut Option<&mut dyn AudioSink>) -> Option<&'s mut dyn AudioSink> {
    match audio {
        Some(audio) => Some(&mut **audio),
        None => None,
    }
}
