//! Rotorlift - fly the helicopter from pad to pad without running dry or hitting anything.

use anyhow::Result;
use audio::{AudioSystem, Voice};
use engine_core::Time;
use game::config::AudioConfig;
use game::{GameConfig, GameLoop};
use input::InputState;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

/// Audio device plus the two voices the game uses.
struct Sound {
    system: AudioSystem,
    engine: Voice,
    music: Voice,
}

impl Sound {
    /// Open the device and load every configured clip. `None` means run silent.
    fn open(config: &AudioConfig) -> Option<Self> {
        let mut system = match AudioSystem::new() {
            Ok(system) => system,
            Err(e) => {
                log::warn!("Audio unavailable ({}), running silent", e);
                return None;
            }
        };
        for clip in &config.clips {
            system.load_optional(&clip.name, &clip.path);
        }
        system.set_master_volume(config.master_volume);
        Some(Self {
            system,
            engine: Voice::new(config.engine_volume),
            music: Voice::new(config.music_volume),
        })
    }
}

/// Everything that exists once the window is up.
struct Running {
    window: Arc<Window>,
    game: GameLoop,
    input: InputState,
    time: Time,
    sound: Option<Sound>,
    title: String,
}

impl Running {
    fn frame(&mut self) {
        self.time.update();
        let dt = self.time.fixed_timestep_seconds();
        while self.time.should_fixed_update() {
            match self.sound.as_mut() {
                Some(sound) => {
                    let mut engine = sound.engine.bind(&mut sound.system);
                    self.game.tick(dt, &self.input, Some(&mut engine));
                }
                None => self.game.tick(dt, &self.input, None),
            }
            self.input.begin_frame();
        }

        let title = self.game.status_line();
        if title != self.title {
            self.window.set_title(&title);
            self.title = title;
        }
    }
}

/// Application handler for winit.
struct App {
    config: GameConfig,
    state: Option<Running>,
}

impl App {
    fn new(config: GameConfig) -> Self {
        Self { config, state: None }
    }

    fn start(&self, event_loop: &ActiveEventLoop) -> Result<Running> {
        let window_attrs = Window::default_attributes()
            .with_title("Rotorlift")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let mut sound = Sound::open(&self.config.audio);
        let game = match sound.as_mut() {
            Some(sound) => {
                let mut music = sound.music.bind(&mut sound.system);
                GameLoop::new(&self.config, Some(&mut music))?
            }
            None => GameLoop::new(&self.config, None)?,
        };

        let mut input = InputState::new();
        let size = window.inner_size();
        input.process_resize(size.width, size.height);

        let mut time = Time::new();
        time.set_fixed_rate(self.config.tick_rate);

        Ok(Running {
            window,
            game,
            input,
            time,
            sound,
            title: String::new(),
        })
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        match self.start(event_loop) {
            Ok(running) => {
                running.window.request_redraw();
                self.state = Some(running);
            }
            Err(e) => {
                log::error!("Failed to initialize game: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(state) = &mut self.state else {
            return;
        };
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.input.process_resize(size.width, size.height),
            WindowEvent::Focused(false) => state.input.release_all(),
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    if key == KeyCode::Escape && event.state.is_pressed() {
                        event_loop.exit();
                        return;
                    }
                    state.input.process_keyboard(key, event.state);
                }
            }
            WindowEvent::MouseInput { state: button_state, button, .. } => {
                state.input.process_mouse_button(button, button_state);
            }
            WindowEvent::CursorMoved { position, .. } => {
                state.input.process_cursor_position((position.x, position.y));
            }
            WindowEvent::Touch(touch) => {
                state
                    .input
                    .process_touch(touch.id, touch.phase, (touch.location.x, touch.location.y));
            }
            WindowEvent::RedrawRequested => state.frame(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║                      Rotorlift                       ║");
    println!("╠══════════════════════════════════════════════════════╣");
    println!("║  Space / Click / Touch  - Main engine                ║");
    println!("║  A / D                  - Tilt                       ║");
    println!("║  Hold pointer above/below the craft to tilt          ║");
    println!("║  Escape                 - Quit                       ║");
    println!("╠══════════════════════════════════════════════════════╣");
    println!("║  DEBUG BUILDS: L - next level │ C - collisions │     ║");
    println!("║                F - refuel                            ║");
    println!("╚══════════════════════════════════════════════════════╝");

    let config = GameConfig::load();
    log::info!("Starting Rotorlift with {} scenes", config.scenes.len());

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
