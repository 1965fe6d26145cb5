//! Game configuration (window, flight tuning, audio, scenes). Loaded from config.ron at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading or validating a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid RON: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Persistent game settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    /// Simulation rate in Hz.
    #[serde(default = "default_tick_rate")]
    pub tick_rate: f64,
    #[serde(default)]
    pub flight: FlightConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    /// Scenes in build order. Index 0 is the title screen by convention.
    #[serde(default = "default_scenes")]
    pub scenes: Vec<SceneDef>,
}

/// Vehicle tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightConfig {
    /// Main engine thrust. Scaled by the tick duration into the per-tick force.
    #[serde(default = "default_main_thrust")]
    pub main_thrust: f32,
    /// Roll rate in degrees per second per active roll input.
    #[serde(default = "default_rcs_thrust")]
    pub rcs_thrust: f32,
    /// Maximum tilt either way, in degrees.
    #[serde(default = "default_rotation_limit")]
    pub rotation_limit_degree: f32,
    /// Full tank, in kg.
    #[serde(default = "default_max_fuel_mass")]
    pub max_fuel_mass: f32,
    /// Share of maximum engine thrust in use, [0, 1].
    #[serde(default = "default_thrust_fraction")]
    pub thrust_fraction: f32,
    /// Pause between an outcome and the scene change, in seconds.
    #[serde(default = "default_level_load_delay")]
    pub level_load_delay: f32,
    /// Dry mass of the vehicle body, in kg.
    #[serde(default = "default_vehicle_mass")]
    pub vehicle_mass: f32,
    #[serde(default = "default_hull_half_extents")]
    pub hull_half_extents: [f32; 3],
    /// Number of cosmetic rotors.
    #[serde(default = "default_rotor_count")]
    pub rotor_count: u32,
    #[serde(default = "default_engine_clip")]
    pub engine_clip: Option<String>,
    #[serde(default = "default_success_clip")]
    pub success_clip: Option<String>,
    #[serde(default = "default_death_clip")]
    pub death_clip: Option<String>,
    #[serde(default = "default_true")]
    pub engine_particles: bool,
    #[serde(default = "default_true")]
    pub success_particles: bool,
    #[serde(default = "default_true")]
    pub death_particles: bool,
}

/// Clip files and mix levels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Clips to load at startup. Missing files are skipped with a warning.
    #[serde(default = "default_clips")]
    pub clips: Vec<ClipDef>,
    #[serde(default = "default_music_clip")]
    pub music_clip: Option<String>,
    #[serde(default = "default_music_volume")]
    pub music_volume: f64,
    #[serde(default = "default_engine_volume")]
    pub engine_volume: f64,
    #[serde(default = "default_master_volume")]
    pub master_volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipDef {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneKind {
    /// Title screen: no vehicle, any confirm input starts the game.
    Menu,
    /// Playable level with a vehicle.
    Level,
}

/// One scene in the build order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDef {
    pub name: String,
    pub kind: SceneKind,
    #[serde(default)]
    pub spawn: [f32; 3],
    /// Spawn orientation as XYZ Euler angles in degrees.
    #[serde(default)]
    pub spawn_rotation: [f32; 3],
    /// Hostile ground plane at y = 0.
    #[serde(default = "default_true")]
    pub ground: bool,
    #[serde(default)]
    pub props: Vec<PropDef>,
}

/// Static box in a level. `tag` is "Friendly", "Finish", or anything else for hostile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropDef {
    pub position: [f32; 3],
    pub half_extents: [f32; 3],
    pub tag: String,
}

fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_tick_rate() -> f64 {
    60.0
}
fn default_true() -> bool {
    true
}
fn default_main_thrust() -> f32 {
    1000.0
}
fn default_rcs_thrust() -> f32 {
    100.0
}
fn default_rotation_limit() -> f32 {
    30.0
}
fn default_max_fuel_mass() -> f32 {
    2000.0
}
fn default_thrust_fraction() -> f32 {
    0.5
}
fn default_level_load_delay() -> f32 {
    2.0
}
fn default_vehicle_mass() -> f32 {
    1.0
}
fn default_hull_half_extents() -> [f32; 3] {
    [0.75, 0.5, 1.5]
}
fn default_rotor_count() -> u32 {
    2
}
fn default_engine_clip() -> Option<String> {
    Some("engine".into())
}
fn default_success_clip() -> Option<String> {
    Some("success".into())
}
fn default_death_clip() -> Option<String> {
    Some("death".into())
}
fn default_clips() -> Vec<ClipDef> {
    ["engine", "success", "death", "music"]
        .into_iter()
        .map(|name| ClipDef {
            name: name.to_string(),
            path: PathBuf::from(format!("assets/audio/{name}.ogg")),
        })
        .collect()
}
fn default_music_clip() -> Option<String> {
    Some("music".into())
}
fn default_music_volume() -> f64 {
    0.5
}
fn default_engine_volume() -> f64 {
    0.8
}
fn default_master_volume() -> f64 {
    1.0
}

fn pad(position: [f32; 3], tag: &str) -> PropDef {
    PropDef {
        position,
        half_extents: [3.0, 0.25, 3.0],
        tag: tag.to_string(),
    }
}

fn wall(z: f32, height: f32) -> PropDef {
    PropDef {
        position: [0.0, height / 2.0, z],
        half_extents: [6.0, height / 2.0, 1.0],
        tag: "Obstacle".to_string(),
    }
}

fn default_scenes() -> Vec<SceneDef> {
    let level = |name: &str, props: Vec<PropDef>| SceneDef {
        name: name.to_string(),
        kind: SceneKind::Level,
        spawn: [0.0, 1.0, 0.0],
        spawn_rotation: [0.0, 0.0, 0.0],
        ground: true,
        props,
    };
    vec![
        SceneDef {
            name: "Title".into(),
            kind: SceneKind::Menu,
            spawn: [0.0; 3],
            spawn_rotation: [0.0; 3],
            ground: false,
            props: Vec::new(),
        },
        level(
            "Hop",
            vec![pad([0.0, 0.25, 0.0], "Friendly"), pad([0.0, 0.25, 30.0], "Finish")],
        ),
        level(
            "Wall",
            vec![
                pad([0.0, 0.25, 0.0], "Friendly"),
                wall(20.0, 25.0),
                pad([0.0, 0.25, 40.0], "Finish"),
            ],
        ),
        level(
            "Slalom",
            vec![
                pad([0.0, 0.25, 0.0], "Friendly"),
                wall(18.0, 20.0),
                PropDef {
                    position: [0.0, 60.0, 36.0],
                    half_extents: [6.0, 20.0, 1.0],
                    tag: "Obstacle".into(),
                },
                wall(54.0, 30.0),
                pad([0.0, 0.25, 72.0], "Finish"),
            ],
        ),
    ]
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            main_thrust: default_main_thrust(),
            rcs_thrust: default_rcs_thrust(),
            rotation_limit_degree: default_rotation_limit(),
            max_fuel_mass: default_max_fuel_mass(),
            thrust_fraction: default_thrust_fraction(),
            level_load_delay: default_level_load_delay(),
            vehicle_mass: default_vehicle_mass(),
            hull_half_extents: default_hull_half_extents(),
            rotor_count: default_rotor_count(),
            engine_clip: default_engine_clip(),
            success_clip: default_success_clip(),
            death_clip: default_death_clip(),
            engine_particles: true,
            success_particles: true,
            death_particles: true,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            clips: default_clips(),
            music_clip: default_music_clip(),
            music_volume: default_music_volume(),
            engine_volume: default_engine_volume(),
            master_volume: default_master_volume(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            tick_rate: default_tick_rate(),
            flight: FlightConfig::default(),
            audio: AudioConfig::default(),
            scenes: default_scenes(),
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. A missing file is created with the
    /// defaults; an invalid one is ignored with a warning.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            let config = Self::default();
            config.save();
            log::info!("Wrote default config to {:?}", path);
            return config;
        }
        match Self::load_from(&path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Invalid config at {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    /// Read and validate a config file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&data)
    }

    /// Parse and validate RON text.
    pub fn from_ron_str(data: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Save current config to `config.ron`. Logs on error.
    pub fn save(&self) {
        self.save_to(&config_path());
    }

    /// Save as pretty RON to `path`. Logs on error.
    pub fn save_to(&self, path: &Path) {
        match ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            Ok(s) => {
                if let Err(e) = std::fs::write(path, s) {
                    log::warn!("Could not write config to {:?}: {}", path, e);
                }
            }
            Err(e) => log::warn!("Could not serialize config: {}", e),
        }
    }

    /// Reject values the flight logic cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = &self.flight;
        if !(0.0..=1.0).contains(&f.thrust_fraction) {
            return Err(ConfigError::Invalid(format!(
                "thrust_fraction {} outside [0, 1]",
                f.thrust_fraction
            )));
        }
        if !(0.0..=360.0).contains(&f.rotation_limit_degree) {
            return Err(ConfigError::Invalid(format!(
                "rotation_limit_degree {} outside [0, 360]",
                f.rotation_limit_degree
            )));
        }
        if !(MIN_TICK_RATE..=MAX_TICK_RATE).contains(&self.tick_rate) {
            return Err(ConfigError::Invalid(format!(
                "tick_rate {} outside [{}, {}] Hz",
                self.tick_rate, MIN_TICK_RATE, MAX_TICK_RATE
            )));
        }
        require_positive("max_fuel_mass", f.max_fuel_mass)?;
        require_positive("vehicle_mass", f.vehicle_mass)?;
        for extent in f.hull_half_extents {
            require_positive("hull_half_extents", extent)?;
        }
        require_non_negative("main_thrust", f.main_thrust)?;
        require_non_negative("rcs_thrust", f.rcs_thrust)?;
        require_non_negative("level_load_delay", f.level_load_delay)?;
        if self.scenes.is_empty() {
            return Err(ConfigError::Invalid("at least one scene is required".into()));
        }
        Ok(())
    }
}

/// Slowest and fastest simulation rates accepted, in Hz.
const MIN_TICK_RATE: f64 = 1.0;
const MAX_TICK_RATE: f64 = 1000.0;

fn require_positive(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{} must be positive and finite, got {}", name, value)))
    }
}

fn require_non_negative(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{} must be finite and not negative, got {}", name, value)))
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}
