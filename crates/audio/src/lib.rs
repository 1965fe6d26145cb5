//! Audio system using Kira: clip library plus voices for the engine and music.

use anyhow::Result;
use engine_core::AudioSink;
use kira::{
    manager::{AudioManager, AudioManagerSettings, backend::DefaultBackend},
    sound::{
        PlaybackRate, PlaybackState,
        static_sound::{StaticSoundData, StaticSoundHandle, StaticSoundSettings},
    },
    tween::Tween,
};
use std::collections::HashMap;
use std::path::Path;

/// Main audio system owning the device and every loaded clip.
pub struct AudioSystem {
    manager: AudioManager,
    sounds: HashMap<String, StaticSoundData>,
}

impl AudioSystem {
    /// Open the default audio device.
    pub fn new() -> Result<Self> {
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())?;
        Ok(Self {
            manager,
            sounds: HashMap::new(),
        })
    }

    /// Load a sound from a file.
    pub fn load_sound(&mut self, name: &str, path: &Path) -> Result<()> {
        let sound_data = StaticSoundData::from_file(path)?;
        self.sounds.insert(name.to_string(), sound_data);
        Ok(())
    }

    /// Load a sound, logging instead of failing. Returns whether it loaded.
    pub fn load_optional(&mut self, name: &str, path: &Path) -> bool {
        match self.load_sound(name, path) {
            Ok(()) => {
                log::debug!("Loaded clip '{}' from {:?}", name, path);
                true
            }
            Err(e) => {
                log::warn!("Could not load clip '{}' from {:?}: {}", name, path, e);
                false
            }
        }
    }

    /// Length of a loaded clip in seconds.
    pub fn clip_duration(&self, name: &str) -> Option<f32> {
        self.sounds.get(name).map(|s| s.duration().as_secs_f32())
    }

    fn start(&mut self, name: &str, settings: StaticSoundSettings) -> Result<Option<StaticSoundHandle>> {
        let Some(sound_data) = self.sounds.get(name) else {
            return Ok(None);
        };
        let handle = self.manager.play(sound_data.clone().with_settings(settings))?;
        Ok(Some(handle))
    }

    /// Set master volume (0.0 to 1.0).
    pub fn set_master_volume(&mut self, volume: f64) {
        let _ = self.manager.main_track().set_volume(volume, Tween::default());
    }
}

/// One channel of playback, like a single speaker on an object:
/// it plays one clip at a time and has its own pitch and volume.
pub struct Voice {
    handle: Option<StaticSoundHandle>,
    pitch: f64,
    volume: f64,
}

impl Voice {
    pub fn new(volume: f64) -> Self {
        Self {
            handle: None,
            pitch: 1.0,
            volume,
        }
    }

    /// Borrow this voice together with the system that plays it.
    pub fn bind<'a>(&'a mut self, system: &'a mut AudioSystem) -> VoiceMut<'a> {
        VoiceMut { system, voice: self }
    }

    fn is_playing(&self) -> bool {
        matches!(self.handle.as_ref().map(|h| h.state()), Some(PlaybackState::Playing))
    }
}

/// A [`Voice`] bound to its [`AudioSystem`]; implements [`AudioSink`].
pub struct VoiceMut<'a> {
    system: &'a mut AudioSystem,
    voice: &'a mut Voice,
}

impl VoiceMut<'_> {
    fn replace(&mut self, clip: &str, looping: bool) {
        self.stop();
        let mut settings = StaticSoundSettings::new()
            .volume(self.voice.volume)
            .playback_rate(PlaybackRate::Factor(self.voice.pitch));
        if looping {
            settings = settings.loop_region(..);
        }
        match self.system.start(clip, settings) {
            Ok(handle) => self.voice.handle = handle,
            Err(e) => log::warn!("Could not play clip '{}': {}", clip, e),
        }
    }
}

impl AudioSink for VoiceMut<'_> {
    fn is_playing(&self) -> bool {
        self.voice.is_playing()
    }

    fn play_loop(&mut self, clip: &str) {
        self.replace(clip, true);
    }

    fn play_one_shot(&mut self, clip: &str) {
        self.replace(clip, false);
    }

    fn stop(&mut self) {
        if let Some(mut handle) = self.voice.handle.take() {
            let _ = handle.stop(Tween::default());
        }
    }

    fn set_pitch(&mut self, pitch: f32) {
        self.voice.pitch = f64::from(pitch);
        if let Some(handle) = self.voice.handle.as_mut() {
            let _ = handle.set_playback_rate(PlaybackRate::Factor(f64::from(pitch)), Tween::default());
        }
    }

    fn clip_duration(&self, clip: &str) -> Option<f32> {
        self.system.clip_duration(clip)
    }
}

// Re-export for convenience
pub use kira;
