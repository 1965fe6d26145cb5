//! Session coordinator: background music and scene transitions.
//!
//! There is at most one live [`Session`] per process. It is activated once
//! through a [`SessionSlot`]; a later activation is refused with a warning
//! and the first session stays in place (first wins).

use engine_core::{AudioSink, SceneError, SceneLoader};

/// Index of the first playable scene. Index 0 is the title screen.
pub const FIRST_LEVEL_INDEX: usize = 1;

/// Scene change asked for by gameplay, usually after a delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRequest {
    AdvanceLevel,
    RestartLevel,
}

/// Process-wide session state.
pub struct Session<L: SceneLoader> {
    loader: L,
    music_clip: Option<String>,
    music_playing: bool,
}

impl<L: SceneLoader> Session<L> {
    pub fn new(loader: L, music_clip: Option<String>) -> Self {
        Self {
            loader,
            music_clip,
            music_playing: false,
        }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn loader_mut(&mut self) -> &mut L {
        &mut self.loader
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_playing
    }

    /// Start background music unless it is already running.
    fn start_music(&mut self, music: Option<&mut dyn AudioSink>) {
        if self.music_playing {
            return;
        }
        let (Some(music), Some(clip)) = (music, self.music_clip.as_deref()) else {
            return;
        };
        if !music.is_playing() {
            music.play_loop(clip);
        }
        self.music_playing = true;
    }

    /// Load the scene after the active one, wrapping to index 0 after the last.
    pub fn advance_to_next_level(&mut self) -> Result<usize, SceneError> {
        let count = self.loader.scene_count();
        if count == 0 {
            return Err(SceneError::Empty);
        }
        let mut next = self.loader.active_scene_index() + 1;
        if next >= count {
            next = 0;
        }
        self.loader.load_scene(next)?;
        log::info!("Advancing to scene {} of {}", next, count);
        Ok(next)
    }

    /// Load the first playable level.
    pub fn restart_from_first_level(&mut self) -> Result<usize, SceneError> {
        self.loader.load_scene(FIRST_LEVEL_INDEX)?;
        log::info!("Restarting from scene {}", FIRST_LEVEL_INDEX);
        Ok(FIRST_LEVEL_INDEX)
    }

    /// Carry out a queued request.
    pub fn handle(&mut self, request: SessionRequest) -> Result<usize, SceneError> {
        match request {
            SessionRequest::AdvanceLevel => self.advance_to_next_level(),
            SessionRequest::RestartLevel => self.restart_from_first_level(),
        }
    }
}

/// Holder for the single live session.
pub struct SessionSlot<L: SceneLoader> {
    current: Option<Session<L>>,
}

impl<L: SceneLoader> Default for SessionSlot<L> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<L: SceneLoader> SessionSlot<L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `candidate` as the live session and start its music.
    ///
    /// If a session is already live, `candidate` is dropped untouched, a
    /// warning is logged, and the existing session is returned.
    pub fn activate(&mut self, candidate: Session<L>, music: Option<&mut dyn AudioSink>) -> &mut Session<L> {
        let first = self.current.is_none();
        let session = self.current.get_or_insert(candidate);
        if first {
            session.start_music(music);
        } else {
            log::warn!("A session is already active; ignoring the new one");
        }
        session
    }

    pub fn get(&self) -> Option<&Session<L>> {
        self.current.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut Session<L>> {
        self.current.as_mut()
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Loader that records every load into a shared log.
    struct FakeLoader {
        active: usize,
        count: usize,
        loads: Rc<RefCell<Vec<usize>>>,
    }

    impl FakeLoader {
        fn new(active: usize, count: usize) -> (Self, Rc<RefCell<Vec<usize>>>) {
            let loads = Rc::new(RefCell::new(Vec::new()));
            (
                Self {
                    active,
                    count,
                    loads: loads.clone(),
                },
                loads,
            )
        }
    }

    impl SceneLoader for FakeLoader {
        fn load_scene(&mut self, index: usize) -> Result<(), SceneError> {
            if index >= self.count {
                return Err(SceneError::OutOfRange {
                    index,
                    count: self.count,
                });
            }
            self.active = index;
            self.loads.borrow_mut().push(index);
            Ok(())
        }
        fn active_scene_index(&self) -> usize {
            self.active
        }
        fn scene_count(&self) -> usize {
            self.count
        }
    }

    #[derive(Default)]
    struct FakeMusic {
        loops: Vec<String>,
    }

    impl AudioSink for FakeMusic {
        fn is_playing(&self) -> bool {
            !self.loops.is_empty()
        }
        fn play_loop(&mut self, clip: &str) {
            self.loops.push(clip.to_string());
        }
        fn play_one_shot(&mut self, _clip: &str) {}
        fn stop(&mut self) {}
        fn set_pitch(&mut self, _pitch: f32) {}
        fn clip_duration(&self, _clip: &str) -> Option<f32> {
            None
        }
    }

    #[test]
    fn advance_steps_to_next_scene() {
        let (loader, loads) = FakeLoader::new(1, 4);
        let mut session = Session::new(loader, None);
        assert_eq!(session.advance_to_next_level(), Ok(2));
        assert_eq!(*loads.borrow(), vec![2]);
    }

    #[test]
    fn advance_from_last_scene_wraps_to_zero() {
        let (loader, loads) = FakeLoader::new(3, 4);
        let mut session = Session::new(loader, None);
        assert_eq!(session.advance_to_next_level(), Ok(0));
        assert_eq!(*loads.borrow(), vec![0]);
    }

    #[test]
    fn restart_always_loads_first_level() {
        for active in 0..4 {
            let (loader, loads) = FakeLoader::new(active, 4);
            let mut session = Session::new(loader, None);
            assert_eq!(session.restart_from_first_level(), Ok(FIRST_LEVEL_INDEX));
            assert_eq!(*loads.borrow(), vec![1]);
        }
    }

    #[test]
    fn restart_without_a_level_fails() {
        let (loader, loads) = FakeLoader::new(0, 1);
        let mut session = Session::new(loader, None);
        assert_eq!(
            session.restart_from_first_level(),
            Err(SceneError::OutOfRange { index: 1, count: 1 })
        );
        assert!(loads.borrow().is_empty());
    }

    #[test]
    fn requests_dispatch_to_transitions() {
        let (loader, _) = FakeLoader::new(2, 4);
        let mut session = Session::new(loader, None);
        assert_eq!(session.handle(SessionRequest::AdvanceLevel), Ok(3));
        assert_eq!(session.handle(SessionRequest::RestartLevel), Ok(1));
    }

    #[test]
    fn music_starts_once_on_first_activation() {
        let mut music = FakeMusic::default();
        let mut slot = SessionSlot::new();
        let (loader, _) = FakeLoader::new(0, 3);
        let session = slot.activate(Session::new(loader, Some("theme".into())), Some(&mut music));
        assert!(session.is_music_playing());
        session.advance_to_next_level().ok();
        session.advance_to_next_level().ok();
        assert_eq!(music.loops, vec!["theme".to_string()]);
    }

    #[test]
    fn second_session_is_refused_untouched() {
        let mut slot = SessionSlot::new();
        assert!(!slot.is_active());
        let (first, first_loads) = FakeLoader::new(0, 3);
        slot.activate(Session::new(first, None), None);
        assert!(slot.is_active());

        let (second, second_loads) = FakeLoader::new(2, 5);
        let mut music = FakeMusic::default();
        let live = slot.activate(Session::new(second, Some("theme".into())), Some(&mut music));

        assert_eq!(live.loader().scene_count(), 3);
        assert!(!live.is_music_playing());
        live.advance_to_next_level().ok();
        assert_eq!(*first_loads.borrow(), vec![1]);
        assert!(second_loads.borrow().is_empty());
        assert!(music.loops.is_empty());
    }
}
