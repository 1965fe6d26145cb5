//! Scene catalog: the build-ordered list of scenes and which one is active.

use engine_core::{SceneError, SceneLoader};

use crate::config::SceneDef;

/// Configured scenes plus the active index. A load only records the
/// request; the driver rebuilds the world on its next tick.
#[derive(Debug, Clone)]
pub struct SceneCatalog {
    scenes: Vec<SceneDef>,
    active: usize,
    pending: Option<usize>,
}

impl SceneCatalog {
    pub fn new(scenes: Vec<SceneDef>) -> Self {
        Self {
            scenes,
            active: 0,
            pending: None,
        }
    }

    pub fn scene(&self, index: usize) -> Option<&SceneDef> {
        self.scenes.get(index)
    }

    pub fn active_scene(&self) -> Option<&SceneDef> {
        self.scenes.get(self.active)
    }

    /// Take the index of a load requested since the last call.
    pub fn take_pending_load(&mut self) -> Option<usize> {
        self.pending.take()
    }
}

impl SceneLoader for SceneCatalog {
    fn load_scene(&mut self, index: usize) -> Result<(), SceneError> {
        if self.scenes.is_empty() {
            return Err(SceneError::Empty);
        }
        if index >= self.scenes.len() {
            return Err(SceneError::OutOfRange {
                index,
                count: self.scenes.len(),
            });
        }
        self.active = index;
        self.pending = Some(index);
        Ok(())
    }

    fn active_scene_index(&self) -> usize {
        self.active
    }

    fn scene_count(&self) -> usize {
        self.scenes.len()
    }
}
