//! Input handling for keyboard, mouse and touch.
//!
//! The window layer feeds raw events in; flight code asks intent-level
//! questions ("is thrust held?", "which way is the player rolling?").

use glam::Vec2;
use std::collections::{BTreeMap, HashSet};

/// Key that fires the main engine.
pub const THRUST_KEY: KeyCode = KeyCode::Space;
/// Key that rolls the vehicle toward negative angles.
pub const ROLL_DECREASE_KEY: KeyCode = KeyCode::KeyA;
/// Key that rolls the vehicle toward positive angles.
pub const ROLL_INCREASE_KEY: KeyCode = KeyCode::KeyD;
/// Debug: jump to the next level.
pub const DEBUG_NEXT_LEVEL_KEY: KeyCode = KeyCode::KeyL;
/// Debug: toggle collision handling.
pub const DEBUG_COLLISIONS_KEY: KeyCode = KeyCode::KeyC;
/// Debug: refill the fuel tank.
pub const DEBUG_REFUEL_KEY: KeyCode = KeyCode::KeyF;

/// Manages input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,

    /// Mouse buttons currently held.
    mouse_held: HashSet<MouseButton>,
    /// Mouse buttons pressed this frame.
    mouse_pressed: HashSet<MouseButton>,

    /// Mouse position in window coordinates (origin top-left, y down).
    mouse_position: Vec2,

    /// Active touches by finger id, in window coordinates.
    touches: BTreeMap<u64, Vec2>,

    /// A touch began this frame.
    touch_started: bool,

    /// Window size in physical pixels.
    screen_size: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call once after each simulation tick has read input.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.mouse_pressed.clear();
        self.touch_started = false;
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.keys_held.contains(&key) {
                    self.keys_pressed.insert(key);
                }
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
            }
        }
    }

    /// Process a mouse button event.
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.mouse_held.contains(&button) {
                    self.mouse_pressed.insert(button);
                }
                self.mouse_held.insert(button);
            }
            ElementState::Released => {
                self.mouse_held.remove(&button);
            }
        }
    }

    /// Process cursor position update.
    pub fn process_cursor_position(&mut self, position: (f64, f64)) {
        self.mouse_position = Vec2::new(position.0 as f32, position.1 as f32);
    }

    /// Process a touch event.
    pub fn process_touch(&mut self, id: u64, phase: TouchPhase, position: (f64, f64)) {
        let at = Vec2::new(position.0 as f32, position.1 as f32);
        match phase {
            TouchPhase::Started => {
                self.touch_started = true;
                self.touches.insert(id, at);
            }
            TouchPhase::Moved => {
                self.touches.insert(id, at);
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.touches.remove(&id);
            }
        }
    }

    /// Process a window resize.
    pub fn process_resize(&mut self, width: u32, height: u32) {
        self.screen_size = Vec2::new(width as f32, height as f32);
    }

    /// Forget everything held. Used when the window loses focus.
    pub fn release_all(&mut self) {
        self.keys_held.clear();
        self.mouse_held.clear();
        self.touches.clear();
    }

    // Query methods

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a mouse button is held.
    pub fn is_mouse_held(&self, button: MouseButton) -> bool {
        self.mouse_held.contains(&button)
    }

    /// Check if a mouse button was pressed this frame.
    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse_pressed.contains(&button)
    }

    /// Get the mouse position in window coordinates.
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    pub fn touch_count(&self) -> usize {
        self.touches.len()
    }

    pub fn screen_size(&self) -> Vec2 {
        self.screen_size
    }

    /// Thrust is held by key, by any touch, or by the left mouse button.
    pub fn is_thrust_held(&self) -> bool {
        self.is_key_held(THRUST_KEY) || self.touch_count() > 0 || self.is_mouse_held(MouseButton::Left)
    }

    /// Roll-decrease key held.
    pub fn is_roll_decrease_held(&self) -> bool {
        self.is_key_held(ROLL_DECREASE_KEY)
    }

    /// Roll-increase key held.
    pub fn is_roll_increase_held(&self) -> bool {
        self.is_key_held(ROLL_INCREASE_KEY)
    }

    /// Thrust key, screen tap or click started this frame.
    pub fn is_confirm_pressed(&self) -> bool {
        self.is_key_pressed(THRUST_KEY)
            || self.is_key_pressed(KeyCode::Enter)
            || self.is_mouse_pressed(MouseButton::Left)
            || self.touch_started
    }

    /// Pointer position while a pointer is held: the left mouse button, or
    /// failing that the lowest-id touch.
    pub fn held_pointer(&self) -> Option<Vec2> {
        if self.is_mouse_held(MouseButton::Left) {
            return Some(self.mouse_position);
        }
        self.touches.values().next().copied()
    }
}

// Re-export for convenience
pub use winit::event::{ElementState, MouseButton, TouchPhase};
pub use winit::keyboard::KeyCode;
