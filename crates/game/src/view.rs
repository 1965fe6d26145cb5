//! Side-on view used to place the vehicle on screen for pointer steering.

use glam::{Vec2, Vec3};

use crate::vehicle::{MAX_HEIGHT, MIN_HEIGHT};

/// Orthographic side view: screen x follows world z, screen y follows world y.
/// The view tracks the vehicle horizontally and frames the full flight band vertically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideView {
    /// World height shown at the vertical centre of the screen.
    pub center_height: f32,
    /// World units visible from the top to the bottom of the screen.
    pub vertical_span: f32,
}

impl Default for SideView {
    fn default() -> Self {
        let margin = 5.0;
        Self {
            center_height: (MIN_HEIGHT + MAX_HEIGHT) / 2.0,
            vertical_span: MAX_HEIGHT - MIN_HEIGHT + 2.0 * margin,
        }
    }
}

impl SideView {
    /// Window coordinates (origin top-left, y down) of `position`,
    /// with the view centred horizontally on `focus_z`.
    pub fn project(&self, position: Vec3, focus_z: f32, screen: Vec2) -> Vec2 {
        let scale = screen.y / self.vertical_span;
        Vec2::new(
            screen.x / 2.0 + (position.z - focus_z) * scale,
            screen.y / 2.0 - (position.y - self.center_height) * scale,
        )
    }
}
