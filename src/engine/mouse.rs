//! Shared pointer state, in simulation-space pixels.

use glam::Vec2;

/// Pointer state written by the host surface and read by the frame tick.
///
/// `pressing` is a one-shot edge flag: set on mouse-down, cleared when
/// the button lifts and again unconditionally after every drawn frame.
/// It means "pressed during this frame", not "currently held".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Mouse {
    pub x: f32,
    pub y: f32,
    pub pressing: bool,
}

impl Mouse {
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}
