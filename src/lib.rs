//! Coup Ahoo - a pirate dice battle on a fixed-resolution 2D canvas
//!
//! Core modules:
//! - `engine`: camera, mouse, scene contract and the game orchestrator
//! - `scene`: concrete game scenes (the dice battle)
//! - `surface`: browser host adapter (letterbox fit, input remapping, frame loop)
//! - `audio`: audio enablement lifecycle
//! - `settings`: runtime preferences

pub mod audio;
pub mod engine;
pub mod scene;
pub mod settings;
pub mod surface;

pub use audio::AudioManager;
pub use engine::camera::Camera;
pub use engine::game::{Game, Key, Scene, SceneContext, run_frame};
pub use engine::mouse::Mouse;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Logical render resolution - the simulation always draws into a
    /// WIDTH x HEIGHT backing store; the host scales it to fit.
    pub const WIDTH: f32 = 800.0;
    pub const HEIGHT: f32 = 600.0;

    /// Clamp for per-frame delta time (tab switches, debugger pauses)
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}
