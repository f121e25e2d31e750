//! View transform and procedural camera shake.

use std::cell::Cell;
use std::f32::consts::PI;
use std::rc::Rc;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

#[cfg(target_arch = "wasm32")]
use gloo_timers::callback::Timeout;

use super::random::random;

/// Shake amplitudes, shared with the pending reset callback so the
/// callback never has to reach back into a camera that may be gone.
#[derive(Default)]
struct ShakeAmplitude {
    strength: Cell<f32>,
    rotation: Cell<f32>,
}

impl ShakeAmplitude {
    // Invoked by the deferred timer on wasm; tests drive it directly.
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    fn reset(&self) {
        self.strength.set(0.0);
        self.rotation.set(0.0);
    }
}

/// Camera owned by the game orchestrator.
///
/// `pan`, `zoom` and `shift` are caller-controlled view parameters.
/// `offset` and `rotation` are outputs: recomputed from the current
/// shake amplitudes on every [`Camera::update`], never accumulated, so
/// the shake reads as jitter rather than drift.
pub struct Camera {
    pub offset: Vec2,
    pub rotation: f32,
    pub zoom: f32,
    pub pan: Vec2,
    pub shift: f32,
    shake: Rc<ShakeAmplitude>,
    #[cfg(target_arch = "wasm32")]
    pending_reset: Option<Timeout>,
    rng: Pcg32,
}

impl Camera {
    pub fn new(seed: u64) -> Self {
        Self {
            offset: Vec2::ZERO,
            rotation: 0.0,
            zoom: 1.0,
            pan: Vec2::ZERO,
            shift: 0.0,
            shake: Rc::new(ShakeAmplitude::default()),
            #[cfg(target_arch = "wasm32")]
            pending_reset: None,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Start a shake: jitter up to `amount` pixels and `rotation_deg`
    /// of roll for `duration` seconds of wall-clock time.
    ///
    /// Re-arming before the previous shake expires replaces it; the
    /// amplitudes and the reset deadline both come from the latest call.
    pub fn shake(&mut self, amount: f32, duration: f32, rotation_deg: f32) {
        self.shake.strength.set(amount);
        self.shake.rotation.set(rotation_deg / 360.0 * PI);
        self.schedule_reset(duration);
    }

    /// Redraw the jitter for this tick. Called once per update, before
    /// the frame is drawn. With both amplitudes at zero this yields an
    /// exact identity: `offset == (0, 0)`, `rotation == 0`.
    pub fn update(&mut self) {
        let strength = self.shake.strength.get();
        let rotation = self.shake.rotation.get();
        self.offset = Vec2::new(
            random(&mut self.rng, -strength, strength),
            random(&mut self.rng, -strength, strength),
        );
        self.rotation = random(&mut self.rng, -rotation, rotation);
    }

    #[cfg(target_arch = "wasm32")]
    fn schedule_reset(&mut self, duration: f32) {
        // Replacing the option drops the previous Timeout, which cancels
        // its callback; dropping the camera cancels the outstanding one.
        let shake = Rc::clone(&self.shake);
        let ms = (f64::from(duration.max(0.0)) * 1000.0).round() as u32;
        self.pending_reset = Some(Timeout::new(ms, move || shake.reset()));
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn schedule_reset(&mut self, _duration: f32) {}
}
