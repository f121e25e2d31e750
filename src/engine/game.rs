//! Game orchestrator and the scene contract.

use std::rc::Rc;

use crate::audio::AudioManager;
use crate::consts::{HEIGHT, WIDTH};

use super::camera::Camera;
use super::draw::DrawSurface;
use super::mouse::Mouse;

/// A keyboard key as reported by the browser (e.g. `" "`, `"Enter"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Engine capabilities handed to a scene on every call that may mutate
/// engine state: the camera for impact feedback, the shared audio
/// lifecycle for mute toggles and gesture unlocks.
pub struct SceneContext<'a> {
    pub camera: &'a mut Camera,
    pub audio: &'a AudioManager,
}

/// One game screen. The orchestrator treats scenes as opaque: it drives
/// these four entry points and nothing else. Scenes own their entities
/// and derive their own delta time from the frame timestamp.
pub trait Scene {
    fn update(&mut self, time: f64, mouse: &Mouse, ctx: &mut SceneContext<'_>);
    fn draw(&self, surface: &dyn DrawSurface);
    fn pressed(&mut self, key: &Key, ctx: &mut SceneContext<'_>);
    fn click(&mut self, mouse: &Mouse, ctx: &mut SceneContext<'_>);
}

/// The orchestrator: owns the camera and the active scene, holds the
/// shared audio handle, and is driven once per animation frame by the
/// host surface.
pub struct Game {
    /// Active scene. Replaceable at any time; the swap takes effect on
    /// the next update/draw pair.
    pub scene: Box<dyn Scene>,
    pub camera: Camera,
    audio: Rc<AudioManager>,
}

impl Game {
    pub fn new(audio: Rc<AudioManager>, scene: Box<dyn Scene>, seed: u64) -> Self {
        Self {
            scene,
            camera: Camera::new(seed),
            audio,
        }
    }

    /// Advance one tick: camera first, then the scene with the same
    /// monotonic timestamp (milliseconds, from the frame scheduler).
    pub fn update(&mut self, time: f64, mouse: &Mouse) {
        self.camera.update();
        self.scene.update(
            time,
            mouse,
            &mut SceneContext {
                camera: &mut self.camera,
                audio: &self.audio,
            },
        );
    }

    /// Draw the current frame. The caller hands the surface over with an
    /// identity transform; the camera transform (jitter offset, pan,
    /// shift, roll and zoom about the logical center) is applied here.
    pub fn draw(&self, surface: &dyn DrawSurface) {
        let cam = &self.camera;
        let cx = f64::from(WIDTH) / 2.0;
        let cy = f64::from(HEIGHT) / 2.0;

        surface.save();
        surface.translate(
            cx + f64::from(cam.offset.x + cam.pan.x + cam.shift),
            cy + f64::from(cam.offset.y + cam.pan.y),
        );
        surface.rotate(f64::from(cam.rotation));
        surface.scale(f64::from(cam.zoom), f64::from(cam.zoom));
        surface.translate(-cx, -cy);
        self.scene.draw(surface);
        surface.restore();
    }

    /// Keyboard input, forwarded to the scene. The autoplay unlock on
    /// key-down is the host surface's job, not this method's.
    pub fn pressed(&mut self, key: &Key) {
        self.scene.pressed(
            key,
            &mut SceneContext {
                camera: &mut self.camera,
                audio: &self.audio,
            },
        );
    }

    /// Pointer click in simulation coordinates, forwarded to the scene.
    pub fn click(&mut self, mouse: &Mouse) {
        self.scene.click(
            mouse,
            &mut SceneContext {
                camera: &mut self.camera,
                audio: &self.audio,
            },
        );
    }
}

/// One animation frame, in the order the host loop must run it:
/// transform reset, update, draw, then clear the one-shot press flag -
/// so a press is visible to exactly one update/draw pair.
pub fn run_frame(game: &mut Game, time: f64, mouse: &mut Mouse, surface: &dyn DrawSurface) {
    surface.reset_transform();
    game.update(time, mouse);
    game.draw(surface);
    mouse.pressing = false;
}
