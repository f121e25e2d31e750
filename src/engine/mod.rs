//! Engine core
//!
//! Everything here is platform-free: the camera, the mouse record, the
//! scene contract and the orchestrator talk to the browser only through
//! the [`draw::DrawSurface`] capability, so the whole module tree tests
//! natively.

pub mod camera;
pub mod draw;
pub mod game;
pub mod mouse;
pub mod random;

pub use camera::Camera;
pub use draw::DrawSurface;
pub use game::{Game, Key, Scene, SceneContext, run_frame};
pub use mouse::Mouse;
pub use random::random;
