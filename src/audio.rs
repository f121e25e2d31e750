//! Audio enablement lifecycle.
//!
//! Browsers gate audio behind a user gesture, so the context is created
//! by `prepare` and resumed by `play` - both idempotent, both safe to
//! call from any input handler. Mixing and playback live outside this
//! crate; the engine only carries the lifecycle.

use std::cell::Cell;

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, AudioContextState};

pub struct AudioManager {
    #[cfg(target_arch = "wasm32")]
    ctx: RefCell<Option<AudioContext>>,
    muted: Cell<bool>,
}

impl AudioManager {
    pub fn new(muted: bool) -> Self {
        Self {
            #[cfg(target_arch = "wasm32")]
            ctx: RefCell::new(None),
            muted: Cell::new(muted),
        }
    }

    /// Create the audio context if it does not exist yet. Idempotent.
    #[cfg(target_arch = "wasm32")]
    pub fn prepare(&self) {
        let mut ctx = self.ctx.borrow_mut();
        if ctx.is_none() {
            *ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("failed to create AudioContext - audio disabled");
            }
        }
    }

    /// Resume-or-start: browsers suspend the context until a user
    /// gesture, so the host calls this from every key-down and
    /// mouse-down. Idempotent.
    #[cfg(target_arch = "wasm32")]
    pub fn play(&self) {
        self.prepare();
        if let Some(ctx) = self.ctx.borrow().as_ref() {
            if ctx.state() == AudioContextState::Suspended {
                let _ = ctx.resume();
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn prepare(&self) {}

    #[cfg(not(target_arch = "wasm32"))]
    pub fn play(&self) {}

    pub fn muted(&self) -> bool {
        self.muted.get()
    }

    pub fn set_muted(&self, muted: bool) {
        self.muted.set(muted);
    }
}
