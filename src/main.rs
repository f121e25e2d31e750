//! Coup Ahoo entry point
//!
//! Handles platform-specific initialization and mounts the play session.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;

    use coup_ahoo::surface::CanvasSurface;
    use wasm_bindgen::prelude::*;

    // One play session per page. wasm-bindgen exports are free
    // functions, so the mounted surface lives in a thread-local slot.
    thread_local! {
        static SURFACE: RefCell<Option<CanvasSurface>> = const { RefCell::new(None) };
    }

    pub fn mount(canvas_id: &str) -> Result<(), JsValue> {
        let surface =
            CanvasSurface::mount(canvas_id).map_err(|e| JsValue::from_str(&e.to_string()))?;
        // Replacing an existing session tears the old one down first.
        SURFACE.with(|slot| *slot.borrow_mut() = Some(surface));
        log::info!("Coup Ahoo running");
        Ok(())
    }

    pub fn unmount() {
        if SURFACE.with(|slot| slot.borrow_mut().take()).is_some() {
            log::info!("Coup Ahoo stopped");
        }
    }
}

/// Browser entry: set up logging and mount onto `#canvas`.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
    wasm_app::mount("canvas")
}

/// Mount (or remount) onto the canvas with the given element id.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn mount(canvas_id: String) -> Result<(), JsValue> {
    wasm_app::mount(&canvas_id)
}

/// Tear down the running session: stops the frame loop and removes
/// every DOM listener the mount registered.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn unmount() {
    wasm_app::unmount();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Coup Ahoo (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    println!("\nRunning headless battle smoke test...");
    smoke_test_battle();
}

#[cfg(not(target_arch = "wasm32"))]
fn smoke_test_battle() {
    use coup_ahoo::scene::DiceScene;
    use coup_ahoo::{AudioManager, Game, Key, Mouse, Settings};
    use std::rc::Rc;

    let audio = Rc::new(AudioManager::new(true));
    let mut game = Game::new(audio, Box::new(DiceScene::new(Settings::default(), 7)), 7);
    let mouse = Mouse::default();

    game.pressed(&Key(" ".into()));
    for i in 0..600 {
        game.update(f64::from(i) * 16.0, &mouse);
    }
    println!("✓ Battle smoke test passed!");
}
