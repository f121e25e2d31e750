//! Browser host adapter.
//!
//! Owns everything the engine core must not know about: the canvas
//! element and its container, DOM event translation into simulation
//! coordinates, the animation-frame loop, and teardown. The math lives
//! in [`viewport`]; the wiring lives in the wasm-only mount below.

pub mod viewport;

pub use viewport::Viewport;

use thiserror::Error;

/// Environmental failures at mount time. All of these abort
/// initialization before the frame loop starts.
#[derive(Debug, Error)]
pub enum MountError {
    #[error("window or document unavailable")]
    MissingWindow,
    #[error("canvas element `{0}` not found")]
    MissingCanvas(String),
    #[error("canvas has no parent container")]
    MissingContainer,
    #[error("2d drawing context unavailable")]
    MissingContext,
}

#[cfg(target_arch = "wasm32")]
pub use mount::CanvasSurface;

#[cfg(target_arch = "wasm32")]
mod mount {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;
    use web_sys::{
        CanvasRenderingContext2d, Element, Event, EventTarget, HtmlCanvasElement, KeyboardEvent,
        MouseEvent, Window,
    };

    use super::MountError;
    use super::viewport::Viewport;
    use crate::audio::AudioManager;
    use crate::consts::{HEIGHT, WIDTH};
    use crate::engine::game::{Game, Key, run_frame};
    use crate::engine::mouse::Mouse;
    use crate::scene::dice::DiceScene;
    use crate::settings::Settings;

    /// A registered DOM listener; unregisters itself when dropped.
    struct Listener {
        target: EventTarget,
        event: &'static str,
        closure: Closure<dyn FnMut(Event)>,
    }

    impl Listener {
        fn new(
            target: &EventTarget,
            event: &'static str,
            handler: impl FnMut(Event) + 'static,
        ) -> Self {
            let closure = Closure::<dyn FnMut(Event)>::new(handler);
            let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            Self {
                target: target.clone(),
                event,
                closure,
            }
        }
    }

    impl Drop for Listener {
        fn drop(&mut self) {
            let _ = self
                .target
                .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
        }
    }

    /// Refit the viewport to the container and mirror it onto the
    /// canvas element's CSS transform.
    fn apply_fit(canvas: &HtmlCanvasElement, container: &Element, viewport: &Cell<Viewport>) {
        let mut vp = viewport.get();
        vp.refit(
            f64::from(container.client_width()),
            f64::from(container.client_height()),
        );
        viewport.set(vp);

        let style = canvas.style();
        let _ = style.set_property("transform-origin", "top left");
        let _ = style.set_property("transform", &vp.css_transform());
        if vp.ratio <= 0.0 {
            log::warn!("container has zero area; pointer input suspended");
        }
    }

    /// A mounted play session. Everything acquired at mount - frame
    /// loop, DOM listeners, the game itself - is released together when
    /// this is dropped.
    pub struct CanvasSurface {
        window: Window,
        alive: Rc<Cell<bool>>,
        raf_id: Rc<Cell<i32>>,
        frame: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
        _listeners: Vec<Listener>,
        game: Rc<RefCell<Game>>,
    }

    impl CanvasSurface {
        /// Mount onto the canvas with the given element id and start the
        /// frame loop. Fails fast on any missing piece of environment.
        pub fn mount(canvas_id: &str) -> Result<Self, MountError> {
            let window = web_sys::window().ok_or(MountError::MissingWindow)?;
            let document = window.document().ok_or(MountError::MissingWindow)?;
            let canvas: HtmlCanvasElement = document
                .get_element_by_id(canvas_id)
                .ok_or_else(|| MountError::MissingCanvas(canvas_id.to_string()))?
                .dyn_into()
                .map_err(|_| MountError::MissingCanvas(canvas_id.to_string()))?;
            let container = canvas.parent_element().ok_or(MountError::MissingContainer)?;
            let ctx: CanvasRenderingContext2d = canvas
                .get_context("2d")
                .ok()
                .flatten()
                .and_then(|obj| obj.dyn_into().ok())
                .ok_or(MountError::MissingContext)?;

            // Backing store stays at logical resolution; the CSS
            // transform does the scaling.
            canvas.set_width(WIDTH as u32);
            canvas.set_height(HEIGHT as u32);

            let settings = Settings::load(&canvas);
            let audio = Rc::new(AudioManager::new(settings.muted));
            audio.prepare();
            audio.play();

            let seed = js_sys::Date::now() as u64;
            let game = Rc::new(RefCell::new(Game::new(
                Rc::clone(&audio),
                Box::new(DiceScene::new(settings, seed)),
                seed,
            )));
            let mouse = Rc::new(RefCell::new(Mouse::default()));
            let viewport = Rc::new(Cell::new(Viewport::default()));

            apply_fit(&canvas, &container, &viewport);

            let mut listeners = Vec::new();

            {
                let canvas = canvas.clone();
                let container = container.clone();
                let viewport = Rc::clone(&viewport);
                listeners.push(Listener::new(&window, "resize", move |_| {
                    apply_fit(&canvas, &container, &viewport);
                }));
            }

            {
                let viewport = Rc::clone(&viewport);
                listeners.push(Listener::new(&document, "fullscreenchange", move |_| {
                    let mut vp = viewport.get();
                    vp.fullscreen = !vp.fullscreen;
                    viewport.set(vp);
                }));
            }

            {
                let canvas_for_rect = canvas.clone();
                let viewport = Rc::clone(&viewport);
                let mouse = Rc::clone(&mouse);
                listeners.push(Listener::new(&canvas, "mousemove", move |event| {
                    let event: MouseEvent = event.unchecked_into();
                    let rect = canvas_for_rect.get_bounding_client_rect();
                    if let Some((x, y)) = viewport.get().pointer_to_simulation(
                        f64::from(event.client_x()),
                        f64::from(event.client_y()),
                        rect.left(),
                        rect.top(),
                    ) {
                        let mut m = mouse.borrow_mut();
                        m.x = x;
                        m.y = y;
                    }
                }));
            }

            {
                let audio = Rc::clone(&audio);
                let game = Rc::clone(&game);
                let mouse = Rc::clone(&mouse);
                listeners.push(Listener::new(&canvas, "mousedown", move |_| {
                    // Any gesture doubles as the autoplay unlock
                    audio.play();
                    let snapshot = {
                        let mut m = mouse.borrow_mut();
                        m.pressing = true;
                        *m
                    };
                    game.borrow_mut().click(&snapshot);
                }));
            }

            {
                let mouse = Rc::clone(&mouse);
                listeners.push(Listener::new(&document, "mouseup", move |_| {
                    mouse.borrow_mut().pressing = false;
                }));
            }

            {
                let audio = Rc::clone(&audio);
                let game = Rc::clone(&game);
                listeners.push(Listener::new(&document, "keydown", move |event| {
                    let event: KeyboardEvent = event.unchecked_into();
                    audio.play();
                    game.borrow_mut().pressed(&Key(event.key()));
                }));
            }

            let alive = Rc::new(Cell::new(true));
            let raf_id = Rc::new(Cell::new(0));
            let frame: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> =
                Rc::new(RefCell::new(None));

            {
                let alive = Rc::clone(&alive);
                let raf_id = Rc::clone(&raf_id);
                let frame = Rc::clone(&frame);
                let window = window.clone();
                let game = Rc::clone(&game);
                let mouse = Rc::clone(&mouse);
                let closure = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
                    if !alive.get() {
                        return;
                    }
                    // Chain the next frame before doing any work: a slow
                    // frame skips the next tick instead of queueing it.
                    if let Some(cb) = frame.borrow().as_ref() {
                        if let Ok(id) =
                            window.request_animation_frame(cb.as_ref().unchecked_ref())
                        {
                            raf_id.set(id);
                        }
                    }
                    run_frame(
                        &mut game.borrow_mut(),
                        time,
                        &mut mouse.borrow_mut(),
                        &ctx,
                    );
                });
                *frame.borrow_mut() = Some(closure);
            }

            if let Some(cb) = frame.borrow().as_ref() {
                if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    raf_id.set(id);
                }
            }

            log::info!("mounted at {}x{} logical pixels", WIDTH, HEIGHT);

            Ok(Self {
                window,
                alive,
                raf_id,
                frame,
                _listeners: listeners,
                game,
            })
        }

        /// The running game, for page-level glue (e.g. swapping the
        /// scene slot).
        pub fn game(&self) -> Rc<RefCell<Game>> {
            Rc::clone(&self.game)
        }
    }

    impl Drop for CanvasSurface {
        fn drop(&mut self) {
            // All-or-nothing teardown: silence any already-queued frame,
            // cancel the pending request, break the frame closure's
            // self-reference, and let the listener guards unregister.
            // Dropping the game drops the camera, which cancels a
            // pending shake reset.
            self.alive.set(false);
            let _ = self.window.cancel_animation_frame(self.raf_id.get());
            if let Ok(mut frame) = self.frame.try_borrow_mut() {
                frame.take();
            }
            log::info!("unmounted");
        }
    }
}
