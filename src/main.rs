//! Gradle Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, EventTarget, HtmlCanvasElement, KeyboardEvent, TouchEvent, VisibilityState,
        Window,
    };

    use gradle_runner::platform::{DeviceEvent, Key, LocalStore};
    use gradle_runner::renderer::CanvasSurface;
    use gradle_runner::sim::{Arena, GameEvent};
    use gradle_runner::{FrameOutcome, Session};

    type Frame = Closure<dyn FnMut(f64)>;

    /// An event listener that removes itself when dropped
    struct Listener {
        target: EventTarget,
        kind: &'static str,
        closure: Closure<dyn FnMut(web_sys::Event)>,
    }

    impl Listener {
        fn attach(
            target: &EventTarget,
            kind: &'static str,
            handler: impl FnMut(web_sys::Event) + 'static,
        ) -> Option<Self> {
            let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
            match target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref()) {
                Ok(()) => Some(Self {
                    target: target.clone(),
                    kind,
                    closure,
                }),
                Err(e) => {
                    log::warn!("Could not listen for {}: {:?}", kind, e);
                    None
                }
            }
        }
    }

    impl Drop for Listener {
        fn drop(&mut self) {
            let _ = self.target.remove_event_listener_with_callback(
                self.kind,
                self.closure.as_ref().unchecked_ref(),
            );
        }
    }

    /// Everything the drive loop and listeners share
    struct Shared {
        window: Window,
        document: Document,
        session: RefCell<Session<LocalStore>>,
        surface: RefCell<CanvasSurface>,
        /// Pending requestAnimationFrame id
        frame_id: Cell<Option<i32>>,
        frame_cb: RefCell<Option<Frame>>,
    }

    impl Shared {
        fn schedule(self: &Rc<Self>) {
            if self.frame_id.get().is_some() {
                return;
            }
            let cb = self.frame_cb.borrow();
            let Some(cb) = cb.as_ref() else { return };
            match self.window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                Ok(id) => self.frame_id.set(Some(id)),
                Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
            }
        }

        fn cancel(&self) {
            if let Some(id) = self.frame_id.take() {
                let _ = self.window.cancel_animation_frame(id);
            }
        }

        fn on_frame(self: &Rc<Self>) {
            self.frame_id.set(None);
            let outcome = {
                let mut surface = self.surface.borrow_mut();
                self.session.borrow_mut().frame(&mut *surface)
            };
            self.update_hud();
            if outcome == FrameOutcome::Continue {
                self.schedule();
            }
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let session = self.session.borrow();
            self.set_text("gameScore", &session.state().score.to_string());
            self.set_text("highScore", &session.best_score().to_string());
        }

        fn show_game_over(&self, score: u64) {
            self.set_text("finalScore", &score.to_string());
            if let Some(el) = self.document.get_element_by_id("gameOver") {
                let _ = el.class_list().add_1("active");
            }
        }

        fn hide_game_over(&self) {
            if let Some(el) = self.document.get_element_by_id("gameOver") {
                let _ = el.class_list().remove_1("active");
            }
        }

        fn handle(&self, event: DeviceEvent) {
            self.session.borrow_mut().handle(event);
        }

        fn touch_y(&self, event: &TouchEvent) -> Option<f32> {
            let touch = event.touches().get(0)?;
            let surface = self.surface.borrow();
            let rect = surface.canvas().get_bounding_client_rect();
            Some(touch.client_y() as f32 - rect.top() as f32)
        }
    }

    /// Browser handle for one runner instance
    #[wasm_bindgen]
    pub struct RunnerGame {
        shared: Rc<Shared>,
        listeners: Vec<Listener>,
    }

    #[wasm_bindgen]
    impl RunnerGame {
        /// Attach to the canvas with id `canvas_id`
        #[wasm_bindgen(constructor)]
        pub fn new(canvas_id: &str) -> Result<RunnerGame, JsValue> {
            let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
            let document = window
                .document()
                .ok_or_else(|| JsValue::from_str("no document"))?;
            let canvas: HtmlCanvasElement = document
                .get_element_by_id(canvas_id)
                .ok_or_else(|| JsValue::from_str("canvas not found"))?
                .dyn_into()?;

            let viewport = window
                .inner_width()
                .ok()
                .and_then(|w| w.as_f64())
                .unwrap_or(860.0) as f32;
            let arena = Arena::fit(viewport);
            let surface = CanvasSurface::new(canvas, arena.width as u32, arena.height as u32)?;

            let seed = js_sys::Date::now() as u64;
            log::info!(
                "Runner ready: {}x{} arena, seed {}",
                arena.width,
                arena.height,
                seed
            );

            let shared = Rc::new(Shared {
                window,
                document,
                session: RefCell::new(Session::new(LocalStore::new(), arena, seed)),
                surface: RefCell::new(surface),
                frame_id: Cell::new(None),
                frame_cb: RefCell::new(None),
            });

            // Game over screen follows the round-over event
            {
                let weak = Rc::downgrade(&shared);
                shared.session.borrow_mut().subscribe(move |event| {
                    let GameEvent::RoundOver { score, .. } = event else {
                        return;
                    };
                    if let Some(shared) = weak.upgrade() {
                        shared.show_game_over(*score);
                    }
                });
            }

            {
                let weak = Rc::downgrade(&shared);
                let cb = Closure::<dyn FnMut(f64)>::new(move |_time: f64| {
                    if let Some(shared) = weak.upgrade() {
                        shared.on_frame();
                    }
                });
                shared.frame_cb.replace(Some(cb));
            }

            shared.update_hud();
            Ok(RunnerGame {
                shared,
                listeners: Vec::new(),
            })
        }

        /// Start (or restart) a round
        pub fn start(&mut self) {
            self.shared.cancel();
            self.shared.hide_game_over();
            if self.listeners.is_empty() {
                self.listeners = setup_input_handlers(&self.shared);
            }
            self.shared.session.borrow_mut().start();
            self.shared.schedule();
        }

        /// Stop the round and release every listener
        pub fn stop(&mut self) {
            self.shared.cancel();
            self.listeners.clear();
            self.shared.session.borrow_mut().stop();
        }

        pub fn pause(&mut self) {
            if self.shared.session.borrow_mut().pause() {
                self.shared.cancel();
            }
        }

        pub fn resume(&mut self) {
            if self.shared.session.borrow_mut().resume() {
                self.shared.schedule();
            }
        }

        pub fn score(&self) -> f64 {
            self.shared.session.borrow().state().score as f64
        }

        #[wasm_bindgen(js_name = bestScore)]
        pub fn best_score(&self) -> f64 {
            self.shared.session.borrow().best_score() as f64
        }
    }

    impl Drop for RunnerGame {
        fn drop(&mut self) {
            self.stop();
        }
    }

    fn setup_input_handlers(shared: &Rc<Shared>) -> Vec<Listener> {
        let mut listeners = Vec::new();
        let document: &EventTarget = shared.document.as_ref();

        // Keyboard
        {
            let weak = Rc::downgrade(shared);
            listeners.extend(Listener::attach(document, "keydown", move |event| {
                let Some(shared) = weak.upgrade() else { return };
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                match event.key().as_str() {
                    "i" | "I" => {
                        shared.session.borrow_mut().toggle_autopilot();
                    }
                    key => {
                        let key = Key::from_dom(key);
                        if key != Key::Other {
                            event.prevent_default();
                            shared.handle(DeviceEvent::KeyDown(key));
                        }
                    }
                }
            }));
        }
        {
            let weak = Rc::downgrade(shared);
            listeners.extend(Listener::attach(document, "keyup", move |event| {
                let Some(shared) = weak.upgrade() else { return };
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                shared.handle(DeviceEvent::KeyUp(Key::from_dom(&event.key())));
            }));
        }

        // Touch
        let canvas: EventTarget = shared.surface.borrow().canvas().clone().into();
        {
            let weak = Rc::downgrade(shared);
            listeners.extend(Listener::attach(&canvas, "touchstart", move |event| {
                event.prevent_default();
                let Some(shared) = weak.upgrade() else { return };
                if let Some(y) = event.dyn_ref::<TouchEvent>().and_then(|t| shared.touch_y(t)) {
                    shared.handle(DeviceEvent::TouchStart { y });
                }
            }));
        }
        {
            let weak = Rc::downgrade(shared);
            listeners.extend(Listener::attach(&canvas, "touchend", move |event| {
                event.prevent_default();
                if let Some(shared) = weak.upgrade() {
                    shared.handle(DeviceEvent::TouchEnd);
                }
            }));
        }

        // Auto-pause while the tab is hidden
        {
            let weak = Rc::downgrade(shared);
            listeners.extend(Listener::attach(document, "visibilitychange", move |_event| {
                let Some(shared) = weak.upgrade() else { return };
                let hidden = shared.document.visibility_state() == VisibilityState::Hidden;
                if hidden {
                    if shared.session.borrow_mut().auto_pause() {
                        shared.cancel();
                        log::info!("Auto-paused (tab hidden)");
                    }
                } else if shared.session.borrow_mut().auto_resume() {
                    shared.schedule();
                }
            }));
        }

        listeners
    }

    pub fn init() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }
        log::info!("Gradle Runner loaded");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::init();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Gradle Runner (native) starting...");
    log::info!("Native mode plays one headless autopilot round");
    log::info!("Run with `trunk serve` for the web version");

    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::time::{SystemTime, UNIX_EPOCH};

    use serde::Serialize;

    use gradle_runner::platform::MemoryStore;
    use gradle_runner::renderer::RecordingSurface;
    use gradle_runner::sim::{Arena, GameEvent};
    use gradle_runner::{FrameOutcome, Session};

    /// Safety cap so a perfect autopilot run still ends
    const MAX_FRAMES: u64 = 60 * 60 * 10;

    #[derive(Debug, Default, Serialize)]
    struct RoundSummary {
        seed: u64,
        frames: u64,
        score: u64,
        best: u64,
        speed_level: u32,
        obstacles_cleared: u32,
        jumps: u32,
        crashed: bool,
    }

    pub fn run() {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let arena = Arena::default();
        let mut session = Session::new(MemoryStore::new(), arena, seed);
        let mut surface = RecordingSurface::new(arena.width, arena.height);

        let tally = std::rc::Rc::new(std::cell::RefCell::new(RoundSummary {
            seed,
            ..Default::default()
        }));
        {
            let tally = tally.clone();
            session.subscribe(move |event| {
                let mut t = tally.borrow_mut();
                match event {
                    GameEvent::Jumped => t.jumps += 1,
                    GameEvent::ObstacleCleared { .. } => t.obstacles_cleared += 1,
                    GameEvent::Collided(_) => t.crashed = true,
                    _ => {}
                }
            });
        }

        session.toggle_autopilot();
        session.start();
        while session.frame(&mut surface) == FrameOutcome::Continue {
            if session.state().frame >= MAX_FRAMES {
                session.stop();
            }
        }

        let mut summary = tally.borrow_mut();
        summary.frames = session.state().frame;
        summary.score = session.state().score;
        summary.best = session.best_score();
        summary.speed_level = session.state().speed_level();

        match serde_json::to_string_pretty(&*summary) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Could not serialize summary: {}", e),
        }
    }
}
