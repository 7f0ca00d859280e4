//! Hex Fit entry point
//!
//! The browser build wires the engine to a canvas: pointer events drive the
//! drag, a one-second interval drives the level clock and an animation frame
//! loop repaints. The native build runs a short scripted session.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, PointerEvent};

    use hex_fit::EngineConfig;
    use hex_fit::consts::TIMER_TICK_SECS;
    use hex_fit::renderer::{Frame, build_frame, css_rgba};
    use hex_fit::sim::{GameState, HostCallbacks, PointerTracker, ReleaseOutcome, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        config: EngineConfig,
        ctx: CanvasRenderingContext2d,
        canvas: HtmlCanvasElement,
        dpr: f64,
        hud: DomHud,
        /// Pointer that owns the current drag
        pointers: PointerTracker,
    }

    /// Reacts to engine events by updating the DOM
    struct DomHud {
        document: Document,
    }

    impl DomHud {
        fn set_text(&self, selector: &str, text: &str) {
            if let Some(el) = self.document.query_selector(selector).ok().flatten() {
                el.set_text_content(Some(text));
            }
        }

        fn set_class(&self, id: &str, class: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.set_attribute("class", class);
            }
        }
    }

    impl HostCallbacks for DomHud {
        fn on_score(&mut self, points: u32) {
            self.set_text("#hud-gain", &format!("+{points}"));
            self.set_class("hud-gain", "pop");
        }

        fn on_game_over(&mut self) {
            self.set_class("game-over", "");
        }

        fn on_rejected(&mut self) {
            self.set_class("hud-board", "shake");
        }

        fn on_level_up(&mut self, level: u32) {
            self.set_text("#level-banner .hud-value", &level.to_string());
            self.set_class("level-banner", "pop");
        }
    }

    impl Game {
        /// Match the backing store to the CSS size and relayout the engine
        fn fit_canvas(&mut self) {
            let window = web_sys::window().expect("no window");
            self.dpr = window.device_pixel_ratio();
            let w = self.canvas.client_width().max(1);
            let h = self.canvas.client_height().max(1);
            self.canvas.set_width((w as f64 * self.dpr) as u32);
            self.canvas.set_height((h as f64 * self.dpr) as u32);
            self.state.resize(w as f32, h as f32);
        }

        fn restart(&mut self, seed: u64) {
            let (w, h) = (self.state.layout().width, self.state.layout().height);
            self.state = GameState::new(self.config.clone(), seed, w, h);
            self.pointers = PointerTracker::new();
            self.hud.set_class("game-over", "hidden");
            log::info!("Game restarted with seed: {}", seed);
        }

        /// Forward queued engine events and refresh the HUD text
        fn flush_events(&mut self) {
            self.state.dispatch_events(&mut self.hud);
            self.update_hud();
        }

        fn update_hud(&self) {
            let level = self.state.level();
            self.hud.set_text("#hud-level .hud-value", &level.level.to_string());
            self.hud.set_text(
                "#hud-score .hud-value",
                &format!("{} / {}", level.level_score, self.state.level_target()),
            );
            self.hud.set_text("#hud-total .hud-value", &self.state.total_score().to_string());
            if let Some(bar) = self.hud.document.get_element_by_id("hud-progress") {
                let progress = level.progress(self.state.rules());
                let _ = bar.set_attribute("style", &format!("width: {:.1}%", progress * 100.0));
            }
            self.hud.set_text(
                "#hud-time .hud-value",
                &format!("{}", level.time_remaining.ceil() as u32),
            );
            if let Some(el) = self.hud.document.get_element_by_id("hud") {
                match serde_json::to_string(&self.state.snapshot()) {
                    Ok(json) => {
                        let _ = el.set_attribute("data-snapshot", &json);
                    }
                    Err(e) => log::warn!("Snapshot failed: {}", e),
                }
            }
        }

        fn render(&self) {
            paint(&self.ctx, &build_frame(&self.state), self.dpr);
        }

        /// Pointer position in CSS pixels relative to the canvas
        fn pointer_pos(&self, event: &PointerEvent) -> Vec2 {
            let rect = self.canvas.get_bounding_client_rect();
            Vec2::new(
                event.client_x() as f32 - rect.left() as f32,
                event.client_y() as f32 - rect.top() as f32,
            )
        }
    }

    fn paint(ctx: &CanvasRenderingContext2d, frame: &Frame, dpr: f64) {
        let _ = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
        ctx.set_fill_style_str(&css_rgba(frame.background));
        ctx.fill_rect(0.0, 0.0, frame.width as f64, frame.height as f64);

        ctx.set_line_width(1.5);
        for hexagon in &frame.hexagons {
            ctx.begin_path();
            let [first, rest @ ..] = &hexagon.corners;
            ctx.move_to(first.x as f64, first.y as f64);
            for corner in rest {
                ctx.line_to(corner.x as f64, corner.y as f64);
            }
            ctx.close_path();
            ctx.set_fill_style_str(&css_rgba(hexagon.fill));
            ctx.fill();
            if let Some(stroke) = hexagon.stroke {
                ctx.set_stroke_style_str(&css_rgba(stroke));
                ctx.stroke();
            }
        }

        if let Some(overlay) = frame.overlay {
            ctx.set_fill_style_str(&css_rgba(overlay));
            ctx.fill_rect(0.0, 0.0, frame.width as f64, frame.height as f64);
        }
    }

    /// Optional `<script id="engine-config" type="application/json">` block
    fn load_config(document: &Document) -> EngineConfig {
        let Some(text) = document
            .get_element_by_id("engine-config")
            .and_then(|el| el.text_content())
        else {
            return EngineConfig::default();
        };
        match EngineConfig::from_json(&text) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Ignoring engine config: {}", e);
                EngineConfig::default()
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Hex Fit starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let config = load_config(&document);
        let seed = js_sys::Date::now() as u64;
        let state = GameState::new(
            config.clone(),
            seed,
            canvas.client_width().max(1) as f32,
            canvas.client_height().max(1) as f32,
        );
        let game = Rc::new(RefCell::new(Game {
            state,
            config,
            ctx,
            canvas: canvas.clone(),
            dpr: 1.0,
            hud: DomHud {
                document: document.clone(),
            },
            pointers: PointerTracker::new(),
        }));
        game.borrow_mut().fit_canvas();
        game.borrow().update_hud();

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_restart_button(game.clone());
        setup_auto_pause(game.clone());
        setup_resize(game.clone());
        start_clock(game.clone());

        request_animation_frame(game);

        log::info!("Hex Fit running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Pointer down - pick up a tray piece
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut g = game.borrow_mut();
                // Returning from a blur or hidden tab resumes the game
                if !g.state.is_active() {
                    g.state.set_active(true);
                }
                let pos = g.pointer_pos(&event);
                let Game { state, pointers, .. } = &mut *g;
                if pointers.pointer_down(state, event.pointer_id(), pos).is_some() {
                    event.prevent_default();
                    let _ = canvas_clone.set_pointer_capture(event.pointer_id());
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer move - follow the finger
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut g = game.borrow_mut();
                let pos = g.pointer_pos(&event);
                let Game { state, pointers, .. } = &mut *g;
                pointers.pointer_move(state, event.pointer_id(), pos);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer up - drop
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut g = game.borrow_mut();
                let pos = g.pointer_pos(&event);
                let Game { state, pointers, .. } = &mut *g;
                let outcome = pointers.pointer_up(state, event.pointer_id(), pos);
                if let ReleaseOutcome::Placed(report) = outcome {
                    log::debug!(
                        "Placed piece {} at ({}, {}) for {} pts",
                        report.piece_id,
                        report.anchor.q,
                        report.anchor.r,
                        report.total_points()
                    );
                }
                g.flush_events();
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer cancel - the browser took the gesture away
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut g = game.borrow_mut();
                let Game { state, pointers, .. } = &mut *g;
                pointers.pointer_cancel(state, event.pointer_id());
            });
            let _ = canvas
                .add_event_listener_with_callback("pointercancel", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// One-second level clock
    fn start_clock(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::<dyn FnMut()>::new(move || {
            let mut g = game.borrow_mut();
            tick(&mut g.state, TIMER_TICK_SECS);
            g.flush_events();
        });
        let _ = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            (TIMER_TICK_SECS * 1000.0) as i32,
        );
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |_time: f64| {
            game.borrow().render();
            request_animation_frame(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                let mut g = game.borrow_mut();
                g.restart(seed);
                g.flush_events();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().fit_canvas();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let visible = document_clone.visibility_state() == web_sys::VisibilityState::Visible;
                let mut g = game.borrow_mut();
                if visible != g.state.is_active() {
                    g.state.set_active(visible);
                    log::info!("{} (visibility)", if visible { "Resumed" } else { "Paused" });
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.state.is_active() {
                    g.state.set_active(false);
                    log::info!("Paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Hex Fit (native) starting...");
    log::info!("The playable build targets wasm32 - run with `trunk serve` for the web version");

    headless_session();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted session: each second, drop every tray piece on the first hex that
/// takes it. Runs until game over or `MAX_ROUNDS` seconds.
#[cfg(not(target_arch = "wasm32"))]
fn headless_session() {
    use hex_fit::EngineConfig;
    use hex_fit::consts::TIMER_TICK_SECS;
    use hex_fit::sim::{GameState, HostCallbacks, ReleaseOutcome, hex_to_pixel, tick};

    const MAX_ROUNDS: u32 = 600;

    struct LogHost {
        scored: u64,
    }

    impl HostCallbacks for LogHost {
        fn on_score(&mut self, points: u32) {
            self.scored += u64::from(points);
        }
        fn on_game_over(&mut self) {
            log::info!("Host saw game over after {} pts", self.scored);
        }
        fn on_level_up(&mut self, level: u32) {
            log::info!("Host saw level {}", level);
        }
    }

    let config = EngineConfig::default();
    let lift = glam::Vec2::new(0.0, config.drag_lift_cells);
    let mut state = GameState::new(config, 7, 480.0, 800.0);
    let mut host = LogHost { scored: 0 };

    let mut placed = 0;
    let mut rounds = 0;
    while !state.is_game_over() && rounds < MAX_ROUNDS {
        rounds += 1;
        let layout = *state.layout();

        for slot in 0..layout.tray_slot_anchors().len() {
            let hexes: Vec<_> = state.board().cells().map(|(hex, _)| hex).collect();
            for hex in hexes {
                let Some(home) = state.tray().slot(slot).map(|piece| piece.home) else {
                    break;
                };
                if state.pointer_down(home) != Some(slot) {
                    state.cancel_drag();
                    break;
                }
                let target = hex_to_pixel(hex, layout.origin, layout.cell_size) + lift * layout.cell_size;
                if let ReleaseOutcome::Placed(_) = state.pointer_up(target) {
                    placed += 1;
                    break;
                }
            }
        }

        tick(&mut state, TIMER_TICK_SECS);
        state.dispatch_events(&mut host);
    }

    match serde_json::to_string_pretty(&state.snapshot()) {
        Ok(json) => log::debug!("Final snapshot:\n{}", json),
        Err(e) => log::warn!("Snapshot failed: {}", e),
    }
    log::info!(
        "Session over: {} pieces placed, level {}, total {} pts",
        placed,
        state.level().level,
        state.total_score()
    );
}
