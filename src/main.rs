//! Endless Racer entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::closure::WasmClosure;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        DeviceOrientationEvent, Document, EventTarget, HtmlCanvasElement, HtmlElement,
        KeyboardEvent, TouchEvent,
    };

    use endless_racer::audio::{AudioManager, cue_for_event, engine_tone};
    use endless_racer::persistence::LocalStorageStore;
    use endless_racer::platform::Capabilities;
    use endless_racer::renderer::{CanvasRenderer, fuel_color};
    use endless_racer::sim::{GameEvent, GamePhase, RawInput, TiltReading, Viewport};
    use endless_racer::{ControlMode, Game, Settings, Tuning};

    /// Everything the browser callbacks share
    struct App {
        game: Game<LocalStorageStore>,
        renderer: CanvasRenderer,
        audio: AudioManager,
        settings: Settings,
        raw: RawInput,
        /// Touch x where the virtual wheel was grabbed
        wheel_origin: Option<f32>,
        last_phase: GamePhase,
    }

    impl App {
        fn start(&mut self) {
            let seed = js_sys::Date::now() as u64;
            self.audio.resume();
            self.game.start(seed);
            self.raw = RawInput {
                tilt: self.raw.tilt,
                ..Default::default()
            };
            log::info!("Run started with seed: {}", seed);
        }

        fn frame(&mut self, time: f64) {
            self.game.frame(time, &self.raw);

            for event in self.game.drain_events() {
                if let Some(cue) = cue_for_event(&event) {
                    self.audio.play(cue);
                }
                if let GameEvent::GameOver { reason, distance } = event {
                    log::info!("Game over ({:?}) at {:.2} km", reason, distance);
                }
            }

            let hud = self.game.hud();
            if hud.phase == GamePhase::Playing {
                self.audio
                    .update_engine(engine_tone(hud.speed as f32, hud.speed_ratio));
            } else if self.last_phase == GamePhase::Playing {
                self.audio.stop_engine();
            }

            self.renderer.render(&self.game.render_view(), time);
            self.update_hud();
            self.last_phase = hud.phase;
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = document() else { return };
            let hud = self.game.hud();

            set_text(&document, "hud-distance", &format!("{:.2} km", hud.distance));
            set_text(&document, "hud-speed", &format!("{} km/h", hud.speed));
            set_text(&document, "hud-best", &format!("{:.2} km", hud.best_distance));
            match hud.lives {
                Some(lives) => set_text(&document, "hud-lives", &"❤".repeat(lives as usize)),
                None => set_text(&document, "hud-lives", ""),
            }

            if let Some(bar) = element::<HtmlElement>(&document, "hud-fuel-bar") {
                let style = bar.style();
                let _ = style.set_property("width", &format!("{:.0}%", hud.fuel_percent));
                let _ = style.set_property("background", &fuel_color(hud.fuel_percent));
            }
            set_visible(&document, "fuel-warning", hud.fuel_low && hud.phase == GamePhase::Playing);

            let effects: Vec<String> = hud
                .effects
                .iter()
                .map(|e| format!("{} {}s", e.kind.as_str(), e.seconds_left))
                .collect();
            set_text(&document, "hud-effects", &effects.join("  "));

            set_visible(&document, "menu", hud.phase == GamePhase::Menu);
            set_visible(&document, "pause-menu", hud.phase == GamePhase::Paused);
            set_visible(&document, "game-over", hud.phase == GamePhase::GameOver);

            if let Some(summary) = self.game.summary() {
                set_text(&document, "final-distance", &format!("{:.2} km", summary.distance));
                set_text(&document, "final-speed", &format!("{} km/h", summary.max_speed));
                set_text(&document, "final-fuel", &summary.fuel_collected.to_string());
                set_visible(&document, "final-record", summary.new_record);
            }
        }

        fn apply_settings(&mut self) {
            self.audio.set_enabled(self.settings.sound_enabled);
            self.audio.set_volume(self.settings.master_volume);
            self.renderer
                .set_camera_shake(self.settings.effective_camera_shake());
            self.game.set_control_mode(self.settings.control_mode);
            self.settings.save();
        }

        fn resize(&mut self) {
            let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
            let (w, h) = self.renderer.resize(dpr);
            self.game.resize(Viewport::new(w, h));
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn element<T: JsCast>(document: &Document, id: &str) -> Option<T> {
        document.get_element_by_id(id)?.dyn_into::<T>().ok()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    fn listen<T: ?Sized + WasmClosure>(target: &EventTarget, name: &str, closure: Closure<T>) {
        let _ = target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn on_click(document: &Document, id: &str, app: &Rc<RefCell<App>>, f: fn(&mut App)) {
        if let Some(btn) = document.get_element_by_id(id) {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                f(&mut app.borrow_mut());
            });
            listen(&btn, "click", closure);
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Endless Racer starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = element(&document, "canvas").ok_or("no canvas")?;
        let dpr = window.device_pixel_ratio();
        let mut renderer = CanvasRenderer::new(canvas.clone(), dpr).ok_or("no 2d context")?;
        let (width, height) = renderer.resize(dpr);

        let settings = Settings::load();
        let capabilities = Capabilities::detect();
        let audio = AudioManager::new(
            capabilities.audio,
            settings.master_volume,
            settings.sound_enabled,
        );

        let game = Game::new(
            Tuning::classic(),
            Viewport::new(width, height),
            capabilities,
            settings.control_mode,
            LocalStorageStore,
        );

        let app = Rc::new(RefCell::new(App {
            game,
            renderer,
            audio,
            settings,
            raw: RawInput::default(),
            wheel_origin: None,
            last_phase: GamePhase::Menu,
        }));
        app.borrow_mut().apply_settings();

        setup_keyboard(&window, app.clone());
        setup_touch(&canvas, app.clone());
        if capabilities.tilt {
            setup_tilt(&window, app.clone());
        }
        setup_buttons(&document, &app);
        setup_auto_pause(&window, &document, app.clone());

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().resize();
            });
            listen(&window, "resize", closure);
        }

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(app);

        log::info!("Endless Racer running!");
        Ok(())
    }

    fn setup_keyboard(window: &web_sys::Window, app: Rc<RefCell<App>>) {
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                let keys = &mut a.raw.keys;
                match event.key().as_str() {
                    "ArrowUp" | "w" | "W" => keys.up = true,
                    "ArrowDown" | "s" | "S" => keys.down = true,
                    "ArrowLeft" | "a" | "A" => keys.left = true,
                    "ArrowRight" | "d" | "D" => keys.right = true,
                    " " => keys.brake = true,
                    "p" | "P" | "Escape" => {
                        a.game.toggle_pause();
                    }
                    "Enter" => {
                        if matches!(a.game.phase(), GamePhase::Menu | GamePhase::GameOver) {
                            a.start();
                        }
                    }
                    _ => return,
                }
                event.prevent_default();
            });
            listen(window, "keydown", closure);
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut a = app.borrow_mut();
            let keys = &mut a.raw.keys;
            match event.key().as_str() {
                "ArrowUp" | "w" | "W" => keys.up = false,
                "ArrowDown" | "s" | "S" => keys.down = false,
                "ArrowLeft" | "a" | "A" => keys.left = false,
                "ArrowRight" | "d" | "D" => keys.right = false,
                " " => keys.brake = false,
                _ => {}
            }
        });
        listen(window, "keyup", closure);
    }

    /// Touch zones: left third steers left, right third steers right, the
    /// middle brakes. In wheel mode the whole canvas is the wheel.
    fn apply_touches(app: &mut App, event: &TouchEvent, canvas: &HtmlCanvasElement) {
        let rect = canvas.get_bounding_client_rect();
        let width = rect.width() as f32;
        let touches = event.touches();

        app.raw.touch = Default::default();
        if touches.length() == 0 {
            app.raw.wheel.active = false;
            app.wheel_origin = None;
            return;
        }

        match app.game.control_mode() {
            ControlMode::Touch => {
                for i in 0..touches.length() {
                    let Some(touch) = touches.get(i) else { continue };
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    if x < width / 3.0 {
                        app.raw.touch.left = true;
                    } else if x > width * 2.0 / 3.0 {
                        app.raw.touch.right = true;
                    } else {
                        app.raw.touch.brake = true;
                    }
                }
            }
            ControlMode::Wheel => {
                if let Some(touch) = touches.get(0) {
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let origin = *app.wheel_origin.get_or_insert(x);
                    app.raw.wheel.active = true;
                    app.raw.wheel.offset = x - origin;
                }
            }
        }
    }

    fn setup_touch(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        for name in ["touchstart", "touchmove", "touchend", "touchcancel"] {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut a = app.borrow_mut();
                a.audio.resume();
                apply_touches(&mut a, &event, &canvas_clone);
            });
            listen(canvas, name, closure);
        }
    }

    fn setup_tilt(window: &web_sys::Window, app: Rc<RefCell<App>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: DeviceOrientationEvent| {
            if let (Some(beta), Some(gamma)) = (event.beta(), event.gamma()) {
                app.borrow_mut().raw.tilt = Some(TiltReading {
                    beta: beta as f32,
                    gamma: gamma as f32,
                });
            }
        });
        listen(window, "deviceorientation", closure);
    }

    fn setup_buttons(document: &Document, app: &Rc<RefCell<App>>) {
        on_click(document, "start-btn", app, App::start);
        on_click(document, "restart-btn", app, App::start);
        on_click(document, "resume-btn", app, |a| {
            a.game.resume();
        });
        on_click(document, "pause-btn", app, |a| {
            a.game.pause();
        });
        on_click(document, "menu-btn", app, |a| {
            a.game.exit_to_menu();
        });
        on_click(document, "sound-btn", app, |a| {
            let on = a.settings.toggle_sound();
            a.apply_settings();
            log::info!("Sound {}", if on { "on" } else { "off" });
        });
        on_click(document, "controls-btn", app, |a| {
            let mode = a.settings.toggle_control_mode();
            a.raw.wheel = Default::default();
            a.wheel_origin = None;
            a.apply_settings();
            log::info!("Control mode: {}", mode.as_str());
        });
    }

    fn setup_auto_pause(window: &web_sys::Window, document: &Document, app: Rc<RefCell<App>>) {
        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden
                    && app.borrow_mut().game.pause()
                {
                    log::info!("Auto-paused (tab hidden)");
                }
            });
            listen(document, "visibilitychange", closure);
        }

        // Window blur (click outside)
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            let mut a = app.borrow_mut();
            a.raw.keys = Default::default();
            if a.game.pause() {
                log::info!("Auto-paused (window blur)");
            }
        });
        listen(window, "blur", closure);
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Endless Racer (native) starting...");
    log::info!("Native mode runs a headless autopilot - build for wasm32 to play");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(7);
    autopilot::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo: a simple driver that dodges solid obstacles
#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use endless_racer::consts::NOMINAL_FRAME_MS;
    use endless_racer::persistence::MemoryStore;
    use endless_racer::platform::Capabilities;
    use endless_racer::sim::{EntityKind, GameEvent, Intent, SimulationState, Viewport};
    use endless_racer::{ControlMode, Game, Tuning};

    /// Ten simulated minutes
    const MAX_TICKS: u32 = 36_000;
    const LOOKAHEAD: f32 = 350.0;

    fn choose(state: &SimulationState) -> Intent {
        let car = &state.vehicle;
        let bounds = state.road_bounds();

        let threat = state
            .entities
            .iter()
            .filter(|e| match e.kind {
                EntityKind::Obstacle(kind) => kind.traits().fatal,
                EntityKind::Bonus(_) => false,
            })
            .filter(|e| e.pos.y < car.pos.y && e.pos.y > car.pos.y - LOOKAHEAD)
            .filter(|e| (e.pos.x - car.pos.x).abs() < (e.size.x + car.size.x) / 2.0 + 10.0)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

        let mut intent = Intent::accelerate();
        if let Some(threat) = threat {
            let room_left = car.pos.x - bounds.min_x;
            let room_right = bounds.max_x - car.pos.x;
            if (threat.pos.x >= car.pos.x && room_left > car.size.x) || room_right < car.size.x {
                intent.steer_left = true;
            } else {
                intent.steer_right = true;
            }
        } else if let Some(bonus) = state
            .entities
            .iter()
            .filter(|e| e.is_bonus() && e.pos.y < car.pos.y)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        {
            let dx = bonus.pos.x - car.pos.x;
            intent.steer_left = dx < -10.0;
            intent.steer_right = dx > 10.0;
        }
        intent
    }

    pub fn run(seed: u64) {
        let mut game = Game::new(
            Tuning::classic(),
            Viewport::default(),
            Capabilities::none(),
            ControlMode::Touch,
            MemoryStore::new(),
        );
        game.start(seed);

        let mut hits = 0;
        let mut pickups = 0;
        for _ in 0..MAX_TICKS {
            let intent = choose(game.state());
            game.step(&intent, NOMINAL_FRAME_MS);
            for event in game.drain_events() {
                match event {
                    GameEvent::ObstacleHit { .. } | GameEvent::ShieldBlocked { .. } => hits += 1,
                    GameEvent::BonusCollected { kind } => {
                        pickups += 1;
                        log::debug!("Picked up {}", kind.as_str());
                    }
                    _ => {}
                }
            }
            if !game.state().is_playing() {
                break;
            }
        }

        let hud = game.hud();
        match game.summary() {
            Some(summary) => println!(
                "Run over ({:?}): {:.2} km, top speed {} km/h, {} fuel pickups, {} bonuses, {} soft hits",
                summary.reason,
                summary.distance,
                summary.max_speed,
                summary.fuel_collected,
                pickups,
                hits
            ),
            None => println!(
                "Still driving after {} ticks: {:.2} km, fuel {:.0}%",
                MAX_TICKS, hud.distance, hud.fuel_percent
            ),
        }
    }
}
