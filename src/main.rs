//! Spud Survivors entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use spud_survivors::consts::*;
    use spud_survivors::renderer::{RenderState, build_scene};
    use spud_survivors::sim::{
        GameState, Phase, TickInput, close_shop, purchase, reroll, tick,
    };
    use spud_survivors::tuning::{SHOP_OFFERS, Tuning};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            Self {
                state: GameState::new(seed, Tuning::default())
                    .expect("default tuning must validate"),
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.state, &input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.dash = false;
                self.input.pause = false;
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let scene = build_scene(&self.state);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&scene) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();
            let snap = self.state.snapshot();

            if let Some(el) = document.query_selector("#hud-wave .hud-value").ok().flatten() {
                el.set_text_content(Some(&snap.wave.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-hp .hud-value").ok().flatten() {
                el.set_text_content(Some(&format!("{:.0}/{:.0}", snap.hp, snap.max_hp)));
            }
            if let Some(el) = document.query_selector("#hud-gold .hud-value").ok().flatten() {
                el.set_text_content(Some(&snap.gold.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-xp .hud-value").ok().flatten() {
                el.set_text_content(Some(&snap.xp.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-enemies .hud-value").ok().flatten() {
                el.set_text_content(Some(&snap.enemy_count.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-timer .hud-value").ok().flatten() {
                let left = self.state.tuning.wave_ticks.saturating_sub(self.state.wave_ticks);
                let seconds = (left as f32 / TICKS_PER_SECOND).ceil() as u32;
                el.set_text_content(Some(&seconds.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.fps.to_string()));
            }

            // Phase overlays
            set_visible(&document, "start-menu", snap.phase == Phase::NotStarted);
            set_visible(&document, "shop-menu", snap.phase == Phase::Shop);
            set_visible(&document, "pause-menu", snap.phase == Phase::Paused);
            set_visible(&document, "game-over", snap.phase == Phase::GameOver);

            if snap.phase == Phase::Shop {
                if let Some(el) = document.get_element_by_id("shop-gold") {
                    el.set_text_content(Some(&snap.gold.to_string()));
                }
                for slot in 0..SHOP_OFFERS {
                    if let Some(btn) = document.get_element_by_id(&format!("shop-offer-{slot}")) {
                        let label = self
                            .state
                            .shop
                            .offers
                            .get(slot)
                            .and_then(|&item| self.state.tuning.upgrades.get(item))
                            .map(|u| format!("{}: {} ({}g)", u.name, u.desc, u.cost));
                        btn.set_text_content(label.as_deref());
                    }
                }
                if let Some(btn) = document.get_element_by_id("reroll-btn") {
                    btn.set_text_content(Some(&format!(
                        "Reroll ({}g)",
                        self.state.shop.reroll_price
                    )));
                }
            }

            if snap.phase == Phase::GameOver {
                if let Some(el) = document.get_element_by_id("final-wave") {
                    el.set_text_content(Some(&snap.wave.to_string()));
                }
                if let Some(el) = document.get_element_by_id("final-gold") {
                    el.set_text_content(Some(&snap.gold.to_string()));
                }
                if let Some(el) = document.get_element_by_id("final-xp") {
                    el.set_text_content(Some(&snap.xp.to_string()));
                }
            }
        }

        /// Reset game state for restart
        fn restart(&mut self, seed: u64) {
            self.state.restart(seed);
            self.accumulator = 0.0;
            self.input = TickInput::default();
        }
    }

    fn set_visible(document: &web_sys::Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Spud Survivors starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let arena = game.borrow().state.tuning.arena;
        let render_state = RenderState::new(surface, &adapter, width, height, arena).await;
        game.borrow_mut().render_state = Some(render_state);

        // Set up input handlers and menu buttons
        setup_keyboard(game.clone());
        setup_start_menu(&document, game.clone());
        setup_shop_menu(&document, game.clone());
        setup_pause_menu(&document, game.clone());
        setup_restart_button(&document, game.clone());
        setup_auto_pause(game.clone());

        // Show HUD
        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        // Start game loop
        request_animation_frame(game);

        log::info!("Spud Survivors running!");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                let handled = match event.key().as_str() {
                    "w" | "W" | "ArrowUp" => {
                        g.input.up = true;
                        true
                    }
                    "s" | "S" | "ArrowDown" => {
                        g.input.down = true;
                        true
                    }
                    "a" | "A" | "ArrowLeft" => {
                        g.input.left = true;
                        true
                    }
                    "d" | "D" | "ArrowRight" => {
                        g.input.right = true;
                        true
                    }
                    " " | "Shift" => {
                        g.input.dash = true;
                        true
                    }
                    "Escape" | "p" | "P" => {
                        g.input.pause = true;
                        true
                    }
                    _ => false,
                };
                if handled {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "w" | "W" | "ArrowUp" => g.input.up = false,
                    "s" | "S" | "ArrowDown" => g.input.down = false,
                    "a" | "A" | "ArrowLeft" => g.input.left = false,
                    "d" | "D" | "ArrowRight" => g.input.right = false,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// One button per weapon in the catalog; picking one starts the run.
    fn setup_start_menu(document: &web_sys::Document, game: Rc<RefCell<Game>>) {
        let names: Vec<String> = game
            .borrow()
            .state
            .tuning
            .weapons
            .iter()
            .map(|w| w.name.clone())
            .collect();

        for (i, name) in names.into_iter().enumerate() {
            let Some(btn) = document.get_element_by_id(&format!("weapon-{i}")) else {
                continue;
            };
            btn.set_text_content(Some(&name));
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                if let Err(e) = g.state.select_starting_weapon(&name) {
                    log::error!("weapon select failed: {e}");
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_shop_menu(document: &web_sys::Document, game: Rc<RefCell<Game>>) {
        for slot in 0..SHOP_OFFERS {
            let Some(btn) = document.get_element_by_id(&format!("shop-offer-{slot}")) else {
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                if let Some(&item) = g.state.shop.offers.get(slot) {
                    let _ = purchase(&mut g.state, item);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("reroll-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let _ = reroll(&mut game.borrow_mut().state);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("close-shop-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                close_shop(&mut game.borrow_mut().state);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_pause_menu(document: &web_sys::Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("resume-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().input.pause = true; // Toggle back to combat
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(document: &web_sys::Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                game.borrow_mut().restart(seed);
                log::info!("Game restarted with seed: {}", seed);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.state.phase == Phase::Combat {
                        g.input.pause = true;
                        log::info!("Auto-paused (tab hidden)");
                    }
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
                if g.state.phase == Phase::Combat {
                    g.input.pause = true;
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Spud Survivors (native) starting...");
    log::info!("Native mode is a headless demo - run with `trunk serve` for the web version");

    demo_run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted headless run: pick a weapon, survive a few waves, spend gold
/// in the shop, report the result.
#[cfg(not(target_arch = "wasm32"))]
fn demo_run() {
    use spud_survivors::Tuning;
    use spud_survivors::sim::{GameState, Phase, TickInput, close_shop, purchase, tick};

    let mut state = GameState::new(42, Tuning::default()).expect("default tuning is valid");
    state
        .select_starting_weapon("Pistol")
        .expect("catalog has a Pistol");

    let mut input = TickInput {
        right: true,
        ..Default::default()
    };
    while state.phase != Phase::GameOver && state.wave <= 5 {
        tick(&mut state, &input);
        if state.time_ticks % 120 == 0 {
            input.right = !input.right;
            input.left = !input.right;
        }
        if state.phase == Phase::Shop {
            let offers = state.shop.offers.clone();
            for item in offers {
                let _ = purchase(&mut state, item);
            }
            let snap = state.snapshot();
            log::info!(
                "wave {} cleared: hp {:.0}/{:.0}, gold {}, xp {}",
                snap.wave - 1,
                snap.hp,
                snap.max_hp,
                snap.gold,
                snap.xp
            );
            close_shop(&mut state);
        }
    }

    let snap = state.snapshot();
    println!(
        "demo over: reached wave {} with {} gold and {} xp",
        snap.wave, snap.gold, snap.xp
    );
}
