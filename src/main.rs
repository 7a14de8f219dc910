//! Lucky Reels entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use lucky_reels::config::MachineConfig;
    use lucky_reels::platform::{assets, overlay, overlay_texts};
    use lucky_reels::renderer::{RenderState, TextureAtlas};
    use lucky_reels::settings::Settings;
    use lucky_reels::sim::{GameEvent, GameState, TickInput, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        last_time: f64,
        input: TickInput,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, viewport: Vec2, config: MachineConfig) -> Self {
            Self {
                state: GameState::new(seed, viewport, config, Settings::load()),
                render_state: None,
                last_time: 0.0,
                input: TickInput::default(),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        fn update(&mut self, dt: f32, time: f64) {
            let input = std::mem::take(&mut self.input);
            // Hover persists between pointer events
            self.input.pointer = input.pointer;
            tick(&mut self.state, &input, dt);

            for event in self.state.drain_events() {
                match event {
                    GameEvent::SpinFinished(outcome) if outcome.win => {
                        log::info!("Jackpot! {:?}", outcome.visible)
                    }
                    event => log::debug!("{:?}", event),
                }
            }

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

        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.state) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let (w, h) = render_state.size;
                        let logical = render_state.logical_size;
                        render_state.resize(w, h, logical);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update text overlay elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            overlay::apply(&document, &overlay_texts(&self.state, Some(self.fps)));
        }
    }

    fn canvas_size(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (Vec2, u32, u32) {
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        (Vec2::new(client_w as f32, client_h as f32), width, height)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Lucky Reels starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let (viewport, width, height) = canvas_size(&window, &canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        let config_json = assets::fetch_config_json(assets::CONFIG_PATH).await;
        let config = MachineConfig::from_optional_json(config_json.as_deref());

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(
            seed,
            viewport,
            config.as_ref().cloned().unwrap_or_default(),
        )));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
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

        let symbol_count = game.borrow().state.config.symbols.len() as u32;
        match RenderState::new(
            surface,
            &adapter,
            width,
            height,
            (viewport.x, viewport.y),
            TextureAtlas::new(assets::ATLAS_CELL_SIZE, symbol_count),
        )
        .await
        {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => {
                log::error!("{}", e);
                return;
            }
        }

        setup_input_handlers(&canvas, game.clone());
        setup_resize_handler(canvas.clone(), game.clone());

        // The loader animates while images download
        request_animation_frame(game.clone());
        match config {
            Ok(_) => wasm_bindgen_futures::spawn_local(load_assets(game)),
            Err(e) => game.borrow_mut().state.fail_loading(&e),
        }

        log::info!("Lucky Reels running!");
    }

    async fn load_assets(game: Rc<RefCell<Game>>) {
        let config = game.borrow().state.config.clone();
        let progress_game = game.clone();
        let result = assets::load_symbol_textures(&config, move |progress| {
            progress_game.borrow_mut().state.set_load_progress(progress);
        })
        .await;

        let mut g = game.borrow_mut();
        match result {
            Ok((atlas, textures)) => {
                if let Some(ref mut render_state) = g.render_state {
                    render_state.set_atlas(atlas);
                }
                if g.state.finish_loading(&textures).is_ok() {
                    log::info!("Loaded {} symbols", textures.len());
                }
            }
            Err(e) => g.state.fail_loading(&e),
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Pointer move drives hover
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let p = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                game.borrow_mut().input.pointer = Some(p);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer down activates the spin button
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let p = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                let mut g = game.borrow_mut();
                g.input.pointer = Some(p);
                g.input.pointer_down = true;
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard: Space/Enter spin, F toggles the fps counter
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "Space" | "Enter" => {
                        event.prevent_default();
                        g.input.spin = true;
                    }
                    "KeyF" => {
                        let mut settings = g.state.settings.clone();
                        settings.show_fps = !settings.show_fps;
                        settings.save();
                        g.state.apply_settings(settings);
                    }
                    _ => {}
                }
            });
            if let Some(window) = web_sys::window() {
                let _ = window
                    .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }
    }

    fn setup_resize_handler(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (viewport, width, height) = canvas_size(&window, &canvas);
            canvas.set_width(width);
            canvas.set_height(height);
            let mut g = game.borrow_mut();
            g.input.resize = Some(viewport);
            if let Some(ref mut render_state) = g.render_state {
                render_state.resize(width, height, (viewport.x, viewport.y));
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
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
                0.0
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
    log::info!("Lucky Reels (native) starting...");
    log::info!("Native mode runs headless - run with `trunk serve` for the web version");

    if let Err(e) = headless_spin() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Load with placeholder textures, spin once and print the result
#[cfg(not(target_arch = "wasm32"))]
fn headless_spin() -> Result<(), lucky_reels::error::GameError> {
    use glam::Vec2;
    use lucky_reels::config::MachineConfig;
    use lucky_reels::settings::Settings;
    use lucky_reels::sim::{GameEvent, GameState, SymbolCatalog, TickInput, tick};

    const DT: f32 = 1.0 / 60.0;

    let config = MachineConfig::default();
    let textures = SymbolCatalog::sequential(&config)?
        .entries()
        .iter()
        .map(|e| (e.name.clone(), e.texture))
        .collect();

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut state = GameState::new(seed, Vec2::new(800.0, 600.0), config, Settings::default());
    state.finish_loading(&textures)?;

    let idle = TickInput::default();
    let spin = TickInput {
        spin: true,
        ..Default::default()
    };
    // Loader minimum display time plus fade, then the full spin
    for frame in 0..(20.0 / DT) as usize {
        let input = if frame == 120 { &spin } else { &idle };
        tick(&mut state, input, DT);
        for event in state.drain_events() {
            match event {
                GameEvent::SpinFinished(outcome) => {
                    for (i, column) in outcome.visible.iter().enumerate() {
                        println!("reel {}: {}", i, column.join(" | "));
                    }
                    println!("{}", if outcome.win { "YOU WIN!" } else { "no win" });
                    return Ok(());
                }
                event => log::info!("{:?}", event),
            }
        }
    }
    log::warn!("Spin did not finish");
    Ok(())
}
