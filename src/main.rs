//! Goose Catch entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent};

    use goose_catch::audio::{AudioManager, SoundCue};
    use goose_catch::consts::NAME_PROMPT_DELAY_MS;
    use goose_catch::highscores::NamePrompt;
    use goose_catch::platform::{
        Direction, FrameClock, InputState, Key, LocalStorage, MemoryStorage, Storage,
    };
    use goose_catch::renderer::{FieldRenderer, RenderError, build_scene};
    use goose_catch::sim::{GameEvent, GamePhase, GameState, tick};
    use goose_catch::{Leaderboard, NameRequest, Settings, Tuning, now_ms};

    /// Asks through `window.prompt`
    struct BrowserPrompt;

    impl NamePrompt for BrowserPrompt {
        fn request_name(&mut self, default: &str) -> Option<String> {
            web_sys::window()?
                .prompt_with_message_and_default("Your name for the leaderboard?", default)
                .ok()
                .flatten()
        }
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        rng: Pcg32,
        input: InputState,
        clock: FrameClock,
        leaderboard: Leaderboard,
        settings: Settings,
        storage: Box<dyn Storage>,
        audio: AudioManager,
        renderer: FieldRenderer,
    }

    impl Game {
        /// Advance one animation frame and return what happened
        fn frame(&mut self, time: f64) -> Vec<GameEvent> {
            let dt = self.clock.advance(time);

            if self.input.take_mute() {
                let muted = self.settings.toggle_mute();
                self.audio.set_volume(self.settings.effective_volume());
                self.save_settings();
                log::info!("Sound {}", if muted { "muted" } else { "on" });
            }

            let input = self.input.frame_input();
            tick(&mut self.state, &input, dt, &mut self.rng);

            let events = self.state.drain_events();
            for event in &events {
                if let Some(cue) = SoundCue::from_event(event) {
                    self.audio.play(cue);
                }
            }
            events
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = build_scene(&self.state);
            match self.renderer.render(&vertices) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    self.renderer.reconfigure();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&self.state.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("lives") {
                el.set_text_content(Some(&self.state.lives.to_string()));
            }
            if let Some(el) = document.get_element_by_id("level") {
                el.set_text_content(Some(&self.state.level.to_string()));
            }
            if let Some(el) = document.get_element_by_id("best") {
                let best = self.leaderboard.top_score().unwrap_or(0);
                el.set_text_content(Some(&best.to_string()));
            }
            if let Some(el) = document.get_element_by_id("btnStart") {
                let label = match self.state.phase {
                    GamePhase::Idle => "Start",
                    GamePhase::Running => "Pause",
                    GamePhase::Paused => "Resume",
                    GamePhase::Ended => "Game over",
                };
                el.set_text_content(Some(label));
            }

            // Game-over text over the scrim
            if let Some(el) = document.get_element_by_id("game-over") {
                let _ = el
                    .class_list()
                    .toggle_with_force("hidden", !self.state.is_over());
            }
            if self.state.is_over()
                && let Some(el) = document.get_element_by_id("final-score")
            {
                el.set_text_content(Some(&self.state.score.to_string()));
            }
        }

        fn save_settings(&mut self) {
            if let Err(e) = self.settings.save(self.storage.as_mut()) {
                log::warn!("Failed to save settings: {e}");
            }
        }

        fn save_leaderboard(&mut self) {
            if let Err(e) = self.leaderboard.save(self.storage.as_mut()) {
                log::warn!("Failed to save high scores: {e}");
            }
        }
    }

    /// Balance overrides from `<script id="tuning" type="application/json">`
    fn load_tuning(document: &Document) -> Tuning {
        let json = document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content())
            .unwrap_or_default();
        if json.trim().is_empty() {
            return Tuning::default();
        }
        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Applied tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning overrides: {e}");
                Tuning::default()
            }
        }
    }

    fn open_storage() -> Box<dyn Storage> {
        match LocalStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!("LocalStorage unavailable, scores will not persist: {e}");
                Box::new(MemoryStorage::new())
            }
        }
    }

    /// Fill `#leaderboard` with one `<li>` per entry (text only, never markup)
    fn render_leaderboard(document: &Document, board: &Leaderboard) {
        let Some(list) = document.get_element_by_id("leaderboard") else {
            return;
        };
        list.set_text_content(None);

        let lines = if board.is_empty() {
            vec!["No scores yet. Play your first round!".to_string()]
        } else {
            board.lines()
        };
        for line in lines {
            if let Ok(li) = document.create_element("li") {
                li.set_text_content(Some(&line));
                let _ = list.append_child(&li);
            }
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Goose Catch starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game")
            .ok_or("no canvas")?
            .dyn_into()?;

        // Stage follows the field shape before the canvas is measured
        let tuning = load_tuning(&document);

        if let Some(stage) = document
            .get_element_by_id("stage")
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            stage
                .style()
                .set_property("aspect-ratio", &tuning.aspect_ratio_css())?;
        }

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let renderer = init_renderer(&canvas, width, height, &tuning)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        // Initialize game
        let storage = open_storage();
        let settings = Settings::load(storage.as_ref());
        let leaderboard = Leaderboard::load(storage.as_ref());
        let mut audio = AudioManager::new();
        audio.set_volume(settings.effective_volume());

        let seed = js_sys::Date::now() as u64;
        let input = InputState::for_launch(settings.auto_start);

        render_leaderboard(&document, &leaderboard);
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.class_list().add_1("hidden");
        }

        let game = Rc::new(RefCell::new(Game {
            state: GameState::new(tuning),
            rng: Pcg32::seed_from_u64(seed),
            input,
            clock: FrameClock::new(tuning.max_frame_dt),
            leaderboard,
            settings,
            storage,
            audio,
            renderer,
        }));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone())?;
        setup_buttons(&document, game.clone());
        setup_auto_pause(game.clone())?;
        setup_resize(&canvas, game.clone())?;

        // Start game loop
        request_animation_frame(game);

        log::info!("Goose Catch running!");
        Ok(())
    }

    /// Acquire surface, adapter and device for the canvas
    async fn init_renderer(
        canvas: &HtmlCanvasElement,
        width: u32,
        height: u32,
        tuning: &Tuning,
    ) -> Result<FieldRenderer, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        FieldRenderer::new(
            surface,
            &adapter,
            width,
            height,
            (tuning.field_width, tuning.field_height),
        )
        .await
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Mouse move - absolute position mapped to field x
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = canvas_clone.get_bounding_client_rect();
                if rect.width() <= 0.0 {
                    return;
                }
                let mut g = game.borrow_mut();
                let field_w = g.state.tuning.field_width as f64;
                let x = (event.client_x() as f64 - rect.left()) / rect.width() * field_w;
                g.input.pointer_moved(x as f32);
            });
            canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(key) = Key::from_code(&event.code()) else {
                    return;
                };
                if key == Key::Toggle {
                    // Space would scroll the page
                    event.prevent_default();
                    if event.repeat() {
                        return;
                    }
                }
                let mut g = game.borrow_mut();
                g.audio.unlock();
                g.input.key_down(key);
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_code(&event.code()) {
                    game.borrow_mut().input.key_up(key);
                }
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    /// Hold-to-move on-screen button (touch and mouse)
    fn setup_hold_button(document: &Document, id: &str, dir: Direction, game: Rc<RefCell<Game>>) {
        let Some(btn) = document.get_element_by_id(id) else {
            return;
        };
        for (kind, held) in [
            ("touchstart", true),
            ("touchend", false),
            ("touchcancel", false),
            ("mousedown", true),
            ("mouseup", false),
            ("mouseleave", false),
        ] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                if kind.starts_with("touch") {
                    event.prevent_default();
                }
                game.borrow_mut().input.set_button(dir, held);
            });
            let _ = btn.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        setup_hold_button(document, "btnLeft", Direction::Left, game.clone());
        setup_hold_button(document, "btnRight", Direction::Right, game.clone());

        // Start and pause both toggle the session
        for id in ["btnStart", "btnPause"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    let mut g = game.borrow_mut();
                    g.audio.unlock();
                    g.input.request_toggle();
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("btnRestart") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.request_restart();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    g.input.release_all();
                    if g.settings.pause_on_blur && g.state.is_running() {
                        g.input.request_toggle();
                        log::info!("Auto-paused (tab hidden)");
                    }
                } else {
                    g.clock.reset();
                }
            });
            document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.input.release_all();
                if g.settings.pause_on_blur && g.state.is_running() {
                    g.input.request_toggle();
                    log::info!("Auto-paused (window blur)");
                }
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    /// Keep the backing store matched to the displayed size
    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let canvas_clone = canvas.clone();
        let window_clone = window.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let dpr = window_clone.device_pixel_ratio();
            let width = (canvas_clone.client_width() as f64 * dpr) as u32;
            let height = (canvas_clone.client_height() as f64 * dpr) as u32;
            if width == 0 || height == 0 {
                return;
            }
            canvas_clone.set_width(width);
            canvas_clone.set_height(height);
            game.borrow_mut().renderer.resize(width, height);
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    /// Resolve after `ms` milliseconds
    async fn sleep_ms(ms: i32) -> Result<(), JsValue> {
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            let scheduled = web_sys::window().map(|w| {
                w.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            });
            if !matches!(scheduled, Some(Ok(_))) {
                let _ = resolve.call0(&JsValue::NULL);
            }
        });
        JsFuture::from(promise).await.map(|_| ())
    }

    /// Ask for a name once the game-over overlay has painted
    fn spawn_name_request(game: Rc<RefCell<Game>>, request: NameRequest) {
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = sleep_ms(NAME_PROMPT_DELAY_MS).await {
                log::warn!("Name prompt delay failed: {e:?}");
            }
            // Blocks until answered; other handlers may fire meanwhile, so the
            // game is only borrowed once a name is in hand
            let name = request.ask(&mut BrowserPrompt);
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let mut g = game.borrow_mut();
            let level = request.level;
            let rank = request.submit(name.as_deref(), &mut g.leaderboard);
            log::info!(
                "Leaderboard updated (level {level}, rank {})",
                rank.map_or_else(|| "-".to_string(), |r| r.to_string())
            );
            g.save_leaderboard();
            render_leaderboard(&document, &g.leaderboard);
        });
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
        let events = {
            let mut g = game.borrow_mut();
            let events = g.frame(time);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
            events
        };

        for event in &events {
            if let Some(request) = NameRequest::from_event(event, now_ms()) {
                spawn_name_request(game.clone(), request);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Goose Catch failed to start: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Goose Catch (native) starting...");
    log::info!("Rendering requires the browser - run with `trunk serve` for the web version");

    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless session played by a simple bot
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use goose_catch::highscores::FixedName;
    use goose_catch::platform::{Direction, InputState, MemoryStorage};
    use goose_catch::sim::{GameEvent, GameState, ItemKind, tick};
    use goose_catch::{Leaderboard, NameRequest, now_ms};

    /// Three minutes at 60 fps
    const MAX_TICKS: u32 = 60 * 180;
    const DT: f32 = 1.0 / 60.0;
    /// Pixels of slack before the bot moves
    const DEADBAND: f32 = 6.0;

    /// Chase the lowest parcel still above the goose
    fn steer(state: &GameState, input: &mut InputState) {
        let player = &state.player.rect;
        let target = state
            .items
            .iter()
            .filter(|it| it.kind == ItemKind::GoodOrder && it.rect.bottom() <= player.bottom())
            .max_by(|a, b| a.rect.top().total_cmp(&b.rect.top()))
            .map(|it| it.rect.center().x);

        let offset = target.map_or(0.0, |x| x - player.center().x);
        input.set_button(Direction::Left, offset < -DEADBAND);
        input.set_button(Direction::Right, offset > DEADBAND);
    }

    pub fn run() {
        let seed = now_ms() as u64;
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut state = GameState::default();
        let mut storage = MemoryStorage::new();
        let mut board = Leaderboard::load(&storage);
        let mut input = InputState::for_launch(true);
        let (mut caught, mut hits) = (0u32, 0u32);

        log::info!("Demo seed: {seed}");

        for _ in 0..MAX_TICKS {
            steer(&state, &mut input);
            tick(&mut state, &input.frame_input(), DT, &mut rng);

            for event in state.drain_events() {
                match event {
                    GameEvent::Collected { .. } => caught += 1,
                    GameEvent::Hit { .. } => hits += 1,
                    GameEvent::LevelUp { level } => println!("Level {level}!"),
                    GameEvent::GameOver { .. } => {
                        if let Some(request) = NameRequest::from_event(&event, now_ms()) {
                            request.resolve(&mut FixedName(Some("Demo Bot".into())), &mut board);
                        }
                    }
                    _ => {}
                }
            }
            if state.is_over() {
                break;
            }
        }

        if let Err(e) = board.save(&mut storage) {
            log::warn!("Failed to save high scores: {e}");
        }

        println!("\n=== Demo summary ===");
        println!("Ticks:   {}", state.time_ticks);
        println!("Score:   {}", state.score);
        println!("Level:   {}", state.level);
        println!("Caught:  {caught}");
        println!("Hits:    {hits}");
        println!("Ended:   {}", state.is_over());
        for line in board.lines() {
            println!("  {line}");
        }
    }
}
