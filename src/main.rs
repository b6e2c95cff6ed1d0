//! Lane Crosser entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use lane_crosser::consts::*;
    use lane_crosser::platform::{FrameClock, direction_for_key, direction_for_key_code};
    use lane_crosser::renderer::{QuadBatch, RenderState, TextItem};
    use lane_crosser::scene;
    use lane_crosser::sim::{self, GameEvent, GameState, Sprite};
    use lane_crosser::ui::{CHARACTERS, ModalAction, ModalContent, ModalController};
    use lane_crosser::{AssetError, Resources, Tuning};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        resources: Resources,
        render_state: Option<RenderState>,
        clock: FrameClock,
        modal: ModalController,
    }

    impl Game {
        fn new(seed: u64, tuning: Tuning, resources: Resources) -> Self {
            Self {
                modal: ModalController::new(tuning.modal_delay),
                state: GameState::new(seed, tuning),
                resources,
                render_state: None,
                clock: FrameClock::new(),
            }
        }

        /// Scheduled tasks, then the Update phase, then events
        fn update(&mut self, dt: f64) -> Option<ModalContent> {
            sim::run_schedule(&mut self.state, dt);
            sim::update(&mut self.state, dt as f32);

            for event in self.state.drain_events() {
                match event {
                    GameEvent::Outcome(outcome) => self.modal.notify(outcome),
                    other => log::debug!("{:?}", other),
                }
            }

            self.modal.advance(dt as f32).cloned()
        }

        /// Render the current frame, returning the text the scene asked for
        fn render(&mut self) -> Vec<TextItem> {
            let mut batch = QuadBatch::new(&self.resources);
            scene::draw(&self.state, &mut batch);

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(batch.vertices()) {
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

            batch.texts().to_vec()
        }
    }

    fn current_document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let classes = el.class_list();
            let _ = if hidden {
                classes.add_1("hidden")
            } else {
                classes.remove_1("hidden")
            };
        }
    }

    /// Mirror scene text into the HUD overlay
    fn update_hud(document: &Document, texts: &[TextItem]) {
        if let (Some(el), Some(score)) = (document.get_element_by_id("hud-score"), texts.first())
        {
            if el.text_content().as_deref() != Some(score.text.as_str()) {
                el.set_text_content(Some(&score.text));
            }
        }
    }

    fn show_modal(document: &Document, content: &ModalContent) {
        let fields = [
            (".messageTitle", content.title.to_string()),
            (".gameStatus", content.status.to_string()),
            (".rating-score", content.score.to_string()),
        ];
        for (selector, text) in fields {
            if let Some(el) = document.query_selector(selector).ok().flatten() {
                el.set_text_content(Some(&text));
            }
        }
        set_hidden(document, "modal", false);
    }

    fn show_load_error(document: &Document, err: &AssetError) {
        if let Some(el) = document.get_element_by_id("loading") {
            el.set_text_content(Some(&format!("Failed to load sprites: {}", err)));
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Lane Crosser starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        // Nothing runs until every sprite resolved
        let mut resources = Resources::new();
        {
            let document = document.clone();
            resources.on_ready(move || set_hidden(&document, "loading", true));
        }
        if let Err(e) = resources.load(&Sprite::ALL) {
            log::error!("{}", e);
            show_load_error(&document, &e);
            return;
        }

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No canvas element");
            return;
        };

        // Fixed logical size; CSS scales the canvas
        let width = CANVAS_WIDTH as u32;
        let height = CANVAS_HEIGHT as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let tuning = Tuning::load();
        let game = Rc::new(RefCell::new(Game::new(seed, tuning, resources)));

        log::info!("Game initialized with seed: {}", seed);

        match init_renderer(canvas, width, height).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("WebGPU unavailable, rendering disabled: {}", e),
        }

        setup_character_selection(&document, game.clone());
        setup_input_handlers(game.clone());
        setup_modal(&document, game.clone());

        set_hidden(&document, "hud", false);

        // Start game loop
        request_animation_frame(game);

        log::info!("Lane Crosser running!");
    }

    async fn init_renderer(
        canvas: HtmlCanvasElement,
        width: u32,
        height: u32,
    ) -> Result<RenderState, lane_crosser::renderer::RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        RenderState::new(surface, &adapter, width, height).await
    }

    /// Fill the selection list with the roster; a click picks the character
    /// and hides the list
    fn setup_character_selection(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(list) = document
            .query_selector("#player-selection ul")
            .ok()
            .flatten()
        else {
            log::warn!("No character selection list, defaulting to {:?}", Sprite::CharBoy);
            sim::select_character(&mut game.borrow_mut().state, Sprite::CharBoy);
            return;
        };

        for sprite in CHARACTERS {
            let Ok(item) = document.create_element("li") else {
                continue;
            };
            let _ = item.set_attribute("data-image", sprite.asset_name());
            let _ = item.set_attribute("class", "character");
            item.set_text_content(Some(sprite.asset_name()));

            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let picked = event
                    .current_target()
                    .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
                    .and_then(|el| el.get_attribute("data-image"))
                    .and_then(|name| Sprite::from_asset_name(&name));
                let Some(sprite) = picked else {
                    return;
                };
                if sim::select_character(&mut game.borrow_mut().state, sprite) {
                    if let Some(document) = current_document() {
                        set_hidden(&document, "player-selection", true);
                    }
                }
            });
            let _ = item.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();

            let _ = list.append_child(&item);
        }
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            // Older browsers only report the numeric code
            let direction = direction_for_key(&event.key())
                .or_else(|| direction_for_key_code(event.key_code()));
            if direction.is_some() {
                event.prevent_default();
            }
            sim::handle_input(&mut game.borrow_mut().state, direction);
        });
        let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_modal(document: &Document, game: Rc<RefCell<Game>>) {
        let buttons = [
            (".btn-primary", ModalAction::PlayAgain),
            (".btn-secondary", ModalAction::Close),
            (".modal-close", ModalAction::Close),
        ];

        for (selector, action) in buttons {
            let Some(btn) = document.query_selector(selector).ok().flatten() else {
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                if g.modal.act(action) {
                    sim::request_reset(&mut g.state);
                }
                if let Some(document) = current_document() {
                    set_hidden(&document, "modal", true);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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

            let dt = g.clock.tick(time);
            let opened = g.update(dt);
            let texts = g.render();

            if let Some(document) = current_document() {
                update_hud(&document, &texts);
                if let Some(content) = opened {
                    show_modal(&document, &content);
                }
            }
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
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    log::info!("Lane Crosser (native) starting...");
    log::info!("Native mode runs headless - run with `trunk serve` for the web version");

    let tuning = lane_crosser::Tuning::load()?;
    headless::run(tuning)?;
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted session: pick a character and keep walking up until the game ends
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use lane_crosser::renderer::QuadBatch;
    use lane_crosser::scene;
    use lane_crosser::sim::{self, Direction, GameEvent, GameState, Sprite};
    use lane_crosser::{AssetError, Resources, Tuning};

    const SEED: u64 = 0x1a7e;
    const FRAME_DT: f64 = 1.0 / 60.0;
    /// Frames between simulated key presses
    const FRAMES_PER_MOVE: u32 = 20;
    const MAX_FRAMES: u32 = 60 * 60;

    pub fn run(tuning: Tuning) -> Result<(), AssetError> {
        let mut resources = Resources::new();
        resources.load(&Sprite::ALL)?;

        let mut state = GameState::new(SEED, tuning);
        sim::select_character(&mut state, Sprite::CharCatGirl);

        for frame in 1..=MAX_FRAMES {
            sim::run_schedule(&mut state, FRAME_DT);
            sim::update(&mut state, FRAME_DT as f32);
            if frame % FRAMES_PER_MOVE == 0 {
                sim::handle_input(&mut state, Some(Direction::Up));
            }

            let mut batch = QuadBatch::new(&resources);
            scene::draw(&state, &mut batch);

            for event in state.drain_events() {
                match event {
                    GameEvent::Outcome(outcome) => {
                        log::info!(
                            "Frame {}: {:?} ({} vertices in last frame)",
                            frame,
                            outcome,
                            batch.vertices().len()
                        );
                        return Ok(());
                    }
                    other => log::debug!("Frame {}: {:?}", frame, other),
                }
            }
        }

        log::warn!("No outcome after {} frames", MAX_FRAMES);
        Ok(())
    }
}
