//! Snek entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement};

    use snek::GameConfig;
    use snek::platform::{TickClock, direction_for_key};
    use snek::renderer::CellSink;
    use snek::sim::{CellChange, GameState, TickOutcome, tick};

    /// One `div.cell` per grid cell, plus the game-over overlay
    struct DomBoard {
        cells: Vec<Element>,
        overlay: Element,
    }

    impl DomBoard {
        fn build(document: &Document, parent: &Element, state: &GameState) -> Result<Self, JsValue> {
            let rows = state.grid.rows();
            let board: HtmlElement = document.create_element("div")?.dyn_into()?;
            board.class_list().add_1("board")?;
            let side = format!("calc({} * var(--cell-width))", rows);
            board.style().set_property("width", &side)?;
            board.style().set_property("height", &side)?;
            parent.append_child(&board)?;

            let mut cells: Vec<Element> = Vec::with_capacity(state.grid.cell_count());
            for (idx, cell) in state.board.cells().iter().enumerate() {
                let el: HtmlElement = document.create_element("div")?.dyn_into()?;
                el.class_list().add_1("cell")?;
                el.style()
                    .set_property("left", &format!("calc({} * var(--cell-width))", cell.x))?;
                el.style()
                    .set_property("top", &format!("calc({} * var(--cell-width))", cell.y))?;
                el.set_attribute("data-idx", &idx.to_string())?;
                el.set_attribute("data-x", &cell.x.to_string())?;
                el.set_attribute("data-y", &cell.y.to_string())?;
                board.append_child(&el)?;
                cells.push(el.into());
            }

            let overlay = document.create_element("div")?;
            overlay.set_attribute("class", "gameover hidden")?;
            let message = document.create_element("p")?;
            message.set_text_content(Some("Game over"));
            overlay.append_child(&message)?;
            let button = document.create_element("button")?;
            button.set_attribute("id", "new-game-btn")?;
            button.set_attribute("data-test", "new-game")?;
            button.set_text_content(Some("New game"));
            overlay.append_child(&button)?;
            parent.append_child(&overlay)?;

            let mut dom = Self { cells, overlay };
            dom.repaint(state);
            Ok(dom)
        }

        /// Redraw every cell from the board state
        fn repaint(&mut self, state: &GameState) {
            for (el, cell) in self.cells.iter().zip(state.board.cells()) {
                let kind = if cell.snake {
                    "snek"
                } else if cell.food {
                    "fud"
                } else {
                    "false"
                };
                let _ = el.set_attribute("data-active", &cell.active.to_string());
                let _ = el.set_attribute("data-type", kind);
            }
        }

        fn show_game_over(&self, visible: bool) {
            let class = if visible { "gameover" } else { "gameover hidden" };
            let _ = self.overlay.set_attribute("class", class);
        }
    }

    impl CellSink for DomBoard {
        fn cell_changed(&mut self, change: &CellChange) {
            let Some(el) = self.cells.get(change.idx) else {
                return;
            };
            if change.active {
                let _ = el.set_attribute("data-active", "true");
                let _ = el.set_attribute("data-type", change.kind.as_str());
            } else if el.get_attribute("data-type").as_deref() == Some(change.kind.as_str()) {
                let _ = el.set_attribute("data-active", "false");
                let _ = el.set_attribute("data-type", "false");
            }
        }

        fn game_over(&mut self) {
            self.show_game_over(true);
        }
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        board: DomBoard,
        clock: TickClock,
        last_time: f64,
    }

    impl Game {
        /// Run the ticks that are due this frame
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                time - self.last_time
            } else {
                0.0
            };
            self.last_time = time;

            for _ in 0..self.clock.advance(dt) {
                let report = tick(&mut self.state);
                report.dispatch(&mut self.board);
                if report.outcome == TickOutcome::GameOver {
                    self.clock.stop();
                    break;
                }
            }
        }

        /// Reset game state for restart
        fn restart(&mut self, seed: u64) {
            if let Err(err) = self.state.restart(seed) {
                log::error!("Restart failed: {}", err);
                return;
            }
            self.board.repaint(&self.state);
            self.board.show_game_over(false);
            self.clock.rearm();
        }
    }

    /// Optional JSON config embedded in the page
    fn load_config(document: &Document) -> Result<GameConfig, snek::SnekError> {
        let json = document
            .get_element_by_id("snek-config")
            .and_then(|el| el.text_content())
            .filter(|text| !text.trim().is_empty());
        match json {
            Some(json) => GameConfig::from_json(&json),
            None => Ok(GameConfig::default()),
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Snek starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        let body: Element = document.body().expect("no body").into();

        let config = match load_config(&document) {
            Ok(config) => config,
            Err(err) => {
                log::error!("Refusing to start: {}", err);
                return Err(JsError::new(&err.to_string()).into());
            }
        };

        let logo = document.create_element("h1")?;
        logo.set_text_content(Some("Snek"));
        logo.class_list().add_1("logo")?;
        body.append_child(&logo)?;

        let seed = js_sys::Date::now() as u64;
        let state = GameState::new(config, seed).map_err(|err| JsError::new(&err.to_string()))?;
        let board = DomBoard::build(&document, &body, &state)?;
        let clock = TickClock::new(state.config.tick_interval_ms);

        let game = Rc::new(RefCell::new(Game {
            state,
            board,
            clock,
            last_time: 0.0,
        }));

        setup_input_handlers(game.clone());
        setup_restart_button(&document, game.clone());

        request_animation_frame(game);

        log::info!("Snek running!");
        Ok(())
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            if let Some(direction) = direction_for_key(&event.key()) {
                event.prevent_default();
                let mut g = game.borrow_mut();
                if !g.state.request_direction(direction) {
                    log::debug!("Ignored reversal to {}", direction.as_str());
                }
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
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
        match game.try_borrow_mut() {
            Ok(mut g) => g.update(time),
            // A tick is still being processed; never start another on top of it
            Err(_) => log::warn!("Skipping frame: previous tick still running"),
        }

        request_animation_frame(game);
    }

    fn setup_restart_button(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("new-game-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                let mut g = game.borrow_mut();
                g.restart(seed);
                log::info!("Game restarted with seed: {}", seed);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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
    log::info!("Snek (native) starting...");
    log::info!("The playable version runs in the browser - build with `trunk serve`");

    if let Err(err) = run_headless() {
        log::error!("Headless run failed: {}", err);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one game without input until the snake hits a wall, printing the board
#[cfg(not(target_arch = "wasm32"))]
fn run_headless() -> snek::SnekResult<()> {
    use snek::GameConfig;
    use snek::renderer::TextRenderer;
    use snek::sim::{GameState, tick};

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let config = GameConfig::from_preset(snek::BoardPreset::Small);
    let mut state = GameState::new(config, seed)?;
    let rows = state.grid.rows() as usize;
    let mut renderer = TextRenderer::from_board(&state.board, rows);

    println!("{}", renderer.render());
    while !renderer.game_over {
        tick(&mut state).dispatch(&mut renderer);
    }
    println!("{}", renderer.render());
    println!(
        "Game over after {} ticks, score {}",
        state.time_ticks, state.score
    );
    Ok(())
}
