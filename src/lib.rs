use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Interval;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, HtmlAudioElement, HtmlCanvasElement, HtmlElement, MouseEvent, PointerEvent};

pub mod api;
pub mod audio;
pub mod canvas;
pub mod catalog;
pub mod config;
pub mod input;
pub mod protocol;
pub mod scene;
pub mod status;

use api::{Backend, ClientError};
use audio::AudioController;
use canvas::Painter;
use config::ClientConfig;
use input::{Effect, UiState};
use protocol::{MapData, PlaceRequest};

// --- IMPORTS & LOGGING ---
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
    #[wasm_bindgen(js_namespace = console)]
    fn error(s: &str);
}

const CANVAS_ID: &str = "game-canvas";
const ENTITY_LIST_ID: &str = "entity-list";
const MESSAGE_ID: &str = "game-message";
const MUSIC_ID: &str = "background-music";

// --- PAGE ---

struct Page {
    document: Document,
    painter: Painter,
    entity_list: HtmlElement,
    message: HtmlElement,
    message_header: HtmlElement,
    money: HtmlElement,
    power: HtmlElement,
    sun: HtmlElement,
}

fn element<T: JsCast>(document: &Document, id: &str) -> Result<T, ClientError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| ClientError::MissingElement(id.to_string()))?
        .dyn_into::<T>()
        .map_err(|_| ClientError::MissingElement(id.to_string()))
}

impl Page {
    fn find(document: Document, canvas: HtmlCanvasElement) -> Result<Page, ClientError> {
        let message: HtmlElement = element(&document, MESSAGE_ID)?;
        let message_header = message
            .query_selector("h2")?
            .and_then(|h| h.dyn_into::<HtmlElement>().ok())
            .ok_or_else(|| ClientError::MissingElement(format!("{} h2", MESSAGE_ID)))?;
        Ok(Page {
            painter: Painter::new(canvas)?,
            entity_list: element(&document, ENTITY_LIST_ID)?,
            message,
            message_header,
            money: element(&document, "money")?,
            power: element(&document, "power")?,
            sun: element(&document, "sun")?,
            document,
        })
    }
}

// --- CLIENT ---

struct App {
    backend: Backend,
    page: Page,
    audio: AudioController,
    ui: RefCell<UiState>,
}

thread_local! {
    static APP: RefCell<Option<Rc<App>>> = const { RefCell::new(None) };
}

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

fn apply(app: &Rc<App>, effects: Vec<Effect>) {
    for effect in effects {
        match effect {
            Effect::Redraw => spawn_redraw(app),
            Effect::RefreshResources => spawn_resource_refresh(app),
            Effect::ClearSelectionStyle => {
                if let Err(e) = catalog::clear_selection_style(&app.page.document) {
                    error(&format!("Error clearing selection: {}", e));
                }
            }
            Effect::Alert(message) => alert(&message),
            Effect::PlaySound(name) => app.audio.play_effect(name),
            Effect::Log(message) => log(&message),
            Effect::Report(message) => error(&message),
        }
    }
}

async fn refresh_resources(app: &App) -> Result<(), ClientError> {
    let resources = app.backend.resources().await?;
    app.page.money.set_inner_text(&resources.money.to_string());
    app.page.power.set_inner_text(&resources.power.to_string());
    app.page.sun.set_inner_text(&resources.sun.to_string());
    Ok(())
}

fn spawn_resource_refresh(app: &Rc<App>) {
    let app = app.clone();
    spawn_local(async move {
        if let Err(e) = refresh_resources(&app).await {
            error(&format!("Error fetching resources: {}", e));
        }
    });
}

async fn draw_map(app: &App) -> Result<(), ClientError> {
    let map = app.backend.map().await?;
    let offset = app.ui.borrow().camera();
    app.page.painter.begin(scene::canvas_size(&map), offset)?;
    let painted = paint_layers(app, &map).await;
    app.page.painter.end();
    painted
}

/// Terrain goes out before the entity fetch, so a failed fetch leaves the
/// tiles on screen.
async fn paint_layers(app: &App, map: &MapData) -> Result<(), ClientError> {
    app.page.painter.paint(&scene::terrain(map))?;
    let snapshot = app.backend.entities().await?;
    let mut ops = scene::entities(&snapshot);
    if let Some(cell) = app.ui.borrow().ghost_cell() {
        ops.push(scene::ghost(cell));
    }
    app.page.painter.paint(&ops)?;
    Ok(())
}

fn spawn_redraw(app: &Rc<App>) {
    let app = app.clone();
    spawn_local(async move {
        if let Err(e) = draw_map(&app).await {
            error(&format!("Error fetching or drawing map: {}", e));
        }
    });
}

async fn load_catalog(app: &Rc<App>) -> Result<(), ClientError> {
    let listing = app.backend.catalog().await?;
    let list = &app.page.entity_list;
    list.set_inner_html("");

    for (name, entry) in &listing.entries {
        let item = catalog::create_item(&app.page.document, name, entry)?;

        let handler = app.clone();
        let entity_type = name.clone();
        let closure = Closure::wrap(Box::new(move |_event: MouseEvent| {
            let effect = handler.ui.borrow_mut().toggle_selection(&entity_type);
            let selected = handler.ui.borrow().selected().map(str::to_string);
            if let Err(e) = catalog::sync_selection_style(&handler.page.document, selected.as_deref()) {
                error(&format!("Error styling selection: {}", e));
            }
            apply(&handler, vec![effect]);
        }) as Box<dyn FnMut(_)>);
        item.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();

        list.append_child(&item)?;
    }
    Ok(())
}

async fn poll_game_state(app: &App) -> Result<(), ClientError> {
    let game = app.backend.game_state().await?;
    if let Some(text) = status::banner(game.outcome()) {
        if let Err(e) = status::show(&app.page.message, &app.page.message_header, text) {
            error(&format!("Error showing game result: {}", e));
        }
        if let Err(e) = app.backend.stop_game().await {
            error(&format!("Error stopping game: {}", e));
        }
    }
    Ok(())
}

fn spawn_game_state_poll(app: &Rc<App>) {
    let app = app.clone();
    spawn_local(async move {
        if let Err(e) = poll_game_state(&app).await {
            error(&format!("Error fetching game state: {}", e));
        }
    });
}

fn spawn_placement(app: &Rc<App>, req: PlaceRequest) {
    let app = app.clone();
    spawn_local(async move {
        let result = app.backend.place(&req).await;
        let effects = app.ui.borrow_mut().placement_result(result);
        apply(&app, effects);
    });
}

fn check_backend(app: &Rc<App>) {
    let app = app.clone();
    spawn_local(async move {
        match app.backend.ping().await {
            Ok(text) => log(&format!("Backend at {} says: {}", app.backend.config().backend_url, text)),
            Err(e) => error(&format!("Error connecting to backend: {}", e)),
        }
    });
}

// --- INPUT ---

fn bind_input(app: &Rc<App>) -> Result<(), ClientError> {
    let canvas = app.page.painter.canvas();

    {
        let app = app.clone();
        let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
            let effect = app.ui.borrow_mut().hover(event.offset_x() as f64, event.offset_y() as f64);
            apply(&app, effect.into_iter().collect());
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let app = app.clone();
        let closure = Closure::wrap(Box::new(move |event: PointerEvent| {
            app.ui.borrow_mut().pointer_down(event.client_x() as f64, event.client_y() as f64);
            if let Err(e) = app.page.painter.canvas().set_pointer_capture(event.pointer_id()) {
                error(&format!("Pointer capture failed: {:?}", e));
            }
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let app = app.clone();
        let closure = Closure::wrap(Box::new(move |event: PointerEvent| {
            let effect = app.ui.borrow_mut().drag_move(event.client_x() as f64, event.client_y() as f64);
            apply(&app, effect.into_iter().collect());
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let app = app.clone();
        let closure = Closure::wrap(Box::new(move |_event: PointerEvent| {
            app.ui.borrow_mut().pointer_up();
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let app = app.clone();
        let closure = Closure::wrap(Box::new(move |_event: MouseEvent| {
            let effect = app.ui.borrow_mut().leave();
            apply(&app, effect.into_iter().collect());
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let app = app.clone();
        let closure = Closure::wrap(Box::new(move |_event: MouseEvent| {
            let request = app.ui.borrow().commit();
            if let Some(req) = request {
                spawn_placement(&app, req);
            }
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

// --- ENTRY POINTS ---

/// Wires the page up: binds input, starts the pollers and kicks off the
/// first fetches. Calling it a second time is a no-op.
#[wasm_bindgen]
pub fn run_client() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    if APP.with(|slot| slot.borrow().is_some()) {
        return Ok(());
    }

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global `window` exists"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document on window"))?;
    let canvas: HtmlCanvasElement = element(&document, CANVAS_ID)?;

    let config = ClientConfig::from_attributes(|name| canvas.get_attribute(name));
    let music = document
        .get_element_by_id(MUSIC_ID)
        .and_then(|el| el.dyn_into::<HtmlAudioElement>().ok());

    let app = Rc::new(App {
        backend: Backend::new(config.clone()),
        page: Page::find(document, canvas)?,
        audio: AudioController::new(music, config.clone()),
        ui: RefCell::new(UiState::new()),
    });
    APP.with(|slot| *slot.borrow_mut() = Some(app.clone()));

    bind_input(&app)?;

    {
        let restart = Closure::wrap(Box::new(move || {
            if let Err(e) = restart_game() {
                error(&format!("Restart failed: {:?}", e));
            }
        }) as Box<dyn FnMut()>);
        js_sys::Reflect::set(&window, &JsValue::from_str("restartGame"), restart.as_ref())?;
        restart.forget();
    }

    check_backend(&app);
    {
        let app = app.clone();
        spawn_local(async move {
            if let Err(e) = load_catalog(&app).await {
                error(&format!("Error loading available entities: {}", e));
            }
        });
    }
    spawn_resource_refresh(&app);
    spawn_redraw(&app);
    spawn_game_state_poll(&app);
    {
        let app = app.clone();
        spawn_local(async move { app.audio.start_music().await });
    }

    {
        let app = app.clone();
        Interval::new(config.resource_poll_ms, move || spawn_resource_refresh(&app)).forget();
    }
    {
        let app = app.clone();
        Interval::new(config.state_poll_ms, move || spawn_game_state_poll(&app)).forget();
    }

    Ok(())
}

/// Hides the end-of-game overlay and reloads the page, which resets every
/// piece of client state.
#[wasm_bindgen]
pub fn restart_game() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global `window` exists"))?;

    let app = APP.with(|slot| slot.borrow().clone());
    if let Some(app) = app {
        status::hide(&app.page.message)?;
    } else if let Some(document) = window.document() {
        if let Ok(message) = element::<HtmlElement>(&document, MESSAGE_ID) {
            status::hide(&message)?;
        }
    }

    window.location().reload()
}
