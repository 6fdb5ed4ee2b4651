//! Browser runtime
//!
//! Binds the page elements, forwards DOM events into the [`AppContext`] and
//! drives [`AppContext::frame`] from `requestAnimationFrame`. Drawing is
//! delegated to a JavaScript callback that receives the camera's
//! view-projection matrix every frame.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, EventTarget, HtmlCanvasElement, HtmlElement, HtmlProgressElement, MouseEvent,
    WheelEvent, Window,
};

use crate::app::input::{ButtonState, MouseButton};
use crate::app::render::RenderBackend;
use crate::app::ui::{UiElement, UiSurface};
use crate::config::{RenderSettings, SceneConfig, UiConfig};
use crate::engine::AppContext;
use crate::errors::{Result, SceneError};
use crate::scene::{NodeHandle, Scene};
use crate::utils::Timer;

type WebContext = AppContext<WebUi, JsRenderer>;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
}

/// Starts the scene. `config_json` overrides [`SceneConfig`] defaults;
/// `render` is called with a `Float32Array` view-projection matrix per frame.
#[wasm_bindgen]
pub fn launch(
    config_json: Option<String>,
    render: Option<js_sys::Function>,
) -> std::result::Result<(), JsValue> {
    let result = match config_json {
        Some(json) => SceneConfig::from_json_str(&json),
        None => Ok(SceneConfig::default()),
    }
    .and_then(|config| run(config, render));
    result.map_err(|e| JsValue::from_str(&e.to_string()))
}

pub fn run(config: SceneConfig, render: Option<js_sys::Function>) -> Result<()> {
    let ui = WebUi::bind(&config.ui)?;
    let window = ui.window.clone();
    let canvas = query(&document(&window)?, &config.ui.canvas_selector)?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| SceneError::MissingUiElement(config.ui.canvas_selector.clone()))?;

    let renderer = JsRenderer {
        canvas: canvas.clone(),
        callback: render,
    };
    let (width, height) = window_size(&window);
    let mut ctx = AppContext::new(config, ui, renderer, width, height);
    ctx.resize(width, height, window.device_pixel_ratio() as f32);
    ctx.start_loading()?;

    let ctx = Rc::new(RefCell::new(ctx));
    install_listeners(&window, &canvas, &ctx)?;
    start_frame_loop(&window, ctx)
}

// ============================================================================
// UI surface
// ============================================================================

pub struct WebUi {
    window: Window,
    progress_bar: HtmlProgressElement,
    progress_text: HtmlElement,
    overlay: HtmlElement,
    open_button: HtmlElement,
    map_button: HtmlElement,
    opacity: FxHashMap<UiElement, f32>,
}

impl WebUi {
    /// Looks up every element up front. A missing one is fatal.
    pub fn bind(config: &UiConfig) -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| SceneError::Wasm("no global window".into()))?;
        let document = document(&window)?;

        let progress_bar = by_id(&document, &config.progress_bar_id)?
            .dyn_into::<HtmlProgressElement>()
            .map_err(|_| SceneError::MissingUiElement(config.progress_bar_id.clone()))?;

        Ok(Self {
            progress_text: by_id(&document, &config.progress_text_id)?,
            overlay: query(&document, &config.overlay_selector)?,
            open_button: by_id(&document, &config.open_button_id)?,
            map_button: by_id(&document, &config.map_button_id)?,
            progress_bar,
            window,
            opacity: FxHashMap::default(),
        })
    }

    #[must_use]
    pub fn element(&self, element: UiElement) -> &HtmlElement {
        match element {
            UiElement::ProgressBar => &self.progress_bar,
            UiElement::ProgressText => &self.progress_text,
            UiElement::LoadingOverlay => &self.overlay,
            UiElement::OpenButton => &self.open_button,
            UiElement::MapButton => &self.map_button,
        }
    }

    fn set_style(&self, element: UiElement, property: &str, value: &str) -> bool {
        self.element(element)
            .style()
            .set_property(property, value)
            .is_ok()
    }
}

impl UiSurface for WebUi {
    fn set_progress(&mut self, value: f32) {
        self.progress_bar.set_value(f64::from(value));
    }

    fn set_text(&mut self, element: UiElement, text: &str) {
        self.element(element).set_inner_text(text);
    }

    fn opacity(&self, element: UiElement) -> Option<f32> {
        Some(self.opacity.get(&element).copied().unwrap_or(1.0))
    }

    fn set_opacity(&mut self, element: UiElement, opacity: f32) -> bool {
        self.opacity.insert(element, opacity);
        self.set_style(element, "opacity", &opacity.to_string())
    }

    fn set_displayed(&mut self, element: UiElement, displayed: bool) {
        if displayed {
            if let Err(e) = self.element(element).style().remove_property("display") {
                log::warn!("Could not show {element:?}: {e:?}");
            }
        } else {
            self.set_style(element, "display", "none");
        }
    }

    fn set_visible(&mut self, element: UiElement, visible: bool) {
        self.set_style(element, "visibility", if visible { "visible" } else { "hidden" });
    }

    fn set_enabled(&mut self, element: UiElement, enabled: bool) {
        let el = self.element(element);
        let result = if enabled {
            el.remove_attribute("disabled")
        } else {
            el.set_attribute("disabled", "")
        };
        if let Err(e) = result {
            log::warn!("Could not toggle {element:?}: {e:?}");
        }
    }

    fn open_url(&mut self, url: &str) -> Result<()> {
        self.window.open_with_url_and_target(url, "_blank")?;
        Ok(())
    }
}

// ============================================================================
// Render backend
// ============================================================================

pub struct JsRenderer {
    canvas: HtmlCanvasElement,
    callback: Option<js_sys::Function>,
}

impl RenderBackend for JsRenderer {
    fn configure(&mut self, settings: &RenderSettings) {
        log::info!(
            "Render settings: {:?} tone mapping, exposure {}",
            settings.tone_mapping,
            settings.tone_mapping_exposure
        );
    }

    fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32) {
        self.canvas.set_width((width as f32 * pixel_ratio) as u32);
        self.canvas.set_height((height as f32 * pixel_ratio) as u32);
    }

    fn clear(&mut self) {}

    fn render(&mut self, scene: &Scene, camera: NodeHandle) {
        let (Some(callback), Some(cam)) = (&self.callback, scene.cameras.get(camera)) else {
            return;
        };
        let matrix = cam.view_projection_matrix().to_cols_array();
        let array = js_sys::Float32Array::from(&matrix[..]);
        if let Err(e) = callback.call1(&JsValue::NULL, &array) {
            log::error!("Render callback failed: {e:?}");
        }
    }
}

// ============================================================================
// Event plumbing
// ============================================================================

fn document(window: &Window) -> Result<Document> {
    window
        .document()
        .ok_or_else(|| SceneError::Wasm("window has no document".into()))
}

fn by_id(document: &Document, id: &str) -> Result<HtmlElement> {
    document
        .get_element_by_id(id)
        .and_then(|e| e.dyn_into::<HtmlElement>().ok())
        .ok_or_else(|| SceneError::MissingUiElement(id.to_string()))
}

fn query(document: &Document, selector: &str) -> Result<HtmlElement> {
    document
        .query_selector(selector)?
        .and_then(|e| e.dyn_into::<HtmlElement>().ok())
        .ok_or_else(|| SceneError::MissingUiElement(selector.to_string()))
}

fn window_size(window: &Window) -> (u32, u32) {
    let dim = |v: std::result::Result<JsValue, JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as u32
    };
    (dim(window.inner_width()), dim(window.inner_height()))
}

/// Registers a listener for the page's lifetime.
fn listen<E, F>(target: &EventTarget, name: &str, mut handler: F) -> Result<()>
where
    E: JsCast + 'static,
    F: FnMut(E) + 'static,
{
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        if let Ok(event) = event.dyn_into::<E>() {
            handler(event);
        }
    });
    target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Runs `f` unless the context is already borrowed (re-entrant DOM event).
fn with_ctx(ctx: &Rc<RefCell<WebContext>>, f: impl FnOnce(&mut WebContext)) {
    match ctx.try_borrow_mut() {
        Ok(mut ctx) => f(&mut ctx),
        Err(_) => log::debug!("Dropped event during frame"),
    }
}

fn install_listeners(
    window: &Window,
    canvas: &HtmlCanvasElement,
    ctx: &Rc<RefCell<WebContext>>,
) -> Result<()> {
    let c = ctx.clone();
    listen(canvas, "mousedown", move |e: MouseEvent| {
        with_ctx(&c, |ctx| {
            let button = MouseButton::from_dom_index(e.button());
            ctx.input.inject_mouse_button(button, ButtonState::Pressed);
        });
    })?;

    let c = ctx.clone();
    listen(window, "mouseup", move |e: MouseEvent| {
        with_ctx(&c, |ctx| {
            let button = MouseButton::from_dom_index(e.button());
            ctx.input.inject_mouse_button(button, ButtonState::Released);
        });
    })?;

    let c = ctx.clone();
    listen(window, "mousemove", move |e: MouseEvent| {
        with_ctx(&c, |ctx| {
            ctx.input.inject_mouse_position(e.client_x() as f32, e.client_y() as f32);
        });
    })?;

    let c = ctx.clone();
    listen(canvas, "wheel", move |e: WheelEvent| {
        e.prevent_default();
        with_ctx(&c, |ctx| ctx.input.inject_scroll(0.0, -(e.delta_y().signum() as f32)));
    })?;

    let c = ctx.clone();
    let resize_window = window.clone();
    listen(window, "resize", move |_: web_sys::Event| {
        let (width, height) = window_size(&resize_window);
        let ratio = resize_window.device_pixel_ratio() as f32;
        with_ctx(&c, |ctx| ctx.resize(width, height, ratio));
    })?;

    for element in [UiElement::OpenButton, UiElement::MapButton] {
        let c = ctx.clone();
        let target = ctx.borrow().ui.element(element).clone();
        listen(&target, "click", move |_: MouseEvent| {
            with_ctx(&c, |ctx| {
                if let Err(e) = ctx.click(element) {
                    log::error!("{element:?} click failed: {e}");
                }
            });
        })?;
    }

    Ok(())
}

fn start_frame_loop(window: &Window, ctx: Rc<RefCell<WebContext>>) -> Result<()> {
    let slot: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let next = slot.clone();
    let loop_window = window.clone();
    let mut timer = Timer::new();

    *slot.borrow_mut() = Some(Closure::new(move || {
        timer.tick();
        with_ctx(&ctx, |ctx| ctx.frame(timer.dt_seconds()));
        if let Some(callback) = next.borrow().as_ref()
            && let Err(e) = loop_window.request_animation_frame(callback.as_ref().unchecked_ref())
        {
            log::error!("requestAnimationFrame failed: {e:?}");
        }
    }));

    if let Some(callback) = slot.borrow().as_ref() {
        window.request_animation_frame(callback.as_ref().unchecked_ref())?;
    }
    Ok(())
}
