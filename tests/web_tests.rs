//! Browser UI Binding Tests
//!
//! Tests for:
//! - `WebUi::bind` succeeding when every page element exists
//! - A missing element failing the bind with its id
//!
//! Run with `wasm-pack test --headless --chrome`.

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{Document, HtmlElement};

use card_scene::SceneError;
use card_scene::app::web::WebUi;
use card_scene::config::UiConfig;

wasm_bindgen_test_configure!(run_in_browser);

// ============================================================================
// Helpers
// ============================================================================

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn body() -> HtmlElement {
    document().body().unwrap()
}

fn append(tag: &str, id: Option<&str>, class: Option<&str>) {
    let element = document().create_element(tag).unwrap();
    if let Some(id) = id {
        element.set_id(id);
    }
    if let Some(class) = class {
        element.set_class_name(class);
    }
    body().append_child(&element).unwrap();
}

/// Replaces the page with the card scene markup, leaving out `skip`.
fn build_page(config: &UiConfig, skip: Option<&str>) {
    body().set_inner_html("");
    let overlay = config.overlay_selector.trim_start_matches('.');
    append("div", None, Some(overlay));
    append("progress", Some(&config.progress_bar_id), None);
    append("span", Some(&config.progress_text_id), None);
    for id in [&config.open_button_id, &config.map_button_id] {
        if skip != Some(id.as_str()) {
            append("button", Some(id), None);
        }
    }
    append("canvas", None, Some("webgl"));
}

// ============================================================================
// Binding
// ============================================================================

#[wasm_bindgen_test]
fn bind_finds_every_element() {
    let config = UiConfig::default();
    build_page(&config, None);

    assert!(WebUi::bind(&config).is_ok());
}

#[wasm_bindgen_test]
fn missing_open_button_fails_the_bind() {
    let config = UiConfig::default();
    build_page(&config, Some("open_button"));

    let result = WebUi::bind(&config);

    assert!(matches!(
        result,
        Err(SceneError::MissingUiElement(ref id)) if id == "open_button"
    ));
}
