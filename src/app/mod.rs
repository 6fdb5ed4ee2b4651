//! Application frontends
//!
//! - [`input`]: platform-agnostic pointer state
//! - [`ui`]: the page elements behind [`UiSurface`]
//! - [`render`]: the drawing seam behind [`RenderBackend`]
//! - `web` (wasm32): browser runtime and entry points

pub mod input;
pub mod render;
pub mod ui;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::{ButtonState, Input, MouseButton};
pub use render::{NullRenderer, RenderBackend};
pub use ui::{HeadlessUi, UiChange, UiElement, UiSurface};
