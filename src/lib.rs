//! card-scene
//!
//! Load-and-reveal timeline for a decorative 3D card scene. The crate loads a
//! card model and an environment map while reporting combined progress,
//! reveals the scene with a chained fade and camera pan, and plays a staged
//! open animation when the open button is clicked.
//!
//! Drawing and the page itself sit behind the [`RenderBackend`] and
//! [`UiSurface`] traits; the `wasm32` build ships a browser runtime for both.
//!
//! # Modules
//!
//! - [`timeline`]: the reveal and open sequencing
//! - [`engine`]: [`AppContext`] and the per-frame routine
//! - [`assets`]: readers, glTF / HDR decoding, the loading manager
//! - [`animation`]: cue-tagged property tweens
//! - [`scene`]: scene graph, camera, lights, fog and the composed layout
//! - [`utils`]: orbit controls and frame timing
//! - [`app`]: input, UI surface, render backend, web runtime
//! - [`config`]: every scene constant, loadable from JSON

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod animation;
pub mod app;
pub mod assets;
pub mod config;
pub mod engine;
pub mod errors;
pub mod scene;
pub mod timeline;
pub mod utils;

pub use app::{HeadlessUi, NullRenderer, RenderBackend, UiElement, UiSurface};
pub use assets::{LoadProgress, LoadingManager};
pub use config::SceneConfig;
pub use engine::AppContext;
pub use errors::{Result, SceneError};
pub use scene::{NodeHandle, Scene};
pub use timeline::{Cue, OpenOutcome, Timeline, UiState};
pub use utils::OrbitControls;
