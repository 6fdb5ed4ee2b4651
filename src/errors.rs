//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`SceneError`] covers all failure modes including:
//! - Asset loading and decoding errors
//! - Missing UI elements at startup
//! - Animation targets that are not (yet) available
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for `std::result::Result<T, SceneError>`.
//!
//! ```rust,ignore
//! use card_scene::errors::{SceneError, Result};
//!
//! fn bind_ui() -> Result<()> {
//!     Err(SceneError::MissingUiElement("open_button".into()))
//! }
//! ```

use thiserror::Error;

/// The main error type for the card scene.
#[derive(Error, Debug)]
pub enum SceneError {
    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// An asset could not be fetched or parsed.
    #[error("Failed to load asset '{asset}': {reason}")]
    AssetLoad {
        /// Asset uri as registered with the loading manager
        asset: String,
        /// Human readable failure description
        reason: String,
    },

    /// Image decoding error.
    #[error("Image decode error: {0}")]
    ImageDecode(String),

    /// glTF parsing error.
    #[error("glTF error: {0}")]
    Gltf(String),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    // ========================================================================
    // UI & Animation Errors
    // ========================================================================
    /// An expected DOM node is absent.
    #[error("Missing UI element: #{0}")]
    MissingUiElement(String),

    /// An animation was requested on a target that is not attached.
    #[error("Animation target unavailable: {0}")]
    AnimationTargetUnavailable(String),

    // ========================================================================
    // I/O & Network Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(String),

    /// HTTP response error with status code.
    #[error("HTTP response error: status {status}")]
    HttpResponse {
        /// HTTP status code
        status: u16,
    },

    /// URL parsing error.
    #[cfg(feature = "http")]
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Feature not enabled.
    #[error("Feature not enabled: {0}")]
    FeatureNotEnabled(String),

    /// WASM-specific error.
    #[error("WASM error: {0}")]
    Wasm(String),
}

impl SceneError {
    /// Wraps any displayable failure as an [`SceneError::AssetLoad`].
    pub fn asset_load(asset: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        SceneError::AssetLoad {
            asset: asset.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<image::ImageError> for SceneError {
    fn from(err: image::ImageError) -> Self {
        SceneError::ImageDecode(err.to_string())
    }
}

impl From<gltf::Error> for SceneError {
    fn from(err: gltf::Error) -> Self {
        SceneError::Gltf(err.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for SceneError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        SceneError::Wasm(format!("{value:?}"))
    }
}

/// Alias for `Result<T, SceneError>`.
pub type Result<T> = std::result::Result<T, SceneError>;
