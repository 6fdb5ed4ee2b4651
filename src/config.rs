//! Scene configuration.
//!
//! Every constant of the card scene lives here with its default. The whole
//! tree deserializes from JSON with `#[serde(default)]`, so a config file only
//! needs the fields it overrides.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::animation::{Easing, PartialVec3};
use crate::errors::Result;
use crate::scene::mesh::FilterMode;

/// Converts a `0xRRGGBB` color to normalized RGB.
#[must_use]
pub fn hex_color(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub assets: AssetConfig,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    pub render: RenderSettings,
    pub lights: LightsConfig,
    pub fog: FogConfig,
    pub backdrop: BackdropConfig,
    pub card: CardConfig,
    pub timeline: TimelineConfig,
    pub ui: UiConfig,
}

impl SceneConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory (native) or URL prefix the asset paths are resolved against.
    pub root: String,
    pub model: String,
    pub environment: String,
    /// The reveal proceeds without the environment map if it fails.
    pub environment_required: bool,
    /// Extra attempts per asset after the first failure.
    pub max_retries: u32,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: String::new(),
            model: "W_Card.glb".into(),
            environment: "ENV.hdr".into(),
            environment_required: false,
            max_retries: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 50.0,
            near: 0.1,
            far: 500.0,
            position: Vec3::new(0.0, 0.0, 12.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub enable_pan: bool,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub target: Vec3,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub min_azimuth_angle: f32,
    pub max_azimuth_angle: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            enable_pan: false,
            rotate_speed: 1.0,
            zoom_speed: 0.05,
            target: Vec3::ZERO,
            min_polar_angle: PI / 3.0,
            max_polar_angle: PI / 1.85,
            min_azimuth_angle: -0.5,
            max_azimuth_angle: 0.5,
            min_distance: 5.0,
            max_distance: 12.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneMapping {
    None,
    Linear,
    #[default]
    AcesFilmic,
}

/// Renderer configuration handed to the [`RenderBackend`](crate::app::render::RenderBackend).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub antialias: bool,
    /// Transparent canvas background.
    pub alpha: bool,
    pub srgb_output: bool,
    pub tone_mapping: ToneMapping,
    pub tone_mapping_exposure: f32,
    /// The frame routine clears explicitly before rendering.
    pub auto_clear: bool,
    pub max_pixel_ratio: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            antialias: true,
            alpha: true,
            srgb_output: true,
            tone_mapping: ToneMapping::AcesFilmic,
            tone_mapping_exposure: 0.2,
            auto_clear: false,
            max_pixel_ratio: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotLightConfig {
    pub color: u32,
    pub intensity: f32,
    pub distance: f32,
    pub angle: f32,
    pub penumbra: f32,
    pub decay: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for SpotLightConfig {
    fn default() -> Self {
        Self {
            color: 0xff_ff_ff,
            intensity: 30.0,
            distance: 20.0,
            angle: 0.7,
            penumbra: 0.75,
            decay: 0.2,
            position: Vec3::new(0.0, 8.0, 8.0),
            target: Vec3::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientLightConfig {
    pub color: u32,
    pub intensity: f32,
}

impl Default for AmbientLightConfig {
    fn default() -> Self {
        Self {
            color: 0xd6_ed_ff,
            intensity: 0.2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightsConfig {
    pub spot: SpotLightConfig,
    pub ambient: AmbientLightConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FogConfig {
    pub enabled: bool,
    pub color: u32,
    pub near: f32,
    pub far: f32,
}

impl Default for FogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            color: 0x2e_04_23,
            near: 15.0,
            far: 30.0,
        }
    }
}

/// Wall and ground planes behind the card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackdropConfig {
    pub size: f32,
    pub color: u32,
    pub wall_z: f32,
    pub ground_y: f32,
    pub receive_shadow: bool,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            size: 300.0,
            color: 0x7d_09_50,
            wall_z: -1.0,
            ground_y: -2.0,
            receive_shadow: true,
        }
    }
}

/// Material overrides applied to the loaded card model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    pub normal_scale: Vec2,
    pub map_min_filter: FilterMode,
    pub map_mag_filter: FilterMode,
    /// Node driven by the open animation. `None` picks the model's first
    /// root node.
    pub animated_node: Option<String>,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            normal_scale: Vec2::new(1.2, -1.2),
            map_min_filter: FilterMode::Linear,
            map_mag_filter: FilterMode::Nearest,
            animated_node: None,
        }
    }
}

/// A position tween: end value and duration in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveStage {
    pub to: PartialVec3,
    pub duration: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub easing: Easing,
    pub overlay_fade_duration: f32,
    pub camera_pan: MoveStage,
    pub card_slide: MoveStage,
    pub card_settle: MoveStage,
    pub button_fade_duration: f32,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            easing: Easing::Power1Out,
            overlay_fade_duration: 1.0,
            camera_pan: MoveStage {
                to: PartialVec3::xyz(-5.0, 5.0, 12.0),
                duration: 3.0,
            },
            card_slide: MoveStage {
                to: PartialVec3::x(4.5),
                duration: 1.0,
            },
            card_settle: MoveStage {
                to: PartialVec3::xz(0.0, 0.5),
                duration: 1.5,
            },
            button_fade_duration: 1.0,
        }
    }
}

/// DOM element identifiers and the map link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub canvas_selector: String,
    pub progress_bar_id: String,
    pub progress_text_id: String,
    pub overlay_selector: String,
    pub open_button_id: String,
    pub map_button_id: String,
    pub map_url: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            canvas_selector: "canvas.webgl".into(),
            progress_bar_id: "loading-bar".into(),
            progress_text_id: "progress".into(),
            overlay_selector: ".loading-bar-container".into(),
            open_button_id: "open_button".into(),
            map_button_id: "map_button".into(),
            map_url: "https://goo.gl/maps/CTaSeRSC7cHaXBc27".into(),
        }
    }
}
