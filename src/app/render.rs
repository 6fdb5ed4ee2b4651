//! Render backend seam
//!
//! Drawing is left to the host. The frame routine hands the backend the
//! composed scene after world matrices are up to date.

use crate::config::RenderSettings;
use crate::scene::{NodeHandle, Scene};

pub trait RenderBackend {
    /// Applies output settings once at startup.
    fn configure(&mut self, settings: &RenderSettings);

    /// Drawing buffer size in CSS pixels plus the (already capped) pixel ratio.
    fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32);

    /// Auto-clear is off, so the frame routine clears explicitly.
    fn clear(&mut self);

    fn render(&mut self, scene: &Scene, camera: NodeHandle);
}

/// Backend that draws nothing and counts calls.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub settings: Option<RenderSettings>,
    pub size: (u32, u32),
    pub pixel_ratio: f32,
    pub clears: u64,
    pub frames: u64,
}

impl NullRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderBackend for NullRenderer {
    fn configure(&mut self, settings: &RenderSettings) {
        self.settings = Some(settings.clone());
    }

    fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32) {
        self.size = (width, height);
        self.pixel_ratio = pixel_ratio;
    }

    fn clear(&mut self) {
        self.clears += 1;
    }

    fn render(&mut self, _scene: &Scene, _camera: NodeHandle) {
        self.frames += 1;
    }
}
