//! Environment - plain data
//!
//! Image based lighting source and distance fog.

use std::sync::Arc;

use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentMapping {
    EquirectangularReflection,
}

/// Decoded high dynamic range environment image, RGBA32F row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentMap {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub texels: Vec<f32>,
    pub mapping: EnvironmentMapping,
}

impl EnvironmentMap {
    /// Returns the RGBA texel at `(x, y)`.
    #[must_use]
    pub fn texel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        let t = self.texels.get(i..i + 4)?;
        Some([t[0], t[1], t[2], t[3]])
    }
}

/// IBL configuration. The map lights the scene but is not drawn as background.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    pub env_map: Option<Arc<EnvironmentMap>>,
    pub intensity: f32,
}

impl Environment {
    #[must_use]
    pub fn new() -> Self {
        Self {
            env_map: None,
            intensity: 1.0,
        }
    }

    pub fn set_env_map(&mut self, map: Option<Arc<EnvironmentMap>>) {
        self.env_map = map;
    }

    #[must_use]
    pub fn has_env_map(&self) -> bool {
        self.env_map.is_some()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

/// Linear distance fog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub color: Vec3,
    pub near: f32,
    pub far: f32,
}
