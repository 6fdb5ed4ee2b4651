use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    Nearest,
    Linear,
}

/// Sampling state of a texture bound to a material slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureSampling {
    pub min_filter: FilterMode,
    pub mag_filter: FilterMode,
}

impl Default for TextureSampling {
    fn default() -> Self {
        Self {
            min_filter: FilterMode::Linear,
            mag_filter: FilterMode::Linear,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialKind {
    Phong,
    Standard,
}

/// Material parameters the scene setup touches. Everything else stays in
/// the source asset for the renderer to read.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub kind: MaterialKind,
    pub color: Vec3,
    pub normal_scale: Vec2,
    pub has_normal_map: bool,
    pub base_color_map: Option<TextureSampling>,
    pub depth_write: bool,
}

impl Material {
    #[must_use]
    pub fn new_phong(color: Vec3) -> Self {
        Self {
            kind: MaterialKind::Phong,
            color,
            normal_scale: Vec2::ONE,
            has_normal_map: false,
            base_color_map: None,
            depth_write: true,
        }
    }

    #[must_use]
    pub fn new_standard() -> Self {
        Self {
            kind: MaterialKind::Standard,
            color: Vec3::ONE,
            ..Self::new_phong(Vec3::ONE)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Plane { width: f32, height: f32 },
    /// One primitive of a loaded model's mesh, addressed by glTF indices.
    Imported { mesh_index: usize, primitive_index: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub geometry: Geometry,
    pub material: Material,
    pub receive_shadow: bool,
}

impl Mesh {
    #[must_use]
    pub fn new(name: impl Into<String>, geometry: Geometry, material: Material) -> Self {
        Self {
            name: name.into(),
            geometry,
            material,
            receive_shadow: false,
        }
    }
}
