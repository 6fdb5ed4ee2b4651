use glam::Vec3;

#[derive(Debug, Clone, PartialEq)]
pub struct SpotLight {
    /// Cutoff distance; 0 means unlimited.
    pub distance: f32,
    /// Cone half-angle in radians.
    pub angle: f32,
    pub penumbra: f32,
    pub decay: f32,
    /// Point the cone is aimed at, in world space.
    pub target: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LightKind {
    Ambient,
    Spot(SpotLight),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub color: Vec3,
    pub intensity: f32,
    pub kind: LightKind,
    pub cast_shadows: bool,
}

impl Light {
    #[must_use]
    pub fn new_ambient(color: Vec3, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            kind: LightKind::Ambient,
            cast_shadows: false,
        }
    }

    #[must_use]
    pub fn new_spot(color: Vec3, intensity: f32, spot: SpotLight) -> Self {
        Self {
            color,
            intensity,
            kind: LightKind::Spot(spot),
            cast_shadows: false,
        }
    }
}
