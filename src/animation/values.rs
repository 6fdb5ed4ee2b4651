use glam::Vec3;
use serde::{Deserialize, Serialize};

pub trait Interpolatable: Copy + Sized {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self;
}

impl Interpolatable for f32 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start + (end - start) * t
    }
}

impl Interpolatable for Vec3 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }
}

/// A position goal that only names some of its axes.
///
/// Unnamed axes keep whatever value the target holds when the tween starts,
/// so `{ x: 4.5 }` slides along X and leaves Y and Z alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialVec3 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
}

impl PartialVec3 {
    #[must_use]
    pub const fn new(x: Option<f32>, y: Option<f32>, z: Option<f32>) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub const fn x(x: f32) -> Self {
        Self::new(Some(x), None, None)
    }

    #[must_use]
    pub const fn xz(x: f32, z: f32) -> Self {
        Self::new(Some(x), None, Some(z))
    }

    #[must_use]
    pub const fn xyz(x: f32, y: f32, z: f32) -> Self {
        Self::new(Some(x), Some(y), Some(z))
    }

    /// Fills the unnamed axes from `base`.
    #[must_use]
    pub fn resolve(self, base: Vec3) -> Vec3 {
        Vec3::new(
            self.x.unwrap_or(base.x),
            self.y.unwrap_or(base.y),
            self.z.unwrap_or(base.z),
        )
    }
}

impl From<Vec3> for PartialVec3 {
    fn from(v: Vec3) -> Self {
        Self::xyz(v.x, v.y, v.z)
    }
}
