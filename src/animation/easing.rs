use serde::{Deserialize, Serialize};

/// Easing curves applied to tween progress.
///
/// Names follow the GSAP convention (`power1.out` is a quadratic ease-out and
/// the default for every tween).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Easing {
    #[serde(rename = "none", alias = "linear")]
    Linear,
    #[serde(rename = "power1.in")]
    Power1In,
    #[default]
    #[serde(rename = "power1.out")]
    Power1Out,
    #[serde(rename = "power1.inOut")]
    Power1InOut,
    #[serde(rename = "power2.in")]
    Power2In,
    #[serde(rename = "power2.out")]
    Power2Out,
    #[serde(rename = "power2.inOut")]
    Power2InOut,
}

impl Easing {
    /// Maps linear progress `t` in `[0, 1]` onto the curve.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::Power1In => ease_in(t, 2),
            Easing::Power1Out => ease_out(t, 2),
            Easing::Power1InOut => ease_in_out(t, 2),
            Easing::Power2In => ease_in(t, 3),
            Easing::Power2Out => ease_out(t, 3),
            Easing::Power2InOut => ease_in_out(t, 3),
        }
    }
}

fn ease_in(t: f32, power: i32) -> f32 {
    t.powi(power)
}

fn ease_out(t: f32, power: i32) -> f32 {
    1.0 - (1.0 - t).powi(power)
}

fn ease_in_out(t: f32, power: i32) -> f32 {
    if t < 0.5 {
        ease_in(t * 2.0, power) / 2.0
    } else {
        1.0 - ease_in((1.0 - t) * 2.0, power) / 2.0
    }
}
