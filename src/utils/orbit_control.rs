use std::f32::consts::PI;

use glam::{Vec2, Vec3};

use crate::app::input::{Input, MouseButton};
use crate::config::ControlsConfig;
use crate::scene::transform::Transform;

/// Damped orbit controls with angle and distance limits.
///
/// The spherical offset is re-derived from the camera position on every
/// update, so anything else moving the camera (a tween) composes with user
/// rotation instead of being overwritten.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub damping_factor: f32,
    pub enable_damping: bool,
    pub enable_pan: bool,

    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub min_azimuth_angle: f32,
    pub max_azimuth_angle: f32,

    pub target: Vec3,

    rotate_delta: Vec2,
}

impl OrbitControls {
    #[must_use]
    pub fn new(target: Vec3) -> Self {
        Self {
            rotate_speed: 1.0,
            zoom_speed: 0.05,
            pan_speed: 1.0,
            damping_factor: 0.05,
            enable_damping: true,
            enable_pan: true,

            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            min_azimuth_angle: f32::NEG_INFINITY,
            max_azimuth_angle: f32::INFINITY,

            target,
            rotate_delta: Vec2::ZERO,
        }
    }

    #[must_use]
    pub fn from_config(config: &ControlsConfig) -> Self {
        Self {
            rotate_speed: config.rotate_speed,
            zoom_speed: config.zoom_speed,
            damping_factor: config.damping_factor,
            enable_damping: config.enable_damping,
            enable_pan: config.enable_pan,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            min_polar_angle: config.min_polar_angle,
            max_polar_angle: config.max_polar_angle,
            min_azimuth_angle: config.min_azimuth_angle,
            max_azimuth_angle: config.max_azimuth_angle,
            ..Self::new(config.target)
        }
    }

    /// Azimuth (about +Y, zero on +Z) and polar angle (from +Y) of a camera
    /// position relative to the target.
    #[must_use]
    pub fn spherical(&self, position: Vec3) -> (f32, f32, f32) {
        let offset = position - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return (0.0, PI / 2.0, 0.0);
        }
        let theta = offset.x.atan2(offset.z);
        let phi = (offset.y / radius).clamp(-1.0, 1.0).acos();
        (radius, theta, phi)
    }

    pub fn update(&mut self, transform: &mut Transform, input: &Input, fov_degrees: f32, dt: f32) {
        let screen_height = input.screen_size().y.max(1.0);
        let (mut radius, mut theta, mut phi) = self.spherical(transform.position);

        if input.get_mouse_button(MouseButton::Left) {
            let rotate_per_pixel = 2.0 * PI / screen_height;
            self.rotate_delta -= input.mouse_delta() * rotate_per_pixel * self.rotate_speed;
        }

        if self.enable_damping {
            let target_fps = 60.0;
            let retention = (1.0 - self.damping_factor).powf(dt * target_fps);
            let applied = self.rotate_delta * (1.0 - retention);
            theta += applied.x;
            phi += applied.y;
            self.rotate_delta *= retention;
        } else {
            theta += self.rotate_delta.x;
            phi += self.rotate_delta.y;
            self.rotate_delta = Vec2::ZERO;
        }

        theta = theta.clamp(self.min_azimuth_angle, self.max_azimuth_angle);
        const EPS: f32 = 0.000_001;
        phi = phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(EPS, PI - EPS);

        let scroll = input.scroll_delta().y;
        if scroll != 0.0 {
            let scale = (1.0 - self.zoom_speed).powf(scroll.abs());
            if scroll > 0.0 {
                radius *= scale;
            } else {
                radius /= scale;
            }
        }
        radius = radius.clamp(self.min_distance, self.max_distance);

        if self.enable_pan && input.get_mouse_button(MouseButton::Right) {
            let half_fov = fov_degrees.to_radians() / 2.0;
            let world_height = 2.0 * radius * half_fov.tan();
            let pixels_to_world = world_height / screen_height;

            let forward = -spherical_offset(1.0, theta, phi);
            let right = forward.cross(Vec3::Y).normalize_or_zero();
            let up = right.cross(forward).normalize_or_zero();

            let delta = input.mouse_delta();
            self.target += (right * -delta.x + up * delta.y) * pixels_to_world * self.pan_speed;
        }

        transform.position = self.target + spherical_offset(radius, theta, phi);
        transform.look_at(self.target, Vec3::Y);
    }
}

fn spherical_offset(radius: f32, theta: f32, phi: f32) -> Vec3 {
    let sin_phi = phi.sin();
    Vec3::new(
        radius * sin_phi * theta.sin(),
        radius * phi.cos(),
        radius * sin_phi * theta.cos(),
    )
}
