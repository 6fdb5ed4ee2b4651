//! Platform-agnostic pointer input
//!
//! Holds the pointer state the orbit controls read. Platform glue (DOM
//! listeners on the web, a host event loop natively) translates its events
//! into the `inject_*` calls.

use glam::Vec2;
use rustc_hash::FxHashSet;

/// Mouse button enumeration
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

impl MouseButton {
    /// Maps a DOM `MouseEvent.button` index.
    #[must_use]
    pub fn from_dom_index(index: i16) -> Self {
        match index {
            0 => Self::Left,
            1 => Self::Middle,
            2 => Self::Right,
            other => Self::Other(other.unsigned_abs()),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ButtonState {
    Pressed,
    Released,
}

#[derive(Debug, Clone, Default)]
pub struct Input {
    pressed_mouse: FxHashSet<MouseButton>,
    just_pressed_mouse: FxHashSet<MouseButton>,

    mouse_position: Option<Vec2>,
    mouse_delta: Vec2,
    scroll_delta: Vec2,

    screen_size: Vec2,
}

impl Input {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========== System API (called by the platform glue) ==========

    /// Clears per-frame state. Called after the controls consumed it.
    pub fn end_frame(&mut self) {
        self.just_pressed_mouse.clear();
        self.mouse_delta = Vec2::ZERO;
        self.scroll_delta = Vec2::ZERO;
    }

    pub fn inject_mouse_button(&mut self, button: MouseButton, state: ButtonState) {
        match state {
            ButtonState::Pressed => {
                if self.pressed_mouse.insert(button) {
                    self.just_pressed_mouse.insert(button);
                }
            }
            ButtonState::Released => {
                self.pressed_mouse.remove(&button);
            }
        }
    }

    /// The first position after creation produces no delta.
    pub fn inject_mouse_position(&mut self, x: f32, y: f32) {
        let new_pos = Vec2::new(x, y);
        if let Some(old) = self.mouse_position {
            self.mouse_delta += new_pos - old;
        }
        self.mouse_position = Some(new_pos);
    }

    /// Positive `delta_y` zooms in.
    pub fn inject_scroll(&mut self, delta_x: f32, delta_y: f32) {
        self.scroll_delta += Vec2::new(delta_x, delta_y);
    }

    pub fn inject_resize(&mut self, width: u32, height: u32) {
        self.screen_size = Vec2::new(width as f32, height as f32);
    }

    // ========== Queries ==========

    #[must_use]
    pub fn get_mouse_button(&self, button: MouseButton) -> bool {
        self.pressed_mouse.contains(&button)
    }

    #[must_use]
    pub fn get_mouse_button_down(&self, button: MouseButton) -> bool {
        self.just_pressed_mouse.contains(&button)
    }

    #[must_use]
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position.unwrap_or(Vec2::ZERO)
    }

    #[must_use]
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    #[must_use]
    pub fn scroll_delta(&self) -> Vec2 {
        self.scroll_delta
    }

    #[must_use]
    pub fn screen_size(&self) -> Vec2 {
        self.screen_size
    }
}
