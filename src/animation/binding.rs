use glam::Vec3;

use crate::animation::values::PartialVec3;
use crate::app::ui::UiElement;
use crate::scene::NodeHandle;

/// Defines the property a tween drives and the value it ends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenProperty {
    /// Maps to `node.transform.position`; unnamed axes are left untouched.
    Position { node: NodeHandle, to: PartialVec3 },
    /// Maps to the CSS opacity of a UI element.
    Opacity { element: UiElement, to: f32 },
}

impl TweenProperty {
    /// Short human readable description, used in failure reports.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            TweenProperty::Position { node, .. } => format!("position of node {node:?}"),
            TweenProperty::Opacity { element, .. } => format!("opacity of {element:?}"),
        }
    }
}

/// Value captured from the target when a tween starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StartValue {
    Position(Vec3),
    Opacity(f32),
}

/// Resolves tween properties against the live scene and UI.
///
/// Reads return `None` and writes return `false` when the target is gone.
pub trait TweenTargets {
    fn position(&self, node: NodeHandle) -> Option<Vec3>;
    fn set_position(&mut self, node: NodeHandle, value: Vec3) -> bool;
    fn opacity(&self, element: UiElement) -> Option<f32>;
    fn set_opacity(&mut self, element: UiElement, value: f32) -> bool;
}
