//! Tween System
//!
//! Property tweens in the style of a keyframe clip played once: each
//! [`TweenSpec`] drives one [`TweenProperty`] from the value it holds when the
//! tween starts to a fixed end value over a fixed duration.
//!
//! Tweens carry a caller-defined cue instead of callbacks. The
//! [`TweenMixer`] reports `Started`, `Completed` and `Failed` events tagged
//! with that cue, and the caller decides what to chain next.

pub mod action;
pub mod binding;
pub mod easing;
pub mod mixer;
pub mod values;

pub use action::{Tween, TweenSpec};
pub use binding::{StartValue, TweenProperty, TweenTargets};
pub use easing::Easing;
pub use mixer::{TweenEvent, TweenEventKind, TweenId, TweenMixer};
pub use values::{Interpolatable, PartialVec3};
