//! Utility Module
//!
//! - [`OrbitControls`]: damped camera orbit with angle and distance limits
//! - [`Timer`]: frame timing

pub mod orbit_control;
pub mod time;

pub use orbit_control::OrbitControls;
pub use time::Timer;
