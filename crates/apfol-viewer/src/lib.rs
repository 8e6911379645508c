//! Rotation control for the Apfol 3D product viewer.
//!
//! Rendering and asset loading belong to the host's rendering engine. This
//! crate decides which angle to draw each frame.
//!
//! ```rust
//! use apfol_viewer::{ActiveInput, Pointer, RotationController};
//! use std::time::Duration;
//!
//! let mut viewer = RotationController::default();
//! viewer.on_scroll(0.5, Duration::ZERO);
//! assert_eq!(viewer.active_input(Duration::from_millis(10)), ActiveInput::Scroll);
//!
//! viewer.pointer_down(Pointer::mouse(0.0, 0.0));
//! assert_eq!(viewer.active_input(Duration::from_millis(20)), ActiveInput::Drag);
//! ```

mod model;
mod rotation;

pub use model::{fit_scale, BoundsSize, FIT_SIZE};
pub use rotation::{
    ActiveInput, Pointer, Rotation, RotationController, ViewerConfig, AUTO_ROTATE_BOUND,
    AUTO_ROTATE_SPEED, DEFAULT_INITIAL_YAW, DEFAULT_ROTATION_RANGE, DRAG_PITCH_PER_PIXEL,
    DRAG_YAW_PER_PIXEL, EASING, PITCH_LIMIT, SCROLL_PITCH_DECAY, SCROLL_QUIET_PERIOD,
};
