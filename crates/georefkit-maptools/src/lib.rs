//! # GeorefKit Map Tools
//!
//! The interactive gesture interpreters for GeorefKit: move, rotate, scale,
//! side adjustment, and two-point georeferencing, plus the canvas seam
//! ([`MapView`]) they consume and a concrete [`Viewport`] implementation.
//!
//! Each tool follows the same lifecycle: `canvas_press_event` captures the
//! pre-gesture state and records the undo entry, `canvas_move_event`
//! updates the live preview (shadow + rubber-band outlines), and
//! `canvas_release_event` commits to the layer. The host draws the preview
//! geometry; the tools never render.

pub mod adjust_tool;
pub mod move_tool;
pub mod rotate_tool;
pub mod scale_tool;
pub mod tool;
pub mod two_point_tool;
pub mod viewport;

pub use adjust_tool::{AdjustRasterTool, Side};
pub use move_tool::MoveRasterTool;
pub use rotate_tool::RotateRasterTool;
pub use scale_tool::ScaleRasterTool;
pub use tool::{
    undo_last_action, MapTool, MapView, Modifiers, PointerButton, PointerEvent, ScaleDpiPrompt,
};
pub use two_point_tool::TwoPointGeorefTool;
pub use viewport::Viewport;
