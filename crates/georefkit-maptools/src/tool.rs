//! Common scaffolding for the interactive map tools.
//!
//! A tool consumes pointer events (press, move, release) over the map
//! canvas, previews the pending placement through a
//! [`RasterShadow`](georefkit_raster::RasterShadow), and commits to the
//! active layer on release. Every tool is a single-gesture state machine;
//! `reset()` clears the session unconditionally and is safe to call at any
//! time (tool switch, layer change, undo).
//!
//! The host supplies two collaborators: [`MapView`], the pixel↔world
//! mapping of its canvas, and [`ScaleDpiPrompt`], the modal numeric prompt
//! used by the scale tool's secondary-button path.

use georefkit_core::{Point, ScreenPos};
use georefkit_raster::RasterLayer;

/// Keyboard modifiers captured with a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Control key; switches rotate to around-a-point and scale to uniform.
    pub control: bool,
}

/// Which pointer button an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// One pointer event in canvas device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pos: ScreenPos,
    pub button: PointerButton,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// A primary-button event without modifiers.
    pub fn primary(pos: ScreenPos) -> Self {
        Self {
            pos,
            button: PointerButton::Primary,
            modifiers: Modifiers::default(),
        }
    }

    /// A secondary-button event without modifiers.
    pub fn secondary(pos: ScreenPos) -> Self {
        Self {
            pos,
            button: PointerButton::Secondary,
            modifiers: Modifiers::default(),
        }
    }

    /// The same event with the control modifier set.
    pub fn with_control(mut self) -> Self {
        self.modifiers.control = true;
        self
    }
}

/// The host canvas: bidirectional pixel↔world mapping plus dimensions.
pub trait MapView {
    /// Converts a canvas position to world (map) coordinates.
    fn to_map_coordinates(&self, pos: ScreenPos) -> Point;

    /// Converts a world point to a canvas position.
    fn map_to_pixel(&self, point: Point) -> ScreenPos;

    /// World units covered by one device pixel.
    fn map_units_per_pixel(&self) -> f64;

    fn canvas_width(&self) -> f64;

    fn canvas_height(&self) -> f64;
}

/// Modal numeric prompt for the scale tool's `scale,dpi` path. Returning
/// `None` means the user canceled.
pub trait ScaleDpiPrompt {
    fn request_scale_dpi(&mut self) -> Option<String>;
}

/// Behavior shared by all map tools.
pub trait MapTool {
    /// Clears the gesture session and all preview state. Idempotent;
    /// callable whether or not a gesture is in progress.
    fn reset(&mut self);

    /// Called when the tool is unbound from the canvas.
    fn deactivate(&mut self) {
        self.reset();
    }

    /// True while a press-drag-release cycle is in progress.
    fn is_dragging(&self) -> bool;
}

/// Undoes the last committed gesture on `layer`.
///
/// The active tool (if any) is reset first: undo invalidates the pre-state
/// an in-progress gesture captured, so its session must not survive.
pub fn undo_last_action(layer: &mut RasterLayer, active_tool: Option<&mut dyn MapTool>) -> bool {
    if let Some(tool) = active_tool {
        tool.reset();
    }
    layer.undo()
}

/// Closes a corner polygon into a drawable outline (first point repeated).
pub(crate) fn close_outline(corners: [Point; 4]) -> Vec<Point> {
    vec![corners[0], corners[1], corners[2], corners[3], corners[0]]
}

/// Length guard below which a gesture reference is considered degenerate
/// and the gesture refuses to derive a scale from it.
pub(crate) const DEGENERATE_EPS: f64 = 1e-12;
