//! Drag tool: adjust one side of the raster.
//!
//! The side nearest the press point moves along the axis through the
//! raster center; the opposite side stays fixed. Only the axis
//! perpendicular to the fixed side rescales, and the moved side is clamped
//! so it can never cross 95% of the way to the fixed side.

use tracing::warn;

use georefkit_core::{point_to_segment_distance, Point};
use georefkit_raster::{HistoryEntry, RasterLayer, RasterShadow};

use crate::tool::{close_outline, MapTool, MapView, PointerEvent, DEGENERATE_EPS};

/// A side of the placed raster rectangle, in the fixed hit-test order.
///
/// The mapping to corner indices of the (top-left, top-right, bottom-right,
/// bottom-left) corner array is an explicit table, not a positional
/// coincidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// Hit-test order; opposite sides are two apart.
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    /// Indices of this side's endpoints in the corner array.
    pub fn corner_indices(self) -> (usize, usize) {
        match self {
            Side::Top => (0, 1),
            Side::Right => (1, 2),
            Side::Bottom => (2, 3),
            Side::Left => (3, 0),
        }
    }

    /// The side that stays fixed while this one is adjusted.
    pub fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
        }
    }

    /// Whether adjusting this side rescales the X axis (otherwise Y).
    pub fn scales_x(self) -> bool {
        matches!(self, Side::Right | Side::Left)
    }

    fn midpoint(self, corners: &[Point; 4]) -> Point {
        let (a, b) = self.corner_indices();
        corners[a].midpoint(&corners[b])
    }
}

struct AdjustSession {
    side: Side,
    side_mid: Point,
    /// Unit vector from the layer center through the adjusted side.
    direction: (f64, f64),
    reference_mid: Point,
    reference_distance: f64,
    start_point: Point,
    end_point: Point,
    was_visible: bool,
}

impl AdjustSession {
    /// New center and per-axis factors for the current drag, with the moved
    /// side clamped at 95% of the way to the reference side.
    fn adjustment(&self) -> (Point, f64, f64) {
        let dx = self.end_point.x - self.start_point.x;
        let dy = self.end_point.y - self.start_point.y;
        let mut projected = dx * self.direction.0 + dy * self.direction.1;

        // Do not go beyond 5% of the current side distance
        if projected < -0.95 * self.reference_distance {
            projected = -0.95 * self.reference_distance;
        }

        let moved_mid = Point::new(
            self.side_mid.x + projected * self.direction.0,
            self.side_mid.y + projected * self.direction.1,
        );
        let center = self.reference_mid.midpoint(&moved_mid);
        let factor = self.reference_mid.distance_to(&moved_mid) / self.reference_distance;
        if self.side.scales_x() {
            (center, factor, 1.0)
        } else {
            (center, 1.0, factor)
        }
    }
}

/// Adjusts one side of the active raster.
#[derive(Default)]
pub struct AdjustRasterTool {
    shadow: RasterShadow,
    session: Option<AdjustSession>,
    preview_outline: Option<Vec<Point>>,
    preview_side: Option<[Point; 2]>,
}

impl AdjustRasterTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn canvas_press_event(
        &mut self,
        layer: &mut RasterLayer,
        view: &dyn MapView,
        event: &PointerEvent,
    ) {
        let click = view.to_map_coordinates(event.pos);
        let corners = layer.transform().corner_coordinates();

        // Nearest side wins; ties resolve to the earlier side in ALL order.
        let mut side = Side::ALL[0];
        let mut best = side_distance(&click, side, &corners);
        for candidate in Side::ALL.into_iter().skip(1) {
            let distance = side_distance(&click, candidate, &corners);
            if distance < best {
                best = distance;
                side = candidate;
            }
        }

        let side_mid = side.midpoint(&corners);
        let reference_mid = side.opposite().midpoint(&corners);
        let reference_distance = side_mid.distance_to(&reference_mid);

        let center = layer.transform().center();
        let direction = (side_mid.x - center.x, side_mid.y - center.y);
        let norm = (direction.0 * direction.0 + direction.1 * direction.1).sqrt();
        if norm < DEGENERATE_EPS || reference_distance < DEGENERATE_EPS {
            warn!(
                reference_distance,
                "degenerate raster geometry, ignoring adjust gesture"
            );
            return;
        }

        let session = AdjustSession {
            side,
            side_mid,
            direction: (direction.0 / norm, direction.1 / norm),
            reference_mid,
            reference_distance,
            start_point: click,
            end_point: click,
            was_visible: layer.is_visible(),
        };

        let x_scale = layer.transform().x_scale();
        let y_scale = layer.transform().y_scale();
        layer.history_mut().push(HistoryEntry::Adjust {
            center,
            x_scale,
            y_scale,
        });
        layer.set_visible(false);

        self.shadow.reset();
        self.shadow.show();
        self.session = Some(session);
        self.update_preview(layer);
    }

    pub fn canvas_move_event(
        &mut self,
        layer: &RasterLayer,
        view: &dyn MapView,
        event: &PointerEvent,
    ) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.end_point = view.to_map_coordinates(event.pos);
        self.update_preview(layer);
    }

    pub fn canvas_release_event(
        &mut self,
        layer: &mut RasterLayer,
        view: &dyn MapView,
        event: &PointerEvent,
    ) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        session.end_point = view.to_map_coordinates(event.pos);

        let (center, x_factor, y_factor) = session.adjustment();
        let transform = layer.transform_mut();
        let (x_scale, y_scale) = (transform.x_scale(), transform.y_scale());
        transform.set_center(center);
        transform.set_scale(x_factor * x_scale, y_factor * y_scale);

        layer.set_visible(session.was_visible);
        self.shadow.reset();
        self.preview_outline = None;
        self.preview_side = None;
        layer.commit_transform_parameters();
    }

    /// Closed outline of the adjusted raster.
    pub fn preview_outline(&self) -> Option<&[Point]> {
        self.preview_outline.as_deref()
    }

    /// The adjusted side segment, highlighted by the host.
    pub fn adjusted_side(&self) -> Option<[Point; 2]> {
        self.preview_side
    }

    pub fn shadow(&self) -> &RasterShadow {
        &self.shadow
    }

    fn update_preview(&mut self, layer: &RasterLayer) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let (center, x_factor, y_factor) = session.adjustment();
        let transform = layer.transform();

        self.shadow.set_delta_displacement(
            center.x - transform.center().x,
            center.y - transform.center().y,
        );
        self.shadow.set_delta_scale(x_factor, y_factor);

        let corners = transform.transformed_corner_coordinates(
            center,
            transform.rotation(),
            x_factor * transform.x_scale(),
            y_factor * transform.y_scale(),
        );
        let (a, b) = session.side.corner_indices();
        self.preview_side = Some([corners[a], corners[b]]);
        self.preview_outline = Some(close_outline(corners));
    }
}

fn side_distance(click: &Point, side: Side, corners: &[Point; 4]) -> f64 {
    let (a, b) = side.corner_indices();
    point_to_segment_distance(click, &corners[a], &corners[b])
}

impl MapTool for AdjustRasterTool {
    fn reset(&mut self) {
        self.session = None;
        self.preview_outline = None;
        self.preview_side = None;
        self.shadow.reset();
    }

    fn is_dragging(&self) -> bool {
        self.session.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_table_is_consistent() {
        for side in Side::ALL {
            assert_eq!(side.opposite().opposite(), side);
            assert_eq!(side.scales_x(), side.opposite().scales_x());
        }
        assert!(Side::Right.scales_x());
        assert!(!Side::Top.scales_x());
    }

    #[test]
    fn test_side_midpoints_on_unit_square() {
        let corners = [
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 0.0),
        ];
        assert_eq!(Side::Top.midpoint(&corners), Point::new(0.5, 1.0));
        assert_eq!(Side::Right.midpoint(&corners), Point::new(1.0, 0.5));
        assert_eq!(Side::Bottom.midpoint(&corners), Point::new(0.5, 0.0));
        assert_eq!(Side::Left.midpoint(&corners), Point::new(0.0, 0.5));
    }
}
