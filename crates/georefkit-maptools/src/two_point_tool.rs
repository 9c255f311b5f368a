//! Two-point conformal georeferencing tool.
//!
//! Two press-drag-release cycles. The first drags a recognizable raster
//! feature onto its true map position — a pure translation whose end point
//! becomes the anchor. The second drags a different feature onto its true
//! position: the rotation and uniform scale that carry the second point
//! around the anchor are derived from the two drag vectors and committed
//! together. After the second release the tool waits for a fresh first
//! point.

use tracing::warn;

use georefkit_core::Point;
use georefkit_raster::{HistoryEntry, RasterLayer, RasterShadow};

use crate::tool::{close_outline, MapTool, MapView, PointerEvent, DEGENERATE_EPS};

struct TwoPointSession {
    start_point: Point,
    end_point: Point,
    /// Captured center for the translation phase.
    original_center: Point,
    original_corners: [Point; 4],
    was_visible: bool,
}

/// Georeferences the active raster with two point pairs.
#[derive(Default)]
pub struct TwoPointGeorefTool {
    shadow: RasterShadow,
    first_point: Option<Point>,
    session: Option<TwoPointSession>,
    preview_outline: Option<Vec<Point>>,
}

impl TwoPointGeorefTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// The committed anchor, once the first cycle completed.
    pub fn first_point(&self) -> Option<Point> {
        self.first_point
    }

    pub fn canvas_press_event(
        &mut self,
        layer: &mut RasterLayer,
        view: &dyn MapView,
        event: &PointerEvent,
    ) {
        let start_point = view.to_map_coordinates(event.pos);
        let session = TwoPointSession {
            start_point,
            end_point: start_point,
            original_center: layer.transform().center(),
            original_corners: layer.transform().corner_coordinates(),
            was_visible: layer.is_visible(),
        };

        if self.first_point.is_none() {
            layer.history_mut().push(HistoryEntry::TwoPointsA {
                center: layer.transform().center(),
            });
        } else {
            layer.history_mut().push(HistoryEntry::TwoPointsB {
                rotation: layer.transform().rotation(),
                center: layer.transform().center(),
                x_scale: layer.transform().x_scale(),
                y_scale: layer.transform().y_scale(),
            });
        }
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

        self.shadow.reset();
        self.preview_outline = None;

        match self.first_point {
            None => {
                // First cycle: commit the translation, remember the anchor.
                let dx = session.end_point.x - session.start_point.x;
                let dy = session.end_point.y - session.start_point.y;
                layer
                    .transform_mut()
                    .set_center(session.original_center.translated(dx, dy));
                self.first_point = Some(session.end_point);

                layer.set_visible(session.was_visible);
                layer.commit_transform_parameters();
            }
            Some(first) => {
                let anchor_distance = session.start_point.distance_to(&first);
                if anchor_distance < DEGENERATE_EPS {
                    // A second press on the anchor itself has no defined
                    // rotation or scale; drop the gesture.
                    warn!("second georeferencing point coincides with the anchor, ignoring");
                    layer.history_mut().pop();
                    layer.set_visible(session.was_visible);
                    return;
                }

                let rotation = compute_rotation(first, &session);
                let scale = compute_scale(first, &session);
                layer
                    .transform_mut()
                    .move_center_from_point_rotate(first, rotation, scale, scale);
                let total = layer.transform().rotation() + rotation;
                layer.transform_mut().set_rotation(total);
                let transform = layer.transform_mut();
                let (x_scale, y_scale) = (transform.x_scale(), transform.y_scale());
                transform.set_scale(x_scale * scale, y_scale * scale);

                layer.set_visible(session.was_visible);
                layer.commit_transform_parameters();

                // Await a fresh first point
                self.first_point = None;
            }
        }
    }

    /// The guide polyline start → anchor → pointer (or press → pointer in
    /// the first cycle).
    pub fn displacement_guide(&self) -> Option<Vec<Point>> {
        let session = self.session.as_ref()?;
        match self.first_point {
            Some(first) => Some(vec![session.start_point, first, session.end_point]),
            None => Some(vec![session.start_point, session.end_point]),
        }
    }

    /// Closed outline of the previewed raster.
    pub fn preview_outline(&self) -> Option<&[Point]> {
        self.preview_outline.as_deref()
    }

    pub fn shadow(&self) -> &RasterShadow {
        &self.shadow
    }

    fn update_preview(&mut self, layer: &RasterLayer) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let transform = layer.transform();
        let corners = match self.first_point {
            None => {
                let dx = session.end_point.x - session.start_point.x;
                let dy = session.end_point.y - session.start_point.y;
                self.shadow.set_delta_displacement(dx, dy);
                session.original_corners.map(|p| p.translated(dx, dy))
            }
            Some(first) => {
                if session.start_point.distance_to(&first) < DEGENERATE_EPS {
                    return;
                }
                let rotation = compute_rotation(first, session);
                let scale = compute_scale(first, session);
                self.shadow.set_delta_rotation_from_point(rotation, first);
                self.shadow.set_delta_scale(scale, scale);
                transform.transformed_corner_coordinates_from_point(first, rotation, scale, scale)
            }
        };
        self.preview_outline = Some(close_outline(corners));
    }
}

/// Angle between the anchor→start and anchor→pointer directions, degrees
/// clockwise-positive.
fn compute_rotation(first: Point, session: &TwoPointSession) -> f64 {
    let dx0 = session.start_point.x - first.x;
    let dy0 = session.start_point.y - first.y;
    let dx = session.end_point.x - first.x;
    let dy = session.end_point.y - first.y;
    ((-dy).atan2(dx) - (-dy0).atan2(dx0)).to_degrees()
}

/// Ratio of the anchor→pointer and anchor→start distances.
fn compute_scale(first: Point, session: &TwoPointSession) -> f64 {
    let dx0 = session.start_point.x - first.x;
    let dy0 = session.start_point.y - first.y;
    let dx = session.end_point.x - first.x;
    let dy = session.end_point.y - first.y;
    ((dx * dx + dy * dy) / (dx0 * dx0 + dy0 * dy0)).sqrt()
}

impl MapTool for TwoPointGeorefTool {
    fn reset(&mut self) {
        self.session = None;
        self.first_point = None;
        self.preview_outline = None;
        self.shadow.reset();
    }

    fn is_dragging(&self) -> bool {
        self.session.is_some()
    }
}
