//! Drag tool: rotate the raster.
//!
//! Two modes, chosen at press time: a plain vertical drag rotates around
//! the raster's own center (full canvas height sweeps 90°); with Control
//! held, the raster rotates around the pressed map point and the angle
//! follows the pointer around that point.

use georefkit_core::Point;
use georefkit_raster::{HistoryEntry, RasterLayer, RasterShadow};

use crate::tool::{close_outline, MapTool, MapView, PointerEvent};

struct RotateSession {
    around_point: bool,
    start_point: Point,
    end_point: Point,
    start_screen_y: f64,
    end_screen_y: f64,
    canvas_height: f64,
    was_visible: bool,
}

impl RotateSession {
    fn rotation(&self) -> f64 {
        if self.around_point {
            let dx = self.end_point.x - self.start_point.x;
            let dy = self.end_point.y - self.start_point.y;
            (-dy).atan2(dx).to_degrees()
        } else {
            90.0 * (self.end_screen_y - self.start_screen_y) / self.canvas_height
        }
    }
}

/// Rotates the active raster.
#[derive(Default)]
pub struct RotateRasterTool {
    shadow: RasterShadow,
    session: Option<RotateSession>,
    preview_outline: Option<Vec<Point>>,
}

impl RotateRasterTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn canvas_press_event(
        &mut self,
        layer: &mut RasterLayer,
        view: &dyn MapView,
        event: &PointerEvent,
    ) {
        let start_point = view.to_map_coordinates(event.pos);
        let session = RotateSession {
            around_point: event.modifiers.control,
            start_point,
            end_point: start_point,
            start_screen_y: event.pos.y,
            end_screen_y: event.pos.y,
            canvas_height: view.canvas_height(),
            was_visible: layer.is_visible(),
        };

        layer.history_mut().push(HistoryEntry::Rotation {
            rotation: layer.transform().rotation(),
            center: layer.transform().center(),
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
        session.end_screen_y = event.pos.y;
        session.end_point = view.to_map_coordinates(event.pos);
        self.update_preview(layer);
    }

    pub fn canvas_release_event(&mut self, layer: &mut RasterLayer, _event: &PointerEvent) {
        let Some(session) = self.session.take() else {
            return;
        };

        let rotation = session.rotation();
        if session.around_point {
            layer
                .transform_mut()
                .move_center_from_point_rotate(session.start_point, rotation, 1.0, 1.0);
        }
        let total = layer.transform().rotation() + rotation;
        layer.transform_mut().set_rotation(total);

        layer.set_visible(session.was_visible);
        self.shadow.reset();
        self.preview_outline = None;
        layer.commit_transform_parameters();
    }

    /// The angle reference line (horizontal leg plus pointer leg) when
    /// rotating around a point.
    pub fn angle_guide(&self) -> Option<[Point; 3]> {
        let session = self.session.as_ref().filter(|s| s.around_point)?;
        Some([
            Point::new(session.start_point.x + 10.0, session.start_point.y),
            session.start_point,
            session.end_point,
        ])
    }

    /// Closed outline of the rotated raster.
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
        let rotation = session.rotation();
        let transform = layer.transform();
        let corners = if session.around_point {
            self.shadow
                .set_delta_rotation_from_point(rotation, session.start_point);
            transform.transformed_corner_coordinates_from_point(
                session.start_point,
                rotation,
                1.0,
                1.0,
            )
        } else {
            self.shadow.set_delta_rotation(rotation);
            transform.transformed_corner_coordinates(
                transform.center(),
                transform.rotation() + rotation,
                transform.x_scale(),
                transform.y_scale(),
            )
        };
        self.preview_outline = Some(close_outline(corners));
    }
}

impl MapTool for RotateRasterTool {
    fn reset(&mut self) {
        self.session = None;
        self.preview_outline = None;
        self.shadow.reset();
    }

    fn is_dragging(&self) -> bool {
        self.session.is_some()
    }
}
