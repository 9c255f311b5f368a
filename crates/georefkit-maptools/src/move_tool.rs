//! Drag tool: translate the raster.

use georefkit_core::Point;
use georefkit_raster::{HistoryEntry, RasterLayer, RasterShadow};

use crate::tool::{close_outline, MapTool, MapView, PointerEvent};

struct MoveSession {
    start_point: Point,
    end_point: Point,
    original_center: Point,
    original_corners: [Point; 4],
    was_visible: bool,
}

impl MoveSession {
    fn delta(&self) -> (f64, f64) {
        (
            self.end_point.x - self.start_point.x,
            self.end_point.y - self.start_point.y,
        )
    }

    fn preview_outline(&self) -> Vec<Point> {
        let (dx, dy) = self.delta();
        close_outline(self.original_corners.map(|p| p.translated(dx, dy)))
    }
}

/// Translates the active raster by the drag delta.
#[derive(Default)]
pub struct MoveRasterTool {
    shadow: RasterShadow,
    session: Option<MoveSession>,
    preview_outline: Option<Vec<Point>>,
}

impl MoveRasterTool {
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
        let session = MoveSession {
            start_point,
            end_point: start_point,
            original_center: layer.transform().center(),
            original_corners: layer.transform().corner_coordinates(),
            was_visible: layer.is_visible(),
        };

        layer.history_mut().push(HistoryEntry::Move {
            center: layer.transform().center(),
        });
        layer.set_visible(false);

        self.shadow.reset();
        self.shadow.set_delta_displacement(0.0, 0.0);
        self.shadow.show();
        self.preview_outline = Some(session.preview_outline());
        self.session = Some(session);
    }

    pub fn canvas_move_event(&mut self, view: &dyn MapView, event: &PointerEvent) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.end_point = view.to_map_coordinates(event.pos);
        let (dx, dy) = session.delta();
        let outline = session.preview_outline();

        self.shadow.set_delta_displacement(dx, dy);
        self.preview_outline = Some(outline);
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

        let (dx, dy) = session.delta();
        let center = session.original_center.translated(dx, dy);
        layer.transform_mut().set_center(center);

        layer.set_visible(session.was_visible);
        self.shadow.reset();
        self.preview_outline = None;
        layer.commit_transform_parameters();
    }

    /// The drag line from press point to current pointer, for the host to
    /// draw.
    pub fn displacement_line(&self) -> Option<[Point; 2]> {
        self.session.as_ref().map(|s| [s.start_point, s.end_point])
    }

    /// Closed outline of the displaced raster.
    pub fn preview_outline(&self) -> Option<&[Point]> {
        self.preview_outline.as_deref()
    }

    pub fn shadow(&self) -> &RasterShadow {
        &self.shadow
    }
}

impl MapTool for MoveRasterTool {
    fn reset(&mut self) {
        self.session = None;
        self.preview_outline = None;
        self.shadow.reset();
    }

    fn is_dragging(&self) -> bool {
        self.session.is_some()
    }
}
