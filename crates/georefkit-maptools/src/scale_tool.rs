//! Drag tool: scale the raster.
//!
//! A primary-button drag scales each axis by how far the pointer travels
//! across the canvas (Control keeps the two factors equal). The secondary
//! button instead asks the host for a `scale,dpi` pair and derives an
//! absolute isotropic scale from it; canceling or mistyping the prompt
//! aborts the gesture without touching the model.

use tracing::debug;

use georefkit_core::{InputError, Point, ScaleDpi, ScreenPos};
use georefkit_raster::{HistoryEntry, RasterLayer, RasterShadow};

use crate::tool::{
    close_outline, MapTool, MapView, PointerButton, PointerEvent, ScaleDpiPrompt,
};

struct ScaleSession {
    start: ScreenPos,
    end: ScreenPos,
    canvas_width: f64,
    canvas_height: f64,
    keep_relative_scale: bool,
    was_visible: bool,
}

impl ScaleSession {
    /// Per-axis scale factors for the current drag. The 1.1 divisor keeps a
    /// full-canvas drag short of collapsing the raster to nothing.
    fn scaling(&self) -> (f64, f64) {
        let dx = -(self.end.x - self.start.x);
        let dy = self.end.y - self.start.y;
        let x_factor = 1.0 - dx / (self.canvas_width * 1.1);
        let y_factor = 1.0 - dy / (self.canvas_height * 1.1);
        if self.keep_relative_scale {
            (x_factor, x_factor)
        } else {
            (x_factor, y_factor)
        }
    }
}

/// Scales the active raster.
#[derive(Default)]
pub struct ScaleRasterTool {
    shadow: RasterShadow,
    session: Option<ScaleSession>,
    preview_outline: Option<Vec<Point>>,
}

impl ScaleRasterTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Both buttons record the pre-state; only the primary button starts a
    /// drag session.
    pub fn canvas_press_event(
        &mut self,
        layer: &mut RasterLayer,
        view: &dyn MapView,
        event: &PointerEvent,
    ) {
        if event.button == PointerButton::Primary {
            let session = ScaleSession {
                start: event.pos,
                end: event.pos,
                canvas_width: view.canvas_width(),
                canvas_height: view.canvas_height(),
                keep_relative_scale: event.modifiers.control,
                was_visible: layer.is_visible(),
            };

            layer.set_visible(false);
            self.shadow.reset();
            self.shadow.show();
            self.session = Some(session);
            self.update_preview(layer);
        }
        layer.history_mut().push(HistoryEntry::Scale {
            x_scale: layer.transform().x_scale(),
            y_scale: layer.transform().y_scale(),
        });
    }

    pub fn canvas_move_event(&mut self, layer: &RasterLayer, event: &PointerEvent) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.end = event.pos;
        self.update_preview(layer);
    }

    /// Commits the drag factors (primary) or prompts for `scale,dpi`
    /// (secondary). A canceled prompt aborts silently; malformed input
    /// aborts with the error for the host to display. Both aborts discard
    /// the history entry pushed at press time.
    pub fn canvas_release_event(
        &mut self,
        layer: &mut RasterLayer,
        event: &PointerEvent,
        prompt: &mut dyn ScaleDpiPrompt,
    ) -> Result<(), InputError> {
        match event.button {
            PointerButton::Primary => {
                let Some(mut session) = self.session.take() else {
                    return Ok(());
                };
                session.end = event.pos;

                let (x_factor, y_factor) = session.scaling();
                let transform = layer.transform_mut();
                let (x_scale, y_scale) = (transform.x_scale(), transform.y_scale());
                transform.set_scale(x_factor * x_scale, y_factor * y_scale);

                layer.set_visible(session.was_visible);
                self.shadow.reset();
                self.preview_outline = None;
                layer.commit_transform_parameters();
                Ok(())
            }
            PointerButton::Secondary => {
                let Some(input) = prompt.request_scale_dpi() else {
                    debug!("scale prompt canceled, discarding gesture");
                    layer.history_mut().pop();
                    return Ok(());
                };
                let scale_dpi: ScaleDpi = match input.parse() {
                    Ok(parsed) => parsed,
                    Err(err) => {
                        debug!(%input, "malformed scale,dpi input, discarding gesture");
                        layer.history_mut().pop();
                        return Err(err);
                    }
                };

                let units_per_pixel = scale_dpi.world_units_per_pixel();
                layer
                    .transform_mut()
                    .set_scale(units_per_pixel, units_per_pixel);
                layer.commit_transform_parameters();
                Ok(())
            }
        }
    }

    /// Closed outline of the scaled raster.
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
        let (x_factor, y_factor) = session.scaling();
        if x_factor == 0.0 && y_factor == 0.0 {
            return;
        }
        self.shadow.set_delta_scale(x_factor, y_factor);

        let transform = layer.transform();
        let corners = transform.transformed_corner_coordinates(
            transform.center(),
            transform.rotation(),
            x_factor * transform.x_scale(),
            y_factor * transform.y_scale(),
        );
        self.preview_outline = Some(close_outline(corners));
    }
}

impl MapTool for ScaleRasterTool {
    fn reset(&mut self) {
        self.session = None;
        self.preview_outline = None;
        self.shadow.reset();
    }

    fn is_dragging(&self) -> bool {
        self.session.is_some()
    }
}
