//! Live drag preview of a raster placement.
//!
//! During a drag the real layer is hidden and this shadow stands in for it:
//! a set of pending deltas over the committed transform. All geometry is
//! derived through the model's pure functions with adjusted inputs — the
//! committed model is never touched, and every derivation is closed-form so
//! it can run on every pointer move.

use georefkit_core::{Point, WorldRect};

use crate::transform::AffineTransformModel;

/// What the host needs to paint the shadow: the displaced center, the total
/// rotation, and per-axis device-pixel scale factors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowDrawParameters {
    pub center: Point,
    /// Committed rotation plus the pending delta, degrees clockwise.
    pub rotation: f64,
    /// Device pixels per raster pixel along X.
    pub screen_x_scale: f64,
    /// Device pixels per raster pixel along Y.
    pub screen_y_scale: f64,
}

/// Pending transform deltas for the drag preview.
#[derive(Debug, Clone, Copy)]
pub struct RasterShadow {
    dx: f64,
    dy: f64,
    d_rotation: f64,
    fx_scale: f64,
    fy_scale: f64,
    /// Fixed point for around-a-point rotation/scale; displacement deltas
    /// are ignored while set.
    fixed_point: Option<Point>,
    visible: bool,
}

impl Default for RasterShadow {
    fn default() -> Self {
        Self {
            dx: 0.0,
            dy: 0.0,
            d_rotation: 0.0,
            fx_scale: 1.0,
            fy_scale: 1.0,
            fixed_point: None,
            visible: false,
        }
    }
}

impl RasterShadow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all pending deltas and hides the shadow.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_delta_displacement(&mut self, dx: f64, dy: f64) {
        self.dx = dx;
        self.dy = dy;
    }

    pub fn set_delta_rotation(&mut self, rotation: f64) {
        self.d_rotation = rotation;
    }

    pub fn set_delta_scale(&mut self, fx_scale: f64, fy_scale: f64) {
        self.fx_scale = fx_scale;
        self.fy_scale = fy_scale;
    }

    /// Pending rotation (and optionally scale, set separately) around a
    /// fixed map point instead of the layer center.
    pub fn set_delta_rotation_from_point(&mut self, rotation: f64, fixed_point: Point) {
        self.d_rotation = rotation;
        self.fixed_point = Some(fixed_point);
    }

    /// Corner geometry that would result if the pending deltas were
    /// committed.
    pub fn corner_coordinates(&self, model: &AffineTransformModel) -> [Point; 4] {
        match self.fixed_point {
            Some(fixed) => model.transformed_corner_coordinates_from_point(
                fixed,
                self.d_rotation,
                self.fx_scale,
                self.fy_scale,
            ),
            None => model.transformed_corner_coordinates(
                model.center().translated(self.dx, self.dy),
                model.rotation() + self.d_rotation,
                model.x_scale() * self.fx_scale,
                model.y_scale() * self.fy_scale,
            ),
        }
    }

    /// Axis-aligned bounds of the preview geometry.
    pub fn bounding_rect(&self, model: &AffineTransformModel) -> WorldRect {
        WorldRect::from_points(&self.corner_coordinates(model))
    }

    /// Paint parameters for the host canvas at the given map resolution.
    pub fn draw_parameters(
        &self,
        model: &AffineTransformModel,
        map_units_per_pixel: f64,
    ) -> ShadowDrawParameters {
        let corners = self.corner_coordinates(model);
        ShadowDrawParameters {
            center: corners[0].midpoint(&corners[2]),
            rotation: model.rotation() + self.d_rotation,
            screen_x_scale: model.x_scale() * self.fx_scale / map_units_per_pixel,
            screen_y_scale: model.y_scale() * self.fy_scale / map_units_per_pixel,
        }
    }
}
