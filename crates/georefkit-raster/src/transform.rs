//! The affine placement model for one raster.
//!
//! A placement is `(center, rotation, x_scale, y_scale)` over a raster of
//! fixed pixel dimensions. Corner geometry is always derived from these
//! parameters by pure functions — no corner is ever stored, so preview,
//! commit, and export can never drift apart.
//!
//! Rotation is stored in degrees, clockwise-positive, normalized to
//! [-180, 180]. The rotation primitive composes `(x·cos − y·sin,
//! x·sin + y·cos)`, which is counter-clockwise-positive, so derivations
//! rotate by the negated angle.

use std::cell::Cell;

use georefkit_core::{GeoTransform, Point, TransformParameters, WorldRect};

/// Placement of a raster image in world coordinates.
#[derive(Debug, Clone)]
pub struct AffineTransformModel {
    center: Point,
    rotation: f64,
    x_scale: f64,
    y_scale: f64,
    image_width: u32,
    image_height: u32,
    // Derived bounding box, recomputed lazily after a commit.
    extent: Cell<Option<WorldRect>>,
}

impl AffineTransformModel {
    /// Creates an identity placement for a raster of the given pixel size.
    pub fn new(image_width: u32, image_height: u32) -> Self {
        Self {
            center: Point::new(0.0, 0.0),
            rotation: 0.0,
            x_scale: 1.0,
            y_scale: 1.0,
            image_width,
            image_height,
            extent: Cell::new(None),
        }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    /// Rotation in degrees, clockwise-positive.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// World units per pixel along the raster's local X axis.
    pub fn x_scale(&self) -> f64 {
        self.x_scale
    }

    /// World units per pixel along the raster's local Y axis.
    pub fn y_scale(&self) -> f64 {
        self.y_scale
    }

    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    /// Snapshot of the current placement parameters.
    pub fn parameters(&self) -> TransformParameters {
        TransformParameters {
            center: self.center,
            rotation: self.rotation,
            x_scale: self.x_scale,
            y_scale: self.y_scale,
        }
    }

    /// Applies a full parameter snapshot (used when loading persisted
    /// properties or existing georeferencing).
    pub fn apply_parameters(&mut self, params: TransformParameters) {
        self.set_center(params.center);
        self.set_scale(params.x_scale, params.y_scale);
        self.set_rotation(params.rotation);
    }

    /// Initializes the placement from existing world-file coefficients.
    pub fn initialize_from_geotransform(&mut self, geotransform: &GeoTransform) {
        let params = geotransform.decompose(self.image_width, self.image_height);
        self.apply_parameters(params);
    }

    pub fn set_center(&mut self, center: Point) {
        self.center = center;
    }

    /// Sets both scale factors directly. No validation: interactive paths
    /// guarantee positive factors, and the permissiveness of the raw setter
    /// matches the persisted-properties contract.
    pub fn set_scale(&mut self, x_scale: f64, y_scale: f64) {
        self.x_scale = x_scale;
        self.y_scale = y_scale;
    }

    /// Sets the rotation, rounded to 3 decimals and normalized into
    /// [-180, 180] by a single ±360 wrap.
    pub fn set_rotation(&mut self, rotation: f64) {
        // 3 decimals ought to be enough for everybody
        let mut rotation = (rotation * 1000.0).round() / 1000.0;
        if rotation < -180.0 {
            rotation += 360.0;
        }
        if rotation > 180.0 {
            rotation -= 360.0;
        }
        self.rotation = rotation;
    }

    /// Updates the raster pixel dimensions (image replaced).
    pub fn set_image_size(&mut self, width: u32, height: u32) {
        self.image_width = width;
        self.image_height = height;
        self.invalidate_extent();
    }

    /// Isotropic fit of the raster into a target extent: whichever of the
    /// width and height ratios is smaller is used for both axes, so the
    /// image takes all of one dimension of the extent.
    pub fn reset_scale(&mut self, extent_width: f64, extent_height: f64) {
        let wratio = extent_width / f64::from(self.image_width);
        let hratio = extent_height / f64::from(self.image_height);
        if wratio > hratio {
            self.set_scale(hratio, hratio);
        } else {
            self.set_scale(wratio, wratio);
        }
    }

    /// The four committed corners in (top-left, top-right, bottom-right,
    /// bottom-left) order.
    pub fn corner_coordinates(&self) -> [Point; 4] {
        self.transformed_corner_coordinates(self.center, self.rotation, self.x_scale, self.y_scale)
    }

    /// Corner geometry for hypothetical absolute parameters over this
    /// raster's pixel dimensions. Pure; shared by preview and export.
    pub fn transformed_corner_coordinates(
        &self,
        center: Point,
        rotation: f64,
        x_scale: f64,
        y_scale: f64,
    ) -> [Point; 4] {
        let half_w = f64::from(self.image_width) / 2.0 * x_scale;
        let half_h = f64::from(self.image_height) / 2.0 * y_scale;
        let corners = [
            Point::new(-half_w, half_h),
            Point::new(half_w, half_h),
            Point::new(half_w, -half_h),
            Point::new(-half_w, -half_h),
        ];

        // Minus sign because stored rotation is clockwise
        let rotation_rad = -rotation.to_radians();
        let cos_rot = rotation_rad.cos();
        let sin_rot = rotation_rad.sin();

        corners.map(|p| p.rotated(cos_rot, sin_rot).translated(center.x, center.y))
    }

    /// Corner geometry under an additional rotation and per-axis scale
    /// applied around `fixed_point` instead of around the center, without
    /// mutating the model.
    ///
    /// The center offset from `fixed_point` is scaled by the deltas, the
    /// half-extent rectangle (current scale × delta scale) is rotated by the
    /// *current* rotation and displaced by the scaled offset, then the whole
    /// result is rotated by `rotation` and translated back to
    /// `fixed_point`. This two-stage composition is what makes
    /// rotate/scale-about-a-point previewable at interactive rates.
    pub fn transformed_corner_coordinates_from_point(
        &self,
        fixed_point: Point,
        rotation: f64,
        x_scale: f64,
        y_scale: f64,
    ) -> [Point; 4] {
        let dx = (self.center.x - fixed_point.x) * x_scale;
        let dy = (self.center.y - fixed_point.y) * y_scale;
        let half_w = f64::from(self.image_width) / 2.0 * self.x_scale * x_scale;
        let half_h = f64::from(self.image_height) / 2.0 * self.y_scale * y_scale;
        let corners = [
            Point::new(-half_w, half_h),
            Point::new(half_w, half_h),
            Point::new(half_w, -half_h),
            Point::new(-half_w, -half_h),
        ];

        let current_rad = -self.rotation.to_radians();
        let (cos_cur, sin_cur) = (current_rad.cos(), current_rad.sin());
        let delta_rad = -rotation.to_radians();
        let (cos_delta, sin_delta) = (delta_rad.cos(), delta_rad.sin());

        corners.map(|p| {
            p.rotated(cos_cur, sin_cur)
                .translated(dx, dy)
                .rotated(cos_delta, sin_delta)
                .translated(fixed_point.x, fixed_point.y)
        })
    }

    /// Commits only the center displacement implied by a rotation/scale
    /// around `fixed_point`: the new center is the midpoint of the diagonal
    /// corners of the hypothetical geometry. Rotation and scale themselves
    /// are committed separately by the caller.
    pub fn move_center_from_point_rotate(
        &mut self,
        fixed_point: Point,
        rotation: f64,
        x_scale: f64,
        y_scale: f64,
    ) {
        let corners =
            self.transformed_corner_coordinates_from_point(fixed_point, rotation, x_scale, y_scale);
        self.center = corners[0].midpoint(&corners[2]);
    }

    /// Axis-aligned bounding box of the committed corners. Cached; the
    /// cache is dropped on [`invalidate_extent`](Self::invalidate_extent)
    /// (called when parameters are committed).
    pub fn extent(&self) -> WorldRect {
        if let Some(extent) = self.extent.get() {
            return extent;
        }
        let extent = WorldRect::from_points(&self.corner_coordinates());
        self.extent.set(Some(extent));
        extent
    }

    /// Drops the cached extent so the next [`extent`](Self::extent) call
    /// re-derives it from the committed parameters.
    pub fn invalidate_extent(&self) {
        self.extent.set(None);
    }
}
