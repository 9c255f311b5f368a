//! The six-coefficient affine transform used by world files.
//!
//! Maps raster pixel indices to world coordinates:
//!
//! ```text
//! world_x = a·col + b·row + c
//! world_y = d·col + e·row + f
//! ```
//!
//! The coefficient names follow the world-file convention; the world-file
//! line order is `a, b, d, e, c, f`.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, TransformParameters};

/// Pixel-to-world affine coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    /// World units per pixel column along X.
    pub a: f64,
    /// Row contribution to X (rotation term).
    pub b: f64,
    /// Column contribution to Y (rotation term).
    pub d: f64,
    /// World units per pixel row along Y (negative for north-up rasters).
    pub e: f64,
    /// X translation.
    pub c: f64,
    /// Y translation.
    pub f: f64,
}

impl GeoTransform {
    /// An axis-aligned transform with no rotation terms.
    pub fn axis_aligned(a: f64, e: f64, c: f64, f: f64) -> Self {
        Self {
            a,
            b: 0.0,
            d: 0.0,
            e,
            c,
            f,
        }
    }

    /// Maps a pixel position (column, row) to world coordinates.
    pub fn apply(&self, col: f64, row: f64) -> Point {
        Point::new(
            self.a * col + self.b * row + self.c,
            self.d * col + self.e * row + self.f,
        )
    }

    /// True for the placeholder transform GDAL reports when a raster has no
    /// real georeferencing (origin 0,0 with unit pixel size).
    pub fn is_default(&self) -> bool {
        self.c == 0.0 && self.f == 0.0 && self.a == 1.0 && self.e == 1.0
    }

    /// Decomposes the coefficients into the interactive placement
    /// parameters: rotation (degrees, clockwise-positive), per-axis scales,
    /// and the world position of the image center.
    ///
    /// Scales come out positive regardless of coefficient signs; the
    /// rotation carries the orientation.
    pub fn decompose(&self, image_width: u32, image_height: u32) -> TransformParameters {
        let rotation = -(self.d.atan2(self.a)).to_degrees();
        let x_scale = (self.a * self.a + self.d * self.d).sqrt();
        let y_scale = (self.b * self.b + self.e * self.e).sqrt();
        let center = self.apply(
            f64::from(image_width) / 2.0,
            f64::from(image_height) / 2.0,
        );
        TransformParameters {
            center,
            rotation,
            x_scale,
            y_scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply() {
        let gt = GeoTransform {
            a: 2.0,
            b: 0.0,
            d: 0.0,
            e: -3.0,
            c: 91.0,
            f: 213.5,
        };
        let p = gt.apply(4.5, 4.5);
        assert!((p.x - 100.0).abs() < 1e-12);
        assert!((p.y - 200.0).abs() < 1e-12);
    }

    #[test]
    fn test_is_default() {
        assert!(GeoTransform::axis_aligned(1.0, 1.0, 0.0, 0.0).is_default());
        assert!(!GeoTransform::axis_aligned(2.0, -2.0, 10.0, 20.0).is_default());
    }

    #[test]
    fn test_decompose_axis_aligned() {
        let gt = GeoTransform::axis_aligned(2.0, -3.0, 100.0, 200.0);
        let params = gt.decompose(10, 10);
        assert_eq!(params.rotation, 0.0);
        assert_eq!(params.x_scale, 2.0);
        assert_eq!(params.y_scale, 3.0);
        assert!((params.center.x - 110.0).abs() < 1e-12);
        assert!((params.center.y - 185.0).abs() < 1e-12);
    }

    #[test]
    fn test_decompose_rotated() {
        // Compose coefficients for a 30° clockwise rotation with scales 2/3,
        // then check the decomposition recovers them.
        let rot = 30.0_f64.to_radians();
        let (sx, sy) = (2.0, 3.0);
        let gt = GeoTransform {
            a: sx * rot.cos(),
            b: -sy * rot.sin(),
            d: -sx * rot.sin(),
            e: -sy * rot.cos(),
            c: 0.0,
            f: 0.0,
        };
        let params = gt.decompose(100, 80);
        assert!((params.rotation - 30.0).abs() < 1e-9);
        assert!((params.x_scale - sx).abs() < 1e-12);
        assert!((params.y_scale - sy).abs() < 1e-12);
    }
}
