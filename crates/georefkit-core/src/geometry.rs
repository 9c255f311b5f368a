//! Geometry primitives shared by the raster model, the map tools, and the
//! export pipeline.
//!
//! Two coordinate spaces exist side by side: world (map) coordinates with the
//! Y axis pointing up, and screen (canvas) coordinates in device pixels with
//! the Y axis pointing down. `Point` is always world, `ScreenPos` always
//! screen; keeping them as separate types prevents mixing the two.

use serde::{Deserialize, Serialize};

/// A 2D point in world (map) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point with the given X and Y coordinates.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculates the distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Midpoint between this point and another.
    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Rotates the point around the origin with a precomputed cosine and
    /// sine, composing `(x·cos − y·sin, x·sin + y·cos)`.
    ///
    /// The angle convention (clockwise vs counter-clockwise) is decided by
    /// the caller through the sign of the sine it passes in.
    pub fn rotated(&self, cos_rot: f64, sin_rot: f64) -> Point {
        Point::new(
            self.x * cos_rot - self.y * sin_rot,
            self.x * sin_rot + self.y * cos_rot,
        )
    }

    /// Translates the point by the given deltas.
    pub fn translated(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// A position on the map canvas, in device pixels. Y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPos {
    pub x: f64,
    pub y: f64,
}

impl ScreenPos {
    /// Creates a new screen position.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in world coordinates.
///
/// `y_min` is the bottom edge and `y_max` the top edge (world Y grows up).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldRect {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl WorldRect {
    /// Creates a rectangle from its edges.
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// The tightest rectangle enclosing all given points.
    pub fn from_points(points: &[Point]) -> Self {
        let mut rect = Self::new(
            f64::INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::NEG_INFINITY,
        );
        for p in points {
            rect.x_min = rect.x_min.min(p.x);
            rect.y_min = rect.y_min.min(p.y);
            rect.x_max = rect.x_max.max(p.x);
            rect.y_max = rect.y_max.max(p.y);
        }
        rect
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    /// True when the rectangle has no area.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// The four corners in (top-left, top-right, bottom-right, bottom-left)
    /// order.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x_min, self.y_max),
            Point::new(self.x_max, self.y_max),
            Point::new(self.x_max, self.y_min),
            Point::new(self.x_min, self.y_min),
        ]
    }
}

/// Snapshot of a raster placement: the payload of transform-change
/// notifications and the result of geotransform decomposition.
///
/// `rotation` is in degrees, clockwise-positive; scales are world units per
/// raster pixel along the local (pre-rotation) axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformParameters {
    pub center: Point,
    pub rotation: f64,
    pub x_scale: f64,
    pub y_scale: f64,
}

/// Distance from a point to a line segment.
///
/// Used for side hit-testing in the adjust tool.
pub fn point_to_segment_distance(p: &Point, a: &Point, b: &Point) -> f64 {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len_sq = abx * abx + aby * aby;
    if len_sq == 0.0 {
        return p.distance_to(a);
    }
    let t = ((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq;
    let t = t.clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * abx, a.y + t * aby);
    p.distance_to(&proj)
}
