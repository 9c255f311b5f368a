//! Coordinate reference system collaborators.
//!
//! The engine does no projection math of its own. It consumes the host's
//! CRS capabilities through two narrow surfaces: a description of the map
//! CRS (for the export sidecar) and an opaque point transform (for keeping a
//! layer in place when the map CRS changes).

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, WorldRect};

/// Whether a CRS is geographic (angular units) or projected (linear units).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrsKind {
    Geographic,
    Projected,
}

impl CrsKind {
    /// The name used by the auxiliary sidecar template.
    pub fn type_name(&self) -> &'static str {
        match self {
            CrsKind::Geographic => "Geographic",
            CrsKind::Projected => "Projected",
        }
    }
}

/// Opaque description of a CRS, as supplied by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrsDescription {
    pub kind: CrsKind,
    /// Well-known text for the CRS, passed through verbatim.
    pub wkt: String,
}

/// A point transform between two CRSs, supplied by the host projection
/// library.
pub trait CoordinateTransform {
    /// Transforms a single point from the source to the destination CRS.
    fn transform_point(&self, point: Point) -> Point;

    /// Transforms a rectangle by transforming its corners and taking the
    /// bounding box of the results.
    fn transform_rect(&self, rect: WorldRect) -> WorldRect {
        let corners = rect.corners().map(|p| self.transform_point(p));
        WorldRect::from_points(&corners)
    }
}
