//! # GeorefKit Core
//!
//! Core types and utilities for GeorefKit.
//! Provides the geometry primitives, the world-file affine transform,
//! unit conversions, error types, and the observer registry used for
//! transform-change notification.

pub mod crs;
pub mod error;
pub mod geometry;
pub mod geotransform;
pub mod observe;
pub mod units;

pub use crs::{CoordinateTransform, CrsDescription, CrsKind};
pub use error::{Error, ExportError, InputError, LayerError, Result};
pub use geometry::{point_to_segment_distance, Point, ScreenPos, TransformParameters, WorldRect};
pub use geotransform::GeoTransform;
pub use observe::{Observers, SubscriptionId};
pub use units::{ScaleDpi, METERS_PER_INCH};
