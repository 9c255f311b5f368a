//! # GeorefKit Raster
//!
//! The raster layer model for GeorefKit: the affine placement transform,
//! the layer itself (image, display properties, persistence, observers),
//! the drag-preview shadow, the undo history, and the layer registry.

pub mod blend;
pub mod history;
pub mod layer;
pub mod properties;
pub mod raster_image;
pub mod registry;
pub mod shadow;
pub mod transform;

pub use blend::BlendMode;
pub use history::{HistoryEntry, HistoryStack};
pub use layer::{LayerId, RasterLayer};
pub use properties::{LayerProperties, DEFAULT_TRANSPARENCY};
pub use raster_image::RasterImage;
pub use registry::LayerRegistry;
pub use shadow::{RasterShadow, ShadowDrawParameters};
pub use transform::AffineTransformModel;
