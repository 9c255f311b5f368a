//! Persisted per-raster properties.
//!
//! The host project store persists layers as a flat block of custom
//! properties under fixed key names. Committing a transform refreshes the
//! block; loading reconstructs the layer from it with no loss. The key
//! names are an external contract shared with existing project files — do
//! not rename them.

use serde::{Deserialize, Serialize};

use georefkit_core::{Point, TransformParameters};

use crate::blend::BlendMode;

/// Default transparency percentage for new layers.
pub const DEFAULT_TRANSPARENCY: u8 = 30;

/// The property block persisted for one raster layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerProperties {
    pub title: String,
    pub filepath: String,
    #[serde(rename = "xScale")]
    pub x_scale: f64,
    #[serde(rename = "yScale")]
    pub y_scale: f64,
    pub rotation: f64,
    #[serde(rename = "xCenter")]
    pub x_center: f64,
    #[serde(rename = "yCenter")]
    pub y_center: f64,
    pub transparency: u8,
    #[serde(rename = "blendMode")]
    pub blend_mode: String,
}

impl LayerProperties {
    /// The transform parameters carried by the block.
    pub fn transform_parameters(&self) -> TransformParameters {
        TransformParameters {
            center: Point::new(self.x_center, self.y_center),
            rotation: self.rotation,
            x_scale: self.x_scale,
            y_scale: self.y_scale,
        }
    }

    /// The blend mode carried by the block, with fallback for unknown
    /// names.
    pub fn blend_mode(&self) -> BlendMode {
        BlendMode::from_name_or_default(&self.blend_mode)
    }
}
