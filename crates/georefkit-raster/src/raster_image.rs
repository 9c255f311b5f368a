//! Raster pixel storage and loading.
//!
//! Decoding is delegated to the `image` crate; everything downstream works
//! on 8-bit RGBA. Sources with deeper sample types are stretched to byte
//! range with a per-channel min/max stretch so scanned 16-bit documents stay
//! usable for on-screen placement.

use std::path::Path;

use image::{DynamicImage, Rgba, RgbaImage};
use tracing::debug;

use georefkit_core::LayerError;

/// A decoded raster held in memory as 8-bit RGBA.
#[derive(Debug, Clone)]
pub struct RasterImage {
    pixels: RgbaImage,
}

impl RasterImage {
    /// Opens and decodes a raster file.
    ///
    /// A missing file and an undecodable file are distinct errors: the
    /// first is recoverable through path correction, the second is not.
    pub fn open(path: &Path) -> Result<Self, LayerError> {
        if !path.exists() {
            return Err(LayerError::ImageNotFound {
                path: path.to_path_buf(),
            });
        }
        let decoded = image::open(path).map_err(|err| LayerError::Decode {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        Ok(Self::from_dynamic(decoded))
    }

    /// Wraps an already-decoded image, normalizing deep sample types.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        let pixels = match image {
            DynamicImage::ImageLuma16(_)
            | DynamicImage::ImageLumaA16(_)
            | DynamicImage::ImageRgb16(_)
            | DynamicImage::ImageRgba16(_)
            | DynamicImage::ImageRgb32F(_)
            | DynamicImage::ImageRgba32F(_) => {
                debug!("stretching deep raster samples to byte range");
                stretch_to_rgba8(&image.to_rgba32f())
            }
            other => other.to_rgba8(),
        };
        Self { pixels }
    }

    /// Wraps raw RGBA pixels (used by tests and by hosts that decode
    /// through their own pipeline).
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// Min/max stretch of each color channel to the byte range; alpha is scaled
/// directly.
fn stretch_to_rgba8(source: &image::Rgba32FImage) -> RgbaImage {
    let mut min = [f32::INFINITY; 3];
    let mut max = [f32::NEG_INFINITY; 3];
    for pixel in source.pixels() {
        for channel in 0..3 {
            min[channel] = min[channel].min(pixel.0[channel]);
            max[channel] = max[channel].max(pixel.0[channel]);
        }
    }

    let mut out = RgbaImage::new(source.width(), source.height());
    for (dst, src) in out.pixels_mut().zip(source.pixels()) {
        let mut bytes = [0u8; 4];
        for channel in 0..3 {
            let range = max[channel] - min[channel];
            let value = if range > 0.0 {
                (src.0[channel] - min[channel]) / range
            } else {
                0.0
            };
            bytes[channel] = (value * 255.0).round() as u8;
        }
        bytes[3] = (src.0[3].clamp(0.0, 1.0) * 255.0).round() as u8;
        *dst = Rgba(bytes);
    }
    out
}
