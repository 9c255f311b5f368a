//! Export of a georeferenced raster.
//!
//! Two modes. With `put_rotation_in_world_file` the raster pixels are
//! written unchanged and the full affine placement (rotation included) goes
//! into the world-file coefficients, exactly matching the interactive
//! pixel→world mapping. Otherwise the raster is resampled into a new
//! axis-aligned image covering the rotated bounding box — upscaling one
//! axis when the two scales differ so native resolution is never lost —
//! and the world file carries only offsets and pixel sizes.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{bail, Context};
use image::{Rgba, RgbaImage};
use tracing::{debug, error, info};

use georefkit_core::{CrsDescription, ExportError, GeoTransform};
use georefkit_raster::RasterLayer;

use crate::aux_xml::write_aux_xml;
use crate::world_file::{world_file_path, write_world_file};

/// User-facing export command: runs the export, logs any failure in full,
/// and reports a single generic error to the caller.
#[derive(Debug, Default)]
pub struct ExportGeorefRasterCommand;

impl ExportGeorefRasterCommand {
    pub fn new() -> Self {
        Self
    }

    /// Exports `layer` to `raster_path` with its world file and CRS
    /// sidecar. Never panics and never exposes failure detail to the user:
    /// the detail goes to the log, the caller gets
    /// [`ExportError::CommandFailed`].
    pub fn export_georef_raster(
        &self,
        layer: &RasterLayer,
        raster_path: &Path,
        put_rotation_in_world_file: bool,
        crs: &CrsDescription,
    ) -> Result<(), ExportError> {
        match export_georef_raster(layer, raster_path, put_rotation_in_world_file, crs) {
            Ok(()) => {
                info!(path = %raster_path.display(), "raster exported successfully");
                Ok(())
            }
            Err(err) => {
                error!(path = %raster_path.display(), "export failed: {err:#}");
                Err(ExportError::CommandFailed)
            }
        }
    }
}

/// The export pipeline with full error detail.
pub fn export_georef_raster(
    layer: &RasterLayer,
    raster_path: &Path,
    put_rotation_in_world_file: bool,
    crs: &CrsDescription,
) -> anyhow::Result<()> {
    let image = layer
        .image()
        .context("layer has no image; initialize it before exporting")?;
    let world_path = world_file_path(raster_path)?;

    let transform = layer.transform();
    let rotation_rad = transform.rotation().to_radians();
    let width = f64::from(image.width());
    let height = f64::from(image.height());

    let (pixels, geotransform);
    if put_rotation_in_world_file {
        // Pixels stay as they are; the world file carries the whole
        // placement.
        let a = transform.x_scale() * rotation_rad.cos();
        // sin instead of -sin for b/d because the stored angle is clockwise
        let b = -transform.y_scale() * rotation_rad.sin();
        let d = transform.x_scale() * -rotation_rad.sin();
        let e = -transform.y_scale() * rotation_rad.cos();
        let center = transform.center();
        let c = center.x - (a * (width - 1.0) / 2.0 + b * (height - 1.0) / 2.0);
        let f = center.y - (d * (width - 1.0) / 2.0 + e * (height - 1.0) / 2.0);

        pixels = image.pixels().clone();
        geotransform = GeoTransform { a, b, d, e, c, f };
    } else {
        // Stretch the short axis so the resample never drops below native
        // resolution, then rotate into an axis-aligned frame.
        let ratio = transform.x_scale() / transform.y_scale();
        let (stretch_x, stretch_y) = if ratio > 1.0 {
            (ratio, 1.0)
        } else {
            (1.0, 1.0 / ratio)
        };

        let dest_width = (stretch_x * width * rotation_rad.cos()).abs()
            + (stretch_y * height * rotation_rad.sin()).abs();
        let dest_height = (stretch_x * width * rotation_rad.sin()).abs()
            + (stretch_y * height * rotation_rad.cos()).abs();
        debug!(dest_width, dest_height, "resampling into axis-aligned frame");

        pixels = resample_rotated(
            image.pixels(),
            transform.rotation(),
            stretch_x,
            stretch_y,
            dest_width,
            dest_height,
        );

        let extent = transform.extent();
        let a = extent.width() / dest_width;
        let e = -extent.height() / dest_height;
        // Half-pixel offset: world-file coefficients reference the center
        // of the upper-left pixel, not its corner.
        let c = extent.x_min + a / 2.0;
        let f = extent.y_max + e / 2.0;
        geotransform = GeoTransform::axis_aligned(a, e, c, f);
    }

    encode_raster(&pixels, raster_path)
        .with_context(|| format!("encoding {}", raster_path.display()))?;
    write_world_file(&world_path, &geotransform)
        .with_context(|| format!("writing {}", world_path.display()))?;
    write_aux_xml(raster_path, crs).context("writing CRS sidecar")?;
    Ok(())
}

/// Inverse-map bilinear resample: each destination pixel is carried back
/// through the inverse of (stretch, then clockwise rotation) and sampled
/// from the source. Pixels falling outside the source stay transparent.
fn resample_rotated(
    source: &RgbaImage,
    rotation: f64,
    stretch_x: f64,
    stretch_y: f64,
    dest_width: f64,
    dest_height: f64,
) -> RgbaImage {
    let out_width = dest_width.ceil().max(1.0) as u32;
    let out_height = dest_height.ceil().max(1.0) as u32;
    let mut out = RgbaImage::from_pixel(out_width, out_height, Rgba([0, 0, 0, 0]));

    // In raster pixel space (Y down) a clockwise visual rotation is the
    // mathematically positive direction; invert by transposing.
    let rad = rotation.to_radians();
    let (sin_rot, cos_rot) = rad.sin_cos();
    let src_cx = f64::from(source.width()) / 2.0;
    let src_cy = f64::from(source.height()) / 2.0;
    let dst_cx = dest_width / 2.0;
    let dst_cy = dest_height / 2.0;

    for dy in 0..out_height {
        for dx in 0..out_width {
            // Destination pixel center relative to the destination center
            let x = f64::from(dx) + 0.5 - dst_cx;
            let y = f64::from(dy) + 0.5 - dst_cy;

            // Inverse rotation, then inverse stretch
            let xr = x * cos_rot + y * sin_rot;
            let yr = -x * sin_rot + y * cos_rot;
            let xs = xr / stretch_x;
            let ys = yr / stretch_y;

            // Back to source pixel indices
            let sx = xs + src_cx - 0.5;
            let sy = ys + src_cy - 0.5;
            out.put_pixel(dx, dy, bilinear_sample(source, sx, sy));
        }
    }
    out
}

/// Bilinear interpolation over the four neighbors of (x, y) in pixel-index
/// space; neighbors outside the image contribute transparency.
fn bilinear_sample(source: &RgbaImage, x: f64, y: f64) -> Rgba<u8> {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;

    let mut accum = [0.0f64; 4];
    for (ix, iy, weight) in [
        (x0, y0, (1.0 - fx) * (1.0 - fy)),
        (x0 + 1.0, y0, fx * (1.0 - fy)),
        (x0, y0 + 1.0, (1.0 - fx) * fy),
        (x0 + 1.0, y0 + 1.0, fx * fy),
    ] {
        if ix < 0.0 || iy < 0.0 || ix >= f64::from(source.width()) || iy >= f64::from(source.height())
        {
            continue;
        }
        let pixel = source.get_pixel(ix as u32, iy as u32);
        for channel in 0..4 {
            accum[channel] += weight * f64::from(pixel.0[channel]);
        }
    }

    Rgba([
        accum[0].round() as u8,
        accum[1].round() as u8,
        accum[2].round() as u8,
        accum[3].round() as u8,
    ])
}

/// Encodes the raster by output extension. TIFF goes through the dedicated
/// encoder for LZW compression (scanned documents are mostly white); JPEG
/// has no alpha channel, so transparency is flattened over white.
fn encode_raster(pixels: &RgbaImage, path: &Path) -> anyhow::Result<()> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    match extension.as_str() {
        "png" | "bmp" => {
            pixels.save(path)?;
        }
        "jpg" | "jpeg" => {
            let mut flat = image::RgbImage::new(pixels.width(), pixels.height());
            for (dst, src) in flat.pixels_mut().zip(pixels.pixels()) {
                let alpha = f64::from(src.0[3]) / 255.0;
                for channel in 0..3 {
                    let value = f64::from(src.0[channel]) * alpha + 255.0 * (1.0 - alpha);
                    dst.0[channel] = value.round() as u8;
                }
            }
            flat.save(path)?;
        }
        "tif" | "tiff" => {
            let writer = BufWriter::new(File::create(path)?);
            let mut encoder = tiff::encoder::TiffEncoder::new(writer)?;
            encoder.write_image_with_compression::<tiff::encoder::colortype::RGBA8, _>(
                pixels.width(),
                pixels.height(),
                tiff::encoder::compression::Lzw,
                pixels.as_raw(),
            )?;
        }
        other => {
            bail!(ExportError::UnsupportedFormat {
                extension: other.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resample_identity_copies_pixels() {
        let mut source = RgbaImage::new(4, 4);
        for (i, pixel) in source.pixels_mut().enumerate() {
            *pixel = Rgba([i as u8 * 10, 0, 0, 255]);
        }
        let out = resample_rotated(&source, 0.0, 1.0, 1.0, 4.0, 4.0);
        assert_eq!(out.dimensions(), (4, 4));
        for (a, b) in out.pixels().zip(source.pixels()) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_resample_quarter_turn() {
        // 4x2 source rotated 90° clockwise becomes 2x4, with the top-left
        // source pixel landing top-right.
        let mut source = RgbaImage::from_pixel(4, 2, Rgba([0, 0, 0, 255]));
        source.put_pixel(0, 0, Rgba([200, 0, 0, 255]));
        let out = resample_rotated(&source, 90.0, 1.0, 1.0, 2.0, 4.0);
        assert_eq!(out.dimensions(), (2, 4));
        assert_eq!(out.get_pixel(1, 0).0, [200, 0, 0, 255]);
    }

    #[test]
    fn test_resample_stretch_doubles_axis() {
        let source = RgbaImage::from_pixel(4, 2, Rgba([7, 7, 7, 255]));
        let out = resample_rotated(&source, 0.0, 2.0, 1.0, 8.0, 2.0);
        assert_eq!(out.dimensions(), (8, 2));
        // Interior pixels keep the uniform color
        assert_eq!(out.get_pixel(4, 1).0, [7, 7, 7, 255]);
    }

    #[test]
    fn test_bilinear_midpoint() {
        let mut source = RgbaImage::new(2, 1);
        source.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        source.put_pixel(1, 0, Rgba([100, 0, 0, 255]));
        let sampled = bilinear_sample(&source, 0.5, 0.0);
        assert_eq!(sampled.0[0], 50);
    }
}
