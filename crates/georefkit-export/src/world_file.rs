//! World file reading and writing.
//!
//! A world file is a six-line text sidecar holding the pixel→world affine
//! coefficients in the literal order `a, b, d, e, c, f`, one `%.13f`-style
//! value per line. The sidecar extension depends on the raster format
//! (`.jgw` for JPEG, `.pgw` for PNG, `.bpw` for BMP, `.tfw` for TIFF).

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use georefkit_core::{ExportError, GeoTransform};

/// The world-file extension for a raster extension, if the format is
/// supported.
pub fn world_file_extension(raster_extension: &str) -> Option<&'static str> {
    match raster_extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("jgw"),
        "png" => Some("pgw"),
        "bmp" => Some("bpw"),
        "tif" | "tiff" => Some("tfw"),
        _ => None,
    }
}

/// The sidecar path next to a raster file.
pub fn world_file_path(raster_path: &Path) -> Result<PathBuf, ExportError> {
    let extension = raster_path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    let world_ext =
        world_file_extension(extension).ok_or_else(|| ExportError::UnsupportedFormat {
            extension: extension.to_string(),
        })?;
    Ok(raster_path.with_extension(world_ext))
}

/// Writes the six coefficients, 13 decimals each, no trailing newline.
pub fn write_world_file(path: &Path, geotransform: &GeoTransform) -> Result<(), ExportError> {
    let content = format!(
        "{:.13}\n{:.13}\n{:.13}\n{:.13}\n{:.13}\n{:.13}",
        geotransform.a,
        geotransform.b,
        geotransform.d,
        geotransform.e,
        geotransform.c,
        geotransform.f,
    );
    fs::write(path, content)?;
    Ok(())
}

/// Parses a world file back into coefficients.
pub fn read_world_file(path: &Path) -> Result<GeoTransform, ExportError> {
    let content = fs::read_to_string(path)?;
    let values: Vec<f64> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.parse::<f64>()
                .map_err(|_| ExportError::MalformedWorldFile {
                    reason: format!("not a number: {line:?}"),
                })
        })
        .collect::<Result<_, _>>()?;
    if values.len() != 6 {
        return Err(ExportError::MalformedWorldFile {
            reason: format!("expected 6 lines, found {}", values.len()),
        });
    }
    Ok(GeoTransform {
        a: values[0],
        b: values[1],
        d: values[2],
        e: values[3],
        c: values[4],
        f: values[5],
    })
}

/// Looks for a world-file sidecar next to a raster and reads it if present.
/// Used at layer initialization to pick up existing georeferencing.
pub fn read_world_file_for(raster_path: &Path) -> Option<GeoTransform> {
    let sidecar = world_file_path(raster_path).ok()?;
    if !sidecar.exists() {
        return None;
    }
    match read_world_file(&sidecar) {
        Ok(geotransform) => Some(geotransform),
        Err(err) => {
            debug!(path = %sidecar.display(), %err, "ignoring unreadable world file");
            None
        }
    }
}
