//! Unit conversion for the scale tool's numeric path.
//!
//! Converts a map scale denominator plus a raster DPI into world units per
//! raster pixel: a 1:3000 scan at 96 DPI covers `3000 / (96 / 0.0254)`
//! meters per pixel.

use std::fmt;
use std::str::FromStr;

use crate::error::InputError;

/// Meters per inch, for DPI conversions.
pub const METERS_PER_INCH: f64 = 0.0254;

/// A parsed `scale,dpi` input pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleDpi {
    /// Map scale denominator (e.g. 3000 for 1:3000).
    pub scale: f64,
    /// Scan resolution in dots per inch.
    pub dpi: f64,
}

impl ScaleDpi {
    /// World units (meters) covered by one raster pixel at this scale and
    /// resolution.
    pub fn world_units_per_pixel(&self) -> f64 {
        self.scale / (self.dpi / METERS_PER_INCH)
    }
}

impl fmt::Display for ScaleDpi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.scale, self.dpi)
    }
}

impl FromStr for ScaleDpi {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(',').collect();
        if fields.len() != 2 {
            return Err(InputError::WrongFieldCount {
                input: s.to_string(),
            });
        }
        let scale = fields[0].trim().parse::<f64>().ok();
        let dpi = fields[1].trim().parse::<f64>().ok();
        match (scale, dpi) {
            (Some(scale), Some(dpi)) if scale > 0.0 && dpi > 0.0 => Ok(Self { scale, dpi }),
            _ => Err(InputError::NotANumber {
                input: s.to_string(),
            }),
        }
    }
}
