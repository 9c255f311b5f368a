//! Layer blend modes.
//!
//! The persisted property block stores the mode by name. Lookup goes
//! through an explicit table; an unknown name falls back to the default so
//! a stale project file can never leave a layer without a usable mode.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Compositing mode applied when the host draws the raster layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlendMode {
    #[default]
    SourceOver,
    Lighten,
    Screen,
    Dodge,
    Addition,
    Darken,
    Multiply,
    Burn,
    Overlay,
    SoftLight,
    HardLight,
    Difference,
    Subtract,
}

impl BlendMode {
    /// All modes, in menu order.
    pub fn all() -> &'static [BlendMode] {
        &[
            BlendMode::SourceOver,
            BlendMode::Lighten,
            BlendMode::Screen,
            BlendMode::Dodge,
            BlendMode::Addition,
            BlendMode::Darken,
            BlendMode::Multiply,
            BlendMode::Burn,
            BlendMode::Overlay,
            BlendMode::SoftLight,
            BlendMode::HardLight,
            BlendMode::Difference,
            BlendMode::Subtract,
        ]
    }

    /// The persisted name of the mode.
    pub fn name(&self) -> &'static str {
        match self {
            BlendMode::SourceOver => "SourceOver",
            BlendMode::Lighten => "Lighten",
            BlendMode::Screen => "Screen",
            BlendMode::Dodge => "Dodge",
            BlendMode::Addition => "Addition",
            BlendMode::Darken => "Darken",
            BlendMode::Multiply => "Multiply",
            BlendMode::Burn => "Burn",
            BlendMode::Overlay => "Overlay",
            BlendMode::SoftLight => "SoftLight",
            BlendMode::HardLight => "HardLight",
            BlendMode::Difference => "Difference",
            BlendMode::Subtract => "Subtract",
        }
    }

    /// Looks up a mode by its persisted name.
    pub fn from_name(name: &str) -> Option<BlendMode> {
        BlendMode::all().iter().copied().find(|m| m.name() == name)
    }

    /// Lookup with fallback: an unknown name logs a warning and yields the
    /// default mode.
    pub fn from_name_or_default(name: &str) -> BlendMode {
        BlendMode::from_name(name).unwrap_or_else(|| {
            warn!(name, "unknown blend mode name, falling back to default");
            BlendMode::default()
        })
    }
}
