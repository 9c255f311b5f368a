//! Error handling for GeorefKit
//!
//! Provides error types for the layers of the engine:
//! - Layer errors (raster loading/initialization)
//! - Input errors (user-entered numeric values)
//! - Export errors (raster encoding and sidecar writing)
//!
//! All error types use `thiserror` for ergonomic error handling.

use std::path::PathBuf;

use thiserror::Error;

/// Raster layer lifecycle errors.
///
/// Raised while loading or initializing a raster layer. A load failure puts
/// the layer into an error state that suppresses drawing until the host
/// supplies a corrected path.
#[derive(Error, Debug)]
pub enum LayerError {
    /// The raster file does not exist at the recorded path
    #[error("Raster file not found: {path}")]
    ImageNotFound {
        /// The path that was probed.
        path: PathBuf,
    },

    /// The raster file exists but could not be decoded
    #[error("Could not decode raster {path}: {reason}")]
    Decode {
        /// The path of the offending raster.
        path: PathBuf,
        /// Decoder detail.
        reason: String,
    },

    /// Operation requires an initialized layer
    #[error("Layer is not initialized")]
    NotInitialized,

    /// The layer is in an error state after a failed load
    #[error("Layer is in an error state (failed to load {path})")]
    Errored {
        /// The path that failed to load.
        path: PathBuf,
    },
}

/// User numeric input errors.
///
/// The only recoverable-error path in the interactive core: the scale tool's
/// `scale,dpi` prompt. A malformed value aborts the gesture without touching
/// the model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// Input did not split into exactly two comma-separated values
    #[error("Must be 2 numbers")]
    WrongFieldCount {
        /// The raw input.
        input: String,
    },

    /// One of the two values was not a number
    #[error("Bad format: Must be scale,dpi (e.g. 3000,96)")]
    NotANumber {
        /// The raw input.
        input: String,
    },
}

/// Export command errors.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The output extension maps to no supported raster format
    #[error("Unsupported raster format: {extension}")]
    UnsupportedFormat {
        /// The offending file extension.
        extension: String,
    },

    /// Encoding the output raster failed
    #[error("Raster encoding failed: {reason}")]
    Encode {
        /// Encoder detail.
        reason: String,
    },

    /// A sidecar file could not be read or written
    #[error("Sidecar I/O failed")]
    Io(#[from] std::io::Error),

    /// A world file did not contain six numeric lines
    #[error("Malformed world file: {reason}")]
    MalformedWorldFile {
        /// Parse detail.
        reason: String,
    },

    /// Generic failure reported to the user; details are in the log
    #[error("There was an error performing this command. See the log for details.")]
    CommandFailed,
}

/// Top-level error type for GeorefKit operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Layer lifecycle error
    #[error(transparent)]
    Layer(#[from] LayerError),

    /// User input error
    #[error(transparent)]
    Input(#[from] InputError),

    /// Export error
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Result alias using the top-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
