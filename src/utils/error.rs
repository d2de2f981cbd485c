//! Error Handling Module
//!
//! Defines the error types for the frequency masking library.
//! Uses thiserror for ergonomic error definitions.
//!
//! All errors are configuration or data-contract violations: there are no
//! transient failure modes and nothing here is worth retrying. Configuration
//! errors (`InvalidRatio`, `UnknownMaskType`) surface when the augmenter is
//! built, before any image is processed.

use thiserror::Error;

/// Main error type for frequency masking operations
#[derive(Error, Debug)]
pub enum FreqMaskError {
    /// Image dimensions incompatible with the transform
    #[error("Invalid image shape: {0}")]
    InvalidShape(String),

    /// Masking ratio outside the valid percentage range
    #[error("Invalid mask ratio {0}: must be within [0, 100]")]
    InvalidRatio(f64),

    /// Unrecognized mask type tag in configuration
    #[error("Unknown mask type '{0}'")]
    UnknownMaskType(String),

    /// Unrecognized band policy tag in configuration
    #[error("Unknown band policy '{0}'")]
    UnknownBandPolicy(String),

    /// Image encoding/decoding error (e.g. JPEG re-compression)
    #[error("Image codec error: {0}")]
    Codec(#[from] image::ImageError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for frequency masking operations
pub type Result<T> = std::result::Result<T, FreqMaskError>;
