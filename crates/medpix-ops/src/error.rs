//! Error types for pixel transforms.

use thiserror::Error;

/// Error type for pixel transforms.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Invalid dimensions specified.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Grids have incompatible sizes or formats.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Configuration error from a core type.
    #[error(transparent)]
    Core(#[from] medpix_core::Error),
}

/// Result type for pixel transforms.
pub type OpsResult<T> = Result<T, OpsError>;
