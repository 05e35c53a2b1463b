//! Error types for session dispatch.

use thiserror::Error;

/// Error type for command dispatch.
///
/// Commands whose prerequisite input was never loaded fail with their own
/// variant; everything else is a pass-through from the transform layer.
#[derive(Error, Debug)]
pub enum SessionError {
    /// A fusion command was issued without a loaded overlay image.
    #[error("no overlay image loaded")]
    MissingOverlay,

    /// A navigation command was issued without a loaded volume.
    #[error("no volume loaded")]
    MissingVolume,

    /// An inverse-rotation command was issued before any rotation.
    #[error("no rotation has been applied")]
    NoRotationApplied,

    /// Transform-layer failure.
    #[error(transparent)]
    Ops(#[from] medpix_ops::OpsError),

    /// Core configuration failure.
    #[error(transparent)]
    Core(#[from] medpix_core::Error),
}

/// Result type for command dispatch.
pub type SessionResult<T> = Result<T, SessionError>;
