//! Error types for medpix-core operations.
//!
//! This module provides the unified configuration-error type shared by the
//! whole pipeline. The taxonomy is deliberately small:
//!
//! - **Configuration errors**: unsupported bit depth, mismatched grid
//!   dimensions, a singular matrix on an inversion request. These always
//!   propagate to the caller; they are never silently coerced.
//! - Numeric degeneracies (zero window width, zero deviation) and
//!   out-of-range neighbor access are *not* errors; each transform
//!   documents its local recovery policy instead.
//!
//! # Usage
//!
//! ```rust
//! use medpix_core::{Error, Result};
//!
//! fn check_same_size(a: (u32, u32), b: (u32, u32)) -> Result<()> {
//!     if a != b {
//!         return Err(Error::dimension_mismatch(a, b));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or validating core types.
///
/// This enum uses [`thiserror`] for automatic [`std::error::Error`] and
/// [`std::fmt::Display`] implementations.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested sample bit depth is not supported.
    ///
    /// Supported depths are 1 through 16 bits, signed or unsigned, the
    /// range a medical container can declare for integer grayscale data.
    #[error("unsupported bit depth: {bits} bits (signed: {signed})")]
    UnsupportedBitDepth {
        /// Requested bits per sample.
        bits: u8,
        /// Requested signedness.
        signed: bool,
    },

    /// Grid dimensions don't match for the operation.
    ///
    /// Returned when an operation requires grids of the same size
    /// (fusion of two modalities, slices of a volume stack).
    #[error("dimension mismatch: {a_width}x{a_height} vs {b_width}x{b_height}")]
    DimensionMismatch {
        /// First grid width.
        a_width: u32,
        /// First grid height.
        a_height: u32,
        /// Second grid width.
        b_width: u32,
        /// Second grid height.
        b_height: u32,
    },

    /// Invalid grid dimensions.
    ///
    /// Returned when a sample buffer doesn't match the declared size, or
    /// when an operation requires a non-empty grid.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
        /// Reason why the dimensions are invalid.
        reason: String,
    },

    /// A volume stack was built from zero slices.
    #[error("volume stack requires at least one slice")]
    EmptyVolume,

    /// A matrix inversion was requested on a singular matrix.
    ///
    /// The accumulated view transform must stay invertible to support the
    /// undo operation; a singular composition is a caller error.
    #[error("matrix is singular and cannot be inverted")]
    SingularMatrix,
}

impl Error {
    /// Creates an [`Error::UnsupportedBitDepth`] error.
    #[inline]
    pub fn unsupported_bit_depth(bits: u8, signed: bool) -> Self {
        Self::UnsupportedBitDepth { bits, signed }
    }

    /// Creates an [`Error::DimensionMismatch`] error from two `(w, h)` pairs.
    #[inline]
    pub fn dimension_mismatch(a: (u32, u32), b: (u32, u32)) -> Self {
        Self::DimensionMismatch {
            a_width: a.0,
            a_height: a.1,
            b_width: b.0,
            b_height: b.1,
        }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Returns `true` if this is a dimension-related error.
    #[inline]
    pub fn is_dimension_error(&self) -> bool {
        matches!(
            self,
            Self::DimensionMismatch { .. } | Self::InvalidDimensions { .. }
        )
    }
}
