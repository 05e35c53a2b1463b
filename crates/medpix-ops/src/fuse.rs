//! Fusion composition of two co-registered modalities.
//!
//! Builds a three-channel image from a reference grid A (typically CT)
//! and an overlay grid B (typically MRI) of identical dimensions:
//!
//! - [`FusionMode::GrayscaleReference`] / [`FusionMode::GrayscaleOverlay`] -
//!   one grid replicated into `[v, v, v]`
//! - [`FusionMode::DualChannel`] - `[0, A(i,j), B(i,j)]`, reference in
//!   green, overlay in blue
//! - [`FusionMode::Split`] - grayscale reference above the split line,
//!   dual-channel overlay at and below it
//!
//! # Example
//!
//! ```rust
//! use medpix_core::{BitDepth, PixelGrid};
//! use medpix_ops::fuse::{fuse, FusionMode};
//!
//! let ct = PixelGrid::filled(8, 8, BitDepth::UNSIGNED_8, 100);
//! let mri = PixelGrid::filled(8, 8, BitDepth::UNSIGNED_8, 30);
//! let fused = fuse(&ct, &mri, FusionMode::DualChannel).unwrap();
//! assert_eq!(fused.pixel(3, 3), [0, 100, 30]);
//! ```

use crate::{OpsError, OpsResult};
use medpix_core::{BitDepth, PixelGrid};
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Divisor applied to the overlay height to place the split line.
pub const SPLIT_DIVISOR: f64 = 1.75;

/// Channel composition variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FusionMode {
    /// Reference grid replicated into all three channels.
    #[default]
    GrayscaleReference,
    /// Overlay grid replicated into all three channels.
    GrayscaleOverlay,
    /// `[0, reference, overlay]` per pixel.
    DualChannel,
    /// Grayscale reference above the split line, dual-channel below.
    Split,
}

/// Three-channel composition buffer produced by [`fuse`].
///
/// Row-major `[r, g, b]` samples plus the bit depth the channels were
/// taken at; the display collaborator uploads it as an RGB texture.
#[derive(Debug, Clone)]
pub struct RgbGrid {
    data: Vec<[i32; 3]>,
    width: u32,
    height: u32,
    depth: BitDepth,
}

impl RgbGrid {
    /// Returns the grid width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the grid height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the channel bit depth.
    #[inline]
    pub fn bit_depth(&self) -> BitDepth {
        self.depth
    }

    /// Returns the `[r, g, b]` pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [i32; 3] {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Returns the raw pixel buffer.
    #[inline]
    pub fn pixels(&self) -> &[[i32; 3]] {
        &self.data
    }
}

/// Composes two co-registered grids into a three-channel image.
///
/// # Errors
///
/// - [`medpix_core::Error::DimensionMismatch`] (via
///   [`OpsError::Core`]) if the grids differ in size.
/// - [`OpsError::SizeMismatch`] if the grids differ in bit depth, since the
///   channels would carry incomparable scales.
pub fn fuse(reference: &PixelGrid, overlay: &PixelGrid, mode: FusionMode) -> OpsResult<RgbGrid> {
    reference.check_same_size(overlay)?;
    if reference.bit_depth() != overlay.bit_depth() {
        return Err(OpsError::SizeMismatch(format!(
            "bit depths differ: {:?} vs {:?}",
            reference.bit_depth(),
            overlay.bit_depth()
        )));
    }
    trace!(
        width = reference.width(),
        height = reference.height(),
        ?mode,
        "fuse"
    );

    let (width, height) = reference.dimensions();
    let split = height as f64 / SPLIT_DIVISOR;
    let mut data = Vec::with_capacity(reference.sample_count());
    for y in 0..height {
        for x in 0..width {
            let a = reference.sample(x, y);
            let b = overlay.sample(x, y);
            let pixel = match mode {
                FusionMode::GrayscaleReference => [a, a, a],
                FusionMode::GrayscaleOverlay => [b, b, b],
                FusionMode::DualChannel => [0, a, b],
                FusionMode::Split => {
                    if y as f64 <= split {
                        [a, a, a]
                    } else {
                        [0, a, b]
                    }
                }
            };
            data.push(pixel);
        }
    }

    Ok(RgbGrid {
        data,
        width,
        height,
        depth: reference.bit_depth(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> (PixelGrid, PixelGrid) {
        let a = PixelGrid::from_samples(
            2,
            4,
            BitDepth::UNSIGNED_8,
            (0..8).map(|i| i * 10).collect(),
        )
        .unwrap();
        let b = PixelGrid::from_samples(
            2,
            4,
            BitDepth::UNSIGNED_8,
            (0..8).map(|i| 200 - i * 10).collect(),
        )
        .unwrap();
        (a, b)
    }

    #[test]
    fn test_grayscale_replication() {
        let (a, b) = pair();
        let gray = fuse(&a, &b, FusionMode::GrayscaleReference).unwrap();
        for (x, y, v) in a.iter() {
            assert_eq!(gray.pixel(x, y), [v, v, v]);
        }
        let gray = fuse(&a, &b, FusionMode::GrayscaleOverlay).unwrap();
        assert_eq!(gray.pixel(0, 0), [200, 200, 200]);
    }

    #[test]
    fn test_dual_channel_law() {
        let (a, b) = pair();
        let fused = fuse(&a, &b, FusionMode::DualChannel).unwrap();
        for y in 0..a.height() {
            for x in 0..a.width() {
                assert_eq!(fused.pixel(x, y), [0, a.sample(x, y), b.sample(x, y)]);
            }
        }
    }

    #[test]
    fn test_split_line_position() {
        // height 4: split = 4 / 1.75 = 2.29, so rows 0..=2 are grayscale
        let (a, b) = pair();
        let fused = fuse(&a, &b, FusionMode::Split).unwrap();
        for y in 0..=2 {
            let v = a.sample(0, y);
            assert_eq!(fused.pixel(0, y), [v, v, v]);
        }
        assert_eq!(fused.pixel(0, 3), [0, a.sample(0, 3), b.sample(0, 3)]);
    }

    #[test]
    fn test_size_mismatch_is_an_error() {
        let a = PixelGrid::new(4, 4, BitDepth::UNSIGNED_8);
        let b = PixelGrid::new(4, 5, BitDepth::UNSIGNED_8);
        assert!(matches!(
            fuse(&a, &b, FusionMode::DualChannel),
            Err(OpsError::Core(_))
        ));
    }

    #[test]
    fn test_depth_mismatch_is_an_error() {
        let a = PixelGrid::new(4, 4, BitDepth::UNSIGNED_8);
        let b = PixelGrid::new(4, 4, BitDepth::SIGNED_16);
        assert!(matches!(
            fuse(&a, &b, FusionMode::DualChannel),
            Err(OpsError::SizeMismatch(_))
        ));
    }
}
