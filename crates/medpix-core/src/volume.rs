//! Slice stacks for volume viewing.
//!
//! A [`VolumeStack`] is the load-time product of reading N axial slices
//! plus the two spacing tags the display geometry needs. It is built once,
//! validated once, and never mutated; the reformatter consumes it to
//! derive the orthogonal views.

use crate::{BitDepth, Error, PixelGrid, Result};

/// An ordered stack of same-sized axial slices plus spacing metadata.
///
/// The spacing values scale display geometry only; they never touch
/// sample values.
///
/// # Example
///
/// ```rust
/// use medpix_core::{BitDepth, PixelGrid, VolumeStack};
///
/// let slices = vec![PixelGrid::new(256, 256, BitDepth::UNSIGNED_8); 20];
/// let stack = VolumeStack::new(slices, 1.0, 0.5).unwrap();
/// assert_eq!(stack.slice_count(), 20);
/// assert_eq!(stack.dimensions(), (256, 256));
/// ```
#[derive(Debug, Clone)]
pub struct VolumeStack {
    slices: Vec<PixelGrid>,
    slice_thickness: f64,
    space_between_slices: f64,
}

impl VolumeStack {
    /// Builds a validated stack from loaded slices.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyVolume`] for zero slices.
    /// - [`Error::DimensionMismatch`] if any slice disagrees with the
    ///   first on width or height.
    /// - [`Error::InvalidDimensions`] if any slice disagrees on bit depth
    ///   (a stack mixes acquisitions otherwise).
    pub fn new(
        slices: Vec<PixelGrid>,
        slice_thickness: f64,
        space_between_slices: f64,
    ) -> Result<Self> {
        let first = slices.first().ok_or(Error::EmptyVolume)?;
        let dims = first.dimensions();
        let depth = first.bit_depth();
        for slice in &slices[1..] {
            if slice.dimensions() != dims {
                return Err(Error::dimension_mismatch(dims, slice.dimensions()));
            }
            if slice.bit_depth() != depth {
                return Err(Error::invalid_dimensions(
                    dims.0,
                    dims.1,
                    "slices with mixed bit depths",
                ));
            }
        }
        Ok(Self {
            slices,
            slice_thickness,
            space_between_slices,
        })
    }

    /// Returns the number of axial slices.
    #[inline]
    pub fn slice_count(&self) -> usize {
        self.slices.len()
    }

    /// Returns the (width, height) shared by every slice.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.slices[0].dimensions()
    }

    /// Returns the bit depth shared by every slice.
    #[inline]
    pub fn bit_depth(&self) -> BitDepth {
        self.slices[0].bit_depth()
    }

    /// Returns one axial slice.
    #[inline]
    pub fn slice(&self, index: usize) -> &PixelGrid {
        &self.slices[index]
    }

    /// Returns all axial slices in order.
    #[inline]
    pub fn slices(&self) -> &[PixelGrid] {
        &self.slices
    }

    /// Returns the declared slice thickness.
    #[inline]
    pub fn slice_thickness(&self) -> f64 {
        self.slice_thickness
    }

    /// Returns the declared gap between slices.
    #[inline]
    pub fn space_between_slices(&self) -> f64 {
        self.space_between_slices
    }

    /// Returns the display-space span of the stack along its depth axis.
    ///
    /// Per-slice extent times slice count; the display collaborator uses
    /// this to place the orthogonal view planes.
    #[inline]
    pub fn depth_extent(&self) -> f64 {
        (self.slice_thickness + self.space_between_slices) * self.slices.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_stack() {
        assert!(matches!(
            VolumeStack::new(vec![], 1.0, 0.0),
            Err(Error::EmptyVolume)
        ));
    }

    #[test]
    fn test_rejects_mismatched_slices() {
        let slices = vec![
            PixelGrid::new(16, 16, BitDepth::UNSIGNED_8),
            PixelGrid::new(16, 8, BitDepth::UNSIGNED_8),
        ];
        assert!(VolumeStack::new(slices, 1.0, 0.0).is_err());
    }

    #[test]
    fn test_rejects_mixed_depths() {
        let slices = vec![
            PixelGrid::new(16, 16, BitDepth::UNSIGNED_8),
            PixelGrid::new(16, 16, BitDepth::SIGNED_16),
        ];
        assert!(VolumeStack::new(slices, 1.0, 0.0).is_err());
    }

    #[test]
    fn test_depth_extent() {
        let slices = vec![PixelGrid::new(4, 4, BitDepth::UNSIGNED_8); 10];
        let stack = VolumeStack::new(slices, 1.5, 0.5).unwrap();
        assert!((stack.depth_extent() - 20.0).abs() < 1e-12);
    }
}
