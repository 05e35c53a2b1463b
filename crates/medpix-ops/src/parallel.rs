//! Row-parallel transforms using Rayon.
//!
//! The two expensive kernels, 3x3 convolution and the W x W Niblack
//! window, are embarrassingly parallel across output rows. These
//! drivers reuse the per-row routines of [`filter`](crate::filter) and
//! [`threshold`](crate::threshold), so serial and parallel results are
//! identical sample for sample.
//!
//! # Example
//!
//! ```rust
//! use medpix_core::{BitDepth, PixelGrid};
//! use medpix_ops::filter::{BoundaryPolicy, Kernel};
//! use medpix_ops::parallel;
//!
//! let grid = PixelGrid::filled(256, 256, BitDepth::UNSIGNED_8, 80);
//! let out = parallel::convolve(&grid, &Kernel::GAUSSIAN, BoundaryPolicy::MirrorIndex).unwrap();
//! assert_eq!(out.dimensions(), (256, 256));
//! ```

use crate::filter::{BoundaryPolicy, Kernel};
use crate::threshold::NiblackParams;
use crate::{OpsError, OpsResult};
use medpix_core::PixelGrid;
use rayon::prelude::*;

/// Parallel 3x3 convolution, clamped into the display range.
///
/// Identical output to [`filter::convolve`](crate::filter::convolve).
///
/// # Errors
///
/// Returns [`OpsError::InvalidDimensions`] for an empty grid.
pub fn convolve(grid: &PixelGrid, kernel: &Kernel, policy: BoundaryPolicy) -> OpsResult<PixelGrid> {
    if grid.is_empty() {
        return Err(OpsError::InvalidDimensions("grid must be non-empty".into()));
    }

    let width = grid.width() as usize;
    let mut data = vec![0i32; grid.sample_count()];
    data.par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| crate::filter::convolve_row_clamped(grid, kernel, policy, y as u32, row));
    Ok(PixelGrid::from_samples(
        grid.width(),
        grid.height(),
        grid.bit_depth(),
        data,
    )?)
}

/// Parallel Niblack binarization.
///
/// Identical output to [`threshold::niblack`](crate::threshold::niblack).
///
/// # Errors
///
/// Same conditions as the serial version.
pub fn niblack(grid: &PixelGrid, params: &NiblackParams) -> OpsResult<PixelGrid> {
    crate::threshold::validate_params(params)?;
    if grid.is_empty() {
        return Err(OpsError::InvalidDimensions("grid must be non-empty".into()));
    }

    let width = grid.width() as usize;
    let mut data = vec![0i32; grid.sample_count()];
    data.par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| crate::threshold::niblack_row(grid, params, y as u32, row));
    Ok(PixelGrid::from_samples(
        grid.width(),
        grid.height(),
        grid.bit_depth(),
        data,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter;
    use crate::threshold;
    use medpix_core::BitDepth;

    fn noisy_grid() -> PixelGrid {
        let values: Vec<i32> = (0..(64 * 48)).map(|i| (i * 131) % 256).collect();
        PixelGrid::from_samples(64, 48, BitDepth::UNSIGNED_8, values).unwrap()
    }

    #[test]
    fn test_parallel_convolve_matches_serial() {
        let grid = noisy_grid();
        for policy in [BoundaryPolicy::ZeroContribution, BoundaryPolicy::MirrorIndex] {
            let serial = filter::convolve(&grid, &Kernel::SHARPEN_WEIGHTED, policy).unwrap();
            let par = convolve(&grid, &Kernel::SHARPEN_WEIGHTED, policy).unwrap();
            assert_eq!(serial.samples(), par.samples());
        }
    }

    #[test]
    fn test_parallel_niblack_matches_serial() {
        let grid = noisy_grid();
        let params = NiblackParams::default();
        let serial = threshold::niblack(&grid, &params).unwrap();
        let par = niblack(&grid, &params).unwrap();
        assert_eq!(serial.samples(), par.samples());
    }
}
