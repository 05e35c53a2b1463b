//! Histogram equalization.
//!
//! Builds the intensity histogram of the input grid, turns its cumulative
//! distribution into a lookup table, and remaps every sample through it.
//! The result spreads the occupied intensity range across the full
//! displayable range.
//!
//! The LUT uses the cumulative-distribution remap anchored at the first
//! occupied bin:
//!
//! ```text
//! lut[i] = round((cdf(i) - cdf_min) / (n - cdf_min) * max_brightness)
//! ```
//!
//! which pins the darkest occupied intensity to 0 and the brightest to
//! `max_brightness`.
//!
//! # Example
//!
//! ```rust
//! use medpix_core::{BitDepth, PixelGrid};
//! use medpix_ops::equalize::equalize;
//!
//! let grid = PixelGrid::from_samples(2, 2, BitDepth::UNSIGNED_8, vec![10, 10, 20, 30]).unwrap();
//! let out = equalize(&grid).unwrap();
//! assert_eq!(out.sample(1, 1), 255); // brightest occupied bin saturates
//! ```

use crate::{OpsError, OpsResult};
use medpix_core::{Histogram, PixelGrid};
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Equalizes a grid's histogram over `[0, max_brightness]`.
///
/// Samples outside the displayable range participate through their
/// nearest boundary bin and remap accordingly, so the output is always
/// within the declared depth.
///
/// A single-intensity grid has nothing to redistribute; it is returned
/// clamped to the displayable range.
///
/// # Errors
///
/// Returns [`OpsError::InvalidDimensions`] for an empty grid.
pub fn equalize(grid: &PixelGrid) -> OpsResult<PixelGrid> {
    if grid.is_empty() {
        return Err(OpsError::InvalidDimensions("grid must be non-empty".into()));
    }
    trace!(width = grid.width(), height = grid.height(), "equalize");

    let max_brightness = grid.max_brightness();
    let histogram = Histogram::from_grid(grid);
    let cumulative = histogram.cumulative();
    let total = grid.sample_count() as u64;

    let cdf_min = cumulative
        .iter()
        .copied()
        .find(|&c| c > 0)
        .unwrap_or(total);
    if cdf_min == total {
        debug!("single-intensity grid, nothing to equalize");
        return Ok(grid.clamped());
    }

    let denom = (total - cdf_min) as f64;
    let lut: Vec<i32> = cumulative
        .iter()
        .map(|&c| {
            if c <= cdf_min {
                0
            } else {
                ((c - cdf_min) as f64 / denom * max_brightness as f64).round() as i32
            }
        })
        .collect();

    Ok(grid.map_samples(|v| lut[v.clamp(0, max_brightness) as usize]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use medpix_core::BitDepth;

    #[test]
    fn test_two_intensity_step_keeps_extremes() {
        // 100 samples at 0 and 100 at the ceiling of an 8-bit grid
        let mut values = vec![0; 100];
        values.extend(vec![255; 100]);
        let grid = PixelGrid::from_samples(200, 1, BitDepth::UNSIGNED_8, values).unwrap();
        let out = equalize(&grid).unwrap();
        assert_eq!(out.sample(0, 0), 0);
        assert_eq!(out.sample(199, 0), 255);
    }

    #[test]
    fn test_darkest_occupied_bin_maps_to_zero() {
        let grid =
            PixelGrid::from_samples(4, 1, BitDepth::UNSIGNED_8, vec![90, 90, 170, 250]).unwrap();
        let out = equalize(&grid).unwrap();
        assert_eq!(out.sample(0, 0), 0);
        assert_eq!(out.sample(3, 0), 255);
        // middle bin lands proportionally between the extremes
        assert_eq!(out.sample(2, 0), 128);
    }

    #[test]
    fn test_uniform_grid_is_returned_clamped() {
        let grid = PixelGrid::filled(8, 8, BitDepth::UNSIGNED_8, 77);
        let out = equalize(&grid).unwrap();
        assert_eq!(out.samples(), grid.samples());
    }

    #[test]
    fn test_output_is_monotone_in_input() {
        let values: Vec<i32> = (0..256).flat_map(|v| std::iter::repeat_n(v, (v % 7 + 1) as usize)).collect();
        let n = values.len() as u32;
        let grid = PixelGrid::from_samples(n, 1, BitDepth::UNSIGNED_8, values.clone()).unwrap();
        let out = equalize(&grid).unwrap();
        for x in 1..n {
            assert!(out.sample(x, 0) >= out.sample(x - 1, 0));
        }
    }

    #[test]
    fn test_raw_out_of_range_samples_are_pulled_in() {
        let grid =
            PixelGrid::from_samples(3, 1, BitDepth::UNSIGNED_8, vec![-40, 100, 900]).unwrap();
        let out = equalize(&grid).unwrap();
        assert!(out.is_within_depth());
        assert_eq!(out.sample(0, 0), 0);
        assert_eq!(out.sample(2, 0), 255);
    }

    #[test]
    fn test_empty_grid_is_an_error() {
        let grid = PixelGrid::new(4, 0, BitDepth::UNSIGNED_8);
        assert!(equalize(&grid).is_err());
    }
}
