//! Intensity windowing / leveling.
//!
//! Remaps a sub-range of the observed intensities onto the full display
//! range: everything at or below the window floor goes black, everything
//! above the window ceiling saturates, and the band in between ramps
//! linearly. The window is derived from the grid's own min/max via two
//! fractional constants, so the same parameters adapt to any study.
//!
//! # Example
//!
//! ```rust
//! use medpix_core::{BitDepth, PixelGrid};
//! use medpix_ops::window::{window_level, WindowLevel};
//!
//! let grid = PixelGrid::from_samples(2, 2, BitDepth::SIGNED_16, vec![-100, 0, 400, 2000]).unwrap();
//! let windowed = window_level(&grid, &WindowLevel::default()).unwrap();
//! assert!(windowed.is_within_depth());
//! ```

use crate::{OpsError, OpsResult};
use medpix_core::PixelGrid;
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Fractional window parameters.
///
/// The level and width of the display window are derived from the grid's
/// observed extremes:
///
/// ```text
/// window = max * max_frac - min * min_frac
/// level  = window / 2
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowLevel {
    /// Fraction applied to the observed maximum.
    pub max_frac: f64,
    /// Fraction applied to the observed minimum.
    pub min_frac: f64,
}

impl Default for WindowLevel {
    fn default() -> Self {
        Self {
            max_frac: 0.2,
            min_frac: -0.2,
        }
    }
}

/// Applies a window/level remap, saturating outside the window.
///
/// Per sample `v`:
/// - `v <= level - window/2` maps to 0
/// - `v > level + window/2` maps to `max_brightness`
/// - otherwise `v` ramps linearly across the window onto
///   `[0, max_brightness]`, truncated to integer
///
/// A degenerate window (zero or negative width, which happens on flat
/// input) falls back to clamping the input into the displayable range
/// rather than dividing by zero.
///
/// # Errors
///
/// Returns [`OpsError::InvalidDimensions`] for an empty grid.
pub fn window_level(grid: &PixelGrid, params: &WindowLevel) -> OpsResult<PixelGrid> {
    let (min, max) = grid
        .min_max()
        .ok_or_else(|| OpsError::InvalidDimensions("grid must be non-empty".into()))?;
    trace!(
        width = grid.width(),
        height = grid.height(),
        min,
        max,
        "window_level"
    );

    let window = max as f64 * params.max_frac - min as f64 * params.min_frac;
    let level = window / 2.0;
    let max_brightness = grid.max_brightness();

    if window <= 0.0 {
        debug!(window, "degenerate window, clamping input");
        return Ok(grid.clamped());
    }

    let floor = level - window / 2.0;
    let ceil = level + window / 2.0;
    Ok(grid.map_samples(|v| {
        let v = v as f64;
        if v <= floor {
            0
        } else if v > ceil {
            max_brightness
        } else {
            ((v - floor) * max_brightness as f64 / window) as i32
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use medpix_core::BitDepth;

    fn ramp_grid(values: Vec<i32>) -> PixelGrid {
        let n = values.len() as u32;
        PixelGrid::from_samples(n, 1, BitDepth::SIGNED_16, values).unwrap()
    }

    #[test]
    fn test_monotone_in_input() {
        let grid = ramp_grid((0..100).map(|i| i * 40).collect());
        let out = window_level(&grid, &WindowLevel::default()).unwrap();
        for x in 1..out.width() {
            assert!(out.sample(x, 0) >= out.sample(x - 1, 0));
        }
    }

    #[test]
    fn test_window_endpoints() {
        // min = 0, max = 1000 with default fractions:
        // window = 1000*0.2 - 0*(-0.2) = 200, floor = 0, ceil = 200
        let grid = ramp_grid(vec![0, 100, 200, 201, 1000]);
        let out = window_level(&grid, &WindowLevel::default()).unwrap();
        assert_eq!(out.sample(0, 0), 0); // at the floor
        assert_eq!(out.sample(1, 0), 32767 / 2); // mid-window
        assert_eq!(out.sample(2, 0), 32767); // at the ceiling
        assert_eq!(out.sample(3, 0), 32767); // just above
        assert_eq!(out.sample(4, 0), 32767); // saturated
    }

    #[test]
    fn test_output_stays_in_range() {
        let grid = ramp_grid(vec![-3000, -1, 0, 1, 12000, 32767]);
        let out = window_level(&grid, &WindowLevel::default()).unwrap();
        assert!(out.is_within_depth());
    }

    #[test]
    fn test_zero_window_clamps_input() {
        // flat grid at zero: window = 0
        let grid = PixelGrid::filled(4, 4, BitDepth::UNSIGNED_8, 0);
        let out = window_level(&grid, &WindowLevel::default()).unwrap();
        assert_eq!(out.samples(), grid.samples());
    }

    #[test]
    fn test_negative_window_clamps_input() {
        // min large and negative flips the derived window sign
        let grid = ramp_grid(vec![-30000, 100]);
        let out = window_level(&grid, &WindowLevel::default()).unwrap();
        assert_eq!(out.sample(0, 0), 0);
        assert_eq!(out.sample(1, 0), 100);
    }

    #[test]
    fn test_empty_grid_is_an_error() {
        let grid = PixelGrid::new(0, 0, BitDepth::UNSIGNED_8);
        assert!(window_level(&grid, &WindowLevel::default()).is_err());
    }

    #[test]
    fn test_keeps_declared_depth() {
        let grid = PixelGrid::from_samples(2, 1, BitDepth::UNSIGNED_8, vec![10, 200]).unwrap();
        let out = window_level(&grid, &WindowLevel::default()).unwrap();
        assert_eq!(out.bit_depth(), BitDepth::UNSIGNED_8);
    }
}
