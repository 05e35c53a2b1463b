//! Dynamic-range normalization and Niblack adaptive thresholding.
//!
//! [`normalize`] is the shared prerequisite of the thresholding and
//! volume pipelines: a percentile-clip linear stretch that maps fixed
//! fractions of the *observed maximum* onto the full display range. It is
//! not a true percentile computation: the clip points are
//! `0.25 * observed_max` and `0.85 * observed_max`, which is what the
//! downstream visual semantics were tuned against.
//!
//! [`niblack`] binarizes a normalized grid against a per-pixel local
//! threshold `t = mean + k * sigma` over a sliding window.
//!
//! # Example
//!
//! ```rust
//! use medpix_core::{BitDepth, PixelGrid};
//! use medpix_ops::threshold::{niblack, normalize, NiblackParams};
//!
//! let grid = PixelGrid::from_samples(2, 2, BitDepth::UNSIGNED_8, vec![10, 60, 120, 250]).unwrap();
//! let normalized = normalize(&grid).unwrap();
//! let binary = niblack(&normalized, &NiblackParams::default()).unwrap();
//! assert!(binary.samples().iter().all(|&v| v == 0 || v == 255));
//! ```

use crate::{OpsError, OpsResult};
use medpix_core::PixelGrid;
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Fraction of the observed maximum mapped to black.
pub const NORMALIZE_LOW_FRAC: f64 = 0.25;

/// Fraction of the observed maximum mapped to full brightness.
pub const NORMALIZE_HIGH_FRAC: f64 = 0.85;

/// Percentile-clip linear stretch onto `[0, max_brightness]`.
///
/// Intensities at or below `0.25 * observed_max` go to 0, intensities at
/// or above `0.85 * observed_max` saturate, and the band in between is
/// stretched linearly (truncated to integer). A grid whose clip points
/// coincide (observed max of zero or below) degenerates to a plain clamp.
///
/// # Errors
///
/// Returns [`OpsError::InvalidDimensions`] for an empty grid.
pub fn normalize(grid: &PixelGrid) -> OpsResult<PixelGrid> {
    let (_, observed_max) = grid
        .min_max()
        .ok_or_else(|| OpsError::InvalidDimensions("grid must be non-empty".into()))?;
    trace!(
        width = grid.width(),
        height = grid.height(),
        observed_max,
        "normalize"
    );

    let low = (observed_max as f64 * NORMALIZE_LOW_FRAC) as i32;
    let high = (observed_max as f64 * NORMALIZE_HIGH_FRAC) as i32;
    let max_brightness = grid.max_brightness();
    if high <= low {
        debug!(low, high, "degenerate clip points, clamping input");
        return Ok(grid.clamped());
    }

    let span = (high - low) as f64;
    Ok(grid.map_samples(|v| {
        let stretched = ((v - low) as f64 / span * max_brightness as f64) as i32;
        stretched.clamp(0, max_brightness)
    }))
}

/// Niblack local-threshold parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NiblackParams {
    /// Sliding-window side length (odd).
    pub window: u32,
    /// Sensitivity coefficient applied to the local deviation.
    pub k: f64,
}

impl Default for NiblackParams {
    fn default() -> Self {
        Self {
            window: 15,
            k: -0.2,
        }
    }
}

/// Niblack adaptive binarization.
///
/// Every sample is compared against the threshold of its own `W x W`
/// neighborhood, `t = mean + k * sigma` (population deviation).
/// Out-of-range window positions contribute literal zero samples, so the
/// window always holds `W * W` values. Output is 0 where `v <= t` and
/// `max_brightness` where `v > t`; a uniform neighborhood has zero
/// deviation, its threshold equals its mean, and the pixel classifies as
/// background.
///
/// # Errors
///
/// - [`OpsError::InvalidParameter`] if the window is even or zero.
/// - [`OpsError::InvalidDimensions`] for an empty grid.
pub fn niblack(grid: &PixelGrid, params: &NiblackParams) -> OpsResult<PixelGrid> {
    validate_params(params)?;
    if grid.is_empty() {
        return Err(OpsError::InvalidDimensions("grid must be non-empty".into()));
    }
    trace!(
        width = grid.width(),
        height = grid.height(),
        window = params.window,
        k = params.k,
        "niblack"
    );

    let width = grid.width() as usize;
    let mut data = vec![0i32; grid.sample_count()];
    for (y, row) in data.chunks_mut(width).enumerate() {
        niblack_row(grid, params, y as u32, row);
    }
    Ok(PixelGrid::from_samples(grid.width(), grid.height(), grid.bit_depth(), data)?)
}

pub(crate) fn validate_params(params: &NiblackParams) -> OpsResult<()> {
    if params.window == 0 || params.window % 2 == 0 {
        return Err(OpsError::InvalidParameter(format!(
            "niblack window must be odd, got {}",
            params.window
        )));
    }
    Ok(())
}

/// Thresholds one output row; shared by the serial and parallel drivers.
pub(crate) fn niblack_row(grid: &PixelGrid, params: &NiblackParams, y: u32, out_row: &mut [i32]) {
    let width = grid.width() as i64;
    let height = grid.height() as i64;
    let max_brightness = grid.max_brightness();
    let half = (params.window / 2) as i64;
    let count = (params.window as u64 * params.window as u64) as f64;

    for (x, out) in out_row.iter_mut().enumerate() {
        let x = x as i64;
        let y = y as i64;
        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        for dy in -half..=half {
            for dx in -half..=half {
                let sx = x + dx;
                let sy = y + dy;
                // out-of-range positions stay at the implicit zero sample
                if sx >= 0 && sx < width && sy >= 0 && sy < height {
                    let v = grid.sample(sx as u32, sy as u32) as f64;
                    sum += v;
                    sum_sq += v * v;
                }
            }
        }
        let mean = sum / count;
        let variance = (sum_sq / count - mean * mean).max(0.0);
        let threshold = mean + params.k * variance.sqrt();

        let v = grid.sample(x as u32, y as u32) as f64;
        *out = if v > threshold { max_brightness } else { 0 };
    }
}
