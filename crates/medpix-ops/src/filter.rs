//! 3x3 convolution filtering and zero-crossing edge detection.
//!
//! One engine applies every production kernel; the filters differ only in
//! the [`Kernel`] table and the [`BoundaryPolicy`] supplied:
//!
//! - [`Kernel::SHARPEN_UNIFORM`], [`Kernel::SHARPEN_CROSS`],
//!   [`Kernel::SHARPEN_WEIGHTED`] - high-pass / sharpening masks
//! - [`Kernel::GAUSSIAN`] - smoothing
//! - [`Kernel::LAPLACIAN`] - second derivative, feeding the
//!   [`zero_crossings`] edge detector
//!
//! # Boundary handling
//!
//! A neighbor falling outside the grid is never an error and never causes
//! the pixel to be skipped; it resolves per policy, either contributing
//! nothing ([`BoundaryPolicy::ZeroContribution`]) or reading the sample
//! mirrored back across the boundary ([`BoundaryPolicy::MirrorIndex`]).
//!
//! # Signed intermediates
//!
//! [`convolve`] clamps results into the displayable range. The Laplacian
//! path must keep its negative lobes for sign analysis, so it goes
//! through [`convolve_signed`], which only saturates the upper bound, and
//! then [`zero_crossings`] to mark the sign changes.
//!
//! # Example
//!
//! ```rust
//! use medpix_core::{BitDepth, PixelGrid};
//! use medpix_ops::filter::{convolve, BoundaryPolicy, Kernel};
//!
//! let grid = PixelGrid::filled(16, 16, BitDepth::UNSIGNED_8, 100);
//! let sharpened = convolve(&grid, &Kernel::SHARPEN_CROSS, BoundaryPolicy::ZeroContribution).unwrap();
//! assert_eq!(sharpened.dimensions(), (16, 16));
//! ```

use crate::{OpsError, OpsResult};
use medpix_core::PixelGrid;
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Fixed 3x3 convolution kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel {
    /// Coefficients indexed `[dy + 1][dx + 1]` for offsets in -1..=1.
    pub coeffs: [[f64; 3]; 3],
}

impl Kernel {
    /// Creates a kernel from a coefficient table.
    #[inline]
    pub const fn new(coeffs: [[f64; 3]; 3]) -> Self {
        Self { coeffs }
    }

    /// Pass-through kernel; convolving with it returns the input.
    pub const IDENTITY: Self = Self::new([
        [0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0],
    ]);

    /// High-pass sharpening mask weighting all eight neighbors equally.
    pub const SHARPEN_UNIFORM: Self = Self::new([
        [-1.0 / 9.0, -1.0 / 9.0, -1.0 / 9.0],
        [-1.0 / 9.0, 8.0 / 9.0, -1.0 / 9.0],
        [-1.0 / 9.0, -1.0 / 9.0, -1.0 / 9.0],
    ]);

    /// High-pass sharpening mask over the 4-connected cross.
    pub const SHARPEN_CROSS: Self = Self::new([
        [0.0, -1.0 / 6.0, 0.0],
        [-1.0 / 6.0, 4.0 / 6.0, -1.0 / 6.0],
        [0.0, -1.0 / 6.0, 0.0],
    ]);

    /// Center-weighted high-pass mask (Laplacian-of-Gaussian pairing).
    pub const SHARPEN_WEIGHTED: Self = Self::new([
        [-1.0 / 16.0, -2.0 / 16.0, -1.0 / 16.0],
        [-2.0 / 16.0, 12.0 / 16.0, -2.0 / 16.0],
        [-1.0 / 16.0, -2.0 / 16.0, -1.0 / 16.0],
    ]);

    /// Gaussian smoothing mask.
    pub const GAUSSIAN: Self = Self::new([
        [0.059, 0.097, 0.059],
        [0.097, 0.159, 0.097],
        [0.059, 0.097, 0.059],
    ]);

    /// 8-connected Laplacian second-derivative operator.
    pub const LAPLACIAN: Self = Self::new([
        [1.0, 1.0, 1.0],
        [1.0, -8.0, 1.0],
        [1.0, 1.0, 1.0],
    ]);

    /// Returns the coefficient for a neighbor offset in -1..=1.
    #[inline]
    pub fn coeff(&self, dy: i32, dx: i32) -> f64 {
        self.coeffs[(dy + 1) as usize][(dx + 1) as usize]
    }

    /// Sum of all coefficients (1.0 for brightness-preserving masks).
    pub fn sum(&self) -> f64 {
        self.coeffs.iter().flatten().sum()
    }
}

/// Strategy for a convolution neighbor outside the grid bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    /// A missing neighbor contributes 0 to the accumulation.
    #[default]
    ZeroContribution,
    /// The out-of-range coordinate reflects back across the boundary:
    /// the sample at `center - offset` stands in for `center + offset`.
    MirrorIndex,
}

/// How the accumulated value is folded back into the sample range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Saturation {
    /// Clamp into `[0, max_brightness]`.
    Full,
    /// Clamp only the ceiling; keep negative intermediates.
    UpperOnly,
}

/// Applies a 3x3 kernel to every pixel, clamping into the display range.
///
/// # Errors
///
/// Returns [`OpsError::InvalidDimensions`] for an empty grid.
///
/// # Example
///
/// ```rust
/// use medpix_core::{BitDepth, PixelGrid};
/// use medpix_ops::filter::{convolve, BoundaryPolicy, Kernel};
///
/// let grid = PixelGrid::filled(8, 8, BitDepth::UNSIGNED_8, 42);
/// let same = convolve(&grid, &Kernel::IDENTITY, BoundaryPolicy::MirrorIndex).unwrap();
/// assert_eq!(same.samples(), grid.samples());
/// ```
pub fn convolve(grid: &PixelGrid, kernel: &Kernel, policy: BoundaryPolicy) -> OpsResult<PixelGrid> {
    convolve_with(grid, kernel, policy, Saturation::Full)
}

/// Applies a 3x3 kernel, saturating only the upper bound.
///
/// Negative results pass through untouched so that a downstream
/// sign-analysis step ([`zero_crossings`]) still sees them. The output is
/// *not* a displayable grid.
pub fn convolve_signed(
    grid: &PixelGrid,
    kernel: &Kernel,
    policy: BoundaryPolicy,
) -> OpsResult<PixelGrid> {
    convolve_with(grid, kernel, policy, Saturation::UpperOnly)
}

fn convolve_with(
    grid: &PixelGrid,
    kernel: &Kernel,
    policy: BoundaryPolicy,
    saturation: Saturation,
) -> OpsResult<PixelGrid> {
    if grid.is_empty() {
        return Err(OpsError::InvalidDimensions("grid must be non-empty".into()));
    }
    trace!(
        width = grid.width(),
        height = grid.height(),
        ?policy,
        "convolve"
    );

    let width = grid.width() as usize;
    let mut data = vec![0i32; grid.sample_count()];
    for (y, row) in data.chunks_mut(width).enumerate() {
        convolve_row(grid, kernel, policy, saturation, y as u32, row);
    }
    Ok(PixelGrid::from_samples(grid.width(), grid.height(), grid.bit_depth(), data)?)
}

/// Convolves one output row; shared by the serial and parallel drivers.
fn convolve_row(
    grid: &PixelGrid,
    kernel: &Kernel,
    policy: BoundaryPolicy,
    saturation: Saturation,
    y: u32,
    out_row: &mut [i32],
) {
    let width = grid.width() as i64;
    let height = grid.height() as i64;
    let max_brightness = grid.max_brightness();

    for (x, out) in out_row.iter_mut().enumerate() {
        let x = x as i64;
        let y = y as i64;
        let mut sum = 0.0;
        for dy in -1i64..=1 {
            for dx in -1i64..=1 {
                let mut sx = x + dx;
                let mut sy = y + dy;
                if sx < 0 || sx >= width {
                    match policy {
                        BoundaryPolicy::ZeroContribution => continue,
                        BoundaryPolicy::MirrorIndex => sx = x - dx,
                    }
                }
                if sy < 0 || sy >= height {
                    match policy {
                        BoundaryPolicy::ZeroContribution => continue,
                        BoundaryPolicy::MirrorIndex => sy = y - dy,
                    }
                }
                // A 1-sample-wide axis has nothing to mirror onto.
                if sx < 0 || sx >= width || sy < 0 || sy >= height {
                    continue;
                }
                sum += kernel.coeff(dy as i32, dx as i32) * grid.sample(sx as u32, sy as u32) as f64;
            }
        }
        let value = if sum > max_brightness as f64 {
            max_brightness
        } else {
            sum as i32
        };
        *out = match saturation {
            Saturation::Full => value.max(0),
            Saturation::UpperOnly => value,
        };
    }
}

#[cfg(feature = "parallel")]
pub(crate) fn convolve_row_clamped(
    grid: &PixelGrid,
    kernel: &Kernel,
    policy: BoundaryPolicy,
    y: u32,
    out_row: &mut [i32],
) {
    convolve_row(grid, kernel, policy, Saturation::Full, y, out_row);
}

/// Marks sign changes in a signed second-derivative grid as edges.
///
/// Consumes the output of [`convolve_signed`] with
/// [`Kernel::LAPLACIAN`]. An interior sample is an edge when it is
/// exactly zero with horizontally- or vertically-opposed signed
/// neighbors, or negative with any non-negative 4-neighbor. Edges are
/// `max_brightness` on a zero background; the border ring stays
/// background.
///
/// # Errors
///
/// Returns [`OpsError::InvalidDimensions`] for an empty grid.
pub fn zero_crossings(grid: &PixelGrid) -> OpsResult<PixelGrid> {
    if grid.is_empty() {
        return Err(OpsError::InvalidDimensions("grid must be non-empty".into()));
    }
    trace!(
        width = grid.width(),
        height = grid.height(),
        "zero_crossings"
    );

    let max_brightness = grid.max_brightness();
    let mut out = PixelGrid::new(grid.width(), grid.height(), grid.bit_depth());
    if grid.width() < 3 || grid.height() < 3 {
        return Ok(out);
    }

    for y in 1..grid.height() - 1 {
        for x in 1..grid.width() - 1 {
            let v = grid.sample(x, y);
            let left = grid.sample(x - 1, y);
            let right = grid.sample(x + 1, y);
            let up = grid.sample(x, y - 1);
            let down = grid.sample(x, y + 1);

            let edge = if v == 0 {
                (left < 0 && right > 0)
                    || (left > 0 && right < 0)
                    || (up < 0 && down > 0)
                    || (up > 0 && down < 0)
            } else {
                v < 0 && (left >= 0 || right >= 0 || up >= 0 || down >= 0)
            };
            if edge {
                out.set_sample(x, y, max_brightness);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use medpix_core::BitDepth;

    fn grid_from(width: u32, height: u32, values: Vec<i32>) -> PixelGrid {
        PixelGrid::from_samples(width, height, BitDepth::UNSIGNED_8, values).unwrap()
    }

    #[test]
    fn test_identity_kernel_under_both_policies() {
        let grid = grid_from(4, 3, (0..12).map(|v| v * 20).collect());
        for policy in [BoundaryPolicy::ZeroContribution, BoundaryPolicy::MirrorIndex] {
            let out = convolve(&grid, &Kernel::IDENTITY, policy).unwrap();
            assert_eq!(out.samples(), grid.samples());
        }
    }

    #[test]
    fn test_high_pass_masks_zero_a_flat_field() {
        // zero-sum masks: a flat field has no high-frequency content
        let grid = grid_from(8, 8, vec![90; 64]);
        for kernel in [
            Kernel::SHARPEN_UNIFORM,
            Kernel::SHARPEN_CROSS,
            Kernel::SHARPEN_WEIGHTED,
        ] {
            let out = convolve(&grid, &kernel, BoundaryPolicy::MirrorIndex).unwrap();
            assert!(out.samples().iter().all(|&v| v == 0));
        }
    }

    #[test]
    fn test_zero_contribution_darkens_the_border() {
        let grid = grid_from(5, 5, vec![100; 25]);
        let out = convolve(&grid, &Kernel::GAUSSIAN, BoundaryPolicy::ZeroContribution).unwrap();
        // corner loses five of nine neighbors
        assert!(out.sample(0, 0) < out.sample(2, 2));
    }

    #[test]
    fn test_mirror_index_matches_interior_on_flat_field() {
        let grid = grid_from(5, 5, vec![100; 25]);
        let out = convolve(&grid, &Kernel::GAUSSIAN, BoundaryPolicy::MirrorIndex).unwrap();
        assert_eq!(out.sample(0, 0), out.sample(2, 2));
    }

    #[test]
    fn test_convolve_clamps_to_display_range() {
        let mut values = vec![0; 25];
        values[12] = 255; // bright spike
        let grid = grid_from(5, 5, values);
        let out = convolve(&grid, &Kernel::LAPLACIAN, BoundaryPolicy::ZeroContribution).unwrap();
        assert!(out.is_within_depth());
    }

    #[test]
    fn test_convolve_signed_keeps_negative_lobes() {
        let mut values = vec![0; 25];
        values[12] = 100;
        let grid = grid_from(5, 5, values);
        let out =
            convolve_signed(&grid, &Kernel::LAPLACIAN, BoundaryPolicy::ZeroContribution).unwrap();
        // center of the spike goes strongly negative
        assert_eq!(out.sample(2, 2), -800);
        // direct neighbors pick up the positive lobe
        assert_eq!(out.sample(1, 2), 100);
    }

    #[test]
    fn test_zero_crossings_marks_step_edge() {
        // step image: left half dark, right half bright
        let mut values = Vec::with_capacity(36);
        for _y in 0..6 {
            for x in 0..6 {
                values.push(if x < 3 { 0 } else { 200 });
            }
        }
        let grid = grid_from(6, 6, values);
        let lap =
            convolve_signed(&grid, &Kernel::LAPLACIAN, BoundaryPolicy::MirrorIndex).unwrap();
        let edges = zero_crossings(&lap).unwrap();
        // an edge is detected along the step
        let marked = edges.samples().iter().filter(|&&v| v > 0).count();
        assert!(marked > 0);
        // and far from the step nothing fires
        assert_eq!(edges.sample(1, 3), 0);
    }

    #[test]
    fn test_zero_crossings_flat_signed_grid_is_background() {
        let grid =
            PixelGrid::from_samples(5, 5, BitDepth::SIGNED_16, vec![-3; 25]).unwrap();
        let edges = zero_crossings(&grid).unwrap();
        assert!(edges.samples().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_kernel_sums() {
        use approx::assert_abs_diff_eq;
        // the smoothing mask is not normalized to 1
        assert_abs_diff_eq!(Kernel::GAUSSIAN.sum(), 0.783, epsilon = 1e-9);
        assert_abs_diff_eq!(Kernel::LAPLACIAN.sum(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(Kernel::SHARPEN_UNIFORM.sum(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(Kernel::SHARPEN_CROSS.sum(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(Kernel::SHARPEN_WEIGHTED.sum(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(Kernel::IDENTITY.sum(), 1.0, epsilon = 1e-12);
    }
}
