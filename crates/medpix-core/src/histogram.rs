//! Intensity histogram over a pixel grid.
//!
//! The histogram is ephemeral: the equalizer rebuilds it per call and
//! discards it with the lookup table. Bins cover the *inclusive* range
//! `0..=max_brightness`; a histogram sized to only `max_brightness` bins
//! silently drops the top intensity value.

use crate::PixelGrid;

/// Occurrence counts per intensity value for one grid.
///
/// # Example
///
/// ```rust
/// use medpix_core::{BitDepth, Histogram, PixelGrid};
///
/// let grid = PixelGrid::from_samples(2, 2, BitDepth::UNSIGNED_8, vec![0, 0, 255, 128]).unwrap();
/// let hist = Histogram::from_grid(&grid);
/// assert_eq!(hist.count(0), 2);
/// assert_eq!(hist.count(255), 1);
/// assert_eq!(hist.total(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct Histogram {
    counts: Vec<u64>,
    max_brightness: i32,
}

impl Histogram {
    /// Builds the histogram of a grid over `0..=max_brightness`.
    ///
    /// Samples outside the displayable range are counted in the nearest
    /// boundary bin, so raw (not yet normalized) data still produces a
    /// well-formed histogram.
    pub fn from_grid(grid: &PixelGrid) -> Self {
        let max = grid.max_brightness();
        let mut counts = vec![0u64; max as usize + 1];
        for &v in grid.samples() {
            let bin = v.clamp(0, max) as usize;
            counts[bin] += 1;
        }
        Self {
            counts,
            max_brightness: max,
        }
    }

    /// Returns the count for one intensity value.
    ///
    /// Values outside `0..=max_brightness` report zero.
    #[inline]
    pub fn count(&self, value: i32) -> u64 {
        if (0..=self.max_brightness).contains(&value) {
            self.counts[value as usize]
        } else {
            0
        }
    }

    /// Returns all bins, index = intensity value.
    #[inline]
    pub fn bins(&self) -> &[u64] {
        &self.counts
    }

    /// Returns the top intensity covered by the bins.
    #[inline]
    pub fn max_brightness(&self) -> i32 {
        self.max_brightness
    }

    /// Returns the total number of counted samples.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Returns the running cumulative counts, bin by bin.
    ///
    /// `cumulative()[i]` is the number of samples with intensity `<= i`.
    pub fn cumulative(&self) -> Vec<u64> {
        let mut sum = 0u64;
        self.counts
            .iter()
            .map(|&c| {
                sum += c;
                sum
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BitDepth;

    #[test]
    fn test_inclusive_top_bin() {
        let grid =
            PixelGrid::from_samples(2, 1, BitDepth::UNSIGNED_8, vec![255, 255]).unwrap();
        let hist = Histogram::from_grid(&grid);
        assert_eq!(hist.bins().len(), 256);
        assert_eq!(hist.count(255), 2);
    }

    #[test]
    fn test_out_of_range_samples_clamp_into_boundary_bins() {
        let grid =
            PixelGrid::from_samples(2, 1, BitDepth::UNSIGNED_8, vec![-10, 300]).unwrap();
        let hist = Histogram::from_grid(&grid);
        assert_eq!(hist.count(0), 1);
        assert_eq!(hist.count(255), 1);
    }

    #[test]
    fn test_cumulative() {
        let grid =
            PixelGrid::from_samples(4, 1, BitDepth::UNSIGNED_8, vec![0, 1, 1, 3]).unwrap();
        let cum = Histogram::from_grid(&grid).cumulative();
        assert_eq!(cum[0], 1);
        assert_eq!(cum[1], 3);
        assert_eq!(cum[2], 3);
        assert_eq!(cum[3], 4);
        assert_eq!(cum[255], 4);
    }
}
