//! The pixel grid buffer underlying every transform.
//!
//! [`PixelGrid`] is an owned, row-major buffer of grayscale intensity
//! samples plus the [`BitDepth`](crate::BitDepth) metadata the samples were
//! declared with.
//!
//! # Design
//!
//! Samples are stored as `i32` regardless of declared depth. Raw loaded
//! data may exceed the displayable range before normalization, and the
//! second-derivative filter path deliberately produces negative
//! intermediates, so the buffer type has to hold more than the declared
//! depth does. The declared depth travels with the grid and supplies the
//! saturation ceiling for every clamped transform.
//!
//! Transforms never mutate a grid in place: each one consumes a borrowed
//! input and returns a freshly built output. That statelessness is what
//! keeps the processing core testable independently of whatever display
//! loop holds the "current image" reference.
//!
//! # Memory Layout
//!
//! Samples are stored row-major, top-to-bottom:
//!
//! ```text
//! Memory: [s s s s ...]  <- Row 0
//!         [s s s s ...]  <- Row 1
//! ```
//!
//! The buffer lives in an `Arc<Vec<i32>>`, so cloning a grid is cheap and
//! the display collaborator can keep a handle to a previous result while
//! the next transform runs. Mutation during construction goes through
//! copy-on-write.
//!
//! # Usage
//!
//! ```rust
//! use medpix_core::{BitDepth, PixelGrid};
//!
//! let mut grid = PixelGrid::new(512, 512, BitDepth::SIGNED_16);
//! grid.set_sample(100, 100, 1200);
//! assert_eq!(grid.sample(100, 100), 1200);
//!
//! let brighter = grid.map_samples(|v| v + 10);
//! assert_eq!(brighter.sample(100, 100), 1210);
//! assert_eq!(grid.sample(100, 100), 1200); // input untouched
//! ```

use crate::{BitDepth, Error, Result};
use std::sync::Arc;

/// Owned 2D grayscale sample buffer with bit-depth metadata.
///
/// See the [module docs](self) for layout and ownership semantics.
#[derive(Clone)]
pub struct PixelGrid {
    /// Sample buffer (Arc for cheap cloning).
    data: Arc<Vec<i32>>,
    /// Grid width in samples.
    width: u32,
    /// Grid height in samples.
    height: u32,
    /// Declared storage format of the samples.
    depth: BitDepth,
}

impl PixelGrid {
    /// Creates a new grid filled with zeros.
    pub fn new(width: u32, height: u32, depth: BitDepth) -> Self {
        let count = width as usize * height as usize;
        Self {
            data: Arc::new(vec![0; count]),
            width,
            height,
            depth,
        }
    }

    /// Creates a grid from an existing sample buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if the buffer length doesn't
    /// equal `width * height`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use medpix_core::{BitDepth, PixelGrid};
    ///
    /// let grid = PixelGrid::from_samples(2, 2, BitDepth::UNSIGNED_8, vec![1, 2, 3, 4]).unwrap();
    /// assert_eq!(grid.sample(1, 1), 4);
    /// ```
    pub fn from_samples(width: u32, height: u32, depth: BitDepth, data: Vec<i32>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} samples, got {}", expected, data.len()),
            ));
        }
        Ok(Self {
            data: Arc::new(data),
            width,
            height,
            depth,
        })
    }

    /// Creates a grid filled with a constant intensity.
    pub fn filled(width: u32, height: u32, depth: BitDepth, value: i32) -> Self {
        let count = width as usize * height as usize;
        Self {
            data: Arc::new(vec![value; count]),
            width,
            height,
            depth,
        }
    }

    /// Returns the grid width in samples.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the grid height in samples.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the grid dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the declared bit depth.
    #[inline]
    pub fn bit_depth(&self) -> BitDepth {
        self.depth
    }

    /// Returns the saturation ceiling of the declared depth.
    #[inline]
    pub fn max_brightness(&self) -> i32 {
        self.depth.max_brightness()
    }

    /// Returns the total number of samples.
    #[inline]
    pub fn sample_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns `true` if the grid has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns a reference to the raw sample buffer.
    #[inline]
    pub fn samples(&self) -> &[i32] {
        &self.data
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Returns the sample at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn sample(&self, x: u32, y: u32) -> i32 {
        debug_assert!(x < self.width && y < self.height, "sample out of bounds");
        self.data[self.offset(x, y)]
    }

    /// Returns the sample at (x, y), or `None` if out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<i32> {
        if x < self.width && y < self.height {
            Some(self.data[self.offset(x, y)])
        } else {
            None
        }
    }

    /// Sets the sample at (x, y).
    ///
    /// Used while building a result grid; shared buffers copy-on-write.
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn set_sample(&mut self, x: u32, y: u32, value: i32) {
        debug_assert!(x < self.width && y < self.height, "sample out of bounds");
        let offset = self.offset(x, y);
        Arc::make_mut(&mut self.data)[offset] = value;
    }

    /// Returns a row of samples as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[i32] {
        debug_assert!(y < self.height, "row out of bounds");
        let start = y as usize * self.width as usize;
        &self.data[start..start + self.width as usize]
    }

    /// Iterates over all samples with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, i32)> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| (x, y, self.sample(x, y))))
    }

    /// Returns the observed (min, max) intensity, or `None` for an empty grid.
    pub fn min_max(&self) -> Option<(i32, i32)> {
        let mut it = self.data.iter().copied();
        let first = it.next()?;
        let mut min = first;
        let mut max = first;
        for v in it {
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
        }
        Some((min, max))
    }

    /// Builds a new grid by applying `f` to every sample.
    ///
    /// The input grid is left untouched; the output inherits its
    /// dimensions and declared depth.
    pub fn map_samples<F>(&self, f: F) -> PixelGrid
    where
        F: Fn(i32) -> i32,
    {
        let data = self.data.iter().map(|&v| f(v)).collect();
        Self {
            data: Arc::new(data),
            width: self.width,
            height: self.height,
            depth: self.depth,
        }
    }

    /// Returns a copy of this grid with every sample clamped to
    /// `[0, max_brightness]`.
    pub fn clamped(&self) -> PixelGrid {
        let depth = self.depth;
        self.map_samples(|v| depth.clamp(v))
    }

    /// Returns `true` if every sample already lies in `[0, max_brightness]`.
    pub fn is_within_depth(&self) -> bool {
        let max = self.depth.max_brightness();
        self.data.iter().all(|&v| (0..=max).contains(&v))
    }

    /// Checks that another grid has identical dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] otherwise.
    pub fn check_same_size(&self, other: &PixelGrid) -> Result<()> {
        if self.dimensions() != other.dimensions() {
            return Err(Error::dimension_mismatch(
                self.dimensions(),
                other.dimensions(),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for PixelGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelGrid")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("depth", &self.depth)
            .finish()
    }
}
