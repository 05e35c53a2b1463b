//! Multi-planar reformatting of an axial slice stack.
//!
//! Derives the two orthogonal view stacks from a loaded
//! [`VolumeStack`](medpix_core::VolumeStack) of N axial `H x W` slices:
//!
//! - **coronal** (front) stack: H grids of `(N + 12) x W`, with
//!   `coronal[i][j][k] = axial[j][i][k]` for `j < N`
//! - **sagittal** stack: W grids of `(N + 12) x H`, with
//!   `sagittal[i][j][k] = axial[j][k][i]` for `j < N`
//!
//! The 12 trailing rows of every derived grid stay at zero; they are
//! reserved display padding ([`DISPLAY_PADDING`]) and never receive
//! volume data.
//!
//! [`SliceCursor`] tracks which slice of each of the three stacks is
//! currently displayed, with silent clamping at the ends of each range.
//!
//! # Example
//!
//! ```rust
//! use medpix_core::{BitDepth, PixelGrid, VolumeStack};
//! use medpix_ops::reformat::{reformat, NavAxis};
//!
//! let slices = vec![PixelGrid::new(32, 32, BitDepth::UNSIGNED_8); 10];
//! let stack = VolumeStack::new(slices, 1.0, 0.5).unwrap();
//! let views = reformat(&stack).unwrap();
//!
//! let mut cursor = views.cursor();
//! cursor.navigate(NavAxis::Axial, 1);
//! assert_eq!(cursor.axial(), 1);
//! ```

use crate::OpsResult;
use medpix_core::{PixelGrid, VolumeStack};
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Rows appended past the volume data in every derived grid.
pub const DISPLAY_PADDING: u32 = 12;

/// The two derived orthogonal view stacks of one volume.
#[derive(Debug, Clone)]
pub struct ReformatSet {
    coronal: Vec<PixelGrid>,
    sagittal: Vec<PixelGrid>,
    axial_count: usize,
    width: u32,
    height: u32,
}

impl ReformatSet {
    /// Returns the coronal (front) stack: one grid per image row.
    #[inline]
    pub fn coronal(&self) -> &[PixelGrid] {
        &self.coronal
    }

    /// Returns the sagittal stack: one grid per image column.
    #[inline]
    pub fn sagittal(&self) -> &[PixelGrid] {
        &self.sagittal
    }

    /// Returns one coronal slice.
    #[inline]
    pub fn coronal_slice(&self, index: usize) -> &PixelGrid {
        &self.coronal[index]
    }

    /// Returns one sagittal slice.
    #[inline]
    pub fn sagittal_slice(&self, index: usize) -> &PixelGrid {
        &self.sagittal[index]
    }

    /// Returns the number of axial slices the set was derived from.
    #[inline]
    pub fn axial_count(&self) -> usize {
        self.axial_count
    }

    /// Returns a cursor spanning the three view ranges of this set.
    pub fn cursor(&self) -> SliceCursor {
        SliceCursor::new(self.axial_count, self.width, self.height)
    }
}

/// Derives the coronal and sagittal stacks from an axial volume.
///
/// Pure permutation of sample positions: spacing metadata scales display
/// geometry only and is not consulted here.
pub fn reformat(stack: &VolumeStack) -> OpsResult<ReformatSet> {
    let (width, height) = stack.dimensions();
    let slice_count = stack.slice_count();
    let depth = stack.bit_depth();
    trace!(width, height, slice_count, "reformat");

    let derived_height = slice_count as u32 + DISPLAY_PADDING;

    // coronal[i][j][k] = axial[j][i][k]
    let mut coronal = Vec::with_capacity(height as usize);
    for i in 0..height {
        let mut grid = PixelGrid::new(width, derived_height, depth);
        for (j, slice) in stack.slices().iter().enumerate() {
            for k in 0..width {
                grid.set_sample(k, j as u32, slice.sample(k, i));
            }
        }
        coronal.push(grid);
    }

    // sagittal[i][j][k] = axial[j][k][i]
    let mut sagittal = Vec::with_capacity(width as usize);
    for i in 0..width {
        let mut grid = PixelGrid::new(height, derived_height, depth);
        for (j, slice) in stack.slices().iter().enumerate() {
            for k in 0..height {
                grid.set_sample(k, j as u32, slice.sample(i, k));
            }
        }
        sagittal.push(grid);
    }

    Ok(ReformatSet {
        coronal,
        sagittal,
        axial_count: slice_count,
        width,
        height,
    })
}

/// Navigation axis selector for [`SliceCursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAxis {
    /// Steps through the axial slices (`0..N`).
    Axial,
    /// Steps through the sagittal stack (`0..W`).
    Sagittal,
    /// Steps through the coronal stack (`0..H`).
    Coronal,
}

/// Three independent clamped slice indices, one per view stack.
///
/// Navigation steps that would leave a valid range are silently ignored
/// rather than erroring; holding a key at the end of a stack simply
/// stays on the last slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceCursor {
    axial: usize,
    sagittal: usize,
    coronal: usize,
    axial_max: usize,
    sagittal_max: usize,
    coronal_max: usize,
}

impl SliceCursor {
    /// Creates a cursor at the origin of all three ranges.
    pub fn new(axial_count: usize, width: u32, height: u32) -> Self {
        Self {
            axial: 0,
            sagittal: 0,
            coronal: 0,
            axial_max: axial_count.saturating_sub(1),
            sagittal_max: (width as usize).saturating_sub(1),
            coronal_max: (height as usize).saturating_sub(1),
        }
    }

    /// Returns the current axial slice index.
    #[inline]
    pub fn axial(&self) -> usize {
        self.axial
    }

    /// Returns the current sagittal slice index.
    #[inline]
    pub fn sagittal(&self) -> usize {
        self.sagittal
    }

    /// Returns the current coronal slice index.
    #[inline]
    pub fn coronal(&self) -> usize {
        self.coronal
    }

    /// Moves one cursor by `step`, ignoring steps that leave its range.
    pub fn navigate(&mut self, axis: NavAxis, step: i32) {
        let (index, max) = match axis {
            NavAxis::Axial => (&mut self.axial, self.axial_max),
            NavAxis::Sagittal => (&mut self.sagittal, self.sagittal_max),
            NavAxis::Coronal => (&mut self.coronal, self.coronal_max),
        };
        let target = *index as i64 + step as i64;
        if (0..=max as i64).contains(&target) {
            *index = target as usize;
        }
    }
}
