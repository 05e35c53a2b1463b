//! # medpix-ops
//!
//! Pixel transforms for medical grayscale viewing pipelines.
//!
//! Every transform is a pure, synchronous function: borrowed grid(s) in,
//! new grid out, no shared mutable state, no retained handles. A transform
//! runs to completion before its result goes anywhere, so the caller's
//! dispatch loop is the only concurrency story these functions need.
//!
//! # Modules
//!
//! - [`window`] - intensity windowing / leveling
//! - [`equalize`] - histogram equalization
//! - [`filter`] - 3x3 convolution, boundary policies, zero-crossing edges
//! - [`threshold`] - percentile-clip normalization and Niblack binarization
//! - [`reformat`] - orthogonal views of an axial slice stack
//! - [`fuse`] - three-channel composition of two co-registered grids
//! - [`parallel`] - Rayon row-parallel drivers for the expensive kernels
//!
//! # Example
//!
//! ```rust
//! use medpix_core::{BitDepth, PixelGrid};
//! use medpix_ops::filter::{convolve, BoundaryPolicy, Kernel};
//! use medpix_ops::window::{window_level, WindowLevel};
//!
//! let grid = PixelGrid::filled(64, 64, BitDepth::SIGNED_16, 700);
//! let windowed = window_level(&grid, &WindowLevel::default())?;
//! let smoothed = convolve(&windowed, &Kernel::GAUSSIAN, BoundaryPolicy::MirrorIndex)?;
//! assert!(smoothed.is_within_depth());
//! # Ok::<(), medpix_ops::OpsError>(())
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod equalize;
pub mod filter;
pub mod fuse;
pub mod reformat;
pub mod threshold;
pub mod window;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use error::{OpsError, OpsResult};
pub use filter::{BoundaryPolicy, Kernel};
pub use fuse::FusionMode;
pub use reformat::NavAxis;
