//! # medpix-core
//!
//! Core types for medical grayscale image processing.
//!
//! This crate provides the foundational types used throughout the
//! medpix-rs workspace:
//!
//! - [`BitDepth`] - sample storage metadata and the derived brightness ceiling
//! - [`PixelGrid`] - owned row-major sample buffer, cheap to clone
//! - [`Histogram`] - per-grid intensity occurrence counts
//! - [`VolumeStack`] - validated stack of axial slices plus spacing metadata
//! - [`Error`] - the shared configuration-error type
//!
//! ## Design Philosophy
//!
//! Every transform downstream of this crate is a pure function: grid in,
//! new grid out. The types here make that cheap (`Arc`-backed buffers) and
//! honest (immutable access by default, copy-on-write during result
//! construction). Bit depth is runtime metadata rather than a type
//! parameter because the depth is read from container headers at load
//! time, and a signed filter intermediate must flow through the same
//! buffer type as an 8-bit display grid.
//!
//! ## Crate Structure
//!
//! This crate is the foundation of the workspace and has no internal
//! dependencies:
//!
//! ```text
//! medpix-core (this crate)
//!    ^
//!    |
//!    +-- medpix-math (view matrices)
//!    +-- medpix-ops (pixel transforms)
//!    +-- medpix-session (command dispatch)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod depth;
pub mod error;
pub mod grid;
pub mod histogram;
pub mod volume;

pub use depth::BitDepth;
pub use error::{Error, Result};
pub use grid::PixelGrid;
pub use histogram::Histogram;
pub use volume::VolumeStack;
