//! # medpix-math
//!
//! Math utilities for the medpix workspace: homogeneous view matrices and
//! the transform composer the display collaborator drives.
//!
//! - [`Mat4`] - 4x4 row-major homogeneous matrix (translation, per-axis
//!   rotation, inversion, glam interop)
//! - [`Axis`] - rotation axis selector
//! - [`TransformComposer`] - default-view capture, explicit accumulation,
//!   checked inversion

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod composer;
pub mod mat4;

pub use composer::TransformComposer;
pub use mat4::{Axis, Mat4};
