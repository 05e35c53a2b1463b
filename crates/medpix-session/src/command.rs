//! The command surface of the processing core.
//!
//! Input devices are someone else's problem: whatever maps key presses or
//! UI events to behavior produces a [`Command`], and every command maps to
//! exactly one core entry point on
//! [`Session::apply`](crate::Session::apply). The core exposes no other
//! surface.

use medpix_math::Axis;
use medpix_ops::{FusionMode, NavAxis};

/// Production filter selection.
///
/// Each variant fixes one kernel/boundary-policy pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterId {
    /// Uniform-neighbor high-pass sharpening, zero-fill boundary.
    SharpenUniform,
    /// Cross-neighbor high-pass sharpening, zero-fill boundary.
    SharpenCross,
    /// Center-weighted high-pass sharpening, zero-fill boundary.
    SharpenWeighted,
    /// Gaussian smoothing, mirrored boundary.
    Gaussian,
    /// Displayable (clamped) Laplacian, mirrored boundary.
    Laplacian,
    /// Signed Laplacian followed by zero-crossing edge marking.
    LaplacianEdges,
}

/// One user-level operation on the session.
///
/// Dispatch is strictly sequential: [`Session::apply`](crate::Session::apply)
/// takes `&mut self`, so a second command cannot overlap the first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Restore the originally loaded grid and the default view matrix.
    Reset,
    /// Window/level the current grid with the session parameters.
    Window,
    /// Equalize the current grid's histogram.
    Equalize,
    /// Run one production filter on the current grid.
    Filter(FilterId),
    /// Normalize the current grid, then Niblack-binarize it.
    Threshold,
    /// Step one slice cursor of the loaded volume.
    Navigate(NavAxis, i32),
    /// Rotate the view about an axis by an angle in degrees.
    Rotate(Axis, f64),
    /// Undo the most recent rotation via its algebraic inverse.
    InverseRotate,
    /// Compose the loaded overlay with the original grid.
    Fusion(FusionMode),
}
