//! Accumulating view-transform composer.
//!
//! The display collaborator owns a modelview matrix; this composer owns
//! the *algebra* behind it. It captures the default view matrix once at
//! initialization, accumulates explicit right-multiplied transforms, and
//! can hand back the exact inverse for undo.
//!
//! Composition order matters and is fixed: a new transform is always
//! right-multiplied onto the accumulated matrix, and a combined step is
//! built as `T * R` (translate-then-rotate on column vectors).

use crate::{Axis, Mat4};
use medpix_core::{Error, Result};

/// Builds, accumulates, and inverts homogeneous view transforms.
///
/// # Example
///
/// ```rust
/// use medpix_math::{Axis, Mat4, TransformComposer};
///
/// let mut composer = TransformComposer::new(Mat4::IDENTITY);
/// let step = TransformComposer::translate_then_rotate(
///     Mat4::translation(3.0, 1.0, 0.0),
///     Mat4::rotation_deg(Axis::Z, 45.0),
/// );
/// composer.apply(step);
/// let undo = composer.invert_current().unwrap();
/// composer.apply(undo);
/// assert!(composer.current().max_abs_diff(&Mat4::IDENTITY) < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct TransformComposer {
    default: Mat4,
    current: Mat4,
}

impl TransformComposer {
    /// Creates a composer, capturing `default` as the reset target.
    pub fn new(default: Mat4) -> Self {
        Self {
            default,
            current: default,
        }
    }

    /// Returns the accumulated view matrix.
    #[inline]
    pub fn current(&self) -> Mat4 {
        self.current
    }

    /// Returns the default view matrix captured at construction.
    #[inline]
    pub fn default_view(&self) -> Mat4 {
        self.default
    }

    /// Right-multiplies a transform onto the accumulated matrix.
    pub fn apply(&mut self, transform: Mat4) {
        self.current = self.current * transform;
    }

    /// Composes a translation and a rotation into one step, as `T * R`.
    #[inline]
    pub fn translate_then_rotate(translation: Mat4, rotation: Mat4) -> Mat4 {
        translation * rotation
    }

    /// Re-derives a rotation-only matrix for an arbitrary angle.
    ///
    /// Used by the volume viewer to rotate the whole slice stack on
    /// demand without touching the accumulated state.
    #[inline]
    pub fn rotation_for(axis: Axis, degrees: f64) -> Mat4 {
        Mat4::rotation_deg(axis, degrees)
    }

    /// Returns the inverse of the accumulated matrix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SingularMatrix`] if the accumulated matrix cannot
    /// be inverted; the accumulated state is left untouched so the caller
    /// can still reset.
    pub fn invert_current(&self) -> Result<Mat4> {
        self.current.inverse().ok_or(Error::SingularMatrix)
    }

    /// Restores the default view matrix captured at construction.
    pub fn reset(&mut self) {
        self.current = self.default;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_accumulates_right_multiplied() {
        let mut composer = TransformComposer::new(Mat4::IDENTITY);
        let t = Mat4::translation(1.0, 0.0, 0.0);
        let r = Mat4::rotation_deg(Axis::Z, 90.0);
        composer.apply(t);
        composer.apply(r);
        assert!(composer.current().max_abs_diff(&(t * r)) < 1e-12);
    }

    #[test]
    fn test_invert_then_apply_restores_identity() {
        let mut composer = TransformComposer::new(Mat4::IDENTITY);
        composer.apply(TransformComposer::translate_then_rotate(
            Mat4::translation(-2.0, 5.0, 0.0),
            Mat4::rotation_deg(Axis::Z, 123.0),
        ));
        let inv = composer.invert_current().unwrap();
        composer.apply(inv);
        assert!(composer.current().max_abs_diff(&Mat4::IDENTITY) < 1e-6);
    }

    #[test]
    fn test_singular_accumulation_is_reported() {
        let mut composer = TransformComposer::new(Mat4::IDENTITY);
        composer.apply(Mat4::ZERO);
        assert!(matches!(
            composer.invert_current(),
            Err(Error::SingularMatrix)
        ));
        // state is still resettable
        composer.reset();
        assert_eq!(composer.current(), Mat4::IDENTITY);
    }

    #[test]
    fn test_reset_restores_captured_default() {
        let default = Mat4::rotation_deg(Axis::X, -60.0) * Mat4::rotation_deg(Axis::Z, 45.0);
        let mut composer = TransformComposer::new(default);
        composer.apply(Mat4::translation(9.0, 9.0, 9.0));
        composer.reset();
        assert!(composer.current().max_abs_diff(&default) < 1e-12);
    }
}
