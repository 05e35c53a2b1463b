//! The session context: all viewing state behind one explicit object.
//!
//! A [`Session`] owns everything a viewing exercise used to keep in
//! ambient module state: the originally loaded grid, the currently
//! displayed grid, the view-transform composer, and the optional second
//! modality / volume inputs. No transform reads or writes anything the
//! session does not pass it explicitly.
//!
//! # Dispatch contract
//!
//! [`Session::apply`] is the single entry point for every command. It is
//! blocking and not re-entrant by construction: `&mut self` means a
//! second command cannot start until the first returns. The display
//! collaborator reads the results through the accessors after each
//! `apply`; the session never pushes.
//!
//! # Example
//!
//! ```rust
//! use medpix_core::{BitDepth, PixelGrid};
//! use medpix_session::{Command, FilterId, Session};
//!
//! let grid = PixelGrid::filled(64, 64, BitDepth::SIGNED_16, 900);
//! let mut session = Session::new(grid);
//!
//! session.apply(Command::Window).unwrap();
//! session.apply(Command::Filter(FilterId::Gaussian)).unwrap();
//! assert!(session.current().is_within_depth());
//!
//! session.apply(Command::Reset).unwrap();
//! assert_eq!(session.current().samples(), session.original().samples());
//! ```

use crate::{Command, FilterId, SessionError, SessionResult};
use medpix_core::{Error, PixelGrid, VolumeStack};
use medpix_math::{Mat4, TransformComposer};
use medpix_ops::fuse::{fuse, RgbGrid};
use medpix_ops::reformat::{reformat, ReformatSet, SliceCursor};
use medpix_ops::threshold::{niblack, normalize, NiblackParams};
use medpix_ops::window::{window_level, WindowLevel};
use medpix_ops::{filter, BoundaryPolicy, Kernel};
use tracing::debug;

/// Loaded volume plus its derived views and navigation state.
#[derive(Debug, Clone)]
struct VolumeState {
    stack: VolumeStack,
    views: ReformatSet,
    cursor: SliceCursor,
}

/// All state of one interactive viewing session.
///
/// See the [module docs](self) for the dispatch contract.
#[derive(Debug, Clone)]
pub struct Session {
    original: PixelGrid,
    current: PixelGrid,
    window: WindowLevel,
    niblack: NiblackParams,
    composer: TransformComposer,
    overlay: Option<PixelGrid>,
    fused: Option<RgbGrid>,
    volume: Option<VolumeState>,
    last_rotation: Option<Mat4>,
}

impl Session {
    /// Creates a session around a loaded grid.
    ///
    /// The identity matrix becomes the default view; use
    /// [`with_default_view`](Self::with_default_view) when the display
    /// collaborator captured something else at startup.
    pub fn new(original: PixelGrid) -> Self {
        Self::with_default_view(original, Mat4::IDENTITY)
    }

    /// Creates a session with an explicit default view matrix.
    pub fn with_default_view(original: PixelGrid, default_view: Mat4) -> Self {
        let current = original.clone();
        Self {
            original,
            current,
            window: WindowLevel::default(),
            niblack: NiblackParams::default(),
            composer: TransformComposer::new(default_view),
            overlay: None,
            fused: None,
            volume: None,
            last_rotation: None,
        }
    }

    /// Loads the co-registered overlay modality for fusion commands.
    ///
    /// # Errors
    ///
    /// Returns a dimension mismatch if the overlay disagrees with the
    /// originally loaded grid; fusion requires co-registered inputs.
    pub fn set_overlay(&mut self, overlay: PixelGrid) -> SessionResult<()> {
        self.original.check_same_size(&overlay)?;
        self.overlay = Some(overlay);
        Ok(())
    }

    /// Loads a slice stack and derives its orthogonal views.
    pub fn load_volume(&mut self, stack: VolumeStack) -> SessionResult<()> {
        let views = reformat(&stack)?;
        let cursor = views.cursor();
        self.volume = Some(VolumeState {
            stack,
            views,
            cursor,
        });
        Ok(())
    }

    /// Replaces the windowing parameters used by [`Command::Window`].
    pub fn set_window_params(&mut self, params: WindowLevel) {
        self.window = params;
    }

    /// Replaces the threshold parameters used by [`Command::Threshold`].
    pub fn set_niblack_params(&mut self, params: NiblackParams) {
        self.niblack = params;
    }

    /// Returns the originally loaded grid.
    #[inline]
    pub fn original(&self) -> &PixelGrid {
        &self.original
    }

    /// Returns the currently displayed grid.
    #[inline]
    pub fn current(&self) -> &PixelGrid {
        &self.current
    }

    /// Returns the accumulated view matrix for the display collaborator.
    #[inline]
    pub fn view_matrix(&self) -> Mat4 {
        self.composer.current()
    }

    /// Returns the latest fusion composition, if one was requested.
    #[inline]
    pub fn fused(&self) -> Option<&RgbGrid> {
        self.fused.as_ref()
    }

    /// Returns the axial slice under the cursor, if a volume is loaded.
    pub fn axial_slice(&self) -> Option<&PixelGrid> {
        let v = self.volume.as_ref()?;
        Some(v.stack.slice(v.cursor.axial()))
    }

    /// Returns the coronal slice under the cursor, if a volume is loaded.
    pub fn coronal_slice(&self) -> Option<&PixelGrid> {
        let v = self.volume.as_ref()?;
        Some(v.views.coronal_slice(v.cursor.coronal()))
    }

    /// Returns the sagittal slice under the cursor, if a volume is loaded.
    pub fn sagittal_slice(&self) -> Option<&PixelGrid> {
        let v = self.volume.as_ref()?;
        Some(v.views.sagittal_slice(v.cursor.sagittal()))
    }

    /// Returns the loaded volume stack, if any.
    pub fn volume(&self) -> Option<&VolumeStack> {
        self.volume.as_ref().map(|v| &v.stack)
    }

    /// Executes one command against the session state.
    ///
    /// Pixel commands replace the current grid; view commands update the
    /// composer; navigation moves a cursor. Commands whose prerequisite
    /// input was never loaded fail without touching any state.
    ///
    /// # Errors
    ///
    /// - [`SessionError::MissingOverlay`] / [`SessionError::MissingVolume`] /
    ///   [`SessionError::NoRotationApplied`] for unmet prerequisites
    /// - transform-layer errors pass through unchanged
    pub fn apply(&mut self, command: Command) -> SessionResult<()> {
        debug!(?command, "apply");
        match command {
            Command::Reset => {
                self.current = self.original.clone();
                self.composer.reset();
                self.fused = None;
            }
            Command::Window => {
                self.current = window_level(&self.current, &self.window)?;
            }
            Command::Equalize => {
                self.current = medpix_ops::equalize::equalize(&self.current)?;
            }
            Command::Filter(id) => {
                self.current = run_filter(&self.current, id)?;
            }
            Command::Threshold => {
                let normalized = normalize(&self.current)?;
                self.current = niblack(&normalized, &self.niblack)?;
            }
            Command::Navigate(axis, step) => {
                let volume = self.volume.as_mut().ok_or(SessionError::MissingVolume)?;
                volume.cursor.navigate(axis, step);
            }
            Command::Rotate(axis, degrees) => {
                let rotation = TransformComposer::rotation_for(axis, degrees);
                self.composer.apply(rotation);
                self.last_rotation = Some(rotation);
            }
            Command::InverseRotate => {
                let rotation = self.last_rotation.ok_or(SessionError::NoRotationApplied)?;
                let inverse = rotation.inverse().ok_or(Error::SingularMatrix)?;
                self.composer.apply(inverse);
            }
            Command::Fusion(mode) => {
                let overlay = self.overlay.as_ref().ok_or(SessionError::MissingOverlay)?;
                self.fused = Some(fuse(&self.original, overlay, mode)?);
            }
        }
        Ok(())
    }
}

fn run_filter(grid: &PixelGrid, id: FilterId) -> SessionResult<PixelGrid> {
    let out = match id {
        FilterId::SharpenUniform => filter::convolve(
            grid,
            &Kernel::SHARPEN_UNIFORM,
            BoundaryPolicy::ZeroContribution,
        )?,
        FilterId::SharpenCross => filter::convolve(
            grid,
            &Kernel::SHARPEN_CROSS,
            BoundaryPolicy::ZeroContribution,
        )?,
        FilterId::SharpenWeighted => filter::convolve(
            grid,
            &Kernel::SHARPEN_WEIGHTED,
            BoundaryPolicy::ZeroContribution,
        )?,
        FilterId::Gaussian => {
            filter::convolve(grid, &Kernel::GAUSSIAN, BoundaryPolicy::MirrorIndex)?
        }
        FilterId::Laplacian => {
            filter::convolve(grid, &Kernel::LAPLACIAN, BoundaryPolicy::MirrorIndex)?
        }
        FilterId::LaplacianEdges => {
            let signed =
                filter::convolve_signed(grid, &Kernel::LAPLACIAN, BoundaryPolicy::MirrorIndex)?;
            filter::zero_crossings(&signed)?
        }
    };
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use medpix_core::BitDepth;

    fn session() -> Session {
        let values: Vec<i32> = (0..(32 * 32)).map(|i| (i * 29) % 2000).collect();
        let grid = PixelGrid::from_samples(32, 32, BitDepth::SIGNED_16, values).unwrap();
        Session::new(grid)
    }

    #[test]
    fn test_reset_restores_original_and_view() {
        let mut s = session();
        s.apply(Command::Window).unwrap();
        s.apply(Command::Rotate(medpix_math::Axis::Z, 45.0)).unwrap();
        assert_ne!(s.current().samples(), s.original().samples());

        s.apply(Command::Reset).unwrap();
        assert_eq!(s.current().samples(), s.original().samples());
        assert!(s.view_matrix().max_abs_diff(&Mat4::IDENTITY) < 1e-12);
    }

    #[test]
    fn test_pixel_commands_replace_current() {
        let mut s = session();
        s.apply(Command::Equalize).unwrap();
        assert!(s.current().is_within_depth());
        s.apply(Command::Filter(FilterId::SharpenCross)).unwrap();
        assert!(s.current().is_within_depth());
    }

    #[test]
    fn test_threshold_produces_binary_grid() {
        let mut s = session();
        s.apply(Command::Threshold).unwrap();
        let max = s.current().max_brightness();
        assert!(s.current().samples().iter().all(|&v| v == 0 || v == max));
    }

    #[test]
    fn test_fusion_without_overlay_fails() {
        let mut s = session();
        assert!(matches!(
            s.apply(Command::Fusion(medpix_ops::FusionMode::DualChannel)),
            Err(SessionError::MissingOverlay)
        ));
        assert!(s.fused().is_none());
    }

    #[test]
    fn test_overlay_must_be_co_registered() {
        let mut s = session();
        let overlay = PixelGrid::new(16, 16, BitDepth::SIGNED_16);
        assert!(s.set_overlay(overlay).is_err());
    }

    #[test]
    fn test_navigate_without_volume_fails() {
        let mut s = session();
        assert!(matches!(
            s.apply(Command::Navigate(medpix_ops::NavAxis::Axial, 1)),
            Err(SessionError::MissingVolume)
        ));
    }

    #[test]
    fn test_inverse_rotate_requires_a_rotation() {
        let mut s = session();
        assert!(matches!(
            s.apply(Command::InverseRotate),
            Err(SessionError::NoRotationApplied)
        ));
    }

    #[test]
    fn test_rotate_then_inverse_restores_view() {
        let mut s = session();
        s.apply(Command::Rotate(medpix_math::Axis::Y, 30.0)).unwrap();
        s.apply(Command::InverseRotate).unwrap();
        assert!(s.view_matrix().max_abs_diff(&Mat4::IDENTITY) < 1e-6);
    }
}
