//! 4x4 homogeneous matrix type for view transforms.
//!
//! [`Mat4`] carries the rotation + translation compositions the display
//! collaborator multiplies onto its modelview state.
//!
//! # Convention
//!
//! Matrices are stored in **row-major** order and use **column vectors**:
//!
//! ```text
//! | m00 m01 m02 m03 |   | x |
//! | m10 m11 m12 m13 | * | y |
//! | m20 m21 m22 m23 |   | z |
//! | m30 m31 m32 m33 |   | w |
//! ```
//!
//! Translation therefore lives in the last *column*. A consumer that wants
//! the OpenGL column-major layout takes [`Mat4::transpose`] or
//! [`Mat4::to_glam`]; the convention is fixed here and converted exactly
//! once at the display boundary.
//!
//! Angles are taken in **degrees** everywhere and converted to radians
//! internally.
//!
//! # Usage
//!
//! ```rust
//! use medpix_math::{Axis, Mat4};
//!
//! let t = Mat4::translation(10.0, -4.0, 0.0);
//! let r = Mat4::rotation_deg(Axis::Z, 90.0);
//! let m = t * r; // translate-then-rotate
//! let undo = m.inverse().unwrap();
//! ```

use std::ops::{Index, Mul};

/// Rotation axis selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Rotation about the x axis.
    X,
    /// Rotation about the y axis (slice-stack rotation in the volume viewer).
    Y,
    /// Rotation about the z axis (in-plane image rotation).
    Z,
}

/// A 4x4 homogeneous transform matrix.
///
/// Stored row-major; see the [module docs](self) for the full convention.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Mat4 {
    /// Matrix elements in row-major order: [row0, row1, row2, row3]
    pub m: [[f64; 4]; 4],
}

impl Mat4 {
    /// Zero matrix.
    pub const ZERO: Self = Self { m: [[0.0; 4]; 4] };

    /// Identity matrix.
    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Creates a matrix from row arrays.
    #[inline]
    pub const fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        Self { m: rows }
    }

    /// Creates a translation matrix.
    ///
    /// Identity with the translation vector in the last column.
    ///
    /// # Example
    ///
    /// ```rust
    /// use medpix_math::Mat4;
    ///
    /// let t = Mat4::translation(2.0, 3.0, 0.0);
    /// assert_eq!(t.transform([0.0, 0.0, 0.0, 1.0]), [2.0, 3.0, 0.0, 1.0]);
    /// ```
    #[inline]
    pub const fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self::from_rows([
            [1.0, 0.0, 0.0, dx],
            [0.0, 1.0, 0.0, dy],
            [0.0, 0.0, 1.0, dz],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation matrix about `axis` by `degrees`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use medpix_math::{Axis, Mat4};
    ///
    /// let r = Mat4::rotation_deg(Axis::Z, 90.0);
    /// let p = r.transform([1.0, 0.0, 0.0, 1.0]);
    /// assert!((p[0]).abs() < 1e-12);
    /// assert!((p[1] - 1.0).abs() < 1e-12);
    /// ```
    pub fn rotation_deg(axis: Axis, degrees: f64) -> Self {
        let theta = degrees.to_radians();
        let (s, c) = theta.sin_cos();
        match axis {
            Axis::X => Self::from_rows([
                [1.0, 0.0, 0.0, 0.0],
                [0.0, c, -s, 0.0],
                [0.0, s, c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ]),
            Axis::Y => Self::from_rows([
                [c, 0.0, s, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [-s, 0.0, c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ]),
            Axis::Z => Self::from_rows([
                [c, -s, 0.0, 0.0],
                [s, c, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ]),
        }
    }

    /// Returns the transpose of this matrix.
    ///
    /// This is the column-major layout fixed-function GL consumers expect.
    pub fn transpose(&self) -> Self {
        let mut out = Self::ZERO;
        for i in 0..4 {
            for j in 0..4 {
                out.m[i][j] = self.m[j][i];
            }
        }
        out
    }

    /// Computes the determinant.
    pub fn determinant(&self) -> f64 {
        let m = &self.m;
        // 2x2 subfactors of the lower two rows
        let s0 = m[2][0] * m[3][1] - m[2][1] * m[3][0];
        let s1 = m[2][0] * m[3][2] - m[2][2] * m[3][0];
        let s2 = m[2][0] * m[3][3] - m[2][3] * m[3][0];
        let s3 = m[2][1] * m[3][2] - m[2][2] * m[3][1];
        let s4 = m[2][1] * m[3][3] - m[2][3] * m[3][1];
        let s5 = m[2][2] * m[3][3] - m[2][3] * m[3][2];

        m[0][0] * (m[1][1] * s5 - m[1][2] * s4 + m[1][3] * s3)
            - m[0][1] * (m[1][0] * s5 - m[1][2] * s2 + m[1][3] * s1)
            + m[0][2] * (m[1][0] * s4 - m[1][1] * s2 + m[1][3] * s0)
            - m[0][3] * (m[1][0] * s3 - m[1][1] * s1 + m[1][2] * s0)
    }

    /// Computes the inverse of this matrix.
    ///
    /// Returns `None` if the matrix is singular.
    ///
    /// # Example
    ///
    /// ```rust
    /// use medpix_math::{Axis, Mat4};
    ///
    /// let m = Mat4::translation(5.0, 0.0, 0.0) * Mat4::rotation_deg(Axis::Z, 30.0);
    /// let inv = m.inverse().unwrap();
    /// let id = m * inv;
    /// assert!((id.m[0][0] - 1.0).abs() < 1e-9);
    /// ```
    pub fn inverse(&self) -> Option<Self> {
        let m = &self.m;

        // Upper-row and lower-row 2x2 subfactors (adjugate expansion).
        let a0 = m[0][0] * m[1][1] - m[0][1] * m[1][0];
        let a1 = m[0][0] * m[1][2] - m[0][2] * m[1][0];
        let a2 = m[0][0] * m[1][3] - m[0][3] * m[1][0];
        let a3 = m[0][1] * m[1][2] - m[0][2] * m[1][1];
        let a4 = m[0][1] * m[1][3] - m[0][3] * m[1][1];
        let a5 = m[0][2] * m[1][3] - m[0][3] * m[1][2];
        let b0 = m[2][0] * m[3][1] - m[2][1] * m[3][0];
        let b1 = m[2][0] * m[3][2] - m[2][2] * m[3][0];
        let b2 = m[2][0] * m[3][3] - m[2][3] * m[3][0];
        let b3 = m[2][1] * m[3][2] - m[2][2] * m[3][1];
        let b4 = m[2][1] * m[3][3] - m[2][3] * m[3][1];
        let b5 = m[2][2] * m[3][3] - m[2][3] * m[3][2];

        let det = a0 * b5 - a1 * b4 + a2 * b3 + a3 * b2 - a4 * b1 + a5 * b0;
        if det.abs() < 1e-12 {
            return None;
        }
        let inv_det = 1.0 / det;

        Some(Self::from_rows([
            [
                (m[1][1] * b5 - m[1][2] * b4 + m[1][3] * b3) * inv_det,
                (-m[0][1] * b5 + m[0][2] * b4 - m[0][3] * b3) * inv_det,
                (m[3][1] * a5 - m[3][2] * a4 + m[3][3] * a3) * inv_det,
                (-m[2][1] * a5 + m[2][2] * a4 - m[2][3] * a3) * inv_det,
            ],
            [
                (-m[1][0] * b5 + m[1][2] * b2 - m[1][3] * b1) * inv_det,
                (m[0][0] * b5 - m[0][2] * b2 + m[0][3] * b1) * inv_det,
                (-m[3][0] * a5 + m[3][2] * a2 - m[3][3] * a1) * inv_det,
                (m[2][0] * a5 - m[2][2] * a2 + m[2][3] * a1) * inv_det,
            ],
            [
                (m[1][0] * b4 - m[1][1] * b2 + m[1][3] * b0) * inv_det,
                (-m[0][0] * b4 + m[0][1] * b2 - m[0][3] * b0) * inv_det,
                (m[3][0] * a4 - m[3][1] * a2 + m[3][3] * a0) * inv_det,
                (-m[2][0] * a4 + m[2][1] * a2 - m[2][3] * a0) * inv_det,
            ],
            [
                (-m[1][0] * b3 + m[1][1] * b1 - m[1][2] * b0) * inv_det,
                (m[0][0] * b3 - m[0][1] * b1 + m[0][2] * b0) * inv_det,
                (-m[3][0] * a3 + m[3][1] * a1 - m[3][2] * a0) * inv_det,
                (m[2][0] * a3 - m[2][1] * a1 + m[2][2] * a0) * inv_det,
            ],
        ]))
    }

    /// Transforms a homogeneous column vector by this matrix.
    #[inline]
    pub fn transform(&self, v: [f64; 4]) -> [f64; 4] {
        let mut out = [0.0; 4];
        for (i, row) in self.m.iter().enumerate() {
            out[i] = row[0] * v[0] + row[1] * v[1] + row[2] * v[2] + row[3] * v[3];
        }
        out
    }

    /// Multiplies two matrices.
    pub fn mul_mat(&self, other: &Self) -> Self {
        let mut result = Self::ZERO;
        for i in 0..4 {
            for j in 0..4 {
                result.m[i][j] = self.m[i][0] * other.m[0][j]
                    + self.m[i][1] * other.m[1][j]
                    + self.m[i][2] * other.m[2][j]
                    + self.m[i][3] * other.m[3][j];
            }
        }
        result
    }

    /// Returns true if all elements are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.m.iter().flatten().all(|x| x.is_finite())
    }

    /// Returns the largest absolute element-wise difference to `other`.
    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }

    /// Converts to glam `DMat4` (column-major).
    #[inline]
    pub fn to_glam(&self) -> glam::DMat4 {
        // glam is column-major, so transpose on the way out
        let t = self.transpose();
        glam::DMat4::from_cols_array_2d(&t.m)
    }

    /// Creates from glam `DMat4`.
    #[inline]
    pub fn from_glam(m: glam::DMat4) -> Self {
        Self::from_rows(m.to_cols_array_2d()).transpose()
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// Mat4 * Mat4
impl Mul for Mat4 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.mul_mat(&rhs)
    }
}

// Mat4 * [f64; 4]
impl Mul<[f64; 4]> for Mat4 {
    type Output = [f64; 4];

    #[inline]
    fn mul(self, rhs: [f64; 4]) -> [f64; 4] {
        self.transform(rhs)
    }
}

impl Index<usize> for Mat4 {
    type Output = [f64; 4];

    #[inline]
    fn index(&self, i: usize) -> &[f64; 4] {
        &self.m[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &Mat4, b: &Mat4) {
        assert!(a.max_abs_diff(b) < 1e-9, "{a:?} !~ {b:?}");
    }

    #[test]
    fn test_identity_transform() {
        let v = [1.0, 2.0, 3.0, 1.0];
        assert_eq!(Mat4::IDENTITY * v, v);
    }

    #[test]
    fn test_translation() {
        let t = Mat4::translation(10.0, -5.0, 2.0);
        assert_eq!(t * [0.0, 0.0, 0.0, 1.0], [10.0, -5.0, 2.0, 1.0]);
    }

    #[test]
    fn test_rotation_z_quarter_turn() {
        let r = Mat4::rotation_deg(Axis::Z, 90.0);
        let p = r * [1.0, 0.0, 0.0, 1.0];
        assert!(p[0].abs() < 1e-12);
        assert!((p[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotation_y_quarter_turn() {
        let r = Mat4::rotation_deg(Axis::Y, 90.0);
        let p = r * [1.0, 0.0, 0.0, 1.0];
        assert!(p[0].abs() < 1e-12);
        assert!((p[2] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotation_determinant_is_one() {
        use approx::assert_relative_eq;
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            let r = Mat4::rotation_deg(axis, 37.5);
            assert_relative_eq!(r.determinant(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_transpose_round_trip() {
        let m = Mat4::translation(1.0, 2.0, 3.0) * Mat4::rotation_deg(Axis::X, 20.0);
        assert_close(&m.transpose().transpose(), &m);
    }

    #[test]
    fn test_inverse_law() {
        let m = Mat4::translation(4.0, -2.0, 7.0) * Mat4::rotation_deg(Axis::Z, 33.0);
        let inv = m.inverse().unwrap();
        let id = m * inv;
        assert!(id.max_abs_diff(&Mat4::IDENTITY) < 1e-6);
    }

    #[test]
    fn test_singular_has_no_inverse() {
        let mut m = Mat4::IDENTITY;
        m.m[2] = [0.0; 4]; // kill a row
        assert!(m.inverse().is_none());
    }

    #[test]
    fn test_composition_is_not_commutative() {
        let t = Mat4::translation(1.0, 0.0, 0.0);
        let r = Mat4::rotation_deg(Axis::Z, 90.0);
        assert!((t * r).max_abs_diff(&(r * t)) > 1e-6);
    }

    #[test]
    fn test_glam_round_trip() {
        let m = Mat4::translation(3.0, 1.0, -2.0) * Mat4::rotation_deg(Axis::Y, 45.0);
        let back = Mat4::from_glam(m.to_glam());
        assert_close(&back, &m);
    }
}
