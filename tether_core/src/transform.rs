// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal column-major 4×4 matrix.
//!
//! Tracking runtimes hand out poses and camera matrices as 16 column-major
//! `f32`s, and GLES consumes them the same way. [`Mat4`] keeps that layout
//! and adds only what a tick needs (identity, multiply, column access,
//! conversion to and from flat arrays) without pulling in a full
//! linear-algebra crate.

use core::ops::Mul;

/// A column-major 4×4 matrix stored as `[[f32; 4]; 4]`.
///
/// Each inner array is one *column* of the matrix, matching the memory layout
/// expected by `glUniformMatrix4fv` with `transpose = GL_FALSE`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat4 {
    /// Four columns, each a 4-element array `[x, y, z, w]`.
    pub cols: [[f32; 4]; 4],
}

impl Mat4 {
    /// The 4×4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// The all-zero matrix.
    pub const ZERO: Self = Self {
        cols: [[0.0; 4]; 4],
    };

    /// Creates a matrix from four column arrays.
    #[inline]
    #[must_use]
    pub const fn from_cols(col0: [f32; 4], col1: [f32; 4], col2: [f32; 4], col3: [f32; 4]) -> Self {
        Self {
            cols: [col0, col1, col2, col3],
        }
    }

    /// Creates a matrix from a column-major 2-D array.
    #[inline]
    #[must_use]
    pub const fn from_cols_array_2d(cols: [[f32; 4]; 4]) -> Self {
        Self { cols }
    }

    /// Returns the columns as a 2-D array.
    #[inline]
    #[must_use]
    pub const fn to_cols_array_2d(self) -> [[f32; 4]; 4] {
        self.cols
    }

    /// Creates a matrix from 16 column-major floats, the layout tracking
    /// runtimes use for poses and camera matrices.
    #[inline]
    #[must_use]
    pub const fn from_cols_array(m: &[f32; 16]) -> Self {
        Self {
            cols: [
                [m[0], m[1], m[2], m[3]],
                [m[4], m[5], m[6], m[7]],
                [m[8], m[9], m[10], m[11]],
                [m[12], m[13], m[14], m[15]],
            ],
        }
    }

    /// Returns the matrix as 16 column-major floats, ready for upload.
    #[inline]
    #[must_use]
    pub const fn to_cols_array(self) -> [f32; 16] {
        let c = &self.cols;
        [
            c[0][0], c[0][1], c[0][2], c[0][3], c[1][0], c[1][1], c[1][2], c[1][3], c[2][0],
            c[2][1], c[2][2], c[2][3], c[3][0], c[3][1], c[3][2], c[3][3],
        ]
    }

    /// Returns column `i` (0-based).
    ///
    /// # Panics
    ///
    /// Panics if `i >= 4`.
    #[inline]
    #[must_use]
    pub const fn col(self, i: usize) -> [f32; 4] {
        self.cols[i]
    }

    /// Creates a pure translation matrix.
    #[inline]
    #[must_use]
    pub const fn from_translation(x: f32, y: f32, z: f32) -> Self {
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [x, y, z, 1.0],
            ],
        }
    }

    /// Creates a non-uniform scale matrix.
    #[inline]
    #[must_use]
    pub const fn from_scale(sx: f32, sy: f32, sz: f32) -> Self {
        Self {
            cols: [
                [sx, 0.0, 0.0, 0.0],
                [0.0, sy, 0.0, 0.0],
                [0.0, 0.0, sz, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Returns the translation part (the first three entries of column 3).
    #[inline]
    #[must_use]
    pub const fn translation(self) -> [f32; 3] {
        [self.cols[3][0], self.cols[3][1], self.cols[3][2]]
    }

    /// Transforms the point `(x, y, z, 1)` and returns the homogeneous result.
    #[inline]
    #[must_use]
    pub fn transform_point(self, p: [f32; 3]) -> [f32; 4] {
        let c = &self.cols;
        let mut out = [0.0_f32; 4];
        for (i, o) in out.iter_mut().enumerate() {
            *o = c[0][i] * p[0] + c[1][i] * p[1] + c[2][i] * p[2] + c[3][i];
        }
        out
    }

    /// Is every entry [finite]?
    ///
    /// [finite]: f32::is_finite
    #[inline]
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        let mut j = 0;
        while j < 4 {
            let mut i = 0;
            while i < 4 {
                if !self.cols[j][i].is_finite() {
                    return false;
                }
                i += 1;
            }
            j += 1;
        }
        true
    }

    /// Is any entry [NaN]?
    ///
    /// [NaN]: f32::is_nan
    #[inline]
    #[must_use]
    pub const fn is_nan(&self) -> bool {
        let mut j = 0;
        while j < 4 {
            let mut i = 0;
            while i < 4 {
                if self.cols[j][i].is_nan() {
                    return true;
                }
                i += 1;
            }
            j += 1;
        }
        false
    }
}

impl Default for Mat4 {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat4 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let a = &self.cols;
        let b = &rhs.cols;
        let mut out = [[0.0_f32; 4]; 4];
        let mut j = 0;
        while j < 4 {
            let mut i = 0;
            while i < 4 {
                out[j][i] =
                    a[0][i] * b[j][0] + a[1][i] * b[j][1] + a[2][i] * b[j][2] + a[3][i] * b[j][3];
                i += 1;
            }
            j += 1;
        }
        Self { cols: out }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_identity() {
        assert_eq!(Mat4::default(), Mat4::IDENTITY);
    }

    #[test]
    fn identity_multiply() {
        let t = Mat4::from_translation(1.0, 2.0, 3.0);
        assert_eq!(Mat4::IDENTITY * t, t);
        assert_eq!(t * Mat4::IDENTITY, t);
    }

    #[test]
    fn translation_composition() {
        let a = Mat4::from_translation(1.0, 0.0, 0.0);
        let b = Mat4::from_translation(0.0, 2.0, 0.0);
        let c = a * b;
        assert_eq!(c.col(3), [1.0, 2.0, 0.0, 1.0]);
        assert_eq!(c.translation(), [1.0, 2.0, 0.0]);
    }

    #[test]
    fn scale_then_translate() {
        let s = Mat4::from_scale(2.0, 2.0, 2.0);
        let t = Mat4::from_translation(3.0, 4.0, 0.0);
        // Scale first, then translate: T * S
        let combined = t * s;
        assert_eq!(combined.col(0), [2.0, 0.0, 0.0, 0.0]);
        assert_eq!(combined.col(3), [3.0, 4.0, 0.0, 1.0]);
    }

    #[test]
    fn flat_array_is_column_major() {
        let m = Mat4::from_translation(5.0, 6.0, 7.0);
        let flat = m.to_cols_array();
        assert_eq!(&flat[12..16], &[5.0, 6.0, 7.0, 1.0]);
        assert_eq!(Mat4::from_cols_array(&flat), m);
    }

    #[test]
    fn transform_point_applies_scale_and_translation() {
        let m = Mat4::from_translation(1.0, 0.0, -1.0) * Mat4::from_scale(2.0, 2.0, 2.0);
        assert_eq!(m.transform_point([1.0, 1.0, 1.0]), [3.0, 2.0, 1.0, 1.0]);
    }

    #[test]
    fn zero_times_anything_is_zero() {
        let t = Mat4::from_translation(1.0, 2.0, 3.0);
        assert_eq!(Mat4::ZERO * t, Mat4::ZERO);
    }

    #[test]
    fn identity_is_finite() {
        assert!(Mat4::IDENTITY.is_finite());
        assert!(!Mat4::IDENTITY.is_nan());
    }

    #[test]
    fn nan_detected() {
        let mut t = Mat4::IDENTITY;
        t.cols[2][1] = f32::NAN;
        assert!(!t.is_finite());
        assert!(t.is_nan());
    }

    #[test]
    fn infinity_detected() {
        let mut t = Mat4::IDENTITY;
        t.cols[0][3] = f32::INFINITY;
        assert!(!t.is_finite());
        assert!(!t.is_nan());
    }
}
