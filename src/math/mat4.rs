//! 4x4 transformation matrix using column-major convention.
//!
//! # Convention
//! - Vectors are **column vectors** on the right: `Mat4 * Vec`
//! - Translation is stored in the **last column**
//! - Transforms chain **right-to-left**: `A * B * v` applies B first, then A
//! - Rotations are counter-clockwise when looking down the axis toward the origin
//!
//! # Example
//! ```ignore
//! let transform = rotation * scale;  // scale applied first, then rotation
//! let result = transform * vertex;   // transform the vertex
//! ```

use std::ops::Mul;

use super::vec3::Vec3;
use super::vec4::Vec4;

/// 4x4 matrix stored as `data[row][col]` with column-major convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    data: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    pub fn new(data: [[f32; 4]; 4]) -> Self {
        Mat4 { data }
    }

    pub fn identity() -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a translation matrix.
    ///
    /// Translation is stored in the last column (column-major convention).
    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, x],
            [0.0, 1.0, 0.0, y],
            [0.0, 0.0, 1.0, z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn translation_2d(x: f32, y: f32) -> Self {
        Self::translation(x, y, 0.0)
    }

    /// Creates a scale matrix.
    pub fn scaling(x: f32, y: f32, z: f32) -> Self {
        Mat4::new([
            [x, 0.0, 0.0, 0.0],
            [0.0, y, 0.0, 0.0],
            [0.0, 0.0, z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn scaling_2d(x: f32, y: f32) -> Self {
        Self::scaling(x, y, 1.0)
    }

    /// Creates a rotation matrix around the X axis.
    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation matrix around the Y axis.
    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4::new([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation matrix around the Z axis.
    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4::new([
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation that maps the orthonormal basis `(u, v, w)` onto the X, Y and
    /// Z axes. Each axis becomes one row of the matrix.
    pub fn rotation_axes(u: Vec3, v: Vec3, w: Vec3) -> Self {
        Mat4::new([
            [u.x, u.y, u.z, 0.0],
            [v.x, v.y, v.z, 0.0],
            [w.x, w.y, w.z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// 2D shear: `x' = x + shx * y`, `y' = y + shy * x`.
    pub fn shear_2d(shx: f32, shy: f32) -> Self {
        Mat4::new([
            [1.0, shx, 0.0, 0.0],
            [shy, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Simple perspective with the center of projection at the origin and the
    /// projection plane at `z = d`. Leaves `w = z / d`.
    pub fn perspective(d: f32) -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0 / d, 0.0],
        ])
    }

    /// Returns a new matrix with translation applied: `self * Mat4::translation(x, y, z)`.
    pub fn translate(&self, x: f32, y: f32, z: f32) -> Self {
        *self * Mat4::translation(x, y, z)
    }

    pub fn transpose(&self) -> Self {
        let mut data = [[0.0f32; 4]; 4];
        for (row, values) in data.iter_mut().enumerate() {
            for (col, value) in values.iter_mut().enumerate() {
                *value = self.data[col][row];
            }
        }
        Mat4::new(data)
    }

    /// Transforms a direction (w=0): translation is ignored.
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        (*self * Vec4::from_vec3(v, 0.0)).to_vec3()
    }

    /// Access element at [row][col].
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row][col]
    }

    /// Set element at [row][col].
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row][col] = value;
    }
}

/// Matrix multiplication: Mat4 * Mat4.
///
/// For column-major convention, `A * B * v` applies B first, then A.
impl Mul<Mat4> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Self::Output {
        let mut result = [[0.0f32; 4]; 4];

        for row in 0..4 {
            for col in 0..4 {
                result[row][col] = self.data[row][0] * rhs.data[0][col]
                    + self.data[row][1] * rhs.data[1][col]
                    + self.data[row][2] * rhs.data[2][col]
                    + self.data[row][3] * rhs.data[3][col];
            }
        }

        Mat4::new(result)
    }
}

/// Transform a Vec4 by a matrix: Mat4 * Vec4 (column vector).
impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, v: Vec4) -> Self::Output {
        let row = |r: usize| {
            self.data[r][0] * v.x + self.data[r][1] * v.y + self.data[r][2] * v.z + self.data[r][3] * v.w
        };
        Vec4::new(row(0), row(1), row(2), row(3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn translation_moves_points_not_directions() {
        let m = Mat4::translation(1.0, 2.0, 3.0);
        assert_eq!(m * Vec4::point(0.0, 0.0, 0.0), Vec4::point(1.0, 2.0, 3.0));
        assert_eq!(m.transform_vector(Vec3::X), Vec3::X);
    }

    #[test]
    fn rotation_z_is_counter_clockwise() {
        let p = Mat4::rotation_z(FRAC_PI_2) * Vec4::point(1.0, 0.0, 0.0);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn rotations_about_x_and_y_follow_right_hand_rule() {
        let p = Mat4::rotation_x(FRAC_PI_2) * Vec4::point(0.0, 1.0, 0.0);
        assert_relative_eq!(p.z, 1.0, epsilon = 1e-6);
        let q = Mat4::rotation_y(FRAC_PI_2) * Vec4::point(0.0, 0.0, 1.0);
        assert_relative_eq!(q.x, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn product_applies_right_operand_first() {
        let m = Mat4::translation(10.0, 0.0, 0.0) * Mat4::scaling(2.0, 2.0, 2.0);
        assert_eq!(m * Vec4::point(1.0, 1.0, 1.0), Vec4::point(12.0, 2.0, 2.0));
    }

    #[test]
    fn rotation_axes_maps_basis_to_axes() {
        let u = Vec3::new(0.0, 0.0, 1.0);
        let v = Vec3::new(0.0, 1.0, 0.0);
        let w = Vec3::new(-1.0, 0.0, 0.0);
        let m = Mat4::rotation_axes(u, v, w);
        assert_eq!(m.transform_vector(u), Vec3::X);
        assert_eq!(m.transform_vector(w), Vec3::Z);
    }

    #[test]
    fn shear_offsets_x_by_y() {
        let p = Mat4::shear_2d(0.5, 0.0) * Vec4::point2d(0.0, 4.0);
        assert_eq!(p, Vec4::point2d(2.0, 4.0));
    }

    #[test]
    fn perspective_sets_w_from_depth() {
        let p = Mat4::perspective(2.0) * Vec4::point(4.0, 2.0, 4.0);
        assert_relative_eq!(p.w, 2.0);
        assert_eq!(p.homogenize(), Vec4::point(2.0, 1.0, 2.0));
    }

    #[test]
    fn transpose_swaps_rows_and_columns() {
        let m = Mat4::translation(1.0, 2.0, 3.0).transpose();
        assert_eq!(m.get(3, 0), 1.0);
        assert_eq!(m.get(0, 3), 0.0);
    }
}
