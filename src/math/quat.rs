//! Unit quaternions for rigid-body orientation.

use std::ops::Mul;

use super::mat4::Mat4;
use super::vec3::Vec3;

/// Quaternion `w + xi + yj + zk`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quaternion {
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 0.0);

    pub const fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self { w, x, y, z }
    }

    /// Rotation of `angle` radians about `axis`.
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let axis = axis.normalize();
        let (s, c) = (angle / 2.0).sin_cos();
        Self::new(c, axis.x * s, axis.y * s, axis.z * s)
    }

    pub fn magnitude(&self) -> f32 {
        (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Scales to unit length. A zero quaternion normalizes to the identity.
    pub fn normalize(&self) -> Self {
        let m = self.magnitude();
        if m <= f32::EPSILON {
            return Self::IDENTITY;
        }
        Self::new(self.w / m, self.x / m, self.y / m, self.z / m)
    }

    pub fn conjugate(&self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    /// Rotates `v` by this (unit) quaternion: `q v q*`.
    pub fn rotate(&self, v: Vec3) -> Vec3 {
        let q = self.normalize();
        let p = Self::new(0.0, v.x, v.y, v.z);
        let r = q * p * q.conjugate();
        Vec3::new(r.x, r.y, r.z)
    }

    /// Rotation matrix equivalent to [`Quaternion::rotate`].
    pub fn to_matrix(&self) -> Mat4 {
        let Self { w, x, y, z } = self.normalize();
        Mat4::new([
            [
                1.0 - 2.0 * (y * y + z * z),
                2.0 * (x * y - w * z),
                2.0 * (x * z + w * y),
                0.0,
            ],
            [
                2.0 * (x * y + w * z),
                1.0 - 2.0 * (x * x + z * z),
                2.0 * (y * z - w * x),
                0.0,
            ],
            [
                2.0 * (x * z - w * y),
                2.0 * (y * z + w * x),
                1.0 - 2.0 * (x * x + y * y),
                0.0,
            ],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }
}

/// Hamilton product; `a * b` applies `b` first when used as rotations.
impl Mul<Quaternion> for Quaternion {
    type Output = Quaternion;

    fn mul(self, rhs: Quaternion) -> Self::Output {
        Self::new(
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn identity_leaves_vectors_alone() {
        assert_eq!(Quaternion::IDENTITY.rotate(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn quarter_turn_about_z() {
        let q = Quaternion::from_axis_angle(Vec3::Z, FRAC_PI_2);
        let v = q.rotate(Vec3::X);
        assert_relative_eq!(v.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(v.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn matrix_matches_rotate() {
        let q = Quaternion::from_axis_angle(Vec3::new(1.0, 1.0, 0.0), 0.7);
        let v = Vec3::new(0.3, -2.0, 1.5);
        let a = q.rotate(v);
        let b = q.to_matrix().transform_vector(v);
        assert_relative_eq!(a.x, b.x, epsilon = 1e-5);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-5);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-5);
    }

    #[test]
    fn zero_normalizes_to_identity() {
        assert_eq!(Quaternion::new(0.0, 0.0, 0.0, 0.0).normalize(), Quaternion::IDENTITY);
    }
}
