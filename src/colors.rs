//! Linear RGB colors and blending helpers.

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// Color with float channels, nominally in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
pub const RED: Color = Color::new(1.0, 0.0, 0.0);
pub const GREEN: Color = Color::new(0.0, 1.0, 0.0);
pub const BLUE: Color = Color::new(0.0, 0.0, 1.0);

impl Color {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(v: f32) -> Self {
        Self::new(v, v, v)
    }

    /// Blend toward `other` by `t`; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    pub fn scale(self, s: f32) -> Self {
        Self::new(self.r * s, self.g * s, self.b * s)
    }

    /// Clamps every channel to `[0, 1]`.
    pub fn clamp(self) -> Self {
        Self::new(self.r.clamp(0.0, 1.0), self.g.clamp(0.0, 1.0), self.b.clamp(0.0, 1.0))
    }

    /// Quantizes to 8-bit channels (truncating, saturating at 255).
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f32| (c * 255.0).clamp(0.0, 255.0) as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    pub fn from_rgb8([r, g, b]: [u8; 3]) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }
}

impl Add<Color> for Color {
    type Output = Color;

    fn add(self, rhs: Color) -> Self::Output {
        Self::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl Sub<Color> for Color {
    type Output = Color;

    fn sub(self, rhs: Color) -> Self::Output {
        Self::new(self.r - rhs.r, self.g - rhs.g, self.b - rhs.b)
    }
}

/// Channel-wise product, used to modulate a surface color by a light.
impl Mul<Color> for Color {
    type Output = Color;

    fn mul(self, rhs: Color) -> Self::Output {
        Self::new(self.r * rhs.r, self.g * rhs.g, self.b * rhs.b)
    }
}

impl Mul<f32> for Color {
    type Output = Color;

    fn mul(self, rhs: f32) -> Self::Output {
        self.scale(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn lerp_endpoints_and_middle() {
        assert_eq!(BLACK.lerp(WHITE, 0.0), BLACK);
        assert_eq!(BLACK.lerp(WHITE, 1.0), WHITE);
        assert_relative_eq!(RED.lerp(BLUE, 0.5).b, 0.5);
    }

    #[test]
    fn lerp_clamps_fraction() {
        assert_eq!(BLACK.lerp(WHITE, 2.0), WHITE);
        assert_eq!(BLACK.lerp(WHITE, -1.0), BLACK);
    }

    #[test]
    fn modulate_and_clamp() {
        assert_eq!(Color::new(0.5, 1.0, 0.0) * Color::gray(0.5), Color::new(0.25, 0.5, 0.0));
        assert_eq!(Color::new(1.5, -0.2, 0.3).clamp(), Color::new(1.0, 0.0, 0.3));
    }

    #[test]
    fn quantize_saturates() {
        assert_eq!(Color::new(2.0, -1.0, 1.0).to_rgb8(), [255, 0, 255]);
    }
}
