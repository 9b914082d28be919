//! Camera specifications that produce view transformation matrices.
//!
//! Both views map world coordinates to screen pixels: x to the column, and y
//! to the row with row 0 at the top of the image.

use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;
use crate::math::vec4::Point;

/// Orthographic 2D view of the xy-plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View2D {
    /// World point that lands at the center of the image.
    pub center: Point,
    /// World-space width of the visible window.
    pub du: f32,
    /// Direction that becomes the screen's +x axis.
    pub x_axis: Vec3,
    pub screen_x: usize,
    pub screen_y: usize,
}

impl View2D {
    pub fn new(center: Point, du: f32, x_axis: Vec3, screen_x: usize, screen_y: usize) -> Self {
        Self {
            center,
            du,
            x_axis,
            screen_x,
            screen_y,
        }
    }

    /// Builds the view transformation matrix.
    ///
    /// The window height follows the image aspect ratio, so pixels stay
    /// square.
    pub fn matrix(&self) -> Mat4 {
        let (cols, rows) = (self.screen_x as f32, self.screen_y as f32);
        let dv = self.du * rows / cols;
        let angle = self.x_axis.y.atan2(self.x_axis.x);

        let mut vtm = Mat4::translation_2d(-self.center.x, -self.center.y);
        vtm = Mat4::rotation_z(-angle) * vtm;
        vtm = Mat4::scaling_2d(cols / self.du, -rows / dv) * vtm;
        Mat4::translation_2d(cols / 2.0, rows / 2.0) * vtm
    }
}

/// Perspective view defined by a view reference point and a viewing frame.
///
/// The center of projection sits `d` behind the view reference point along
/// `-vpn`; `du` and `dv` size the view window and `b` is the distance from the
/// view reference point to the back clip plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View3D {
    /// View reference point.
    pub vrp: Point,
    /// View plane normal, pointing from the eye into the scene.
    pub vpn: Vec3,
    /// Approximate up direction; projected to be orthogonal to `vpn`.
    pub vup: Vec3,
    pub d: f32,
    pub du: f32,
    pub dv: f32,
    /// Front clip distance.
    pub f: f32,
    /// Back clip distance.
    pub b: f32,
    pub screen_x: usize,
    pub screen_y: usize,
}

impl View3D {
    /// Center of projection in world space, the natural viewer for culling.
    pub fn eye(&self) -> Point {
        let vrp = self.vrp.homogenize().to_vec3();
        Point::from_vec3(vrp - self.vpn.normalize() * self.d, 1.0)
    }

    /// Builds the perspective view transformation matrix.
    ///
    /// Points in front of the center of projection end up with `0 < z <= 1`
    /// at the back plane, and `w` holding the perspective divisor.
    pub fn matrix(&self) -> Mat4 {
        let vrp = self.vrp.homogenize();
        let (cols, rows) = (self.screen_x as f32, self.screen_y as f32);

        let mut vtm = Mat4::translation(-vrp.x, -vrp.y, -vrp.z);

        let u = self.vup.cross(self.vpn);
        let vup = self.vpn.cross(u);
        vtm = Mat4::rotation_axes(u.normalize(), vup.normalize(), self.vpn.normalize()) * vtm;

        vtm = Mat4::translation(0.0, 0.0, self.d) * vtm;

        let b = self.d + self.b;
        vtm = Mat4::scaling(2.0 * self.d / (b * self.du), 2.0 * self.d / (b * self.dv), 1.0 / b) * vtm;

        let d = self.d / b;
        vtm = Mat4::perspective(d) * vtm;

        vtm = Mat4::scaling_2d(-cols / (2.0 * d), -rows / (2.0 * d)) * vtm;
        Mat4::translation_2d(cols / 2.0, rows / 2.0) * vtm
    }
}
