//! Line segments and open polylines.

use crate::colors::Color;
use crate::math::mat4::Mat4;
use crate::math::vec4::Point;
use crate::render::image::Image;
use crate::render::line::{draw_segment, draw_segment_depth};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub a: Point,
    pub b: Point,
    pub z_buffer: bool,
}

impl Line {
    pub fn new(a: Point, b: Point) -> Self {
        Self { a, b, z_buffer: true }
    }

    pub fn transform(&self, m: &Mat4) -> Self {
        Self { a: *m * self.a, b: *m * self.b, ..*self }
    }

    pub fn project(&self) -> Self {
        Self { a: self.a.project(), b: self.b.project(), ..*self }
    }

    /// Normalizes both endpoints in place.
    pub fn normalize(&mut self) {
        self.a = self.a.homogenize();
        self.b = self.b.homogenize();
    }

    /// Draws the segment, clipped to the image, between the rounded endpoints.
    ///
    /// With `z_buffer` set and both endpoints in front of the viewer the line
    /// is depth tested like a filled polygon.
    pub fn draw(&self, image: &mut Image, color: Color) {
        let (a, b) = (self.a, self.b);
        if self.z_buffer && a.z > 0.0 && b.z > 0.0 {
            draw_segment_depth(image, (a.x, a.y, 1.0 / a.z), (b.x, b.y, 1.0 / b.z), color);
        } else {
            draw_segment(image, (a.x, a.y), (b.x, b.y), color);
        }
    }
}

/// A chain of connected segments; unlike a polygon it is not closed.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    points: Vec<Point>,
    pub z_buffer: bool,
}

impl Default for Polyline {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Polyline {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points, z_buffer: true }
    }

    pub fn set(&mut self, points: Vec<Point>) {
        self.points = points;
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn transform(&self, m: &Mat4) -> Self {
        Self {
            points: self.points.iter().map(|&p| *m * p).collect(),
            z_buffer: self.z_buffer,
        }
    }

    pub fn project(&self) -> Self {
        Self {
            points: self.points.iter().map(|p| p.project()).collect(),
            z_buffer: self.z_buffer,
        }
    }

    pub fn normalize(&mut self) {
        for p in &mut self.points {
            *p = p.homogenize();
        }
    }

    /// Segments between consecutive points.
    pub fn segments(&self) -> impl Iterator<Item = Line> + '_ {
        self.points.windows(2).map(move |w| Line {
            a: w[0],
            b: w[1],
            z_buffer: self.z_buffer,
        })
    }

    pub fn draw(&self, image: &mut Image, color: Color) {
        for segment in self.segments() {
            segment.draw(image, color);
        }
    }
}
