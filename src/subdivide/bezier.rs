//! Cubic Bezier curves and bicubic Bezier patches.
//!
//! Both are subdivided with De Casteljau's algorithm at `t = 0.5`. Drawing
//! subdivides until a piece is flat, meaning its screen-space bounding box is
//! no larger than the flatness threshold in both axes, or until the division
//! budget runs out.

use super::{extent, insert_by_x, split_control_points};
use crate::colors::Color;
use crate::error::Result;
use crate::geometry::line::Line;
use crate::geometry::polygon::Polygon;
use crate::math::mat4::Mat4;
use crate::math::vec4::Point;
use crate::render::image::Image;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BezierCurve {
    points: [Point; 4],
    pub z_buffer: bool,
}

impl BezierCurve {
    pub fn new(points: [Point; 4]) -> Self {
        Self {
            points,
            z_buffer: true,
        }
    }

    pub fn points(&self) -> &[Point; 4] {
        &self.points
    }

    pub fn set(&mut self, points: [Point; 4]) {
        self.points = points;
    }

    pub fn transform(&self, m: &Mat4) -> Self {
        Self {
            points: self.points.map(|p| *m * p),
            ..*self
        }
    }

    pub fn project(&self) -> Self {
        Self {
            points: self.points.map(|p| p.project()),
            ..*self
        }
    }

    /// Point on the curve at parameter `t` (Bernstein form).
    pub fn evaluate(&self, t: f32) -> Point {
        let s = 1.0 - t;
        let [p0, p1, p2, p3] = self.points.map(|p| p.to_vec3());
        let v = p0 * (s * s * s) + p1 * (3.0 * s * s * t) + p2 * (3.0 * s * t * t) + p3 * (t * t * t);
        Point::from_vec3(v, 1.0)
    }

    /// Halves the curve at `t = 0.5`.
    pub fn split(&self) -> (Self, Self) {
        let (left, right) = split_control_points(self.points);
        (
            Self { points: left, ..*self },
            Self { points: right, ..*self },
        )
    }

    /// Splits to the full depth the budget allows, ignoring flatness.
    pub fn divide(&self, budget: u32) -> Vec<Self> {
        let mut leaves = Vec::new();
        self.divide_into(budget, &mut leaves);
        leaves
    }

    fn divide_into(&self, budget: u32, leaves: &mut Vec<Self>) {
        if budget <= 1 {
            insert_by_x(leaves, *self, |c| c.points[0].x);
            return;
        }
        let (left, right) = self.split();
        left.divide_into(budget / 2, leaves);
        right.divide_into(budget / 2, leaves);
    }

    /// Whether the control polygon fits in a `threshold`-pixel box.
    pub fn is_flat(&self, threshold: f32) -> Result<bool> {
        let (width, height) = extent(&self.points)?;
        Ok(width <= threshold && height <= threshold)
    }

    /// Splits until each piece is flat or the budget is spent.
    pub fn leaves(&self, threshold: f32, budget: u32) -> Result<Vec<Self>> {
        let mut leaves = Vec::new();
        self.leaves_into(threshold, budget, &mut leaves)?;
        Ok(leaves)
    }

    fn leaves_into(&self, threshold: f32, budget: u32, leaves: &mut Vec<Self>) -> Result<()> {
        if budget <= 1 || self.is_flat(threshold)? {
            insert_by_x(leaves, *self, |c| c.points[0].x);
            return Ok(());
        }
        let (left, right) = self.split();
        left.leaves_into(threshold, budget / 2, leaves)?;
        right.leaves_into(threshold, budget / 2, leaves)
    }

    /// Line segments standing in for this piece: the chord when flat,
    /// otherwise the three legs of the control polygon.
    pub fn segments(&self, threshold: f32) -> Result<Vec<Line>> {
        let p = &self.points;
        let mut lines = if self.is_flat(threshold)? {
            vec![Line::new(p[0], p[3])]
        } else {
            vec![Line::new(p[0], p[1]), Line::new(p[1], p[2]), Line::new(p[2], p[3])]
        };
        for line in &mut lines {
            line.z_buffer = self.z_buffer;
        }
        Ok(lines)
    }

    /// Draws a screen-space curve.
    pub fn draw(&self, image: &mut Image, color: Color, threshold: f32, budget: u32) -> Result<()> {
        let leaves = self.leaves(threshold, budget)?;
        log::trace!("bezier curve drawn as {} pieces", leaves.len());
        for leaf in &leaves {
            for line in leaf.segments(threshold)? {
                line.draw(image, color);
            }
        }
        Ok(())
    }
}

/// A bicubic patch; control point `(i, j)` is stored at `i * 4 + j`, with `i`
/// running along u and `j` along v.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BezierSurface {
    points: [Point; 16],
    pub z_buffer: bool,
}

impl BezierSurface {
    pub fn new(points: [Point; 16]) -> Self {
        Self {
            points,
            z_buffer: true,
        }
    }

    pub fn points(&self) -> &[Point; 16] {
        &self.points
    }

    pub fn set(&mut self, points: [Point; 16]) {
        self.points = points;
    }

    pub fn transform(&self, m: &Mat4) -> Self {
        Self {
            points: self.points.map(|p| *m * p),
            ..*self
        }
    }

    pub fn project(&self) -> Self {
        Self {
            points: self.points.map(|p| p.project()),
            ..*self
        }
    }

    fn split_u(&self) -> (Self, Self) {
        let (mut a, mut b) = (*self, *self);
        for j in 0..4 {
            let column = [0, 1, 2, 3].map(|i| self.points[i * 4 + j]);
            let (top, bottom) = split_control_points(column);
            for i in 0..4 {
                a.points[i * 4 + j] = top[i];
                b.points[i * 4 + j] = bottom[i];
            }
        }
        (a, b)
    }

    fn split_v(&self) -> (Self, Self) {
        let (mut a, mut b) = (*self, *self);
        for i in 0..4 {
            let row = [0, 1, 2, 3].map(|j| self.points[i * 4 + j]);
            let (left, right) = split_control_points(row);
            a.points[i * 4..i * 4 + 4].copy_from_slice(&left);
            b.points[i * 4..i * 4 + 4].copy_from_slice(&right);
        }
        (a, b)
    }

    /// Quarters the patch at `u = 0.5` then `v = 0.5`.
    pub fn split(&self) -> [Self; 4] {
        let (a, b) = self.split_u();
        let (a0, a1) = a.split_v();
        let (b0, b1) = b.split_v();
        [a0, a1, b0, b1]
    }

    /// Splits to the full depth the budget allows, ignoring flatness.
    pub fn divide(&self, budget: u32) -> Vec<Self> {
        let mut leaves = Vec::new();
        self.divide_into(budget, &mut leaves);
        leaves
    }

    fn divide_into(&self, budget: u32, leaves: &mut Vec<Self>) {
        if budget <= 1 {
            insert_by_x(leaves, *self, |s| s.points[0].x);
            return;
        }
        for child in self.split() {
            child.divide_into(budget / 2, leaves);
        }
    }

    pub fn is_flat(&self, threshold: f32) -> Result<bool> {
        let (width, height) = extent(&self.points)?;
        Ok(width <= threshold && height <= threshold)
    }

    /// Splits until each patch is flat or the budget is spent.
    pub fn leaves(&self, threshold: f32, budget: u32) -> Result<Vec<Self>> {
        let mut leaves = Vec::new();
        self.leaves_into(threshold, budget, &mut leaves)?;
        Ok(leaves)
    }

    fn leaves_into(&self, threshold: f32, budget: u32, leaves: &mut Vec<Self>) -> Result<()> {
        if budget <= 1 || self.is_flat(threshold)? {
            insert_by_x(leaves, *self, |s| s.points[0].x);
            return Ok(());
        }
        for child in self.split() {
            child.leaves_into(threshold, budget / 2, leaves)?;
        }
        Ok(())
    }

    /// The two triangles spanning the patch corners.
    pub fn triangles(&self) -> [Polygon; 2] {
        let p = &self.points;
        let mut first = Polygon::new(vec![p[0], p[3], p[15]]);
        let mut second = Polygon::new(vec![p[0], p[15], p[12]]);
        first.z_buffer = self.z_buffer;
        second.z_buffer = self.z_buffer;
        [first, second]
    }

    /// Budget-only subdivision flattened to triangles.
    pub fn to_polygons(&self, budget: u32) -> Vec<Polygon> {
        self.divide(budget)
            .iter()
            .flat_map(|patch| patch.triangles())
            .collect()
    }

    /// Fills a screen-space patch in a solid color.
    pub fn draw(&self, image: &mut Image, color: Color, threshold: f32, budget: u32) -> Result<()> {
        let leaves = self.leaves(threshold, budget)?;
        log::trace!("bezier surface drawn as {} patches", leaves.len());
        for leaf in &leaves {
            for triangle in leaf.triangles() {
                triangle.draw_fill(image, color)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BLACK, WHITE};
    use crate::error::RenderError;
    use approx::assert_relative_eq;

    fn arch() -> BezierCurve {
        BezierCurve::new([
            Point::point2d(0.0, 0.0),
            Point::point2d(30.0, 90.0),
            Point::point2d(60.0, 90.0),
            Point::point2d(90.0, 0.0),
        ])
    }

    fn flat_patch(size: f32) -> BezierSurface {
        let mut points = [Point::default(); 16];
        for i in 0..4 {
            for j in 0..4 {
                points[i * 4 + j] = Point::point2d(j as f32 * size / 3.0, i as f32 * size / 3.0);
            }
        }
        BezierSurface::new(points)
    }

    #[test]
    fn split_point_lies_on_the_curve() {
        let curve = arch();
        let (left, right) = curve.split();
        let mid = curve.evaluate(0.5);
        assert_relative_eq!(left.points()[3].x, mid.x, epsilon = 1e-4);
        assert_relative_eq!(left.points()[3].y, mid.y, epsilon = 1e-4);
        assert_eq!(left.points()[3], right.points()[0]);
        assert_eq!(left.points()[0], curve.points()[0]);
        assert_eq!(right.points()[3], curve.points()[3]);
    }

    #[test]
    fn colinear_curve_stays_on_its_line() {
        // Control points on y = 2x + 1.
        let on_line = |x: f32| Point::point2d(x, 2.0 * x + 1.0);
        let curve = BezierCurve::new([on_line(0.0), on_line(7.0), on_line(3.0), on_line(12.0)]);
        for budget in [1, 2, 8, 64] {
            for leaf in curve.divide(budget) {
                for p in leaf.points() {
                    assert_relative_eq!(p.y, 2.0 * p.x + 1.0, epsilon = 1e-4);
                }
            }
        }
    }

    #[test]
    fn budget_bounds_the_split_depth() {
        let curve = arch();
        for (budget, depth) in [(1u32, 0u32), (2, 1), (3, 1), (16, 4), (100, 6)] {
            assert_eq!(curve.divide(budget).len(), 1 << depth, "budget {budget}");
            let bound = (budget as f32).log2().ceil() as u32;
            assert!(depth <= bound);
        }
    }

    #[test]
    fn leaves_are_ordered_by_first_x() {
        let leaves = arch().divide(16);
        assert!(leaves.windows(2).all(|w| w[0].points()[0].x <= w[1].points()[0].x));
        assert_eq!(leaves[0].points()[0], Point::point2d(0.0, 0.0));
    }

    #[test]
    fn flat_curve_is_not_split() {
        let small = BezierCurve::new([
            Point::point2d(0.0, 0.0),
            Point::point2d(2.0, 3.0),
            Point::point2d(4.0, 3.0),
            Point::point2d(6.0, 0.0),
        ]);
        assert_eq!(small.leaves(10.0, 16).unwrap().len(), 1);
        assert_eq!(small.segments(10.0).unwrap().len(), 1);
        assert!(arch().leaves(10.0, 16).unwrap().len() > 1);
    }

    #[test]
    fn nan_control_point_is_invalid() {
        let mut curve = arch();
        curve.set([
            Point::point2d(0.0, 0.0),
            Point::point2d(f32::NAN, 1.0),
            Point::point2d(2.0, 2.0),
            Point::point2d(3.0, 3.0),
        ]);
        let mut img = Image::new(10, 10).unwrap();
        let err = curve.draw(&mut img, WHITE, 10.0, 16).unwrap_err();
        assert!(matches!(err, RenderError::InvalidBounds { .. }));
    }

    #[test]
    fn drawn_curve_touches_both_endpoints() {
        let mut img = Image::new(100, 100).unwrap();
        arch().draw(&mut img, WHITE, 10.0, 64).unwrap();
        assert_eq!(img.color(0, 0), Some(WHITE));
        assert_eq!(img.color(0, 90), Some(WHITE));
        assert_eq!(img.color(50, 50), Some(BLACK));
    }

    #[test]
    fn surface_split_shares_corners() {
        let patch = flat_patch(30.0);
        let [a0, a1, b0, b1] = patch.split();
        assert_eq!(a0.points()[0], patch.points()[0]);
        assert_eq!(a1.points()[3], patch.points()[3]);
        assert_eq!(b0.points()[12], patch.points()[12]);
        assert_eq!(b1.points()[15], patch.points()[15]);
        assert_eq!(a0.points()[15], b1.points()[0]);
        assert_relative_eq!(a0.points()[15].x, 15.0);
        assert_relative_eq!(a0.points()[15].y, 15.0);
    }

    #[test]
    fn surface_divides_into_four_per_level() {
        let patch = flat_patch(30.0);
        assert_eq!(patch.divide(1).len(), 1);
        assert_eq!(patch.divide(4).len(), 16);
        assert_eq!(patch.to_polygons(2).len(), 8);
    }

    #[test]
    fn flat_surface_fill_covers_its_square() {
        let mut img = Image::new(30, 30).unwrap();
        flat_patch(20.0).draw(&mut img, WHITE, 10.0, 16).unwrap();
        assert_eq!(img.count_not(BLACK), 400);
    }
}
