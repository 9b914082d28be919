//! Axis-aligned box made of six quad faces.

use crate::math::vec4::Point;

use super::polygon::Polygon;

#[derive(Debug, Clone, PartialEq)]
pub struct Cube {
    /// Extent along y.
    pub h: f32,
    /// Extent along x.
    pub w: f32,
    /// Extent along z.
    pub l: f32,
    pub center: Point,
    /// Filled when drawn; otherwise only the face outlines are drawn.
    pub solid: bool,
    sides: [Polygon; 6],
}

impl Cube {
    pub fn new(h: f32, w: f32, l: f32, center: Point, solid: bool) -> Self {
        Self {
            h,
            w,
            l,
            center,
            solid,
            sides: Self::build_sides(h, w, l, center),
        }
    }

    /// Unit cube centered on the origin.
    pub fn unit(solid: bool) -> Self {
        Self::new(1.0, 1.0, 1.0, Point::point(0.0, 0.0, 0.0), solid)
    }

    /// Resizes and moves the cube, rebuilding its faces.
    pub fn set(&mut self, h: f32, w: f32, l: f32, center: Point) {
        *self = Self::new(h, w, l, center, self.solid);
    }

    /// Faces in the order front, back, left, right, top, bottom.
    pub fn sides(&self) -> &[Polygon; 6] {
        &self.sides
    }

    fn build_sides(h: f32, w: f32, l: f32, center: Point) -> [Polygon; 6] {
        let c = center.homogenize();
        let (hw, hh, hl) = (w / 2.0, h / 2.0, l / 2.0);
        let corner = |sx: f32, sy: f32, sz: f32| Point::point(c.x + sx * hw, c.y + sy * hh, c.z + sz * hl);

        // b/t = bottom/top, f/b = front/back, l/r = left/right.
        let bfl = corner(-1.0, -1.0, -1.0);
        let bfr = corner(1.0, -1.0, -1.0);
        let tfl = corner(-1.0, 1.0, -1.0);
        let tfr = corner(1.0, 1.0, -1.0);
        let bbl = corner(-1.0, -1.0, 1.0);
        let bbr = corner(1.0, -1.0, 1.0);
        let tbl = corner(-1.0, 1.0, 1.0);
        let tbr = corner(1.0, 1.0, 1.0);

        [
            Polygon::new(vec![bfl, tfl, tfr, bfr]),
            Polygon::new(vec![bbl, bbr, tbr, tbl]),
            Polygon::new(vec![tfl, tbl, bbl, bfl]),
            Polygon::new(vec![tfr, tbr, bbr, bfr]),
            Polygon::new(vec![tfl, tbl, tbr, tfr]),
            Polygon::new(vec![bfl, bbl, bbr, bfr]),
        ]
    }
}

impl Default for Cube {
    fn default() -> Self {
        Self::unit(true)
    }
}
