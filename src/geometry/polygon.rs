//! Polygon vertex loops with optional per-vertex colors and normals.
//!
//! The loop is implicitly closed: the last vertex connects back to the first.
//! Per-vertex attribute lists are either empty or hold exactly one entry per
//! vertex; every setter checks this, and copies always carry all three lists
//! together.

use crate::colors::Color;
use crate::error::{RenderError, Result};
use crate::geometry::line::Line;
use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;
use crate::math::vec4::Point;
use crate::render::image::Image;
use crate::render::line::draw_segment;
use crate::render::scanline::{self, GradientDirection, Paint};

#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point>,
    colors: Vec<Color>,
    normals: Vec<Vec3>,
    /// Depth-test pixels against the image's depth channel when filling.
    pub z_buffer: bool,
    /// Cull the polygon during traversal when it faces away from the viewer.
    pub one_sided: bool,
}

impl Default for Polygon {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Polygon {
    /// A polygon without per-vertex attributes, depth testing on, two-sided.
    pub fn new(vertices: Vec<Point>) -> Self {
        Self {
            vertices,
            colors: Vec::new(),
            normals: Vec::new(),
            z_buffer: true,
            one_sided: false,
        }
    }

    /// Builds a polygon from 2D `(x, y)` pairs on the z=0 plane.
    pub fn from_xy(points: &[(f32, f32)]) -> Self {
        Self::new(points.iter().map(|&(x, y)| Point::point2d(x, y)).collect())
    }

    pub fn with_colors(vertices: Vec<Point>, colors: Vec<Color>) -> Result<Self> {
        let mut polygon = Self::new(vertices);
        polygon.set_colors(colors)?;
        Ok(polygon)
    }

    /// Replaces every field at once.
    pub fn set_all(
        &mut self,
        vertices: Vec<Point>,
        colors: Vec<Color>,
        normals: Vec<Vec3>,
        z_buffer: bool,
        one_sided: bool,
    ) -> Result<()> {
        check_len("color", vertices.len(), colors.len())?;
        check_len("normal", vertices.len(), normals.len())?;
        self.vertices = vertices;
        self.colors = colors;
        self.normals = normals;
        self.z_buffer = z_buffer;
        self.one_sided = one_sided;
        Ok(())
    }

    /// Replaces the vertex loop. Colors and normals belong to the old
    /// vertices and are dropped.
    pub fn set(&mut self, vertices: Vec<Point>) {
        self.vertices = vertices;
        self.colors.clear();
        self.normals.clear();
    }

    pub fn set_colors(&mut self, colors: Vec<Color>) -> Result<()> {
        check_len("color", self.vertices.len(), colors.len())?;
        self.colors = colors;
        Ok(())
    }

    pub fn set_normals(&mut self, normals: Vec<Vec3>) -> Result<()> {
        check_len("normal", self.vertices.len(), normals.len())?;
        self.normals = normals;
        Ok(())
    }

    /// Empties the polygon, keeping its flags.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.colors.clear();
        self.normals.clear();
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn has_colors(&self) -> bool {
        !self.colors.is_empty()
    }

    /// Depth testing needs `1/z`, so it only applies when every vertex lies in
    /// front of the viewer (`z > 0`). Flat 2D geometry fills in draw order.
    pub fn uses_depth(&self) -> bool {
        self.z_buffer && self.vertices.iter().all(|v| v.z > 0.0)
    }

    // ============ Geometry ============

    /// Returns a copy with every vertex multiplied by `m`. Normals are
    /// transformed as directions and renormalized.
    pub fn transform(&self, m: &Mat4) -> Self {
        Self {
            vertices: self.vertices.iter().map(|&v| *m * v).collect(),
            normals: self
                .normals
                .iter()
                .map(|&n| m.transform_vector(n).normalize())
                .collect(),
            ..self.clone()
        }
    }

    /// Returns a screen-space copy; see [`Point::project`].
    pub fn project(&self) -> Self {
        Self {
            vertices: self.vertices.iter().map(|v| v.project()).collect(),
            ..self.clone()
        }
    }

    /// Homogenizes every vertex in place.
    pub fn normalize(&mut self) {
        for v in &mut self.vertices {
            *v = v.homogenize();
        }
    }

    /// The vertex with the smallest x.
    pub fn min_x(&self) -> Option<Point> {
        self.vertices.iter().copied().reduce(|a, b| if b.x < a.x { b } else { a })
    }

    /// The vertex with the largest x.
    pub fn max_x(&self) -> Option<Point> {
        self.vertices.iter().copied().reduce(|a, b| if b.x > a.x { b } else { a })
    }

    /// Unnormalized normal from the first three vertices: `(b - a) x (c - a)`.
    pub fn surface_normal(&self) -> Option<Vec3> {
        match self.vertices.as_slice() {
            [a, b, c, ..] => {
                let (a, b, c) = (a.homogenize().to_vec3(), b.homogenize().to_vec3(), c.homogenize().to_vec3());
                Some((b - a).cross(c - a))
            }
            _ => None,
        }
    }

    /// Whether the front face points toward `viewer`.
    ///
    /// Polygons with fewer than three vertices are never culled.
    pub fn faces(&self, viewer: Point) -> bool {
        match (self.surface_normal(), self.vertices.first()) {
            (Some(normal), Some(a)) => {
                let to_viewer = viewer.homogenize().to_vec3() - a.homogenize().to_vec3();
                normal.dot(to_viewer) >= 0.0
            }
            _ => true,
        }
    }

    /// Every edge of the closed loop, starting with vertex 0 to vertex 1 and
    /// ending with the closing edge.
    pub fn to_lines(&self) -> Vec<Line> {
        let n = self.vertices.len();
        (0..n)
            .map(|i| Line::new(self.vertices[i], self.vertices[(i + 1) % n]))
            .collect()
    }

    // ============ Drawing ============

    /// Draws the outline of the loop, closing edge included.
    pub fn draw(&self, image: &mut Image, color: Color) {
        let n = self.vertices.len();
        if n == 0 {
            return;
        }
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            draw_segment(image, (a.x, a.y), (b.x, b.y), color);
        }
    }

    /// Scanline fill in a solid color.
    pub fn draw_fill(&self, image: &mut Image, color: Color) -> Result<()> {
        scanline::fill_polygon(self, image, Paint::Solid(color)).map(|_| ())
    }

    /// Scanline fill blending from `from` to `to`.
    pub fn draw_fill_gradient(
        &self,
        image: &mut Image,
        from: Color,
        to: Color,
        direction: GradientDirection,
    ) -> Result<()> {
        scanline::fill_polygon(self, image, Paint::Gradient { from, to, direction }).map(|_| ())
    }

    /// Scanline fill interpolating the per-vertex colors; polygons without
    /// colors fill with `fallback`.
    pub fn draw_fill_shaded(&self, image: &mut Image, fallback: Color) -> Result<()> {
        scanline::fill_polygon(self, image, Paint::Vertex { fallback }).map(|_| ())
    }
}

fn check_len(attribute: &'static str, expected: usize, found: usize) -> Result<()> {
    if found != 0 && found != expected {
        return Err(RenderError::VertexAttributeMismatch {
            attribute,
            expected,
            found,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BLACK, BLUE, GREEN, RED, WHITE};

    fn square() -> Polygon {
        Polygon::from_xy(&[(10.0, 10.0), (20.0, 10.0), (20.0, 20.0), (10.0, 20.0)])
    }

    #[test]
    fn mismatched_colors_are_rejected() {
        let mut p = square();
        let err = p.set_colors(vec![RED, GREEN]).unwrap_err();
        assert!(matches!(
            err,
            RenderError::VertexAttributeMismatch { attribute: "color", expected: 4, found: 2 }
        ));
        assert!(!p.has_colors());
    }

    #[test]
    fn clone_carries_colors_and_normals() {
        let mut p = square();
        p.set_colors(vec![RED, GREEN, BLUE, WHITE]).unwrap();
        p.set_normals(vec![Vec3::Z; 4]).unwrap();
        let copy = p.clone();
        assert_eq!(copy.colors(), p.colors());
        assert_eq!(copy.normals(), p.normals());
    }

    #[test]
    fn set_drops_stale_attributes() {
        let mut p = square();
        p.set_colors(vec![RED; 4]).unwrap();
        p.set(vec![Point::point2d(0.0, 0.0); 3]);
        assert_eq!(p.len(), 3);
        assert!(p.colors().is_empty());
    }

    #[test]
    fn extremes_in_x() {
        let p = Polygon::from_xy(&[(3.0, 0.0), (-2.0, 1.0), (7.0, 5.0)]);
        assert_eq!(p.min_x().unwrap().x, -2.0);
        assert_eq!(p.max_x().unwrap().x, 7.0);
        assert!(Polygon::default().min_x().is_none());
    }

    #[test]
    fn to_lines_closes_the_loop() {
        let lines = square().to_lines();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[3].a, Point::point2d(10.0, 20.0));
        assert_eq!(lines[3].b, Point::point2d(10.0, 10.0));
    }

    #[test]
    fn facing_depends_on_viewer_side() {
        // Counter-clockwise in the xy-plane: normal along +z.
        let p = Polygon::from_xy(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        assert!(p.faces(Point::point(0.0, 0.0, 5.0)));
        assert!(!p.faces(Point::point(0.0, 0.0, -5.0)));
    }

    #[test]
    fn outline_hugs_the_fill() {
        let p = square();
        let mut filled = Image::new(30, 30).unwrap();
        p.draw_fill(&mut filled, WHITE).unwrap();
        p.draw(&mut filled, WHITE);

        // Every outline pixel of a filled shape is within one pixel of the fill.
        let filled_only = {
            let mut img = Image::new(30, 30).unwrap();
            p.draw_fill(&mut img, WHITE).unwrap();
            img
        };
        for row in 0..30 {
            for col in 0..30 {
                if filled.color(row, col) != Some(WHITE) || filled_only.color(row, col) == Some(WHITE) {
                    continue;
                }
                let near_fill = (-1..=1).any(|dr| {
                    (-1..=1).any(|dc| filled_only.color(row + dr, col + dc) == Some(WHITE))
                });
                assert!(near_fill, "outline pixel ({row}, {col}) is detached from the fill");
            }
        }
        assert_eq!(filled_only.count_not(BLACK), 100);
    }

    #[test]
    fn outline_with_far_vertices_is_clipped() {
        let p = Polygon::from_xy(&[(-3e9, 0.0), (3e9, 0.0), (0.0, 5.0)]);
        let mut img = Image::new(10, 10).unwrap();
        p.draw(&mut img, WHITE);
        assert!((0..10).all(|col| img.color(0, col) == Some(WHITE)));
        assert_eq!(img.color(3, 3), Some(BLACK));
    }

    #[test]
    fn transform_moves_vertices() {
        let p = square().transform(&Mat4::translation(5.0, -10.0, 0.0));
        assert_eq!(p.vertices()[0], Point::point2d(15.0, 0.0));
    }
}
