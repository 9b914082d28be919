//! Hierarchical scene modules and their traversal.
//!
//! A [`Module`] is an ordered list of [`Element`]s. Drawing walks the list
//! front to back with three pieces of state:
//!
//! - the **local transform** (LTM), built up by matrix elements,
//! - the **global transform** (GTM) inherited from the parent module,
//! - the [`DrawState`], changed by color and coefficient elements.
//!
//! The [`Lighting`] passed to [`Module::draw`] is shared by the whole
//! traversal and only affects the `Flat` and `Gouraud` shading modes, which
//! light polygons in world space before they are projected.
//!
//! Geometry is mapped to the screen by `VTM * GTM * LTM` and projected. A
//! nested module is drawn with `GTM * LTM` as its global transform and a copy
//! of the current draw state, so nothing it changes is visible to the
//! elements that follow it.
//!
//! # Example
//!
//! ```ignore
//! let mut square = Module::new();
//! square.polygon(Polygon::from_xy(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]));
//! let square = Rc::new(square);
//!
//! let mut scene = Module::new();
//! scene.color(colors::RED).module(square.clone());
//! scene.translate2d(2.0, 0.0).color(colors::BLUE).module(square);
//! scene.draw(&view.matrix(), &Mat4::identity(), &DrawState::default(), &Lighting::new(), &mut image)?;
//! ```

use std::path::Path;
use std::rc::Rc;

use super::draw_state::{DrawState, FillMode, ShadeMode};
use super::element::Element;
use crate::colors::Color;
use crate::error::Result;
use crate::geometry::{Cube, Line, Polygon, Polyline};
use crate::light::Lighting;
use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;
use crate::math::vec4::Point;
use crate::render::image::Image;
use crate::render::line::plot;
use crate::render::scanline::GradientDirection;
use crate::subdivide::{triangle, BezierCurve, BezierSurface};

#[derive(Debug, Clone, Default)]
pub struct Module {
    elements: Vec<Element>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Drops every element. Shared sub-modules survive as long as another
    /// parent still refers to them.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    pub fn insert(&mut self, element: impl Into<Element>) -> &mut Self {
        self.elements.push(element.into());
        self
    }

    // ============ Geometry ============

    pub fn point(&mut self, p: Point) -> &mut Self {
        self.insert(Element::Point(p))
    }

    pub fn line(&mut self, line: Line) -> &mut Self {
        self.insert(Element::Line(line))
    }

    pub fn polyline(&mut self, polyline: Polyline) -> &mut Self {
        self.insert(Element::Polyline(polyline))
    }

    pub fn polygon(&mut self, polygon: Polygon) -> &mut Self {
        self.insert(Element::Polygon(polygon))
    }

    /// Unit cube centered on the origin.
    pub fn cube(&mut self, solid: bool) -> &mut Self {
        self.insert(Element::Cube(Cube::unit(solid)))
    }

    pub fn bezier_curve(&mut self, curve: BezierCurve) -> &mut Self {
        self.insert(Element::BezierCurve(curve))
    }

    pub fn bezier_surface(&mut self, surface: BezierSurface) -> &mut Self {
        self.insert(Element::BezierSurface(surface))
    }

    /// Adds a one-sided unit sphere tessellated `levels` times.
    pub fn sphere(&mut self, levels: u32) -> Result<&mut Self> {
        for mut face in triangle::sphere(levels)? {
            face.one_sided = true;
            self.polygon(face);
        }
        Ok(self)
    }

    // ============ Transforms ============

    pub fn identity(&mut self) -> &mut Self {
        self.insert(Element::Identity)
    }

    pub fn matrix(&mut self, m: Mat4) -> &mut Self {
        self.insert(Element::Matrix(m))
    }

    pub fn translate2d(&mut self, tx: f32, ty: f32) -> &mut Self {
        self.matrix(Mat4::translation_2d(tx, ty))
    }

    pub fn scale2d(&mut self, sx: f32, sy: f32) -> &mut Self {
        self.matrix(Mat4::scaling_2d(sx, sy))
    }

    /// Rotation about the z axis, counter-clockwise in radians.
    pub fn rotate_z(&mut self, angle: f32) -> &mut Self {
        self.matrix(Mat4::rotation_z(angle))
    }

    pub fn shear2d(&mut self, shx: f32, shy: f32) -> &mut Self {
        self.matrix(Mat4::shear_2d(shx, shy))
    }

    pub fn translate(&mut self, tx: f32, ty: f32, tz: f32) -> &mut Self {
        self.matrix(Mat4::translation(tx, ty, tz))
    }

    pub fn scale(&mut self, sx: f32, sy: f32, sz: f32) -> &mut Self {
        self.matrix(Mat4::scaling(sx, sy, sz))
    }

    pub fn rotate_x(&mut self, angle: f32) -> &mut Self {
        self.matrix(Mat4::rotation_x(angle))
    }

    pub fn rotate_y(&mut self, angle: f32) -> &mut Self {
        self.matrix(Mat4::rotation_y(angle))
    }

    /// Rotation onto the orthonormal basis `(u, v, w)`.
    pub fn rotate_xyz(&mut self, u: Vec3, v: Vec3, w: Vec3) -> &mut Self {
        self.matrix(Mat4::rotation_axes(u, v, w))
    }

    // ============ Draw state ============

    pub fn color(&mut self, color: Color) -> &mut Self {
        self.insert(Element::Color(color))
    }

    pub fn body_color(&mut self, color: Color) -> &mut Self {
        self.insert(Element::BodyColor(color))
    }

    pub fn surface_color(&mut self, color: Color) -> &mut Self {
        self.insert(Element::SurfaceColor(color))
    }

    pub fn surface_coeff(&mut self, coeff: f32) -> &mut Self {
        self.insert(Element::SurfaceCoeff(coeff))
    }

    /// Adds a reference to a shared sub-module.
    pub fn module(&mut self, module: Rc<Module>) -> &mut Self {
        self.insert(Element::Module(module))
    }

    // ============ Loading ============

    /// Appends one polygon per face of a Wavefront OBJ file and returns the
    /// number of faces added. Vertex normals are attached when the file has
    /// them.
    pub fn load_obj<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        let options = tobj::LoadOptions {
            single_index: true,
            triangulate: false,
            ..Default::default()
        };
        let (models, _materials) = tobj::load_obj(path, &options)?;

        let mut faces = 0;
        for model in &models {
            let mesh = &model.mesh;
            let positions: Vec<Point> = mesh
                .positions
                .chunks_exact(3)
                .map(|c| Point::point(c[0], c[1], c[2]))
                .collect();
            let normals: Vec<Vec3> = mesh
                .normals
                .chunks_exact(3)
                .map(|c| Vec3::new(c[0], c[1], c[2]))
                .collect();

            // Without arities every face is a triangle.
            let arities: Vec<usize> = if mesh.face_arities.is_empty() {
                vec![3; mesh.indices.len() / 3]
            } else {
                mesh.face_arities.iter().map(|&a| a as usize).collect()
            };

            let mut start = 0;
            for arity in arities {
                let Some(face) = mesh.indices.get(start..start + arity) else {
                    break;
                };
                start += arity;

                let vertices: Option<Vec<Point>> =
                    face.iter().map(|&i| positions.get(i as usize).copied()).collect();
                let Some(vertices) = vertices else {
                    log::warn!("skipping face with an out-of-range index in {}", model.name);
                    continue;
                };

                let mut polygon = Polygon::new(vertices);
                if !normals.is_empty() && normals.len() == positions.len() {
                    polygon.set_normals(face.iter().map(|&i| normals[i as usize]).collect())?;
                }
                self.polygon(polygon);
                faces += 1;
            }
        }

        log::debug!("loaded {} faces from {}", faces, path.display());
        Ok(faces)
    }

    // ============ Traversal ============

    /// Draws the module into `image`.
    ///
    /// `vtm` maps world space to the screen and `gtm` places this module in
    /// the world. `ds` is the starting draw state; it is copied, so the
    /// caller's state is never modified. `lighting` is read by the lit shading
    /// modes only.
    ///
    /// The first fill or subdivision error aborts the traversal. Pixels drawn
    /// by earlier elements stay in the image.
    pub fn draw(
        &self,
        vtm: &Mat4,
        gtm: &Mat4,
        ds: &DrawState,
        lighting: &Lighting,
        image: &mut Image,
    ) -> Result<()> {
        let mut ds = ds.clone();
        let mut ltm = Mat4::identity();

        for element in &self.elements {
            log::trace!("drawing {}", element.kind());
            let world = *gtm * ltm;
            let full = *vtm * world;

            match element {
                Element::Point(p) => {
                    let s = (full * *p).project();
                    plot(image, s.x.round() as i32, s.y.round() as i32, ds.color);
                }
                Element::Line(line) => {
                    let mut s = line.transform(&full).project();
                    s.z_buffer &= ds.z_buffer;
                    s.draw(image, ds.color);
                }
                Element::Polyline(polyline) => {
                    let mut s = polyline.transform(&full).project();
                    s.z_buffer &= ds.z_buffer;
                    s.draw(image, ds.color);
                }
                Element::Polygon(polygon) => {
                    draw_polygon(polygon, &world, vtm, &ds, lighting, image)?
                }
                Element::Cube(cube) => {
                    for side in cube.sides() {
                        if cube.solid {
                            draw_polygon(side, &world, vtm, &ds, lighting, image)?;
                        } else {
                            side.transform(&full).project().draw(image, ds.color);
                        }
                    }
                }
                Element::BezierCurve(curve) => {
                    let mut s = curve.transform(&full).project();
                    s.z_buffer &= ds.z_buffer;
                    s.draw(image, ds.color, ds.flatness_threshold, ds.curve_divisions)?;
                }
                Element::BezierSurface(surface) if is_lit(ds.shade) => {
                    // Lit patches need world-space triangles, so flatness is not tested.
                    for tri in surface.to_polygons(ds.surface_divisions) {
                        draw_polygon(&tri, &world, vtm, &ds, lighting, image)?;
                    }
                }
                Element::BezierSurface(surface) => {
                    let s = surface.transform(&full).project();
                    for leaf in s.leaves(ds.flatness_threshold, ds.surface_divisions)? {
                        for mut tri in leaf.triangles() {
                            tri.z_buffer &= ds.z_buffer;
                            paint(&tri, &ds, image)?;
                        }
                    }
                }
                Element::Identity => ltm = Mat4::identity(),
                Element::Matrix(m) => ltm = *m * ltm,
                Element::Color(c) => ds.color = *c,
                Element::BodyColor(c) => ds.body_color = *c,
                Element::SurfaceColor(c) => ds.surface_color = *c,
                Element::SurfaceCoeff(s) => ds.surface_coeff = *s,
                Element::Module(child) => child.draw(vtm, &world, &ds, lighting, image)?,
            }
        }
        Ok(())
    }
}

fn is_lit(shade: ShadeMode) -> bool {
    matches!(shade, ShadeMode::Flat | ShadeMode::Gouraud)
}

/// Culls and lights in world space, then projects and paints.
fn draw_polygon(
    polygon: &Polygon,
    world: &Mat4,
    vtm: &Mat4,
    ds: &DrawState,
    lighting: &Lighting,
    image: &mut Image,
) -> Result<()> {
    let mut placed = polygon.transform(world);
    if placed.one_sided && !placed.faces(ds.viewer) {
        log::debug!("culled back-facing polygon with {} vertices", polygon.len());
        return Ok(());
    }

    match ds.shade {
        ShadeMode::Flat => {
            let color = flat_color(&placed, ds, lighting);
            to_screen(&placed, vtm, ds).draw_fill(image, color)
        }
        ShadeMode::Gouraud => {
            let colors = vertex_colors(&placed, ds, lighting);
            placed.set_colors(colors)?;
            to_screen(&placed, vtm, ds).draw_fill_shaded(image, ds.color)
        }
        _ => paint(&to_screen(&placed, vtm, ds), ds, image),
    }
}

fn to_screen(placed: &Polygon, vtm: &Mat4, ds: &DrawState) -> Polygon {
    let mut screen = placed.transform(vtm).project();
    screen.z_buffer &= ds.z_buffer;
    screen
}

/// Normals to light a world-space polygon with: its own per-vertex normals,
/// or its surface normal at every vertex.
fn lighting_normals(placed: &Polygon) -> Vec<Vec3> {
    if placed.normals().is_empty() {
        let normal = placed.surface_normal().unwrap_or(Vec3::Z).normalize();
        vec![normal; placed.len()]
    } else {
        placed.normals().to_vec()
    }
}

fn vertex_colors(placed: &Polygon, ds: &DrawState, lighting: &Lighting) -> Vec<Color> {
    let material = ds.material();
    placed
        .vertices()
        .iter()
        .zip(lighting_normals(placed))
        .map(|(&v, n)| lighting.shade(n, v, ds.viewer, &material, placed.one_sided))
        .collect()
}

/// Lights the mean vertex with the mean normal.
fn flat_color(placed: &Polygon, ds: &DrawState, lighting: &Lighting) -> Color {
    let count = placed.len().max(1) as f32;
    let center = placed
        .vertices()
        .iter()
        .fold(Vec3::ZERO, |sum, v| sum + v.homogenize().to_vec3())
        / count;
    let normal = lighting_normals(placed)
        .into_iter()
        .fold(Vec3::ZERO, |sum, n| sum + n);
    lighting.shade(
        normal,
        Point::from_vec3(center, 1.0),
        ds.viewer,
        &ds.material(),
        placed.one_sided,
    )
}

/// Draws a screen-space polygon the way the draw state asks for.
fn paint(screen: &Polygon, ds: &DrawState, image: &mut Image) -> Result<()> {
    match (ds.shade, ds.fill) {
        (ShadeMode::Frame, _) => {
            screen.draw(image, ds.color);
            Ok(())
        }
        (ShadeMode::Vertex, _) if screen.has_colors() => screen.draw_fill_shaded(image, ds.color),
        (_, FillMode::Solid) => screen.draw_fill(image, ds.color),
        (_, FillMode::HorizontalGradient) => {
            screen.draw_fill_gradient(image, ds.color, ds.body_color, GradientDirection::Horizontal)
        }
        (_, FillMode::VerticalGradient) => {
            screen.draw_fill_gradient(image, ds.color, ds.body_color, GradientDirection::Vertical)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BLACK, BLUE, GREEN, RED, WHITE};
    use crate::light::Light;
    use crate::scene::view::View3D;
    use approx::assert_relative_eq;

    fn square(size: f32) -> Polygon {
        Polygon::from_xy(&[(0.0, 0.0), (size, 0.0), (size, size), (0.0, size)])
    }

    fn render(module: &Module, ds: &DrawState, rows: usize, cols: usize) -> Image {
        let mut img = Image::new(rows, cols).unwrap();
        module
            .draw(&Mat4::identity(), &Mat4::identity(), ds, &Lighting::new(), &mut img)
            .unwrap();
        img
    }

    fn render_lit(
        module: &Module,
        ds: &DrawState,
        lighting: &Lighting,
        rows: usize,
        cols: usize,
    ) -> Image {
        let mut img = Image::new(rows, cols).unwrap();
        module
            .draw(&Mat4::identity(), &Mat4::identity(), ds, lighting, &mut img)
            .unwrap();
        img
    }

    /// Matte shading seen from far above the xy-plane.
    fn matte_from_above(shade: ShadeMode) -> DrawState {
        DrawState {
            shade,
            surface_color: BLACK,
            viewer: Point::point(10.0, 10.0, 1000.0),
            ..DrawState::default()
        }
    }

    #[test]
    fn shared_module_is_instanced_without_leaking_state() {
        let mut child = Module::new();
        child.color(RED).polygon(square(10.0));
        let child = Rc::new(child);

        let mut parent = Module::new();
        parent
            .color(BLUE)
            .translate2d(5.0, 5.0)
            .module(child.clone())
            .translate2d(20.0, 0.0)
            .module(child.clone())
            .translate2d(0.0, 20.0)
            .polygon(square(4.0));

        let img = render(&parent, &DrawState::default(), 40, 50);
        assert_eq!(img.color(10, 10), Some(RED));
        assert_eq!(img.color(10, 30), Some(RED));
        assert_eq!(img.color(10, 20), Some(BLACK));
        // Placed by the parent's own accumulated transform, in the parent's color.
        assert_eq!(img.color(27, 27), Some(BLUE));
        assert_eq!(img.color(24, 27), Some(BLACK));
        assert_eq!(img.count_not(BLACK), 100 + 100 + 16);
        assert_eq!(Rc::strong_count(&child), 3);
    }

    #[test]
    fn later_matrices_apply_after_earlier_ones() {
        let mut m = Module::new();
        m.scale2d(2.0, 2.0).translate2d(10.0, 0.0).point(Point::point2d(1.0, 1.0));
        let img = render(&m, &DrawState::default(), 20, 20);
        assert_eq!(img.color(2, 12), Some(WHITE));
        assert_eq!(img.count_not(BLACK), 1);
    }

    #[test]
    fn identity_resets_the_local_transform() {
        let mut m = Module::new();
        m.translate2d(50.0, 50.0).identity().polygon(square(2.0));
        let img = render(&m, &DrawState::default(), 10, 10);
        assert_eq!(img.count_not(BLACK), 4);
        assert_eq!(img.color(1, 1), Some(WHITE));
    }

    #[test]
    fn caller_draw_state_is_untouched() {
        let mut m = Module::new();
        m.color(GREEN).body_color(RED).surface_coeff(3.0);
        let ds = DrawState::default();
        render(&m, &ds, 4, 4);
        assert_eq!(ds, DrawState::default());
    }

    #[test]
    fn one_sided_polygon_facing_away_is_culled() {
        let mut front = square(4.0);
        front.one_sided = true;
        // Clockwise: normal along -z.
        let mut back = Polygon::from_xy(&[(10.0, 0.0), (10.0, 4.0), (14.0, 4.0), (14.0, 0.0)]);
        back.one_sided = true;

        let mut m = Module::new();
        m.polygon(front).polygon(back);
        let ds = DrawState {
            viewer: Point::point(0.0, 0.0, 5.0),
            ..DrawState::default()
        };

        let img = render(&m, &ds, 10, 20);
        assert_eq!(img.color(2, 2), Some(WHITE));
        assert_eq!(img.color(2, 12), Some(BLACK));
    }

    #[test]
    fn frame_shading_draws_outlines() {
        let mut m = Module::new();
        m.translate2d(10.0, 10.0).polygon(square(10.0));
        let ds = DrawState {
            shade: ShadeMode::Frame,
            ..DrawState::default()
        };
        let img = render(&m, &ds, 30, 30);
        assert_eq!(img.count_not(BLACK), 40);
        assert_eq!(img.color(15, 15), Some(BLACK));
    }

    #[test]
    fn gradient_fill_blends_color_to_body_color() {
        let mut m = Module::new();
        m.color(BLACK).body_color(WHITE).polygon(square(10.0));
        let ds = DrawState {
            fill: FillMode::HorizontalGradient,
            ..DrawState::default()
        };
        let img = render(&m, &ds, 10, 10);
        assert!(img.color(5, 9).unwrap().r > img.color(5, 1).unwrap().r);
    }

    #[test]
    fn vertex_shading_uses_polygon_colors() {
        let mut tri = Polygon::from_xy(&[(0.0, 0.0), (20.0, 0.0), (0.0, 20.0)]);
        tri.set_colors(vec![RED, RED, RED]).unwrap();
        let mut m = Module::new();
        m.color(BLUE).polygon(tri).polygon(Polygon::from_xy(&[
            (25.0, 0.0),
            (30.0, 0.0),
            (30.0, 5.0),
        ]));
        let ds = DrawState {
            shade: ShadeMode::Vertex,
            ..DrawState::default()
        };
        let img = render(&m, &ds, 20, 30);
        assert_eq!(img.color(2, 2), Some(RED));
        assert_eq!(img.color(1, 28), Some(BLUE));
    }

    #[test]
    fn cube_through_a_perspective_view() {
        let view = View3D {
            vrp: Point::point(0.0, 0.0, -3.0),
            vpn: Vec3::Z,
            vup: Vec3::Y,
            d: 2.0,
            du: 2.0,
            dv: 2.0,
            f: 0.0,
            b: 10.0,
            screen_x: 64,
            screen_y: 64,
        };
        let ds = DrawState {
            viewer: view.eye(),
            ..DrawState::default()
        };

        let count = |solid: bool| {
            let mut m = Module::new();
            m.rotate_y(0.5).rotate_x(0.3).scale(2.0, 2.0, 2.0).cube(solid);
            let mut img = Image::new(64, 64).unwrap();
            m.draw(&view.matrix(), &Mat4::identity(), &ds, &Lighting::new(), &mut img)
                .unwrap();
            img.count_not(BLACK)
        };
        let solid = count(true);
        let wire = count(false);
        assert!(wire > 0);
        assert!(solid > wire);
    }

    #[test]
    fn frame_outline_with_far_off_vertices_is_clipped() {
        let mut m = Module::new();
        m.polygon(Polygon::from_xy(&[(-3e9, 0.0), (3e9, 0.0), (0.0, 5.0)]));
        let ds = DrawState {
            shade: ShadeMode::Frame,
            ..DrawState::default()
        };
        let img = render(&m, &ds, 10, 10);
        assert!((0..10).all(|col| img.color(0, col) == Some(WHITE)));
        assert!(img.count_not(BLACK) < 100);
    }

    #[test]
    fn gouraud_interpolates_lit_vertex_normals() {
        let mut panel = square(20.0);
        let tilted = Vec3::new(1.0, 0.0, 1.0).normalize();
        panel.set_normals(vec![Vec3::Z, tilted, tilted, Vec3::Z]).unwrap();
        let mut m = Module::new();
        m.body_color(RED).polygon(panel);

        let mut lighting = Lighting::new();
        lighting.add(Light::directional(WHITE, -Vec3::Z));
        let img = render_lit(&m, &matte_from_above(ShadeMode::Gouraud), &lighting, 20, 20);

        let left = img.color(10, 0).unwrap();
        let right = img.color(10, 19).unwrap();
        assert!(left.r > 0.95, "left {left:?}");
        assert!(right.r < 0.8, "right {right:?}");
        assert_eq!(left.g, 0.0);
    }

    #[test]
    fn flat_shading_paints_one_lit_color() {
        let mut m = Module::new();
        m.body_color(WHITE).polygon(square(10.0));

        let mut lighting = Lighting::new();
        lighting.add(Light::directional(WHITE, Vec3::new(0.0, -1.0, -1.0)));
        let img = render_lit(&m, &matte_from_above(ShadeMode::Flat), &lighting, 10, 10);

        let c = img.color(0, 0).unwrap();
        assert_relative_eq!(c.r, std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-4);
        assert_eq!(img.color(9, 9), Some(c));
        assert_eq!(img.count_not(c), 0);
    }

    #[test]
    fn lit_modes_without_lights_are_black() {
        let mut m = Module::new();
        m.color(RED).body_color(RED).polygon(square(4.0));
        let img = render_lit(&m, &matte_from_above(ShadeMode::Flat), &Lighting::new(), 4, 4);
        assert_eq!(img.count_not(BLACK), 0);
    }

    #[test]
    fn lit_bezier_surface_uses_body_color() {
        let mut points = [Point::point(0.0, 0.0, 0.0); 16];
        for (i, p) in points.iter_mut().enumerate() {
            *p = Point::point2d((i % 4) as f32 * 10.0, (i / 4) as f32 * 10.0);
        }
        let mut m = Module::new();
        m.body_color(GREEN).bezier_surface(BezierSurface::new(points));

        let mut lighting = Lighting::new();
        lighting.add(Light::directional(WHITE, -Vec3::Z));
        let img = render_lit(&m, &matte_from_above(ShadeMode::Gouraud), &lighting, 30, 30);

        let c = img.color(10, 20).unwrap();
        assert_relative_eq!(c.g, 1.0, epsilon = 1e-4);
        assert_relative_eq!(c.r, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn lit_cube_faces_get_different_shades() {
        let view = View3D {
            vrp: Point::point(0.0, 0.0, -3.0),
            vpn: Vec3::Z,
            vup: Vec3::Y,
            d: 2.0,
            du: 2.0,
            dv: 2.0,
            f: 0.0,
            b: 10.0,
            screen_x: 64,
            screen_y: 64,
        };
        let ds = DrawState {
            shade: ShadeMode::Flat,
            viewer: view.eye(),
            ..DrawState::default()
        };
        let mut lighting = Lighting::new();
        lighting.add(Light::point(WHITE, Point::point(3.0, 4.0, -5.0)));

        let mut m = Module::new();
        m.rotate_y(0.5).rotate_x(0.3).scale(2.0, 2.0, 2.0).cube(true);
        let mut img = Image::new(64, 64).unwrap();
        m.draw(&view.matrix(), &Mat4::identity(), &ds, &lighting, &mut img)
            .unwrap();

        let mut shades = std::collections::HashSet::new();
        for row in 0..64 {
            for col in 0..64 {
                if let Some(c) = img.color(row, col).filter(|&c| c != BLACK) {
                    shades.insert(c.to_rgb8());
                }
            }
        }
        assert!(shades.len() >= 2, "{shades:?}");
    }

    #[test]
    fn sphere_adds_one_sided_triangles() {
        let mut m = Module::new();
        m.sphere(1).unwrap();
        assert_eq!(m.len(), 32);
        assert!(m.elements().iter().all(|e| matches!(e, Element::Polygon(p) if p.one_sided)));
    }

    #[test]
    fn bezier_curve_element_uses_draw_state_budget() {
        let curve = BezierCurve::new([
            Point::point2d(0.0, 0.0),
            Point::point2d(10.0, 30.0),
            Point::point2d(20.0, 30.0),
            Point::point2d(30.0, 0.0),
        ]);
        let mut m = Module::new();
        m.color(GREEN).bezier_curve(curve);
        let img = render(&m, &DrawState::default(), 40, 40);
        assert_eq!(img.color(0, 0), Some(GREEN));
        assert_eq!(img.color(0, 30), Some(GREEN));
    }

    #[test]
    fn clear_empties_the_module() {
        let mut m = Module::new();
        m.cube(true).color(RED);
        assert_eq!(m.len(), 2);
        m.clear();
        assert!(m.is_empty());
    }

    #[test]
    fn loads_mixed_faces_from_obj() {
        let path = std::env::temp_dir().join(format!("scangraph-mesh-{}.obj", std::process::id()));
        std::fs::write(
            &path,
            "v 0 0 0\nv 10 0 0\nv 10 10 0\nv 0 10 0\nf 1 2 3 4\nf 1 2 3\n",
        )
        .unwrap();
        let mut m = Module::new();
        let faces = m.load_obj(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(faces, 2);
        let sizes: Vec<usize> = m
            .elements()
            .iter()
            .filter_map(|e| match e {
                Element::Polygon(p) => Some(p.len()),
                _ => None,
            })
            .collect();
        assert_eq!(sizes, vec![4, 3]);
    }

    #[test]
    fn missing_obj_is_an_error() {
        let mut m = Module::new();
        assert!(m.load_obj("/nonexistent/scangraph.obj").is_err());
    }
}
