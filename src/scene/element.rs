//! The items a module is made of.

use std::rc::Rc;

use super::module::Module;
use crate::colors::Color;
use crate::geometry::{Cube, Line, Polygon, Polyline};
use crate::math::mat4::Mat4;
use crate::math::vec4::Point;
use crate::subdivide::{BezierCurve, BezierSurface};

/// One entry in a [`Module`].
///
/// Geometry variants own their payload. `Module` holds a shared handle: the
/// same sub-module may appear under several parents, and each appearance is
/// drawn with the transform accumulated at that point.
#[derive(Debug, Clone)]
pub enum Element {
    Point(Point),
    Line(Line),
    Polyline(Polyline),
    Polygon(Polygon),
    Cube(Cube),
    BezierCurve(BezierCurve),
    BezierSurface(BezierSurface),
    /// Resets the local transform.
    Identity,
    /// Composed onto the local transform; applies after earlier matrices.
    Matrix(Mat4),
    Color(Color),
    BodyColor(Color),
    SurfaceColor(Color),
    SurfaceCoeff(f32),
    Module(Rc<Module>),
}

impl Element {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Element::Point(_) => "point",
            Element::Line(_) => "line",
            Element::Polyline(_) => "polyline",
            Element::Polygon(_) => "polygon",
            Element::Cube(_) => "cube",
            Element::BezierCurve(_) => "bezier curve",
            Element::BezierSurface(_) => "bezier surface",
            Element::Identity => "identity",
            Element::Matrix(_) => "matrix",
            Element::Color(_) => "color",
            Element::BodyColor(_) => "body color",
            Element::SurfaceColor(_) => "surface color",
            Element::SurfaceCoeff(_) => "surface coefficient",
            Element::Module(_) => "module",
        }
    }
}

impl From<Polygon> for Element {
    fn from(polygon: Polygon) -> Self {
        Element::Polygon(polygon)
    }
}

impl From<Line> for Element {
    fn from(line: Line) -> Self {
        Element::Line(line)
    }
}

impl From<Cube> for Element {
    fn from(cube: Cube) -> Self {
        Element::Cube(cube)
    }
}

impl From<Mat4> for Element {
    fn from(m: Mat4) -> Self {
        Element::Matrix(m)
    }
}

impl From<Rc<Module>> for Element {
    fn from(module: Rc<Module>) -> Self {
        Element::Module(module)
    }
}
