//! Passive geometric primitives drawn by the scene graph.

pub mod cube;
pub mod line;
pub mod polygon;

pub use cube::Cube;
pub use line::{Line, Polyline};
pub use polygon::Polygon;
