//! A CPU scanline rasterizer driven by a hierarchical scene graph.
//!
//! Scenes are built from [`Module`]s: ordered lists of geometry, transforms
//! and draw-state changes that may share sub-modules. Traversal composes the
//! transforms, projects each primitive to the screen, and fills it into an
//! [`Image`] with an edge-table scanline fill. Bezier curves and patches are
//! subdivided down to flat pieces before they are drawn. Polygons can also be
//! shaded under a [`Lighting`] set.
//!
//! # Quick Start
//!
//! ```ignore
//! use scangraph::prelude::*;
//!
//! let mut image = Image::new(100, 100)?;
//! let mut scene = Module::new();
//! scene
//!     .color(colors::RED)
//!     .polygon(Polygon::from_xy(&[(10.0, 10.0), (20.0, 10.0), (20.0, 20.0), (10.0, 20.0)]));
//! let lighting = Lighting::new();
//! scene.draw(&Mat4::identity(), &Mat4::identity(), &DrawState::default(), &lighting, &mut image)?;
//! image.write_ppm("square.ppm")?;
//! ```

pub mod colors;
pub mod config;
pub mod error;
pub mod geometry;
pub mod light;
pub mod math;
pub mod physics;
pub mod render;
pub mod scene;
pub mod subdivide;

// Re-export commonly needed types at crate root for convenience
pub use config::RenderConfig;
pub use error::{RenderError, Result};
pub use geometry::{Cube, Line, Polygon, Polyline};
pub use light::{Light, Lighting, Material};
pub use render::{Image, Paint, Span};
pub use scene::{DrawState, Element, Module, View2D, View3D};

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use scangraph::prelude::*;
/// ```
pub mod prelude {
    // Color & config
    pub use crate::colors::{self, Color};
    pub use crate::config::RenderConfig;
    pub use crate::error::{RenderError, Result};

    // Math
    pub use crate::math::mat4::Mat4;
    pub use crate::math::quat::Quaternion;
    pub use crate::math::vec3::Vec3;
    pub use crate::math::vec4::{Point, Vec4};

    // Geometry
    pub use crate::geometry::{Cube, Line, Polygon, Polyline};
    pub use crate::subdivide::{BezierCurve, BezierSurface};

    // Rendering
    pub use crate::light::{Light, Lighting, Material};
    pub use crate::render::{fill_polygon, scan_spans, GradientDirection, Image, Paint};

    // Scene
    pub use crate::scene::{DrawState, Element, FillMode, Module, ShadeMode, View2D, View3D};

    // Physics
    pub use crate::physics::{Force, ForceFrame, Rigidbody, GRAVITY};
}
