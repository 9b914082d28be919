//! Error types for rendering.
//!
//! Invariant violations inside the fill engine and the subdivision engine abort
//! the draw call that hit them and surface here. Degenerate or off-screen
//! geometry is not an error; it simply draws nothing.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    /// The active edge list held an odd number of edges on a scanline.
    #[error("malformed polygon topology: {active} active edges on row {row}")]
    MalformedTopology { row: i32, active: usize },

    /// A subdivision bounding box had a NaN or negative extent.
    #[error("invalid bounding box {width} x {height}")]
    InvalidBounds { width: f32, height: f32 },

    /// A per-vertex attribute list does not have one entry per vertex.
    #[error("{attribute} list has {found} entries, polygon has {expected} vertices")]
    VertexAttributeMismatch {
        attribute: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("image dimensions {rows} x {cols} are not usable")]
    DegenerateImage { rows: usize, cols: usize },

    #[error("failed to allocate {bytes} bytes")]
    Allocation { bytes: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("OBJ load error: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;
