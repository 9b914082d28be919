//! Pixel-level drawing: the framebuffer, lines and scanline polygon fill.

pub mod image;
pub mod line;
pub mod scanline;

pub use self::image::{FPixel, Image};
pub use self::line::{draw_line, draw_line_depth, draw_segment, draw_segment_depth, plot};
pub use self::scanline::{fill_polygon, scan_spans, GradientDirection, Paint, Span};
