//! Scanline polygon fill with an edge table and an active edge list.
//!
//! Arbitrary simple polygons (convex or concave) are filled one image row at a
//! time. Every non-horizontal edge becomes an [`Edge`] record; the records are
//! bucketed by their first scanline and activated as the sweep reaches them.
//!
//! # Coverage Rule
//!
//! A pixel row `r` is sampled at its center `y = r + 0.5`. An edge running from
//! `y0` to `y1` (top to bottom) crosses the rows whose centers lie in the
//! half-open range `[y0, y1)`:
//!
//! ```text
//! y_start = scan_row(y0)        first row whose center is >= y0
//! y_end   = scan_row(y1) - 1    last row whose center is <  y1
//! ```
//!
//! where `scan_row` rounds to the nearest row boundary, with an exact `.5`
//! rounding down. Within a row, each pair of consecutive active edges `(l, r)`
//! covers the columns `[round(l.x), round(r.x))`. Both rules are half-open, so
//! polygons that share an edge neither overlap nor leave a gap.
//!
//! # Sweep
//!
//! ```text
//!   edge table (sorted by y_start)      active edge list (sorted by x)
//!   ┌──────┬──────┬──────┐              ┌──────┬──────┐
//!   │ e0   │ e1   │ e2   │ ── y_start ─>│ e1   │ e0   │ ── pairs ─> spans
//!   └──────┴──────┴──────┘   == row     └──────┴──────┘
//! ```
//!
//! 1. Move every edge whose `y_start` is the current row into the active list.
//! 2. Emit a span for each pair of active edges.
//! 3. Retire edges whose `y_end` is the current row and advance the rest by
//!    one row, then re-sort the active list by x.
//! 4. When the active list empties, jump to the next pending edge.
//!
//! Edges also carry `1/z` and a color, stepped alongside x, for depth testing
//! and Gouraud shading.

use super::image::Image;
use crate::colors::{self, Color};
use crate::error::{RenderError, Result};
use crate::geometry::polygon::Polygon;

/// Axis along which a gradient fill blends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientDirection {
    /// Left to right across the polygon's x extent.
    Horizontal,
    /// Top to bottom, one step per emitted span.
    Vertical,
}

/// How filled pixels are colored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Solid(Color),
    Gradient {
        from: Color,
        to: Color,
        direction: GradientDirection,
    },
    /// Interpolate per-vertex colors; `fallback` is used when the polygon has
    /// none.
    Vertex { fallback: Color },
}

/// Interpolated attributes where a span meets one of its edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpanEnd {
    pub x: f32,
    pub inv_z: f32,
    pub color: Color,
}

/// The covered part of one image row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub row: i32,
    /// First covered column.
    pub start: i32,
    /// One past the last covered column.
    pub end: i32,
    pub left: SpanEnd,
    pub right: SpanEnd,
}

impl Span {
    pub fn width(&self) -> i32 {
        self.end - self.start
    }

    /// `1/z` and color at the center of column `col`.
    fn attrs_at(&self, col: i32) -> (f32, Color) {
        let width = self.right.x - self.left.x;
        let t = if width > 0.0 {
            ((col as f32 + 0.5 - self.left.x) / width).clamp(0.0, 1.0)
        } else {
            0.0
        };
        (
            self.left.inv_z + (self.right.inv_z - self.left.inv_z) * t,
            self.left.color.lerp(self.right.color, t),
        )
    }
}

/// Row a y coordinate rounds to; an exact `.5` fraction rounds down.
#[inline]
pub fn scan_row(y: f32) -> i32 {
    let floor = y.floor();
    if y - floor > 0.5 {
        floor as i32 + 1
    } else {
        floor as i32
    }
}

#[derive(Debug, Clone, Copy)]
struct Vertex {
    x: f32,
    y: f32,
    inv_z: f32,
    color: Color,
}

/// One polygon edge, oriented top to bottom, positioned at its current row.
#[derive(Debug, Clone, Copy)]
struct Edge {
    x1: f32,
    y_start: i32,
    y_end: i32,
    x_intersect: f32,
    dx_per_scan: f32,
    inv_z: f32,
    d_inv_z: f32,
    color: Color,
    d_color: Color,
}

impl Edge {
    /// Builds the record for the edge `a -> b`, or `None` if it crosses no
    /// row center inside the image.
    fn new(a: Vertex, b: Vertex, rows: usize) -> Option<Self> {
        if scan_row(a.y) == scan_row(b.y) {
            return None;
        }
        let (top, bottom) = if a.y < b.y { (a, b) } else { (b, a) };
        if top.y > rows as f32 || bottom.y < 0.0 {
            return None;
        }

        let dy = bottom.y - top.y;
        let dx_per_scan = (bottom.x - top.x) / dy;
        let d_inv_z = (bottom.inv_z - top.inv_z) / dy;
        let d_color = (bottom.color - top.color) * (1.0 / dy);

        let mut start = top;
        let mut y_start = scan_row(top.y);
        let y_end = (scan_row(bottom.y) - 1).min(rows as i32 - 1);

        // Clip to the top of the image.
        if start.y < 0.0 {
            let shift = -start.y;
            start.x += shift * dx_per_scan;
            start.inv_z += shift * d_inv_z;
            start.color = start.color + d_color * shift;
            start.y = 0.0;
            y_start = 0;
        }
        if y_end < y_start {
            return None;
        }

        let offset = y_start as f32 + 0.5 - start.y;
        let mut edge = Self {
            x1: bottom.x,
            y_start,
            y_end,
            x_intersect: start.x + offset * dx_per_scan,
            dx_per_scan,
            inv_z: start.inv_z + offset * d_inv_z,
            d_inv_z,
            color: start.color + d_color * offset,
            d_color,
        };
        edge.clamp_to_end();
        Some(edge)
    }

    /// Steps the edge down one row.
    fn advance(&mut self) {
        self.x_intersect += self.dx_per_scan;
        self.inv_z += self.d_inv_z;
        self.color = self.color + self.d_color;
        self.clamp_to_end();
    }

    /// Rounding can carry x past the bottom endpoint on the last rows.
    fn clamp_to_end(&mut self) {
        if (self.dx_per_scan > 0.0 && self.x_intersect > self.x1)
            || (self.dx_per_scan < 0.0 && self.x_intersect < self.x1)
        {
            self.x_intersect = self.x1;
        }
    }

    fn span_end(&self) -> SpanEnd {
        SpanEnd {
            x: self.x_intersect,
            inv_z: self.inv_z,
            color: self.color,
        }
    }
}

fn vertices_of(polygon: &Polygon) -> Vec<Vertex> {
    let depth = polygon.uses_depth();
    let colors = polygon.colors();
    polygon
        .vertices()
        .iter()
        .enumerate()
        .map(|(i, p)| Vertex {
            x: p.x,
            y: p.y,
            inv_z: if depth { 1.0 / p.z } else { 0.0 },
            color: colors.get(i).copied().unwrap_or(colors::BLACK),
        })
        .collect()
}

/// Builds the edge table, stably sorted by first row.
fn edge_table(vertices: &[Vertex], rows: usize) -> Vec<Edge> {
    let n = vertices.len();
    let mut edges: Vec<Edge> = (0..n)
        .filter_map(|i| Edge::new(vertices[i], vertices[(i + 1) % n], rows))
        .collect();
    edges.sort_by_key(|e| e.y_start);
    edges
}

/// Inserts after any active edge with the same x.
fn activate(active: &mut Vec<Edge>, edge: Edge) {
    let at = active.partition_point(|e| e.x_intersect <= edge.x_intersect);
    active.insert(at, edge);
}

/// Pairs up the active edges of `row` into spans clipped to `[0, cols)`.
fn emit_spans(row: i32, active: &[Edge], cols: usize, spans: &mut Vec<Span>) -> Result<()> {
    if active.len() % 2 != 0 {
        log::error!(
            "scanline {} has {} active edges; polygon is not closed",
            row,
            active.len()
        );
        return Err(RenderError::MalformedTopology {
            row,
            active: active.len(),
        });
    }

    for pair in active.chunks_exact(2) {
        let (left, right) = (&pair[0], &pair[1]);
        let start = (left.x_intersect.round() as i32).max(0);
        let end = (right.x_intersect.round() as i32).min(cols as i32);
        if start >= end {
            continue;
        }
        spans.push(Span {
            row,
            start,
            end,
            left: left.span_end(),
            right: right.span_end(),
        });
    }
    Ok(())
}

/// Computes the spans covering `polygon` in a `rows x cols` image, top row
/// first.
///
/// Polygons with fewer than three vertices, non-finite coordinates, or no
/// edge crossing a row center inside the image produce no spans. An odd
/// number of active edges on any row is reported as
/// [`RenderError::MalformedTopology`].
pub fn scan_spans(polygon: &Polygon, rows: usize, cols: usize) -> Result<Vec<Span>> {
    let mut spans = Vec::new();
    if polygon.len() < 3 || rows == 0 || cols == 0 {
        return Ok(spans);
    }
    if polygon
        .vertices()
        .iter()
        .any(|p| !p.x.is_finite() || !p.y.is_finite())
    {
        log::debug!("skipping polygon with non-finite vertices");
        return Ok(spans);
    }

    let vertices = vertices_of(polygon);
    let mut pending = edge_table(&vertices, rows).into_iter().peekable();
    let mut active: Vec<Edge> = Vec::new();

    let mut row = match pending.peek() {
        Some(edge) => edge.y_start,
        None => return Ok(spans),
    };

    while row < rows as i32 {
        while let Some(edge) = pending.next_if(|e| e.y_start == row) {
            activate(&mut active, edge);
        }

        if active.is_empty() {
            match pending.peek() {
                Some(next) => {
                    row = next.y_start;
                    continue;
                }
                None => break,
            }
        }

        emit_spans(row, &active, cols, &mut spans)?;

        active.retain_mut(|edge| {
            if edge.y_end <= row {
                return false;
            }
            edge.advance();
            true
        });
        active.sort_by(|a, b| a.x_intersect.total_cmp(&b.x_intersect));
        row += 1;
    }

    Ok(spans)
}

#[inline]
fn put(image: &mut Image, row: i32, col: i32, inv_z: f32, color: Color, depth: bool) {
    if depth {
        image.set_color_with_depth(row, col, inv_z, color);
    } else {
        image.set_color(row, col, color);
    }
}

/// Fills `polygon` into `image` and returns the number of spans drawn.
///
/// All spans are computed before any pixel is written, so a malformed polygon
/// leaves the image untouched.
pub fn fill_polygon(polygon: &Polygon, image: &mut Image, paint: Paint) -> Result<usize> {
    let spans = scan_spans(polygon, image.rows(), image.cols())?;
    if spans.is_empty() {
        log::debug!("polygon with {} vertices covers no pixels", polygon.len());
        return Ok(0);
    }
    let depth = polygon.uses_depth();

    match paint {
        Paint::Solid(color) => {
            for span in &spans {
                for col in span.start..span.end {
                    let (inv_z, _) = span.attrs_at(col);
                    put(image, span.row, col, inv_z, color, depth);
                }
            }
        }
        Paint::Gradient {
            from,
            to,
            direction: GradientDirection::Horizontal,
        } => {
            let min_x = polygon.min_x().map_or(0.0, |p| p.x);
            let max_x = polygon.max_x().map_or(0.0, |p| p.x);
            let width = max_x - min_x;
            for span in &spans {
                for col in span.start..span.end {
                    let t = if width > 0.0 { (col as f32 - min_x) / width } else { 0.0 };
                    let (inv_z, _) = span.attrs_at(col);
                    put(image, span.row, col, inv_z, from.lerp(to, t), depth);
                }
            }
        }
        Paint::Gradient {
            from,
            to,
            direction: GradientDirection::Vertical,
        } => {
            let n = spans.len() as f32;
            for (i, span) in spans.iter().enumerate() {
                let color = from.lerp(to, i as f32 / n);
                for col in span.start..span.end {
                    let (inv_z, _) = span.attrs_at(col);
                    put(image, span.row, col, inv_z, color, depth);
                }
            }
        }
        Paint::Vertex { fallback } if !polygon.has_colors() => {
            return fill_polygon(polygon, image, Paint::Solid(fallback));
        }
        Paint::Vertex { .. } => {
            for span in &spans {
                for col in span.start..span.end {
                    let (inv_z, color) = span.attrs_at(col);
                    put(image, span.row, col, inv_z, color, depth);
                }
            }
        }
    }

    Ok(spans.len())
}
