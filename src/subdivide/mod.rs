//! Recursive subdivision of Bezier curves, Bezier patches and triangles.
//!
//! Every subdivider works against a division budget that halves at each
//! level; recursion stops once the budget reaches 1, so a budget `D` splits at
//! most `ceil(log2(D))` times. Leaves are collected in order of their first
//! control point's x coordinate, ties keeping generation order, which gives a
//! deterministic draw order.

pub mod bezier;
pub mod triangle;

pub use bezier::{BezierCurve, BezierSurface};

use crate::error::{RenderError, Result};
use crate::math::vec4::Point;

/// One De Casteljau step at `t = 0.5`: the control points of the two halves.
pub(crate) fn split_control_points(p: [Point; 4]) -> ([Point; 4], [Point; 4]) {
    let p01 = p[0].midpoint(p[1]);
    let p12 = p[1].midpoint(p[2]);
    let p23 = p[2].midpoint(p[3]);
    let p012 = p01.midpoint(p12);
    let p123 = p12.midpoint(p23);
    let mid = p012.midpoint(p123);
    ([p[0], p01, p012, mid], [mid, p123, p23, p[3]])
}

/// Inserts `item` after every element whose key is not greater than its own.
pub(crate) fn insert_by_x<T>(list: &mut Vec<T>, item: T, x: impl Fn(&T) -> f32) {
    let key = x(&item);
    let at = list.partition_point(|other| x(other) <= key);
    list.insert(at, item);
}

/// Width and height of the xy bounding box of `points`.
///
/// Fails with [`RenderError::InvalidBounds`] when an extent is NaN or
/// negative.
pub(crate) fn extent(points: &[Point]) -> Result<(f32, f32)> {
    let first = match points.first() {
        Some(p) => *p,
        None => return Ok((0.0, 0.0)),
    };
    let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
    let mut nan = false;
    for p in points {
        nan |= p.x.is_nan() || p.y.is_nan();
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }
    let (width, height) = if nan {
        (f32::NAN, f32::NAN)
    } else {
        (max_x - min_x, max_y - min_y)
    };

    if !(width >= 0.0 && height >= 0.0) {
        return Err(RenderError::InvalidBounds { width, height });
    }
    Ok((width, height))
}
