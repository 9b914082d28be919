//! Single-pixel-wide line and point primitives.
//!
//! Segments are clipped to the image in float space before they are walked,
//! so endpoints far outside the image (or at saturated `i32` values) cost no
//! more than a segment that fits.

use super::image::Image;
use crate::colors::Color;

/// Plots one pixel at screen position `(x, y)`; x is the column, y the row.
#[inline]
pub fn plot(image: &mut Image, x: i32, y: i32, color: Color) {
    image.set_color(y, x, color);
}

/// Draws a line between two pixel positions with Bresenham's algorithm.
///
/// Both endpoints are drawn. Pixels outside the image are skipped.
pub fn draw_line(image: &mut Image, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
    draw_segment(image, (x0 as f32, y0 as f32), (x1 as f32, y1 as f32), color);
}

/// [`draw_line`] with a depth test; `inv_z0`/`inv_z1` are the endpoint `1/z`
/// values, interpolated linearly along the line.
pub fn draw_line_depth(
    image: &mut Image,
    (x0, y0, inv_z0): (i32, i32, f32),
    (x1, y1, inv_z1): (i32, i32, f32),
    color: Color,
) {
    draw_segment_depth(
        image,
        (x0 as f32, y0 as f32, inv_z0),
        (x1 as f32, y1 as f32, inv_z1),
        color,
    );
}

/// Draws the segment between two screen-space positions, rounding the
/// clipped endpoints to pixels.
pub fn draw_segment(image: &mut Image, a: (f32, f32), b: (f32, f32), color: Color) {
    let Some((p0, p1, _)) = clipped(image, a, b) else {
        return;
    };
    bresenham(p0, p1, |x, y, _| plot(image, x, y, color));
}

/// [`draw_segment`] with a depth test on `1/z`, given as the third component
/// of each endpoint.
pub fn draw_segment_depth(
    image: &mut Image,
    (x0, y0, inv_z0): (f32, f32, f32),
    (x1, y1, inv_z1): (f32, f32, f32),
    color: Color,
) {
    let Some((p0, p1, (t0, t1))) = clipped(image, (x0, y0), (x1, y1)) else {
        return;
    };
    bresenham(p0, p1, |x, y, t| {
        let s = t0 + t * (t1 - t0);
        let inv_z = inv_z0 + s as f32 * (inv_z1 - inv_z0);
        image.set_color_with_depth(y, x, inv_z, color);
    });
}

/// Clips `a -> b` to the image and rounds the result to pixel positions.
/// Also returns the kept parameter range of the original segment.
fn clipped(
    image: &Image,
    (ax, ay): (f32, f32),
    (bx, by): (f32, f32),
) -> Option<((i64, i64), (i64, i64), (f64, f64))> {
    if ![ax, ay, bx, by].iter().all(|v| v.is_finite()) {
        log::debug!("skipping line with non-finite endpoint");
        return None;
    }
    let a = (ax as f64, ay as f64);
    let b = (bx as f64, by as f64);
    let (t0, t1) = clip(a, b, image.rows() as f64, image.cols() as f64)?;

    let at = |t: f64| {
        (
            (a.0 + t * (b.0 - a.0)).round() as i64,
            (a.1 + t * (b.1 - a.1)).round() as i64,
        )
    };
    Some((at(t0), at(t1), (t0, t1)))
}

/// Liang-Barsky clip of `a -> b` against `[-1, cols] x [-1, rows]`, one pixel
/// wider than the image on every side. Returns the kept range of `t`.
fn clip(a: (f64, f64), b: (f64, f64), rows: f64, cols: f64) -> Option<(f64, f64)> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);

    for (p, q) in [
        (-dx, a.0 + 1.0),
        (dx, cols - a.0),
        (-dy, a.1 + 1.0),
        (dy, rows - a.1),
    ] {
        if p == 0.0 {
            // Parallel to this boundary and outside it.
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    Some((t0, t1))
}

/// Walks the pixels of a line, calling `visit(x, y, t)` with `t` the fraction
/// of the way from the first endpoint to the second.
///
/// The error term tracks the distance between the ideal line and the current
/// pixel; each step moves along the major axis and, when the accumulated error
/// crosses the threshold, along the minor axis too. Endpoints come from
/// [`clipped`], so they lie within a pixel of the image.
fn bresenham<F>((x0, y0): (i64, i64), (x1, y1): (i64, i64), mut visit: F)
where
    F: FnMut(i32, i32, f64),
{
    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();

    let steps = dx.max(dy);
    if steps == 0 {
        visit(x0 as i32, y0 as i32, 0.0);
        return;
    }

    let x_incr = if x0 < x1 { 1 } else { -1 };
    let y_incr = if y0 < y1 { 1 } else { -1 };

    // Positive error favors x movement, negative favors y.
    let mut err = dx - dy;

    let mut x = x0;
    let mut y = y0;
    let mut step = 0_i64;

    loop {
        visit(x as i32, y as i32, step as f64 / steps as f64);

        if x == x1 && y == y1 {
            break;
        }
        step += 1;

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += x_incr;
        }
        // Both branches may fire: a diagonal step.
        if e2 < dx {
            err += dx;
            y += y_incr;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BLACK, WHITE};

    #[test]
    fn horizontal_line_covers_both_endpoints() {
        let mut img = Image::new(5, 10).unwrap();
        draw_line(&mut img, 1, 2, 8, 2, WHITE);
        assert_eq!(img.count_not(BLACK), 8);
        assert_eq!(img.color(2, 1), Some(WHITE));
        assert_eq!(img.color(2, 8), Some(WHITE));
    }

    #[test]
    fn diagonal_line_is_one_pixel_per_step() {
        let mut img = Image::new(10, 10).unwrap();
        draw_line(&mut img, 0, 0, 9, 9, WHITE);
        assert_eq!(img.count_not(BLACK), 10);
        for i in 0..10 {
            assert_eq!(img.color(i, i), Some(WHITE));
        }
    }

    #[test]
    fn steep_line_in_reverse_direction() {
        let mut img = Image::new(10, 10).unwrap();
        draw_line(&mut img, 5, 9, 4, 0, WHITE);
        assert_eq!(img.count_not(BLACK), 10);
        assert_eq!(img.color(0, 4), Some(WHITE));
        assert_eq!(img.color(9, 5), Some(WHITE));
    }

    #[test]
    fn clipped_line_draws_only_visible_pixels() {
        let mut img = Image::new(4, 4).unwrap();
        draw_line(&mut img, -3, 1, 6, 1, WHITE);
        assert_eq!(img.count_not(BLACK), 4);
    }

    #[test]
    fn saturated_endpoints_are_clipped() {
        let mut img = Image::new(10, 10).unwrap();
        draw_line(&mut img, i32::MIN, 3, i32::MAX, 3, WHITE);
        assert_eq!(img.count_not(BLACK), 10);
        assert!((0..10).all(|col| img.color(3, col) == Some(WHITE)));
    }

    #[test]
    fn far_segment_keeps_its_slope_inside_the_image() {
        // y = x / 2 through the origin, ends billions of pixels away.
        let mut img = Image::new(10, 20).unwrap();
        draw_segment(&mut img, (-4e9, -2e9), (4e9, 2e9), WHITE);
        assert_eq!(img.color(0, 0), Some(WHITE));
        assert_eq!(img.color(5, 10), Some(WHITE));
        assert_eq!(img.color(9, 5), Some(BLACK));
        assert!(img.count_not(BLACK) <= 20);
    }

    #[test]
    fn segment_missing_the_image_draws_nothing() {
        let mut img = Image::new(10, 10).unwrap();
        draw_segment(&mut img, (-50.0, -5.0), (50.0, -5.0), WHITE);
        draw_segment(&mut img, (20.0, -3e9), (20.0, 3e9), WHITE);
        draw_segment(&mut img, (f32::NAN, 0.0), (5.0, 5.0), WHITE);
        assert_eq!(img.count_not(BLACK), 0);
    }

    #[test]
    fn depth_line_respects_closer_pixels() {
        let mut img = Image::new(1, 5).unwrap();
        img.fill_depth(0.5);
        draw_line_depth(&mut img, (0, 0, 0.0), (4, 0, 1.0), WHITE);
        // t = 0, 0.25, 0.5 do not beat 0.5; t = 0.75 and 1.0 do.
        assert_eq!(img.count_not(BLACK), 2);
    }

    #[test]
    fn clipped_depth_line_keeps_original_depth_ramp() {
        // Visible part is x in [-1, 5] of a segment from -5 to 5.
        let mut img = Image::new(1, 5).unwrap();
        draw_segment_depth(&mut img, (-5.0, 0.0, 0.0), (5.0, 0.0, 1.0), WHITE);
        let expected = |col: f32| (col + 5.0) / 10.0;
        for col in 0..5 {
            let z = img.depth(0, col).unwrap();
            assert!((z - expected(col as f32)).abs() < 1e-5, "col {col}: {z}");
        }
    }
}
