//! Midpoint subdivision of triangles.

use super::{extent, insert_by_x};
use crate::error::Result;
use crate::geometry::polygon::Polygon;
use crate::math::vec3::Vec3;
use crate::math::vec4::Point;

/// Splits a triangle into four through its edge midpoints:
/// `(a, ab, ca)`, `(ab, b, bc)`, `(ca, bc, c)` and the middle `(ab, bc, ca)`.
///
/// Per-vertex colors and normals are interpolated along with the vertices,
/// and the flags are inherited. Anything that is not a triangle is returned
/// unchanged as the only element.
pub fn divide(tri: &Polygon) -> Result<Vec<Polygon>> {
    let [a, b, c] = match tri.vertices() {
        &[a, b, c] => [a, b, c],
        _ => {
            log::debug!("cannot subdivide a {}-gon as a triangle", tri.len());
            return Ok(vec![tri.clone()]);
        }
    };
    let (ab, bc, ca) = (a.midpoint(b), b.midpoint(c), c.midpoint(a));

    let corners: [[usize; 3]; 4] = [[0, 3, 5], [3, 1, 4], [5, 4, 2], [3, 4, 5]];
    let points = [a, b, c, ab, bc, ca];

    let colors = match tri.colors() {
        &[x, y, z] => Some([x, y, z, x.lerp(y, 0.5), y.lerp(z, 0.5), z.lerp(x, 0.5)]),
        _ => None,
    };
    let normals = match tri.normals() {
        &[x, y, z] => Some([x, y, z, mid_normal(x, y), mid_normal(y, z), mid_normal(z, x)]),
        _ => None,
    };

    let mut children = Vec::with_capacity(4);
    for idx in corners {
        let mut child = tri.clone();
        child.set(idx.iter().map(|&i| points[i]).collect());
        if let Some(colors) = &colors {
            child.set_colors(idx.iter().map(|&i| colors[i]).collect())?;
        }
        if let Some(normals) = &normals {
            child.set_normals(idx.iter().map(|&i| normals[i]).collect())?;
        }
        children.push(child);
    }
    Ok(children)
}

fn mid_normal(a: Vec3, b: Vec3) -> Vec3 {
    a.lerp(b, 0.5).normalize()
}

/// Applies [`divide`] `levels` times to every triangle.
///
/// The result is ordered by each triangle's first vertex x, ties in
/// generation order.
pub fn tessellate(triangles: &[Polygon], levels: u32) -> Result<Vec<Polygon>> {
    let mut current = triangles.to_vec();
    for _ in 0..levels {
        let mut next = Vec::with_capacity(current.len() * 4);
        for tri in &current {
            for child in divide(tri)? {
                insert_by_x(&mut next, child, first_x);
            }
        }
        current = next;
    }
    Ok(current)
}

/// Whether the triangle's xy bounding box fits within `threshold` both ways.
pub fn is_flat(tri: &Polygon, threshold: f32) -> Result<bool> {
    let (width, height) = extent(tri.vertices())?;
    Ok(width <= threshold && height <= threshold)
}

/// Splits until each triangle is flat or the budget is spent.
///
/// A budget of 1 or less keeps `tri` whole; otherwise each child gets half
/// the budget, so at most `ceil(log2(budget))` rounds of [`divide`] happen.
/// Leaves are ordered by first vertex x.
pub fn leaves(tri: &Polygon, threshold: f32, budget: u32) -> Result<Vec<Polygon>> {
    let mut leaves = Vec::new();
    leaves_into(tri, threshold, budget, &mut leaves)?;
    Ok(leaves)
}

fn leaves_into(
    tri: &Polygon,
    threshold: f32,
    budget: u32,
    leaves: &mut Vec<Polygon>,
) -> Result<()> {
    if budget <= 1 || is_flat(tri, threshold)? {
        insert_by_x(leaves, tri.clone(), first_x);
        return Ok(());
    }
    for child in divide(tri)? {
        leaves_into(&child, threshold, budget / 2, leaves)?;
    }
    Ok(())
}

fn first_x(p: &Polygon) -> f32 {
    p.vertices().first().map_or(0.0, |v| v.x)
}

/// Octahedron faces, wound counter-clockwise seen from outside.
fn octahedron() -> Vec<Polygon> {
    let px = Point::point(1.0, 0.0, 0.0);
    let nx = Point::point(-1.0, 0.0, 0.0);
    let py = Point::point(0.0, 1.0, 0.0);
    let ny = Point::point(0.0, -1.0, 0.0);
    let pz = Point::point(0.0, 0.0, 1.0);
    let nz = Point::point(0.0, 0.0, -1.0);
    [
        [px, py, pz],
        [py, nx, pz],
        [nx, ny, pz],
        [ny, px, pz],
        [py, px, nz],
        [nx, py, nz],
        [ny, nx, nz],
        [px, ny, nz],
    ]
    .into_iter()
    .map(|face| Polygon::new(face.to_vec()))
    .collect()
}

/// Unit sphere approximated by a tessellated octahedron.
///
/// `levels` rounds of subdivision give `8 * 4^levels` triangles. Every vertex
/// is pushed out to the unit sphere and its normal is its position.
pub fn sphere(levels: u32) -> Result<Vec<Polygon>> {
    let mut faces = tessellate(&octahedron(), levels)?;
    for face in &mut faces {
        let dirs: Vec<Vec3> = face.vertices().iter().map(|v| v.to_vec3().normalize()).collect();
        face.set(dirs.iter().map(|&d| Point::from_vec3(d, 1.0)).collect());
        face.set_normals(dirs)?;
    }
    Ok(faces)
}
