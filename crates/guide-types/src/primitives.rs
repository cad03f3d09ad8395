//! Closed, outward-wound triangle primitives.
//!
//! Used for sleeve channel volumes and as fixtures for the kernels and QC.

use std::f64::consts::PI;

use crate::mesh::Mesh;

/// Axis-aligned box from `min` to `max`, 8 points and 12 triangles.
pub fn cuboid(min: [f64; 3], max: [f64; 3]) -> Mesh {
    let [x0, y0, z0] = min;
    let [x1, y1, z1] = max;
    let points = vec![
        [x0, y0, z0],
        [x1, y0, z0],
        [x1, y1, z0],
        [x0, y1, z0],
        [x0, y0, z1],
        [x1, y0, z1],
        [x1, y1, z1],
        [x0, y1, z1],
    ];
    let triangles = [
        // -z
        [0, 2, 1],
        [0, 3, 2],
        // +z
        [4, 5, 6],
        [4, 6, 7],
        // -y
        [0, 1, 5],
        [0, 5, 4],
        // +y
        [3, 7, 6],
        [3, 6, 2],
        // -x
        [0, 4, 7],
        [0, 7, 3],
        // +x
        [1, 2, 6],
        [1, 6, 5],
    ];
    Mesh::from_triangles(points, &triangles)
}

/// Capped cylinder along +Z with its base circle centered at `base_center`.
///
/// `segments` is clamped to at least 3.
pub fn cylinder(base_center: [f64; 3], radius: f64, height: f64, segments: usize) -> Mesh {
    let n = segments.max(3);
    let [cx, cy, cz] = base_center;
    let mut points = Vec::with_capacity(2 * n + 2);
    for z in [cz, cz + height] {
        for i in 0..n {
            let theta = 2.0 * PI * i as f64 / n as f64;
            points.push([cx + radius * theta.cos(), cy + radius * theta.sin(), z]);
        }
    }
    let bottom_center = (2 * n) as u32;
    let top_center = bottom_center + 1;
    points.push([cx, cy, cz]);
    points.push([cx, cy, cz + height]);

    let mut triangles = Vec::with_capacity(4 * n);
    for i in 0..n {
        let j = (i + 1) % n;
        let (bi, bj) = (i as u32, j as u32);
        let (ti, tj) = ((n + i) as u32, (n + j) as u32);
        triangles.push([bi, bj, tj]);
        triangles.push([bi, tj, ti]);
        triangles.push([bottom_center, bj, bi]);
        triangles.push([top_center, ti, tj]);
    }
    Mesh::from_triangles(points, &triangles)
}
