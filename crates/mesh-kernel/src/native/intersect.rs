//! Triangle-triangle intersection counting.

use tracing::trace;

use super::{v3, Vec3};

/// Tolerance on the segment/triangle determinant.
const PARALLEL_EPS: f64 = 1e-12;

#[derive(Debug, Clone, Copy)]
struct Aabb {
    min: Vec3,
    max: Vec3,
}

impl Aabb {
    fn of(corners: &[Vec3; 3]) -> Self {
        let mut min = corners[0];
        let mut max = corners[0];
        for c in &corners[1..] {
            min = min.inf(c);
            max = max.sup(c);
        }
        Self { min, max }
    }

    fn overlaps(&self, other: &Aabb) -> bool {
        (0..3).all(|k| self.min[k] <= other.max[k] && other.min[k] <= self.max[k])
    }
}

/// Number of triangle pairs that intersect each other. Pairs sharing a point
/// index are neighbors and never count; triangles with non-finite corners
/// are ignored. Coplanar overlaps are not detected.
pub(crate) fn count_intersecting_pairs(points: &[[f64; 3]], triangles: &[[u32; 3]]) -> usize {
    let mut items: Vec<(usize, [Vec3; 3], Aabb)> = triangles
        .iter()
        .enumerate()
        .filter_map(|(i, t)| {
            let corners = t.map(|p| v3(&points[p as usize]));
            corners
                .iter()
                .all(|c| c.iter().all(|x| x.is_finite()))
                .then(|| (i, corners, Aabb::of(&corners)))
        })
        .collect();
    items.sort_by(|a, b| a.2.min.x.total_cmp(&b.2.min.x));

    let mut count = 0usize;
    for (k, (i, ta, ba)) in items.iter().enumerate() {
        for (j, tb, bb) in &items[k + 1..] {
            if bb.min.x > ba.max.x {
                break;
            }
            if !ba.overlaps(bb) || shares_point(&triangles[*i], &triangles[*j]) {
                continue;
            }
            if triangles_intersect(ta, tb) {
                trace!(a = i, b = j, "intersecting triangles");
                count += 1;
            }
        }
    }
    count
}

fn shares_point(a: &[u32; 3], b: &[u32; 3]) -> bool {
    a.iter().any(|p| b.contains(p))
}

fn triangles_intersect(a: &[Vec3; 3], b: &[Vec3; 3]) -> bool {
    edges(a).any(|(p, q)| segment_hits_triangle(&p, &q, b))
        || edges(b).any(|(p, q)| segment_hits_triangle(&p, &q, a))
}

fn edges(t: &[Vec3; 3]) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
    (0..3).map(move |i| (t[i], t[(i + 1) % 3]))
}

/// Möller-Trumbore restricted to the segment `p..q`.
fn segment_hits_triangle(p: &Vec3, q: &Vec3, t: &[Vec3; 3]) -> bool {
    let dir = q - p;
    let e1 = t[1] - t[0];
    let e2 = t[2] - t[0];
    let h = dir.cross(&e2);
    let det = e1.dot(&h);
    if det.abs() < PARALLEL_EPS {
        return false;
    }
    let inv = 1.0 / det;
    let s = p - t[0];
    let u = inv * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return false;
    }
    let qv = s.cross(&e1);
    let v = inv * dir.dot(&qv);
    if v < 0.0 || u + v > 1.0 {
        return false;
    }
    let along = inv * e2.dot(&qv);
    (0.0..=1.0).contains(&along)
}
