//! Shortest-edge-first collapse decimation.

use std::collections::HashSet;

use guide_types::Mesh;
use tracing::debug;

use super::adjacency::EdgeMap;
use super::{arr, compact, triangle_cross, triangles_of, v3};
use crate::types::{DecimateParams, KernelResult};

const MAX_PASSES: usize = 8;

/// Remove roughly `target_reduction` of the triangles by collapsing short
/// interior edges to their midpoints. Collapses that would flip a surviving
/// face or pinch the surface are rejected, so the result may fall short of
/// the target.
pub(crate) fn decimate(mesh: &Mesh, params: DecimateParams) -> KernelResult<Mesh> {
    let mut triangles = triangles_of(mesh)?;
    let reduction = if params.target_reduction.is_finite() {
        params.target_reduction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let target = (triangles.len() as f64 * reduction).floor() as usize;
    if target == 0 {
        let mut out = Mesh::from_triangles(mesh.points.clone(), &triangles);
        out.normals = mesh.normals.clone();
        return Ok(out);
    }

    let mut points = mesh.points.clone();
    let mut alive = vec![true; triangles.len()];
    let mut removed = 0usize;
    for _ in 0..MAX_PASSES {
        if removed >= target {
            break;
        }
        let collapsed = collapse_pass(
            &mut points,
            &mut triangles,
            &mut alive,
            params,
            target - removed,
        );
        if collapsed == 0 {
            break;
        }
        removed += collapsed;
    }
    debug!(
        before = triangles.len(),
        removed,
        target,
        "decimation complete"
    );

    let polys = triangles
        .iter()
        .zip(&alive)
        .filter(|(_, a)| **a)
        .map(|(t, _)| t.to_vec())
        .collect();
    Ok(compact(&points, polys, None))
}

/// One sweep over the live surface. Each point takes part in at most one
/// collapse per sweep. Returns the number of triangles removed.
fn collapse_pass(
    points: &mut [[f64; 3]],
    triangles: &mut [[u32; 3]],
    alive: &mut [bool],
    params: DecimateParams,
    budget: usize,
) -> usize {
    let live: Vec<usize> = (0..triangles.len()).filter(|&f| alive[f]).collect();
    let live_tris: Vec<[u32; 3]> = live.iter().map(|&f| triangles[f]).collect();
    let edges = EdgeMap::build(&live_tris);

    let mut incident: Vec<Vec<usize>> = vec![Vec::new(); points.len()];
    for &f in &live {
        for &i in &triangles[f] {
            incident[i as usize].push(f);
        }
    }

    let mut locked = vec![false; points.len()];
    let mut candidates: Vec<(f64, u32, u32)> = Vec::new();
    for (&(a, b), faces) in edges.iter() {
        let lock = match faces.len() {
            1 => !params.boundary_vertex_deletion,
            2 => {
                let len = (v3(&points[a as usize]) - v3(&points[b as usize])).norm();
                if len.is_finite() {
                    candidates.push((len, a, b));
                }
                false
            }
            _ => params.preserve_topology,
        };
        if lock {
            locked[a as usize] = true;
            locked[b as usize] = true;
        }
    }
    candidates.sort_by(|x, y| x.0.total_cmp(&y.0).then((x.1, x.2).cmp(&(y.1, y.2))));

    let mut touched = vec![false; points.len()];
    let mut removed = 0usize;
    for (_, u, v) in candidates {
        if removed >= budget {
            break;
        }
        let (ui, vi) = (u as usize, v as usize);
        if touched[ui] || touched[vi] || locked[ui] || locked[vi] {
            continue;
        }

        let nu = neighbors(triangles, alive, &incident[ui], u);
        let nv = neighbors(triangles, alive, &incident[vi], v);
        if nu.intersection(&nv).count() != 2 {
            continue;
        }

        let mid = (v3(&points[ui]) + v3(&points[vi])) * 0.5;
        let faces = (&incident[ui][..], &incident[vi][..]);
        if would_flip(points, triangles, alive, faces, u, v, arr(&mid)) {
            continue;
        }

        points[ui] = arr(&mid);
        let moved = std::mem::take(&mut incident[vi]);
        for f in moved {
            if !alive[f] {
                continue;
            }
            if triangles[f].contains(&u) {
                alive[f] = false;
                removed += 1;
            } else {
                for i in triangles[f].iter_mut() {
                    if *i == v {
                        *i = u;
                    }
                }
                incident[ui].push(f);
            }
        }

        touched[ui] = true;
        touched[vi] = true;
        for n in nu.iter().chain(nv.iter()) {
            touched[*n as usize] = true;
        }
    }
    removed
}

fn neighbors(triangles: &[[u32; 3]], alive: &[bool], faces: &[usize], of: u32) -> HashSet<u32> {
    faces
        .iter()
        .filter(|&&f| alive[f])
        .flat_map(|&f| triangles[f])
        .filter(|&i| i != of)
        .collect()
}

/// True if moving `u` and `v` to `mid` would reverse or flatten any face
/// that survives the collapse.
fn would_flip(
    points: &[[f64; 3]],
    triangles: &[[u32; 3]],
    alive: &[bool],
    (faces_u, faces_v): (&[usize], &[usize]),
    u: u32,
    v: u32,
    mid: [f64; 3],
) -> bool {
    for &f in faces_u.iter().chain(faces_v) {
        let t = triangles[f];
        if !alive[f] || (t.contains(&u) && t.contains(&v)) {
            continue;
        }
        let before = triangle_cross(points, &t);
        let corners: Vec<[f64; 3]> = t
            .iter()
            .map(|&i| if i == u || i == v { mid } else { points[i as usize] })
            .collect();
        let after = triangle_cross(&corners, &[0, 1, 2]);
        if before.dot(&after) <= 0.0 {
            return true;
        }
    }
    false
}
