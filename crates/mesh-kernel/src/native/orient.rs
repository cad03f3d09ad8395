//! Winding consistency and outward orientation.

use std::collections::VecDeque;

use guide_types::Mesh;
use tracing::debug;

use super::adjacency::{has_directed_edge, EdgeMap};
use super::{polymesh, triangles_of, v3, Vec3};
use crate::types::{KernelResult, NormalsOptions};

pub(crate) fn recompute_normals(mesh: &Mesh, options: NormalsOptions) -> KernelResult<Mesh> {
    let mut triangles = triangles_of(mesh)?;
    let edges = EdgeMap::build(&triangles);

    let (component, flipped) = propagate(&mut triangles, &edges, options.consistent);

    let mut reoriented = 0usize;
    if options.auto_orient {
        let shells = component.iter().copied().max().map_or(0, |m| m + 1);
        for shell in 0..shells {
            if shell_volume(&mesh.points, &triangles, &component, shell) < 0.0 {
                for (t, &c) in triangles.iter_mut().zip(&component) {
                    if c == shell {
                        t.swap(1, 2);
                    }
                }
                reoriented += 1;
            }
        }
    }
    debug!(flipped, reoriented, "normal orientation complete");

    let normals = polymesh::point_normals(&mesh.points, &triangles);
    let mut out = Mesh::from_triangles(mesh.points.clone(), &triangles);
    out.normals = Some(normals);
    Ok(out)
}

/// Label edge-connected triangle groups across manifold edges. With `fix`,
/// flip neighbors whose winding disagrees with the triangle they were reached
/// from. Returns per-triangle group labels and the number of flips.
pub(crate) fn propagate(
    triangles: &mut [[u32; 3]],
    edges: &EdgeMap,
    fix: bool,
) -> (Vec<usize>, usize) {
    const UNSEEN: usize = usize::MAX;
    let mut component = vec![UNSEEN; triangles.len()];
    let mut flipped = 0usize;
    let mut next_label = 0usize;

    for seed in 0..triangles.len() {
        if component[seed] != UNSEEN {
            continue;
        }
        component[seed] = next_label;
        let mut queue = VecDeque::from([seed]);
        while let Some(f) = queue.pop_front() {
            let t = triangles[f];
            for (a, b) in [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])] {
                let faces = edges.faces(a, b);
                if faces.len() != 2 {
                    continue;
                }
                let g = if faces[0] == f { faces[1] } else { faces[0] };
                if component[g] != UNSEEN {
                    continue;
                }
                if fix && has_directed_edge(&triangles[g], a, b) {
                    triangles[g].swap(1, 2);
                    flipped += 1;
                }
                component[g] = next_label;
                queue.push_back(g);
            }
        }
        next_label += 1;
    }
    (component, flipped)
}

/// Signed volume of one shell, measured about its own centroid.
fn shell_volume(
    points: &[[f64; 3]],
    triangles: &[[u32; 3]],
    component: &[usize],
    shell: usize,
) -> f64 {
    let members: Vec<&[u32; 3]> = triangles
        .iter()
        .zip(component)
        .filter(|(_, c)| **c == shell)
        .map(|(t, _)| t)
        .collect();
    if members.is_empty() {
        return 0.0;
    }
    let mut centroid = Vec3::zeros();
    for t in &members {
        for &i in t.iter() {
            centroid += v3(&points[i as usize]);
        }
    }
    centroid /= (members.len() * 3) as f64;

    members
        .iter()
        .map(|t| {
            let a = v3(&points[t[0] as usize]) - centroid;
            let b = v3(&points[t[1] as usize]) - centroid;
            let c = v3(&points[t[2] as usize]) - centroid;
            a.dot(&b.cross(&c)) / 6.0
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use guide_types::primitives::cuboid;

    #[test]
    fn repairs_inconsistent_winding() {
        let mut mesh = cuboid([0.0; 3], [1.0; 3]);
        // Flip the two +z triangles.
        mesh.polys[2].swap(1, 2);
        mesh.polys[3].swap(1, 2);
        let out = recompute_normals(&mesh, NormalsOptions::default()).unwrap();
        let normals = out.normals.unwrap();
        // Point 6 is the (1,1,1) corner: its normal points out along the diagonal.
        let n = normals[6];
        assert!(n[0] > 0.0 && n[1] > 0.0 && n[2] > 0.0, "normal {:?}", n);
    }

    #[test]
    fn flips_inside_out_shell() {
        let mut mesh = cuboid([0.0; 3], [1.0; 3]);
        for poly in &mut mesh.polys {
            poly.swap(1, 2);
        }
        let out = recompute_normals(&mesh, NormalsOptions::default()).unwrap();
        let n = out.normals.unwrap()[0];
        assert!(n[0] < 0.0 && n[1] < 0.0 && n[2] < 0.0, "normal {:?}", n);
    }

    #[test]
    fn orientation_can_be_left_alone() {
        let mut mesh = cuboid([0.0; 3], [1.0; 3]);
        for poly in &mut mesh.polys {
            poly.swap(1, 2);
        }
        let options = NormalsOptions {
            auto_orient: false,
            consistent: true,
        };
        let out = recompute_normals(&mesh, options).unwrap();
        assert_eq!(out.polys, mesh.polys);
    }
}
