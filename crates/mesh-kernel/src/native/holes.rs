//! Small-hole filling over truck's boundary loops.

use guide_types::Mesh;
use tracing::debug;

use super::adjacency::{has_directed_edge, EdgeMap};
use super::{orient, polymesh, triangles_of, v3};
use crate::types::KernelResult;

/// Largest distance from the loop centroid to a loop point.
fn loop_radius(points: &[[f64; 3]], ring: &[u32]) -> f64 {
    let centroid = ring
        .iter()
        .fold(v3(&[0.0; 3]), |acc, &i| acc + v3(&points[i as usize]))
        / ring.len() as f64;
    ring.iter()
        .map(|&i| (v3(&points[i as usize]) - centroid).norm())
        .fold(0.0, f64::max)
}

/// Fan-fill every boundary loop whose radius is at most `hole_size`. The fan
/// runs against the triangle bordering the loop so the patch is wound
/// consistently with it.
///
/// Windings are made consistent first. A surface whose boundary still does
/// not form simple loops (non-manifold edges, pinched points) is returned
/// without filling.
pub(crate) fn fill_holes(mesh: &Mesh, hole_size: f64) -> KernelResult<Mesh> {
    let mut triangles = triangles_of(mesh)?;
    let edges = EdgeMap::build(&triangles);
    orient::propagate(&mut triangles, &edges, true);
    if !edges.has_traceable_boundary(&triangles) {
        debug!("irregular boundary, holes left open");
        let mut out = Mesh::from_triangles(mesh.points.clone(), &triangles);
        out.normals = mesh.normals.clone();
        return Ok(out);
    }
    let loops = polymesh::boundary_loops(&mesh.points, &triangles);

    let mut filled = 0usize;
    for mut ring in loops.iter().cloned() {
        if loop_radius(&mesh.points, &ring) > hole_size {
            continue;
        }
        let (a, b) = (ring[0], ring[1]);
        if edges
            .faces(a, b)
            .iter()
            .any(|&f| has_directed_edge(&triangles[f], a, b))
        {
            ring.reverse();
        }
        for i in 1..ring.len() - 1 {
            triangles.push([ring[0], ring[i], ring[i + 1]]);
        }
        filled += 1;
    }
    debug!(
        holes = loops.len(),
        filled,
        hole_size,
        "hole filling complete"
    );

    let mut out = Mesh::from_triangles(mesh.points.clone(), &triangles);
    out.normals = mesh.normals.clone();
    Ok(out)
}
