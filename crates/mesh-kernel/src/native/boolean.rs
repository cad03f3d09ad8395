//! Boolean difference through csgrs.

use csgrs::mesh::polygon::Polygon;
use csgrs::mesh::vertex::Vertex;
use csgrs::mesh::Mesh as CsgMesh;
use csgrs::traits::CSG;
use guide_types::Mesh;
use nalgebra::Point3;
use tracing::debug;

use super::{polymesh, triangle_cross, triangles_of};
use crate::types::KernelResult;

/// Twice-area below which a facet is left out of the solid.
const MIN_FACET_AREA: f64 = 1e-12;

/// `a - b`, welded at `tolerance` and returned as triangles.
pub(crate) fn difference(a: &Mesh, b: &Mesh, tolerance: f64) -> KernelResult<Mesh> {
    let (solid_a, solid_b) = (to_solid(a)?, to_solid(b)?);
    let result = solid_a.difference(&solid_b);
    debug!(
        a = solid_a.polygons.len(),
        b = solid_b.polygons.len(),
        out = result.polygons.len(),
        "csg difference complete"
    );

    let mut points = Vec::new();
    let mut faces = Vec::with_capacity(result.polygons.len());
    for polygon in &result.polygons {
        let start = points.len() as u32;
        for v in &polygon.vertices {
            points.push([v.pos.x, v.pos.y, v.pos.z]);
        }
        faces.push((start..points.len() as u32).collect::<Vec<_>>());
    }
    let welded = polymesh::weld(&points, &faces, tolerance);
    Ok(polymesh::triangulate(&welded.points, &welded.polys))
}

/// Planar facets with finite geometry, each carrying its own unit normal.
fn to_solid(mesh: &Mesh) -> KernelResult<CsgMesh<()>> {
    let triangles = triangles_of(mesh)?;
    let polygons: Vec<Polygon<()>> = triangles
        .iter()
        .filter_map(|t| {
            let cross = triangle_cross(&mesh.points, t);
            let len = cross.norm();
            if !len.is_finite() || len < MIN_FACET_AREA {
                return None;
            }
            let normal = cross / len;
            let vertices = t
                .iter()
                .map(|&i| {
                    let p = mesh.points[i as usize];
                    Vertex::new(Point3::new(p[0], p[1], p[2]), normal)
                })
                .collect();
            Some(Polygon::new(vertices, None))
        })
        .collect();
    Ok(CsgMesh::from_polygons(&polygons, None))
}
