//! NativeKernel: triangle-mesh kernel on truck-meshalgo and csgrs.
//!
//! truck's `PolygonMesh` filters do triangulation, welding, components,
//! normals and boundary extraction; csgrs does the boolean difference.
//! Every entry point validates indices first, so malformed input yields
//! `InvalidMesh` rather than a panic inside either library.

mod adjacency;
mod boolean;
mod decimate;
mod holes;
mod intersect;
mod orient;
mod polymesh;
mod vtp;

use std::path::Path;

use guide_types::Mesh;
use nalgebra::Vector3;
use tracing::debug;

use crate::traits::MeshKernel;
use crate::types::*;

use adjacency::{normalize_edge, EdgeMap};

pub(crate) type Vec3 = Vector3<f64>;

/// Default distance under which points are merged by `clean` and after a
/// boolean.
pub const DEFAULT_WELD_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy)]
pub struct NativeKernel {
    weld_tolerance: f64,
}

impl NativeKernel {
    pub fn new() -> Self {
        Self {
            weld_tolerance: DEFAULT_WELD_TOLERANCE,
        }
    }

    /// Override the point-merge tolerance. Non-positive or non-finite values
    /// fall back to the default.
    pub fn with_weld_tolerance(mut self, tolerance: f64) -> Self {
        self.weld_tolerance = if tolerance.is_finite() && tolerance > 0.0 {
            tolerance
        } else {
            DEFAULT_WELD_TOLERANCE
        };
        self
    }
}

impl Default for NativeKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshKernel for NativeKernel {
    fn name(&self) -> &'static str {
        "native"
    }

    fn triangulate(&self, mesh: &Mesh) -> KernelResult<Mesh> {
        ensure_indices(mesh)?;
        let mut out = polymesh::triangulate(&mesh.points, &mesh.polys);
        out.normals = mesh.normals.clone();
        Ok(out)
    }

    fn clean(&self, mesh: &Mesh) -> KernelResult<Mesh> {
        let triangles = triangles_of(mesh)?;
        let finite: Vec<Vec<u32>> = triangles
            .iter()
            .filter(|t| {
                t.iter()
                    .all(|&i| mesh.points[i as usize].iter().all(|c| c.is_finite()))
            })
            .map(|t| t.to_vec())
            .collect();
        let before = mesh.point_count();
        let finite = compact(&mesh.points, finite, None);
        let out = polymesh::weld(&finite.points, &finite.polys, self.weld_tolerance);
        debug!(
            before,
            after = out.point_count(),
            polys = out.poly_count(),
            "clean complete"
        );
        Ok(out)
    }

    fn fill_holes(&self, mesh: &Mesh, hole_size: f64) -> KernelResult<Mesh> {
        holes::fill_holes(mesh, hole_size)
    }

    fn recompute_normals(&self, mesh: &Mesh, options: NormalsOptions) -> KernelResult<Mesh> {
        orient::recompute_normals(mesh, options)
    }

    fn largest_component(&self, mesh: &Mesh) -> KernelResult<Mesh> {
        let triangles = triangles_of(mesh)?;
        let groups = polymesh::components(&mesh.points, &triangles);
        let Some(largest) = groups.iter().max_by_key(|g| g.len()) else {
            return Ok(Mesh::empty());
        };
        debug!(
            components = groups.len(),
            kept = largest.len(),
            "largest component selected"
        );
        let polys = largest.iter().map(|&f| triangles[f].to_vec()).collect();
        Ok(compact(&mesh.points, polys, mesh.normals.as_ref()))
    }

    fn decimate(&self, mesh: &Mesh, params: DecimateParams) -> KernelResult<Mesh> {
        decimate::decimate(mesh, params)
    }

    fn boolean_difference(&self, a: &Mesh, b: &Mesh) -> KernelResult<Mesh> {
        boolean::difference(a, b, self.weld_tolerance)
    }

    fn feature_edges(&self, mesh: &Mesh) -> KernelResult<FeatureEdges> {
        let triangles = triangles_of(mesh)?;
        let edges = EdgeMap::build(&triangles);
        let boundary = if edges.has_traceable_boundary(&triangles) {
            let mut boundary: Vec<(u32, u32)> = polymesh::boundary_loops(&mesh.points, &triangles)
                .iter()
                .flat_map(|ring| {
                    let n = ring.len();
                    (0..n).map(move |i| normalize_edge(ring[i], ring[(i + 1) % n]))
                })
                .collect();
            boundary.sort_unstable();
            boundary.dedup();
            boundary
        } else {
            edges.edges_with(|count| count == 1)
        };
        let non_manifold = edges.edges_with(|count| count > 2);
        Ok(FeatureEdges {
            boundary,
            non_manifold,
        })
    }

    fn point_normals(&self, mesh: &Mesh) -> KernelResult<Vec<[f64; 3]>> {
        let triangles = triangles_of(mesh)?;
        Ok(polymesh::point_normals(&mesh.points, &triangles))
    }

    fn self_intersections(&self, mesh: &Mesh) -> KernelResult<usize> {
        let triangles = triangles_of(mesh)?;
        Ok(intersect::count_intersecting_pairs(&mesh.points, &triangles))
    }

    fn write_mesh(&self, mesh: &Mesh, path: &Path) -> KernelResult<()> {
        vtp::write_vtp(mesh, path)
    }
}

// ── Shared helpers ──────────────────────────────────────────────────────────

pub(crate) fn v3(p: &[f64; 3]) -> Vec3 {
    Vector3::new(p[0], p[1], p[2])
}

pub(crate) fn arr(v: &Vec3) -> [f64; 3] {
    [v.x, v.y, v.z]
}

/// Twice-area normal of a triangle.
pub(crate) fn triangle_cross(points: &[[f64; 3]], t: &[u32; 3]) -> Vec3 {
    let a = v3(&points[t[0] as usize]);
    let b = v3(&points[t[1] as usize]);
    let c = v3(&points[t[2] as usize]);
    (b - a).cross(&(c - a))
}

fn ensure_indices(mesh: &Mesh) -> KernelResult<()> {
    if mesh.indices_in_range() {
        return Ok(());
    }
    Err(KernelError::InvalidMesh {
        reason: format!(
            "polygon index out of range (point count = {})",
            mesh.point_count()
        ),
    })
}

/// Fan-triangulate every polygon, rejecting out-of-range indices.
pub(crate) fn triangles_of(mesh: &Mesh) -> KernelResult<Vec<[u32; 3]>> {
    ensure_indices(mesh)?;
    let mut triangles = Vec::with_capacity(mesh.poly_count());
    for poly in &mesh.polys {
        if poly.len() < 3 {
            continue;
        }
        for i in 1..poly.len() - 1 {
            triangles.push([poly[0], poly[i], poly[i + 1]]);
        }
    }
    Ok(triangles)
}

/// Drop unreferenced points and renumber polygons. Normals follow their points.
pub(crate) fn compact(
    points: &[[f64; 3]],
    polys: Vec<Vec<u32>>,
    normals: Option<&Vec<[f64; 3]>>,
) -> Mesh {
    let mut remap: Vec<Option<u32>> = vec![None; points.len()];
    let mut new_points = Vec::new();
    let mut new_normals = Vec::new();
    let normals = normals.filter(|n| n.len() == points.len());

    let mut new_polys = Vec::with_capacity(polys.len());
    for poly in polys {
        let mut mapped = Vec::with_capacity(poly.len());
        for idx in poly {
            let slot = &mut remap[idx as usize];
            let new_idx = match *slot {
                Some(n) => n,
                None => {
                    let n = new_points.len() as u32;
                    new_points.push(points[idx as usize]);
                    if let Some(normals) = normals {
                        new_normals.push(normals[idx as usize]);
                    }
                    *slot = Some(n);
                    n
                }
            };
            mapped.push(new_idx);
        }
        new_polys.push(mapped);
    }

    Mesh {
        points: new_points,
        polys: new_polys,
        normals: normals.map(|_| new_normals),
    }
}
