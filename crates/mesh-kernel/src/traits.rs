use std::path::Path;

use guide_types::Mesh;

use crate::types::*;

/// Geometry kernel capability set used by the guide pipeline.
///
/// Implemented by `NativeKernel` (truck-meshalgo and csgrs) and
/// `NullKernel` (identity/no-op stand-in when no kernel is available).
/// Every operation returns a new mesh and leaves its input untouched.
pub trait MeshKernel: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Split every polygon into triangles.
    fn triangulate(&self, mesh: &Mesh) -> KernelResult<Mesh>;

    /// Merge duplicate points and drop degenerate or duplicate faces.
    fn clean(&self, mesh: &Mesh) -> KernelResult<Mesh>;

    /// Close boundary loops no larger than `hole_size`.
    fn fill_holes(&self, mesh: &Mesh, hole_size: f64) -> KernelResult<Mesh>;

    /// Reorient triangles and compute per-point normals.
    fn recompute_normals(&self, mesh: &Mesh, options: NormalsOptions) -> KernelResult<Mesh>;

    /// Keep only the connected region with the most triangles.
    fn largest_component(&self, mesh: &Mesh) -> KernelResult<Mesh>;

    /// Reduce the triangle count.
    fn decimate(&self, mesh: &Mesh, params: DecimateParams) -> KernelResult<Mesh>;

    /// Boolean difference: `a` minus `b`.
    fn boolean_difference(&self, a: &Mesh, b: &Mesh) -> KernelResult<Mesh>;

    /// Boundary and non-manifold edges.
    fn feature_edges(&self, mesh: &Mesh) -> KernelResult<FeatureEdges>;

    /// One normal per point, in point order.
    fn point_normals(&self, mesh: &Mesh) -> KernelResult<Vec<[f64; 3]>>;

    /// Number of intersecting facet pairs that share no vertex.
    fn self_intersections(&self, mesh: &Mesh) -> KernelResult<usize>;

    /// Serialize in the kernel's native file format.
    fn write_mesh(&self, mesh: &Mesh, path: &Path) -> KernelResult<()>;
}
