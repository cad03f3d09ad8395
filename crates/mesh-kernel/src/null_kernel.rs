//! NullKernel: stand-in used when no geometry kernel is available.
//!
//! Transforming operations return their input unchanged. Operations that must
//! produce new information (booleans, edge and normal queries, intersection
//! tests, serialization) report `NotSupported`, which callers treat like any
//! other degraded-geometry failure.

use std::path::Path;

use guide_types::Mesh;

use crate::traits::MeshKernel;
use crate::types::*;

#[derive(Debug, Clone, Copy, Default)]
pub struct NullKernel;

impl NullKernel {
    pub fn new() -> Self {
        Self
    }

    fn unsupported<T>(operation: &'static str) -> KernelResult<T> {
        Err(KernelError::NotSupported {
            kernel: "null",
            operation,
        })
    }
}

impl MeshKernel for NullKernel {
    fn name(&self) -> &'static str {
        "null"
    }

    fn triangulate(&self, mesh: &Mesh) -> KernelResult<Mesh> {
        Ok(mesh.clone())
    }

    fn clean(&self, mesh: &Mesh) -> KernelResult<Mesh> {
        Ok(mesh.clone())
    }

    fn fill_holes(&self, mesh: &Mesh, _hole_size: f64) -> KernelResult<Mesh> {
        Ok(mesh.clone())
    }

    fn recompute_normals(&self, mesh: &Mesh, _options: NormalsOptions) -> KernelResult<Mesh> {
        Ok(mesh.clone())
    }

    fn largest_component(&self, mesh: &Mesh) -> KernelResult<Mesh> {
        Ok(mesh.clone())
    }

    fn decimate(&self, mesh: &Mesh, _params: DecimateParams) -> KernelResult<Mesh> {
        Ok(mesh.clone())
    }

    fn boolean_difference(&self, _a: &Mesh, _b: &Mesh) -> KernelResult<Mesh> {
        Self::unsupported("boolean_difference")
    }

    fn feature_edges(&self, _mesh: &Mesh) -> KernelResult<FeatureEdges> {
        Self::unsupported("feature_edges")
    }

    fn point_normals(&self, _mesh: &Mesh) -> KernelResult<Vec<[f64; 3]>> {
        Self::unsupported("point_normals")
    }

    fn self_intersections(&self, _mesh: &Mesh) -> KernelResult<usize> {
        Self::unsupported("self_intersections")
    }

    fn write_mesh(&self, _mesh: &Mesh, _path: &Path) -> KernelResult<()> {
        Self::unsupported("write_mesh")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guide_types::primitives::cuboid;

    #[test]
    fn transforms_are_identity() {
        let kernel = NullKernel::new();
        let mesh = cuboid([0.0; 3], [1.0; 3]);
        assert_eq!(kernel.triangulate(&mesh).unwrap(), mesh);
        assert_eq!(kernel.fill_holes(&mesh, 2.0).unwrap(), mesh);
        assert_eq!(
            kernel.decimate(&mesh, DecimateParams::default()).unwrap(),
            mesh
        );
    }

    #[test]
    fn queries_are_not_supported() {
        let kernel = NullKernel::new();
        let mesh = cuboid([0.0; 3], [1.0; 3]);
        assert!(kernel
            .boolean_difference(&mesh, &mesh)
            .unwrap_err()
            .is_not_supported());
        assert!(kernel.feature_edges(&mesh).unwrap_err().is_not_supported());
        assert!(kernel.point_normals(&mesh).unwrap_err().is_not_supported());
    }
}
