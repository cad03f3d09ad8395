use serde::{Deserialize, Serialize};

/// Errors from kernel operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum KernelError {
    #[error("invalid mesh: {reason}")]
    InvalidMesh { reason: String },

    #[error("boolean operation failed: {reason}")]
    BooleanFailed { reason: String },

    #[error("operation not supported by {kernel} kernel: {operation}")]
    NotSupported {
        kernel: &'static str,
        operation: &'static str,
    },

    #[error("failed to write mesh: {reason}")]
    WriteFailed { reason: String },
}

impl KernelError {
    /// True when the kernel lacks the capability, as opposed to failing at it.
    pub fn is_not_supported(&self) -> bool {
        matches!(self, KernelError::NotSupported { .. })
    }
}

pub type KernelResult<T> = Result<T, KernelError>;

/// Options for normal recomputation. Shared vertices are never split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalsOptions {
    /// Orient each closed shell so its normals point outward.
    pub auto_orient: bool,
    /// Make neighboring triangle windings agree.
    pub consistent: bool,
}

impl Default for NormalsOptions {
    fn default() -> Self {
        Self {
            auto_orient: true,
            consistent: true,
        }
    }
}

/// Parameters for decimation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecimateParams {
    /// Fraction of triangles to remove, in [0, 1].
    pub target_reduction: f64,
    /// Refuse collapses that would change the mesh topology.
    pub preserve_topology: bool,
    /// Allow collapsing edges that touch a boundary vertex.
    pub boundary_vertex_deletion: bool,
}

impl Default for DecimateParams {
    fn default() -> Self {
        Self {
            target_reduction: 0.10,
            preserve_topology: true,
            boundary_vertex_deletion: false,
        }
    }
}

/// Boundary and non-manifold edges of a mesh, as sorted point-index pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureEdges {
    /// Edges used by exactly one triangle.
    pub boundary: Vec<(u32, u32)>,
    /// Edges used by more than two triangles.
    pub non_manifold: Vec<(u32, u32)>,
}

impl FeatureEdges {
    pub fn is_empty(&self) -> bool {
        self.boundary.is_empty() && self.non_manifold.is_empty()
    }
}
