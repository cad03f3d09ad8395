//! Best-effort mesh preparation for boolean operations.
//!
//! The chain runs in a fixed order. A stage that errors, panics, or empties
//! a non-empty mesh is skipped and the next stage receives the last good
//! mesh. No stage is retried.

use guide_types::Mesh;
use mesh_kernel::{DecimateParams, KernelResult, MeshKernel, NormalsOptions};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::stage::{run_stage, StageError};

/// Tunables for the preprocessing chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreprocessParams {
    /// Largest boundary loop radius that gets filled.
    pub hole_size: f64,
    /// Fraction of triangles the decimation stage tries to remove.
    pub target_reduction: f64,
}

impl Default for PreprocessParams {
    fn default() -> Self {
        Self {
            hole_size: 2.0,
            target_reduction: 0.10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Triangulate,
    Clean,
    FillHoles,
    RecomputeNormals,
    LargestComponent,
    Decimate,
}

impl Stage {
    /// Chain order.
    pub const CHAIN: [Stage; 6] = [
        Stage::Triangulate,
        Stage::Clean,
        Stage::FillHoles,
        Stage::RecomputeNormals,
        Stage::LargestComponent,
        Stage::Decimate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Triangulate => "triangulate",
            Stage::Clean => "clean",
            Stage::FillHoles => "fill_holes",
            Stage::RecomputeNormals => "recompute_normals",
            Stage::LargestComponent => "largest_component",
            Stage::Decimate => "decimate",
        }
    }

    fn apply(
        self,
        kernel: &dyn MeshKernel,
        mesh: &Mesh,
        params: &PreprocessParams,
    ) -> KernelResult<Mesh> {
        match self {
            Stage::Triangulate => kernel.triangulate(mesh),
            Stage::Clean => kernel.clean(mesh),
            Stage::FillHoles => kernel.fill_holes(mesh, params.hole_size),
            Stage::RecomputeNormals => kernel.recompute_normals(
                mesh,
                NormalsOptions {
                    auto_orient: true,
                    consistent: true,
                },
            ),
            Stage::LargestComponent => kernel.largest_component(mesh),
            Stage::Decimate => kernel.decimate(
                mesh,
                DecimateParams {
                    target_reduction: params.target_reduction,
                    preserve_topology: true,
                    boundary_vertex_deletion: false,
                },
            ),
        }
    }
}

/// What happened to one stage of the chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StageOutcome {
    Applied { stage: Stage },
    Skipped { stage: Stage, reason: String },
}

impl StageOutcome {
    pub fn stage(&self) -> Stage {
        match self {
            StageOutcome::Applied { stage } | StageOutcome::Skipped { stage, .. } => *stage,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, StageOutcome::Applied { .. })
    }
}

/// Run the full chain and report each stage's outcome in chain order.
pub fn preprocess_with_report(
    kernel: &dyn MeshKernel,
    mesh: &Mesh,
    params: &PreprocessParams,
) -> (Mesh, Vec<StageOutcome>) {
    let mut current = mesh.clone();
    let mut report = Vec::with_capacity(Stage::CHAIN.len());

    for stage in Stage::CHAIN {
        let outcome = match run_stage(stage.name(), || stage.apply(kernel, &current, params)) {
            Ok(out) if out.is_empty() && !current.is_empty() => {
                warn!(
                    stage = stage.name(),
                    "stage emptied the mesh, keeping previous"
                );
                StageOutcome::Skipped {
                    stage,
                    reason: "stage produced an empty mesh".to_string(),
                }
            }
            Ok(out) => {
                current = out;
                StageOutcome::Applied { stage }
            }
            Err(err) => {
                log_stage_error(&err);
                StageOutcome::Skipped {
                    stage,
                    reason: err.to_string(),
                }
            }
        };
        report.push(outcome);
    }

    let applied = report.iter().filter(|o| o.is_applied()).count();
    debug!(
        applied,
        points = current.point_count(),
        polys = current.poly_count(),
        "preprocessing complete"
    );
    (current, report)
}

pub fn preprocess(kernel: &dyn MeshKernel, mesh: &Mesh, params: &PreprocessParams) -> Mesh {
    preprocess_with_report(kernel, mesh, params).0
}

/// Absent meshes pass through untouched.
pub fn preprocess_optional(
    kernel: &dyn MeshKernel,
    mesh: Option<&Mesh>,
    params: &PreprocessParams,
) -> Option<Mesh> {
    mesh.map(|m| preprocess(kernel, m, params))
}

// ── Diagnostics ─────────────────────────────────────────────────────────────

/// True iff the mesh has faces and no boundary or non-manifold edges.
/// Any kernel failure reads as not watertight.
pub fn is_watertight(kernel: &dyn MeshKernel, mesh: &Mesh) -> bool {
    if mesh.poly_count() == 0 {
        return false;
    }
    match run_stage("feature_edges", || kernel.feature_edges(mesh)) {
        Ok(edges) => edges.is_empty(),
        Err(err) => {
            log_stage_error(&err);
            false
        }
    }
}

/// True iff the kernel finds at least one intersecting facet pair. Any
/// kernel failure reads as no intersections.
pub fn detect_self_intersections(kernel: &dyn MeshKernel, mesh: &Mesh) -> bool {
    match run_stage("self_intersections", || kernel.self_intersections(mesh)) {
        Ok(count) => count > 0,
        Err(err) => {
            log_stage_error(&err);
            false
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshQc {
    pub watertight: bool,
    pub self_intersections: bool,
}

pub fn mesh_qc(kernel: &dyn MeshKernel, mesh: &Mesh) -> MeshQc {
    MeshQc {
        watertight: is_watertight(kernel, mesh),
        self_intersections: detect_self_intersections(kernel, mesh),
    }
}

fn log_stage_error(err: &StageError) {
    if err.is_not_supported() {
        debug!(stage = err.stage(), error = %err, "kernel capability missing");
    } else {
        warn!(stage = err.stage(), error = %err, "stage failed, keeping previous mesh");
    }
}
