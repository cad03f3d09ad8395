use guide_ops::run_stage;
use guide_types::Mesh;
use mesh_kernel::MeshKernel;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::check::{round3, QcCheck};
use crate::config::QcConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UndercutResult {
    pub undercut_risk: f64,
    pub passes: bool,
}

impl UndercutResult {
    /// Verdict when no normals are available.
    fn unknown() -> Self {
        Self {
            undercut_risk: 0.0,
            passes: true,
        }
    }
}

impl QcCheck for UndercutResult {
    fn name(&self) -> &'static str {
        "undercut"
    }

    fn metric_value(&self) -> f64 {
        self.undercut_risk
    }

    fn passes(&self) -> bool {
        self.passes
    }
}

/// Fraction of points whose normal points against the build axis.
///
/// Fails open: an absent mesh, a kernel without normal support, or a kernel
/// failure reports zero risk and passes.
pub fn undercut_detection(
    kernel: &dyn MeshKernel,
    mesh: Option<&Mesh>,
    config: &QcConfig,
) -> UndercutResult {
    let Some(mesh) = mesh else {
        return UndercutResult::unknown();
    };
    let Some(axis) = unit(config.build_axis) else {
        warn!(axis = ?config.build_axis, "degenerate build axis, skipping undercut check");
        return UndercutResult::unknown();
    };

    let normals = match run_stage("point_normals", || kernel.point_normals(mesh)) {
        Ok(normals) if !normals.is_empty() => normals,
        Ok(_) => return UndercutResult::unknown(),
        Err(err) if err.is_not_supported() => {
            debug!(error = %err, "no point normals, undercut check skipped");
            return UndercutResult::unknown();
        }
        Err(err) => {
            warn!(error = %err, "point normals failed, undercut check skipped");
            return UndercutResult::unknown();
        }
    };

    let backward = normals
        .iter()
        .filter(|n| {
            n[0] * axis[0] + n[1] * axis[1] + n[2] * axis[2] < config.undercut_normal_threshold
        })
        .count();
    let risk = backward as f64 / normals.len() as f64;
    UndercutResult {
        undercut_risk: round3(risk),
        passes: risk < config.max_undercut_risk,
    }
}

fn unit(v: [f64; 3]) -> Option<[f64; 3]> {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    (len > 1e-12 && len.is_finite()).then(|| [v[0] / len, v[1] / len, v[2] / len])
}
