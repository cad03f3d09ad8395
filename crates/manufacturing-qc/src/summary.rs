use std::collections::BTreeMap;

use guide_types::{Implant, Mesh};
use mesh_kernel::MeshKernel;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::check::QcCheck;
use crate::collision::{sleeve_collision_check, CollisionResult};
use crate::config::QcConfig;
use crate::orientation::{printable_orientation_score, OrientationResult};
use crate::thickness::{minimum_thickness, ThicknessResult};
use crate::undercut::{undercut_detection, UndercutResult};

/// All four checks for one guide. `passes` is their conjunction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QcSummary {
    pub minimum_thickness: ThicknessResult,
    pub sleeve_collision: CollisionResult,
    pub undercut: UndercutResult,
    pub printable_orientation: OrientationResult,
    pub passes: bool,
}

impl QcSummary {
    pub fn checks(&self) -> [&dyn QcCheck; 4] {
        [
            &self.minimum_thickness,
            &self.sleeve_collision,
            &self.undercut,
            &self.printable_orientation,
        ]
    }

    /// Check name to verdict.
    pub fn flags(&self) -> BTreeMap<&'static str, bool> {
        self.checks()
            .iter()
            .map(|c| (c.name(), c.passes()))
            .collect()
    }
}

/// Run every check. Computed fresh each call; nothing is cached.
#[instrument(skip_all, fields(implants = implants.len()))]
pub fn qc_summary(
    kernel: &dyn MeshKernel,
    mesh: Option<&Mesh>,
    implants: &[Implant],
    config: &QcConfig,
) -> QcSummary {
    let minimum_thickness = minimum_thickness(mesh, config);
    let sleeve_collision = sleeve_collision_check(implants);
    let undercut = undercut_detection(kernel, mesh, config);
    let printable_orientation = printable_orientation_score(mesh, config);

    let passes = minimum_thickness.passes
        && sleeve_collision.passes
        && undercut.passes
        && printable_orientation.passes;
    info!(
        passes,
        thickness_mm = minimum_thickness.minimum_thickness_mm,
        collisions = sleeve_collision.collisions.len(),
        undercut_risk = undercut.undercut_risk,
        orientation_score = printable_orientation.score,
        "manufacturing qc complete"
    );

    QcSummary {
        minimum_thickness,
        sleeve_collision,
        undercut,
        printable_orientation,
        passes,
    }
}
