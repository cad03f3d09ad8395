use guide_types::Mesh;
use serde::{Deserialize, Serialize};

use crate::check::{round3, QcCheck};
use crate::config::QcConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThicknessResult {
    pub minimum_thickness_mm: f64,
    pub passes: bool,
}

impl QcCheck for ThicknessResult {
    fn name(&self) -> &'static str {
        "minimum_thickness"
    }

    fn metric_value(&self) -> f64 {
        self.minimum_thickness_mm
    }

    fn passes(&self) -> bool {
        self.passes
    }
}

/// Thickness proxy: the smallest non-zero bounding-box extent. A coarse
/// stand-in for a local thickness field; an absent or empty mesh measures
/// zero.
pub fn minimum_thickness(mesh: Option<&Mesh>, config: &QcConfig) -> ThicknessResult {
    let estimated = mesh
        .and_then(Mesh::bounds)
        .map(|b| {
            b.dimensions()
                .into_iter()
                .filter(|d| *d > 0.0)
                .fold(f64::INFINITY, f64::min)
        })
        .filter(|d| d.is_finite())
        .unwrap_or(0.0);

    ThicknessResult {
        minimum_thickness_mm: round3(estimated),
        passes: estimated >= config.min_thickness_mm,
    }
}
