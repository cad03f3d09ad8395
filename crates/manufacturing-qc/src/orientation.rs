use guide_types::Mesh;
use serde::{Deserialize, Serialize};

use crate::check::{round3, QcCheck};
use crate::config::QcConfig;

/// Extents below this are treated as this, so flat or absent meshes score
/// instead of dividing by zero.
const MIN_EXTENT: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrientationResult {
    pub score: f64,
    pub passes: bool,
}

impl QcCheck for OrientationResult {
    fn name(&self) -> &'static str {
        "printable_orientation"
    }

    fn metric_value(&self) -> f64 {
        self.score
    }

    fn passes(&self) -> bool {
        self.passes
    }
}

/// Printability confidence in [0, 1] for printing as placed: x/y extents
/// form the footprint, z is the height.
///
/// The footprint term grows linearly up to `full_footprint_mm2`. Slenderness
/// (height over the larger of width and depth) past `slenderness_onset`
/// cuts the score by up to half across `slenderness_band`.
pub fn printable_orientation_score(mesh: Option<&Mesh>, config: &QcConfig) -> OrientationResult {
    let [dx, dy, dz] = mesh
        .and_then(Mesh::bounds)
        .map(|b| b.dimensions())
        .unwrap_or([0.0; 3]);
    let width = dx.max(MIN_EXTENT);
    let depth = dy.max(MIN_EXTENT);
    let height = dz.max(MIN_EXTENT);

    let footprint = width * depth;
    let slenderness = height / width.max(depth);

    let footprint_score = (footprint / config.full_footprint_mm2).min(1.0);
    let penalty =
        ((slenderness - config.slenderness_onset) / config.slenderness_band).clamp(0.0, 1.0);
    let score = (footprint_score * (1.0 - 0.5 * penalty)).clamp(0.0, 1.0);
    let score = if score.is_finite() { score } else { 0.0 };

    OrientationResult {
        score: round3(score),
        passes: score >= config.min_orientation_score,
    }
}
