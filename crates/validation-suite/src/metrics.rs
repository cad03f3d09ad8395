//! Accuracy and safety metrics for planned implants.

use guide_types::Implant;
use serde::{Deserialize, Serialize};

/// Minimum clearance between a drilling path and the nerve canal, mm.
pub const MIN_CANAL_CLEARANCE_MM: f64 = 2.0;

/// Root-mean-square distance between planned and ground-truth implant
/// centers.
///
/// Implants are paired by index up to the shorter list; no correspondence
/// search is done, so both lists must enumerate implants in the same order.
/// Returns 0.0 when either list is empty.
pub fn implant_deviation(planned: &[Implant], ground_truth: &[Implant]) -> f64 {
    let n = planned.len().min(ground_truth.len());
    if n == 0 {
        return 0.0;
    }
    let sum_sq: f64 = planned
        .iter()
        .zip(ground_truth)
        .map(|(p, g)| {
            let d = p.distance_to(g);
            d * d
        })
        .sum();
    (sum_sq / n as f64).sqrt()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafetyMargin {
    pub min_distance: f64,
    /// Clearance beyond the required minimum, never negative.
    pub safety_margin: f64,
    pub is_safe: bool,
}

pub fn safety_margin(min_distance: f64) -> SafetyMargin {
    SafetyMargin {
        min_distance,
        safety_margin: (min_distance - MIN_CANAL_CLEARANCE_MM).max(0.0),
        is_safe: min_distance >= MIN_CANAL_CLEARANCE_MM,
    }
}
