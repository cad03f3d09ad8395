//! Deterministic stand-in for implant planning.
//!
//! This is a test fixture, not a clinical algorithm. Planned implants are
//! ground truth shifted by an offset derived from a hash of the case id, so
//! a case replays identically on every run. Validation numbers produced from
//! it say nothing about real planning accuracy.

use guide_types::Implant;
use md5::{Digest, Md5};

/// First four bytes of MD5(case id), big-endian. Equal to reading the first
/// eight hex digits of the digest as an integer.
pub fn stable_seed(case_id: &str) -> u32 {
    let digest = Md5::digest(case_id.as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Ground truth perturbed by a seed-derived offset. An empty ground truth
/// yields an empty plan.
pub fn pseudo_planned_implants(ground_truth: &[Implant], case_id: &str) -> Vec<Implant> {
    let seed = stable_seed(case_id);
    let jitter = f64::from(seed % 8) / 10.0;
    let sign = if seed % 2 == 1 { -1.0 } else { 1.0 };
    let offset = [0.2 * sign + jitter / 10.0, 0.1 * sign, 0.15 * sign];

    ground_truth
        .iter()
        .map(|gt| {
            Implant::new([
                gt.position[0] + offset[0],
                gt.position[1] + offset[1],
                gt.position[2] + offset[2],
            ])
        })
        .collect()
}

/// Canal clearance reported for a case, mm. Ranges over 1.8..=3.0 in 0.2 steps.
pub fn stand_in_canal_distance(case_id: &str) -> f64 {
    1.8 + f64::from(stable_seed(case_id) % 7) * 0.2
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn seed_is_leading_digest_digits() {
        assert_eq!(stable_seed("case_001"), 1_744_438_688);
        assert_eq!(stable_seed("case_002"), 3_984_057_931);
        assert_eq!(stable_seed("case_004"), 767_974_787);
        assert_eq!(stable_seed("case_001"), stable_seed("case_001"));
        assert_ne!(stable_seed("case_001"), stable_seed("case_002"));
    }

    #[test]
    fn canal_distance_follows_seed() {
        assert_relative_eq!(stand_in_canal_distance("case_002"), 1.8, epsilon = 1e-12);
        assert_relative_eq!(stand_in_canal_distance("case_003"), 2.6, epsilon = 1e-12);
        assert_relative_eq!(stand_in_canal_distance("case_001"), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn odd_seed_shifts_negative() {
        // case_004 seed is odd, seed % 8 == 3
        let plan = pseudo_planned_implants(&[Implant::new([10.0, 10.0, 10.0])], "case_004");
        assert_eq!(plan.len(), 1);
        assert_relative_eq!(plan[0].position[0], 10.0 - 0.2 + 0.03, epsilon = 1e-12);
        assert_relative_eq!(plan[0].position[1], 9.9, epsilon = 1e-12);
        assert_relative_eq!(plan[0].position[2], 9.85, epsilon = 1e-12);
    }

    #[test]
    fn even_seed_without_jitter() {
        // case_003 seed is even, seed % 8 == 0
        let plan = pseudo_planned_implants(&[Implant::new([0.0; 3])], "case_003");
        assert_relative_eq!(plan[0].position[0], 0.2, epsilon = 1e-12);
        assert_relative_eq!(plan[0].position[1], 0.1, epsilon = 1e-12);
        assert_relative_eq!(plan[0].position[2], 0.15, epsilon = 1e-12);
    }

    #[test]
    fn empty_ground_truth_plans_nothing() {
        assert!(pseudo_planned_implants(&[], "case_001").is_empty());
    }
}
