use guide_types::Implant;
use serde::{Deserialize, Serialize};

use crate::check::{round3, QcCheck};

/// Two sleeves closer than the sum of their radii.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collision {
    pub implant_a: usize,
    pub implant_b: usize,
    /// Center distance, rounded to three decimals.
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionResult {
    pub passes: bool,
    pub collisions: Vec<Collision>,
}

impl QcCheck for CollisionResult {
    fn name(&self) -> &'static str {
        "sleeve_collision"
    }

    /// Number of colliding pairs.
    fn metric_value(&self) -> f64 {
        self.collisions.len() as f64
    }

    fn passes(&self) -> bool {
        self.passes
    }
}

/// Check every implant pair (i < j) for overlapping sleeves.
pub fn sleeve_collision_check(implants: &[Implant]) -> CollisionResult {
    let mut collisions = Vec::new();
    for (i, a) in implants.iter().enumerate() {
        for (j, b) in implants.iter().enumerate().skip(i + 1) {
            let distance = a.distance_to(b);
            if distance < a.sleeve_radius_mm + b.sleeve_radius_mm {
                collisions.push(Collision {
                    implant_a: i,
                    implant_b: j,
                    distance: round3(distance),
                });
            }
        }
    }
    CollisionResult {
        passes: collisions.is_empty(),
        collisions,
    }
}
