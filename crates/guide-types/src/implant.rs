use serde::{Deserialize, Serialize};

/// Sleeve radius assumed when a record does not carry one.
pub const DEFAULT_SLEEVE_RADIUS_MM: f64 = 2.5;

/// An implant position with the radius of its guide sleeve.
///
/// Used for both planned and ground-truth implants. Deserializes from either
/// `{"position": [x, y, z], "sleeve_radius_mm": r}` or the flat
/// `{"x": .., "y": .., "z": ..}` form found in ground-truth files. Missing
/// coordinates read as 0.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ImplantRecord")]
pub struct Implant {
    pub position: [f64; 3],
    pub sleeve_radius_mm: f64,
}

impl Implant {
    pub fn new(position: [f64; 3]) -> Self {
        Self {
            position,
            sleeve_radius_mm: DEFAULT_SLEEVE_RADIUS_MM,
        }
    }

    pub fn with_radius(position: [f64; 3], sleeve_radius_mm: f64) -> Self {
        Self {
            position,
            sleeve_radius_mm,
        }
    }

    /// Euclidean distance between implant centers.
    pub fn distance_to(&self, other: &Implant) -> f64 {
        let dx = self.position[0] - other.position[0];
        let dy = self.position[1] - other.position[1];
        let dz = self.position[2] - other.position[2];
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Wire form accepted for implants.
#[derive(Debug, Clone, Default, Deserialize)]
struct ImplantRecord {
    #[serde(default)]
    position: Option<Vec<f64>>,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    z: Option<f64>,
    #[serde(default)]
    sleeve_radius_mm: Option<f64>,
}

impl From<ImplantRecord> for Implant {
    fn from(record: ImplantRecord) -> Self {
        let position = match record.position {
            Some(coords) => {
                let at = |i: usize| coords.get(i).copied().unwrap_or(0.0);
                [at(0), at(1), at(2)]
            }
            None => [
                record.x.unwrap_or(0.0),
                record.y.unwrap_or(0.0),
                record.z.unwrap_or(0.0),
            ],
        };
        Implant {
            position,
            sleeve_radius_mm: record
                .sleeve_radius_mm
                .unwrap_or(DEFAULT_SLEEVE_RADIUS_MM),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn deserialize_position_form() {
        let implant: Implant =
            serde_json::from_str(r#"{"position": [1.0, 2.0, 3.0], "sleeve_radius_mm": 2.0}"#)
                .unwrap();
        assert_eq!(implant.position, [1.0, 2.0, 3.0]);
        assert_relative_eq!(implant.sleeve_radius_mm, 2.0);
    }

    #[test]
    fn deserialize_flat_form_defaults_radius() {
        let implant: Implant = serde_json::from_str(r#"{"x": 4.0, "z": -1.5}"#).unwrap();
        assert_eq!(implant.position, [4.0, 0.0, -1.5]);
        assert_relative_eq!(implant.sleeve_radius_mm, DEFAULT_SLEEVE_RADIUS_MM);
    }

    #[test]
    fn short_position_pads_with_zero() {
        let implant: Implant = serde_json::from_str(r#"{"position": [7.0]}"#).unwrap();
        assert_eq!(implant.position, [7.0, 0.0, 0.0]);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Implant::new([0.0, 0.0, 0.0]);
        let b = Implant::new([3.0, 4.0, 0.0]);
        assert_relative_eq!(a.distance_to(&b), 5.0);
        assert_relative_eq!(b.distance_to(&a), 5.0);
    }
}
