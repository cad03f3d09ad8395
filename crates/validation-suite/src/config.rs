use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Acceptance criteria for a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationThresholds {
    /// Largest acceptable implant position RMSE, mm.
    pub max_rmse: f64,
    /// Smallest acceptable canal clearance, mm.
    pub min_canal_distance: f64,
    /// The fraction of cases producing a guide must exceed this.
    pub min_guide_success_rate: f64,
}

impl ValidationThresholds {
    pub const DEFAULT: ValidationThresholds = ValidationThresholds {
        max_rmse: 1.5,
        min_canal_distance: 2.0,
        min_guide_success_rate: 0.95,
    };

    /// Per-case verdict.
    pub fn case_passes(&self, rmse: f64, min_canal_distance: f64, guide_generated: bool) -> bool {
        rmse <= self.max_rmse && min_canal_distance >= self.min_canal_distance && guide_generated
    }

    /// Run-level gate on the guide success rate. Strict: a rate equal to the
    /// minimum fails.
    pub fn success_rate_ok(&self, guide_success_rate: f64) -> bool {
        guide_success_rate > self.min_guide_success_rate
    }
}

impl Default for ValidationThresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Where a run reads its limits from and writes its reports to.
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    pub thresholds: ValidationThresholds,
    pub csv_path: PathBuf,
    pub html_path: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            thresholds: ValidationThresholds::DEFAULT,
            csv_path: PathBuf::from("validation_summary.csv"),
            html_path: PathBuf::from("validation_suite/reports/validation_report.html"),
        }
    }
}

impl RunnerConfig {
    /// Default file names placed under `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let defaults = Self::default();
        Self {
            thresholds: defaults.thresholds,
            csv_path: dir.join(defaults.csv_path),
            html_path: dir.join(defaults.html_path),
        }
    }
}
