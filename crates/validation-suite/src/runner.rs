//! Sequential validation over a dataset of cases.
//!
//! Each case goes `loaded -> pipeline-executed -> scored -> recorded`. A case
//! that fails to load aborts the run; every other problem ends up as data in
//! the case's row.

use std::path::{Path, PathBuf};
use std::time::Instant;

use mesh_kernel::MeshKernel;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::config::{RunnerConfig, ValidationThresholds};
use crate::dataset::{collect_case_dirs, load_case, CaseRecord};
use crate::error::{DatasetError, ValidationError};
use crate::metrics::{implant_deviation, safety_margin};
use crate::planning::{pseudo_planned_implants, stand_in_canal_distance};
use crate::report::{write_csv, write_html};

/// What the pipeline measured for one case.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaseMetrics {
    pub rmse: f64,
    pub min_canal_distance: f64,
    pub guide_generated: bool,
    pub execution_time_ms: u64,
}

/// Runs the production pipeline (or a stand-in) on one case.
pub trait CasePipeline {
    fn run(&self, case: &CaseRecord) -> CaseMetrics;
}

/// Deterministic replacement for the real registration/planning/guide
/// pipeline. See [`crate::planning`].
///
/// `execution_time_ms` covers planning and scoring only. The CBCT directory
/// check runs before the clock starts.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandInPipeline;

impl CasePipeline for StandInPipeline {
    fn run(&self, case: &CaseRecord) -> CaseMetrics {
        let registration_ok = case.cbct_dir.exists() && case.ios_path.is_some();

        let start = Instant::now();
        let planned = pseudo_planned_implants(&case.ground_truth_implants, &case.case_id);
        let rmse = implant_deviation(&planned, &case.ground_truth_implants);
        let guide_generated = registration_ok && !planned.is_empty();
        let canal = safety_margin(stand_in_canal_distance(&case.case_id));

        CaseMetrics {
            rmse,
            min_canal_distance: canal.min_distance,
            guide_generated,
            execution_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// One scored case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRow {
    pub case_id: String,
    pub rmse: f64,
    pub min_canal_distance: f64,
    pub guide_generated: bool,
    pub execution_time_ms: u64,
    pub passed: bool,
}

impl ValidationRow {
    pub fn score(
        case_id: impl Into<String>,
        metrics: CaseMetrics,
        thresholds: &ValidationThresholds,
    ) -> Self {
        Self {
            case_id: case_id.into(),
            rmse: metrics.rmse,
            min_canal_distance: metrics.min_canal_distance,
            guide_generated: metrics.guide_generated,
            execution_time_ms: metrics.execution_time_ms,
            passed: thresholds.case_passes(
                metrics.rmse,
                metrics.min_canal_distance,
                metrics.guide_generated,
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub rows: Vec<ValidationRow>,
    pub guide_success_rate: f64,
    pub pass_rate: f64,
    pub thresholds: ValidationThresholds,
    pub csv_path: PathBuf,
    pub html_path: PathBuf,
}

impl RunSummary {
    pub fn all_passed(&self) -> bool {
        self.thresholds.success_rate_ok(self.guide_success_rate)
            && self.rows.iter().all(|r| r.passed)
    }

    /// Report locations and the geometry kernel the run was made with, as
    /// printed by the `dental-guide` binary.
    pub fn outputs(&self, kernel: &dyn MeshKernel) -> serde_json::Value {
        serde_json::json!({
            "kernel": kernel.name(),
            "csv": self.csv_path.display().to_string(),
            "html": self.html_path.display().to_string(),
        })
    }

    /// Process exit code: 0 on full pass, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.all_passed() {
            0
        } else {
            1
        }
    }
}

/// Load, run and score each case directory in order.
pub fn evaluate_cases(
    case_dirs: &[PathBuf],
    pipeline: &dyn CasePipeline,
    thresholds: &ValidationThresholds,
) -> Result<Vec<ValidationRow>, DatasetError> {
    let mut rows = Vec::with_capacity(case_dirs.len());
    for dir in case_dirs {
        let case = load_case(dir)?;
        let metrics = pipeline.run(&case);
        let row = ValidationRow::score(case.case_id, metrics, thresholds);
        info!(
            case_id = %row.case_id,
            rmse = row.rmse,
            min_canal_distance = row.min_canal_distance,
            guide_generated = row.guide_generated,
            execution_time_ms = row.execution_time_ms,
            passed = row.passed,
            "case validated"
        );
        rows.push(row);
    }
    Ok(rows)
}

/// Validate every case under `dataset` and write the CSV and HTML reports.
#[instrument(skip_all, fields(dataset = %dataset.display()))]
pub fn run_validation(
    dataset: &Path,
    pipeline: &dyn CasePipeline,
    config: &RunnerConfig,
) -> Result<RunSummary, ValidationError> {
    let case_dirs = collect_case_dirs(dataset)?;
    let rows = evaluate_cases(&case_dirs, pipeline, &config.thresholds)?;

    let guide_success_rate = fraction(&rows, |r| r.guide_generated);
    let pass_rate = fraction(&rows, |r| r.passed);

    write_csv(&config.csv_path, &rows)?;
    write_html(&config.html_path, &rows, &config.thresholds, pass_rate)?;

    let summary = RunSummary {
        rows,
        guide_success_rate,
        pass_rate,
        thresholds: config.thresholds,
        csv_path: config.csv_path.clone(),
        html_path: config.html_path.clone(),
    };
    info!(
        cases = summary.rows.len(),
        guide_success_rate,
        pass_rate,
        passed = summary.all_passed(),
        "validation run complete"
    );
    Ok(summary)
}

fn fraction(rows: &[ValidationRow], pred: impl Fn(&ValidationRow) -> bool) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    rows.iter().filter(|r| pred(r)).count() as f64 / rows.len() as f64
}
