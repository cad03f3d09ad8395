//! Batch clinical-regression validation for dental guides.
//!
//! Loads labeled case directories, runs each through a [`CasePipeline`],
//! scores the result against [`ValidationThresholds`], and writes a CSV
//! summary plus an HTML report. The process exit code of the
//! `dental-guide` binary carries the overall verdict.

pub mod config;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod planning;
pub mod report;
pub mod runner;

pub use config::{RunnerConfig, ValidationThresholds};
pub use dataset::{collect_case_dirs, load_case, CaseRecord};
pub use error::{DatasetError, ValidationError};
pub use metrics::{implant_deviation, safety_margin, SafetyMargin, MIN_CANAL_CLEARANCE_MM};
pub use runner::{
    evaluate_cases, run_validation, CaseMetrics, CasePipeline, RunSummary, StandInPipeline,
    ValidationRow,
};
