//! dental-guide - clinical regression validation for surgical guides.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;
use validation_suite::{run_validation, RunnerConfig, StandInPipeline};

#[derive(Parser)]
#[command(name = "dental-guide")]
#[command(about = "Dental surgical guide pipeline tools", long_about = None)]
struct Cli {
    /// Run the clinical validation suite on a dataset directory
    #[arg(long, value_name = "DATASET_PATH")]
    validate: Option<PathBuf>,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let Some(dataset) = cli.validate else {
        let _ = Cli::command().print_help();
        println!();
        return ExitCode::SUCCESS;
    };

    match validate(&dataset) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn validate(dataset: &Path) -> Result<u8> {
    let kernel = mesh_kernel::default_kernel();
    let config = RunnerConfig::default();
    let summary = run_validation(dataset, &StandInPipeline, &config)
        .with_context(|| format!("validation of {} failed", dataset.display()))?;

    println!(
        "[DG][VALIDATION] Completed | cases={} pass_rate={:.2}%",
        summary.rows.len(),
        summary.pass_rate * 100.0
    );
    let outputs = summary.outputs(kernel.as_ref());
    println!("{}", serde_json::to_string_pretty(&outputs)?);

    Ok(summary.exit_code())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
