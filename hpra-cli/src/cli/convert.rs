use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use hpra::pipeline::{BatchInput, BatchOutcome, LogProgress, Pipeline, PipelineConfig};
use hpra::{Config, ReportFormat};
use tracing::{info, warn};

use super::{validated, DirectoryArgs};

/// Arguments for `hpra-parser convert`.
#[derive(clap::Args, Debug, Default)]
pub struct ConvertArgs {
    /// Specific XML files to process (relative to the input directory
    /// unless absolute). Without files, every .xml in the input directory
    /// is processed.
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub dirs: DirectoryArgs,

    /// Emit flattened JSON (dot-separated keys).
    #[arg(long)]
    pub flatten: bool,

    /// Disable the quality summary report.
    #[arg(long)]
    pub no_report: bool,

    /// Report format: excel, text or both.
    #[arg(long)]
    pub report_format: Option<ReportFormat>,

    /// Disable checksum generation.
    #[arg(long)]
    pub no_checksums: bool,

    /// Append to an existing checksum ledger instead of overwriting it.
    #[arg(long)]
    pub checksum_append: bool,
}

impl ConvertArgs {
    /// Config file values with the command-line flags layered on top.
    fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = self.dirs.load()?;

        if self.flatten {
            config.flatten = true;
        }
        if self.no_report {
            config.report_enabled = false;
        }
        if let Some(format) = self.report_format {
            config.report_format = format;
        }
        if self.no_checksums {
            config.checksums_enabled = false;
        }
        if self.checksum_append {
            config.checksum_append = true;
        }

        validated(config)
    }

    fn batch_input(&self, config: &Config) -> BatchInput {
        if self.files.is_empty() {
            BatchInput::Directory(config.input_dir.clone())
        } else {
            BatchInput::Files(self.files.clone())
        }
    }
}

pub fn run_convert_command(args: ConvertArgs) -> anyhow::Result<ExitCode> {
    let config = args.resolve_config()?;
    info!(
        "Converting from {} to {} (flatten={})",
        config.input_dir.display(),
        config.output_dir.display(),
        config.flatten
    );

    let pipeline = Pipeline::from_config(Arc::new(PipelineConfig::from_config(&config)));
    let outcome = pipeline
        .run(args.batch_input(&config), &LogProgress)
        .context("Batch could not start")?;

    print_summary(&outcome);

    // Individual file failures are reported, not turned into an exit code.
    Ok(ExitCode::SUCCESS)
}

fn print_summary(outcome: &BatchOutcome) {
    let metrics = &outcome.metrics;

    println!(
        "Processed {} files: {} succeeded, {} warnings, {} failures, {} skipped",
        metrics.total_files(),
        metrics.total_succeeded(),
        metrics.total_warnings(),
        metrics.total_failures(),
        metrics.total_skipped()
    );
    println!("Total records: {}", metrics.total_records());
    println!("Success rate: {:.2}%", metrics.success_rate());

    if let Some(ledger) = &outcome.ledger_path {
        println!("Checksum ledger: {}", ledger.display());
    }
    for report in &outcome.report_paths {
        println!("Quality report: {}", report.display());
    }
    for warning in &outcome.warnings {
        warn!("{:?}", warning);
    }
}
