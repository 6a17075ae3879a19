use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use hpra::integrity::{load_ledger, verify_ledger, LEDGER_FILENAME};

use super::{validated, DirectoryArgs};

/// Arguments for `hpra-parser verify`.
#[derive(clap::Args, Debug, Default)]
pub struct VerifyArgs {
    /// Ledger to verify (default: <output>/checksums.csv).
    #[arg(long)]
    pub ledger: Option<PathBuf>,

    #[command(flatten)]
    pub dirs: DirectoryArgs,
}

/// Exit code 1 when any entry is missing or no longer matches.
pub fn run_verify_command(args: VerifyArgs) -> anyhow::Result<ExitCode> {
    if verify(&args)? > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Prints one line per ledger entry and returns the number of failures.
fn verify(args: &VerifyArgs) -> anyhow::Result<usize> {
    let config = validated(args.dirs.load()?)?;
    let ledger_path = args
        .ledger
        .clone()
        .unwrap_or_else(|| config.output_dir.join(LEDGER_FILENAME));

    let records = load_ledger(&ledger_path)
        .with_context(|| format!("Failed to load ledger {}", ledger_path.display()))?;
    let results = verify_ledger(&records, &config.input_dir, &config.output_dir);

    let mut failed = 0usize;
    for result in &results {
        if result.outcome.is_ok() {
            println!("OK    {} ({})", result.record.relative_path, result.record.file_type);
        } else {
            failed += 1;
            println!(
                "FAIL  {} ({}): {}",
                result.record.relative_path, result.record.file_type, result.outcome
            );
        }
    }
    println!("{} entries verified, {} failed", results.len(), failed);

    Ok(failed)
}
