//! hpra-parser CLI entry point.
//!
//! Initializes logging and delegates to the CLI module for command handling.

mod cli;

use std::process::ExitCode;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> anyhow::Result<ExitCode> {
    // Parse CLI arguments first to get log_level
    let cli = cli::parse_cli();

    // Priority: RUST_LOG env var > --log-level CLI arg > default "info".
    // `log` records from dependencies are bridged through tracing-log by init().
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    if cli.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }

    cli::run_with_cli(cli)
}
