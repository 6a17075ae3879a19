//! Command definitions for hpra-parser.

mod convert;
mod verify;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use hpra::config::loader::validate_config;
use hpra::{load_config, Config};

pub use convert::ConvertArgs;
pub use verify::VerifyArgs;

/// Batch converter for HPRA medicinal-product XML exports.
#[derive(Parser, Debug)]
#[command(name = "hpra-parser")]
#[command(about = "Convert HPRA product XML exports to JSON with checksum ledgers and quality reports")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Convert XML files (or every .xml in the input directory) to JSON.
    Convert(ConvertArgs),

    /// Re-hash the files listed in a checksum ledger.
    Verify(VerifyArgs),
}

/// Directory options shared by both subcommands.
#[derive(clap::Args, Debug, Default)]
pub struct DirectoryArgs {
    /// Configuration file (.json, .yaml or .yml).
    #[arg(short, long, env = "HPRA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Input directory containing XML files.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output directory for JSON, ledger and reports.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl DirectoryArgs {
    /// Loads the config file (or defaults) and applies directory overrides.
    pub fn load(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(input) = &self.input {
            config.input_dir = input.clone();
        }
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
        Ok(config)
    }
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}

pub fn run_with_cli(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Convert(args) => convert::run_convert_command(args),
        Commands::Verify(args) => verify::run_verify_command(args),
    }
}

/// Final validation after CLI overrides are layered on.
fn validated(config: Config) -> anyhow::Result<Config> {
    validate_config(&config).context("Invalid configuration")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_log_flags() {
        let cli = Cli::try_parse_from(["hpra-parser", "verify", "--log-level", "debug", "--log-json"])
            .unwrap();
        assert_eq!(cli.log_level, "debug");
        assert!(cli.log_json);
    }

    #[test]
    fn test_directory_overrides_config_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("hpra.yaml");
        std::fs::write(&config_path, "input_dir: from_file/in\noutput_dir: from_file/out\n").unwrap();

        let args = DirectoryArgs {
            config: Some(config_path),
            input: None,
            output: Some(PathBuf::from("cli/out")),
        };
        let config = args.load().unwrap();

        assert_eq!(config.input_dir, PathBuf::from("from_file/in"));
        assert_eq!(config.output_dir, PathBuf::from("cli/out"));
    }

    #[test]
    fn test_same_directories_rejected() {
        let args = DirectoryArgs {
            config: None,
            input: Some(PathBuf::from("data")),
            output: Some(PathBuf::from("data")),
        };
        assert!(validated(args.load().unwrap()).is_err());
    }
}
