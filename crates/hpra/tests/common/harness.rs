//! Test harness for isolated batch execution.
//!
//! The `TestHarness` owns a temporary directory with `input/`, `output/`
//! and `config/` subdirectories and runs batches with a fixed clock so
//! report names and ledger timestamps are predictable.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;

use hpra::pipeline::{BatchInput, BatchOutcome, NoopProgress, Pipeline, PipelineConfig};
use hpra::report::ReportGenerator;
use hpra::{Config, FixedClock};

use super::builders::PipelineConfigBuilder;

pub struct TestHarness {
    temp_dir: TempDir,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub config_dir: PathBuf,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();

        let input_dir = base.join("input");
        let output_dir = base.join("output");
        let config_dir = base.join("config");

        std::fs::create_dir_all(&input_dir).expect("Failed to create input dir");
        std::fs::create_dir_all(&config_dir).expect("Failed to create config dir");

        Self {
            temp_dir,
            input_dir,
            output_dir,
            config_dir,
        }
    }

    /// The clock every harness batch runs with.
    pub fn batch_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(15, 9, 26)
            .unwrap()
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn write_input(&self, filename: &str, content: &str) -> PathBuf {
        let path = self.input_dir.join(filename);
        std::fs::write(&path, content).expect("Failed to write input file");
        path
    }

    /// Write `config` as JSON or YAML depending on the file extension.
    pub fn write_config(&self, filename: &str, config: &Config) -> PathBuf {
        let path = self.config_dir.join(filename);
        let content = if filename.ends_with(".yaml") || filename.ends_with(".yml") {
            serde_yaml::to_string(config).expect("Failed to serialize config")
        } else {
            serde_json::to_string_pretty(config).expect("Failed to serialize config")
        };
        std::fs::write(&path, content).expect("Failed to write config file");
        path
    }

    pub fn config(&self) -> PipelineConfigBuilder {
        PipelineConfigBuilder::new(&self.input_dir, &self.output_dir)
    }

    pub fn pipeline(&self, config: PipelineConfig) -> Pipeline {
        Pipeline::new(
            Arc::new(config),
            ReportGenerator::new(),
            Box::new(FixedClock(Self::batch_time())),
        )
    }

    pub fn run_directory(&self, config: PipelineConfig) -> BatchOutcome {
        self.pipeline(config)
            .run(BatchInput::Directory(self.input_dir.clone()), &NoopProgress)
            .expect("Batch setup failed")
    }

    pub fn run_files(&self, config: PipelineConfig, files: &[&str]) -> BatchOutcome {
        let files = files.iter().map(PathBuf::from).collect();
        self.pipeline(config)
            .run(BatchInput::Files(files), &NoopProgress)
            .expect("Batch setup failed")
    }

    pub fn output_path(&self, filename: &str) -> PathBuf {
        self.output_dir.join(filename)
    }

    pub fn read_output_json(&self, filename: &str) -> serde_json::Value {
        let content =
            std::fs::read_to_string(self.output_path(filename)).expect("Failed to read output");
        serde_json::from_str(&content).expect("Output is not valid JSON")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
