use std::path::PathBuf;

use crate::config::{Config, ReportFormat};

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input_directory: PathBuf,
    pub output_directory: PathBuf,
    pub flatten: bool,
    pub report_enabled: bool,
    pub report_format: ReportFormat,
    pub checksums_enabled: bool,
    pub checksum_append: bool,
}

impl PipelineConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            input_directory: config.input_dir.clone(),
            output_directory: config.output_dir.clone(),
            flatten: config.flatten,
            report_enabled: config.report_enabled,
            report_format: config.report_format,
            checksums_enabled: config.checksums_enabled,
            checksum_append: config.checksum_append,
        }
    }
}
