use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Emit flattened JSON suitable for spreadsheets/BI tools.
    #[serde(default)]
    pub flatten: bool,
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_true")]
    pub report_enabled: bool,
    #[serde(default)]
    pub report_format: ReportFormat,
    #[serde(default = "default_true")]
    pub checksums_enabled: bool,
    /// Append to an existing checksum ledger instead of overwriting it.
    #[serde(default)]
    pub checksum_append: bool,
}

fn default_true() -> bool {
    true
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("data").join("input")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data").join("output")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            flatten: false,
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            report_enabled: true,
            report_format: ReportFormat::default(),
            checksums_enabled: true,
            checksum_append: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Excel,
    Text,
    Both,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportFormat::Excel => "excel",
            ReportFormat::Text => "text",
            ReportFormat::Both => "both",
        };
        f.write_str(name)
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "excel" | "xlsx" => Ok(ReportFormat::Excel),
            "text" | "txt" => Ok(ReportFormat::Text),
            "both" => Ok(ReportFormat::Both),
            other => Err(format!(
                "unknown report format '{}' (expected excel, text or both)",
                other
            )),
        }
    }
}
