//! Quality summary reports rendered from a finished batch.

pub mod excel;
pub mod text;

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::config::ReportFormat;
use crate::error::ReportError;
use crate::metrics::BatchMetrics;
use crate::sanitize;

pub use excel::{excel_available, ExcelReport};
pub use text::{render_text_report, TextReport};

pub const REPORT_TITLE: &str = "HPRA Parser - Quality Summary Report";

/// Frequent issues listed in the text report.
pub const TEXT_ISSUE_LIMIT: usize = 10;
/// Frequent issues listed on the spreadsheet's issues sheet.
pub const SHEET_ISSUE_LIMIT: usize = 20;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// `quality_report_<YYYYMMDD>_<HHMMSS>`, without extension.
pub fn report_basename(start_time: NaiveDateTime) -> String {
    format!("quality_report_{}", start_time.format("%Y%m%d_%H%M%S"))
}

/// A single report rendering.
pub trait ReportWriter: Send + Sync {
    fn extension(&self) -> &'static str;

    fn write(&self, metrics: &BatchMetrics, path: &Path) -> Result<(), ReportError>;
}

pub struct ReportGenerator {
    excel: Box<dyn ReportWriter>,
    text: Box<dyn ReportWriter>,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_writers(Box::new(ExcelReport), Box::new(TextReport))
    }

    pub fn with_writers(excel: Box<dyn ReportWriter>, text: Box<dyn ReportWriter>) -> Self {
        Self { excel, text }
    }

    /// Writes the report(s) for `format` into `output_dir` and returns the
    /// paths produced. Failures degrade to the other rendering and are
    /// logged; they never propagate.
    pub fn generate(
        &self,
        metrics: &BatchMetrics,
        output_dir: &Path,
        format: ReportFormat,
    ) -> Vec<PathBuf> {
        let basename = report_basename(metrics.start_time());
        let mut written = Vec::new();

        match format {
            ReportFormat::Excel => {
                match self.write_one(self.excel.as_ref(), metrics, output_dir, &basename) {
                    Ok(path) => written.push(path),
                    Err(e) => {
                        warn!("Spreadsheet report failed ({}), falling back to text", e);
                        written.extend(self.try_write(self.text.as_ref(), metrics, output_dir, &basename));
                    }
                }
            }
            ReportFormat::Text => {
                match self.write_one(self.text.as_ref(), metrics, output_dir, &basename) {
                    Ok(path) => written.push(path),
                    Err(e) => {
                        warn!("Text report failed ({}), trying spreadsheet", e);
                        written.extend(self.try_write(self.excel.as_ref(), metrics, output_dir, &basename));
                    }
                }
            }
            ReportFormat::Both => {
                written.extend(self.try_write(self.excel.as_ref(), metrics, output_dir, &basename));
                written.extend(self.try_write(self.text.as_ref(), metrics, output_dir, &basename));
            }
        }

        written
    }

    fn try_write(
        &self,
        writer: &dyn ReportWriter,
        metrics: &BatchMetrics,
        output_dir: &Path,
        basename: &str,
    ) -> Option<PathBuf> {
        match self.write_one(writer, metrics, output_dir, basename) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("{} report failed: {}", writer.extension(), e);
                None
            }
        }
    }

    fn write_one(
        &self,
        writer: &dyn ReportWriter,
        metrics: &BatchMetrics,
        output_dir: &Path,
        basename: &str,
    ) -> Result<PathBuf, ReportError> {
        let path = output_dir.join(format!("{}.{}", basename, writer.extension()));
        writer.write(metrics, &path)?;
        info!("Report written: {}", sanitize::redact_path(&path));
        Ok(path)
    }
}
