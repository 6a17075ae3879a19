use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, info_span, warn};

use crate::clock::{Clock, SystemClock};
use crate::convert::XmlConverter;
use crate::integrity::{self, ChecksumRecord, FileType, LEDGER_FILENAME};
use crate::metrics::{BatchMetrics, ConversionRecord};
use crate::report::ReportGenerator;
use crate::sanitize;
use crate::scanner::{self, DirectoryScanner};
use crate::storage;

use super::config::PipelineConfig;
use super::error::{PipelineError, PipelineWarning};
use super::progress::{ProgressEvent, ProgressReporter};

pub const NO_PRODUCTS_MESSAGE: &str = "No products found in XML file";
pub const MISSING_FILE_MESSAGE: &str = "File does not exist";
pub const OUTPUT_COLLISION_MESSAGE: &str = "Output name already used in this batch by";

/// What a batch should process.
#[derive(Debug, Clone)]
pub enum BatchInput {
    /// Explicit files; relative paths are taken against the input directory.
    Files(Vec<PathBuf>),
    /// Every `.xml` file directly inside the directory.
    Directory(PathBuf),
}

#[derive(Debug)]
pub struct BatchOutcome {
    pub metrics: BatchMetrics,
    pub checksums: Vec<ChecksumRecord>,
    pub ledger_path: Option<PathBuf>,
    pub report_paths: Vec<PathBuf>,
    pub warnings: Vec<PipelineWarning>,
}

pub struct Pipeline {
    config: Arc<PipelineConfig>,
    converter: XmlConverter,
    reports: ReportGenerator,
    clock: Box<dyn Clock>,
}

impl Pipeline {
    /// Production constructor: system clock and the default report writers.
    pub fn from_config(config: Arc<PipelineConfig>) -> Self {
        Self::new(config, ReportGenerator::new(), Box::new(SystemClock))
    }

    /// Inject the report generator and clock.
    pub fn new(
        config: Arc<PipelineConfig>,
        reports: ReportGenerator,
        clock: Box<dyn Clock>,
    ) -> Self {
        let converter = XmlConverter::new(config.flatten);
        Self {
            config,
            converter,
            reports,
            clock,
        }
    }

    /// Processes every target in order. Only directory setup and scanning
    /// can fail; problems with individual files are recorded in the metrics.
    pub fn run(
        &self,
        input: BatchInput,
        progress: &dyn ProgressReporter,
    ) -> Result<BatchOutcome, PipelineError> {
        let _batch_span = info_span!("batch", flatten = self.config.flatten).entered();

        storage::ensure_directory(&self.config.output_directory)?;
        let (targets, input_base) = self.resolve_targets(input)?;

        let mut metrics = BatchMetrics::new(self.clock.now());
        let mut checksums = Vec::new();
        let mut warnings = Vec::new();
        let mut claimed_outputs = HashMap::new();
        let total = targets.len();

        for (index, path) in targets.iter().enumerate() {
            let filename = sanitize::redact_path(path);
            let _file_span = info_span!("file", filename = %filename).entered();

            progress.report(ProgressEvent::Started {
                filename: &filename,
                index,
                total,
            });

            let record = self.process_file(
                path,
                &filename,
                &input_base,
                &mut claimed_outputs,
                &mut checksums,
                &mut warnings,
            );

            progress.report(ProgressEvent::Finished {
                filename: &filename,
                status: record.status,
                records_processed: record.records_processed,
                message: record.message.as_deref(),
            });
            metrics.add_result(record);
        }

        metrics.finalize(self.clock.now());

        let ledger_path = if self.config.checksums_enabled {
            self.write_ledger(&checksums, &mut warnings)
        } else {
            None
        };

        let report_paths = if self.config.report_enabled {
            let paths = self.reports.generate(
                &metrics,
                &self.config.output_directory,
                self.config.report_format,
            );
            if paths.is_empty() {
                warnings.push(PipelineWarning::NoReportWritten);
            }
            paths
        } else {
            Vec::new()
        };

        info!(
            "Batch complete: {} files, {} succeeded, {} warnings, {} failures, {} skipped ({:.2}% success)",
            metrics.total_files(),
            metrics.total_succeeded(),
            metrics.total_warnings(),
            metrics.total_failures(),
            metrics.total_skipped(),
            metrics.success_rate()
        );

        Ok(BatchOutcome {
            metrics,
            checksums,
            ledger_path,
            report_paths,
            warnings,
        })
    }

    /// Returns the files to process and the directory their ledger paths
    /// are relative to.
    fn resolve_targets(&self, input: BatchInput) -> Result<(Vec<PathBuf>, PathBuf), PipelineError> {
        match input {
            BatchInput::Directory(dir) => {
                storage::ensure_directory(&dir)?;
                let files = DirectoryScanner::new(&dir).scan()?;
                Ok((files, dir))
            }
            BatchInput::Files(paths) => {
                let base = self.config.input_directory.clone();
                let files = paths
                    .into_iter()
                    .map(|p| if p.is_absolute() { p } else { base.join(p) })
                    .collect();
                Ok((files, base))
            }
        }
    }

    fn process_file(
        &self,
        path: &Path,
        filename: &str,
        input_base: &Path,
        claimed_outputs: &mut HashMap<String, String>,
        checksums: &mut Vec<ChecksumRecord>,
        warnings: &mut Vec<PipelineWarning>,
    ) -> ConversionRecord {
        let now = self.clock.now();

        if !path.exists() {
            return ConversionRecord::skipped(filename, now, MISSING_FILE_MESSAGE);
        }
        if !scanner::is_xml_path(path) {
            return ConversionRecord::skipped(filename, now, unsupported_extension_message(path));
        }

        // The first file to map onto an output name keeps it for the whole
        // batch. Names compare case-insensitively.
        let output_path = self.output_path_for(path);
        let output_key = sanitize::redact_path(&output_path).to_lowercase();
        if let Some(owner) = claimed_outputs.get(&output_key) {
            return ConversionRecord::failure(
                filename,
                now,
                format!("{} '{}'", OUTPUT_COLLISION_MESSAGE, owner),
            );
        }
        claimed_outputs.insert(output_key, filename.to_string());

        let input_hash = if self.config.checksums_enabled {
            match ChecksumRecord::capture(path, FileType::Input, Some(input_base), now) {
                Ok(record) => {
                    let hash = record.sha256_hash.clone();
                    checksums.push(record);
                    Some(hash)
                }
                Err(e) => return ConversionRecord::failure(filename, now, e.record_message()),
            }
        } else {
            None
        };

        let converted = match self.converter.convert_to_file(path, &output_path) {
            Ok(converted) => converted,
            Err(e) => {
                debug!("Conversion failed: {}", e);
                return ConversionRecord::failure(filename, now, e.record_message())
                    .with_input_hash(input_hash);
            }
        };

        let record = if converted.has_records() {
            ConversionRecord::success(
                filename,
                now,
                converted.records_processed,
                output_path.clone(),
            )
        } else {
            ConversionRecord::warning(filename, now, 0, NO_PRODUCTS_MESSAGE, output_path.clone())
        };

        let output_hash = if self.config.checksums_enabled {
            match ChecksumRecord::capture(
                &output_path,
                FileType::Output,
                Some(&self.config.output_directory),
                now,
            ) {
                Ok(checksum) => {
                    let hash = checksum.sha256_hash.clone();
                    checksums.push(checksum);
                    Some(hash)
                }
                Err(e) => {
                    let output_name = sanitize::redact_path(&output_path);
                    warn!("Failed to hash output {}: {}", output_name, e.record_message());
                    warnings.push(PipelineWarning::OutputHashFailed {
                        filename: output_name,
                        error: e.record_message(),
                    });
                    None
                }
            }
        } else {
            None
        };

        record
            .with_input_hash(input_hash)
            .with_output_hash(output_hash)
    }

    /// `<input stem>.json` in the output directory.
    fn output_path_for(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        self.config.output_directory.join(format!("{}.json", stem))
    }

    fn write_ledger(
        &self,
        checksums: &[ChecksumRecord],
        warnings: &mut Vec<PipelineWarning>,
    ) -> Option<PathBuf> {
        let path = self.config.output_directory.join(LEDGER_FILENAME);
        match integrity::write_ledger(checksums, &path, self.config.checksum_append) {
            Ok(()) => {
                info!(
                    "Checksum ledger written: {} ({} entries)",
                    sanitize::redact_path(&path),
                    checksums.len()
                );
                Some(path)
            }
            Err(e) => {
                warn!("Failed to write checksum ledger: {}", e);
                warnings.push(PipelineWarning::LedgerFailed {
                    path,
                    error: e.to_string(),
                });
                None
            }
        }
    }
}

fn unsupported_extension_message(path: &Path) -> String {
    match path.extension() {
        Some(ext) => format!("Unsupported file extension '.{}'", ext.to_string_lossy()),
        None => "File has no .xml extension".to_string(),
    }
}
