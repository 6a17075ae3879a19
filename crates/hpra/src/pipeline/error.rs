use std::path::PathBuf;

use thiserror::Error;

/// Setup failures that abort a batch. Per-file problems never surface
/// here; they become records in the batch metrics.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to prepare directory: {0}")]
    CreateDirectory(#[from] crate::error::StorageError),

    #[error("Failed to scan '{path}': {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Non-fatal problems at the end of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineWarning {
    OutputHashFailed { filename: String, error: String },
    LedgerFailed { path: PathBuf, error: String },
    NoReportWritten,
}
