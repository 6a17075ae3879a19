use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Failed to parse config YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },
}

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("I/O error reading '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("XML parse error: {0}")]
    Parse(String),

    #[error("I/O error writing output: {0}")]
    Write(#[from] StorageError),

    #[error("Failed to serialize JSON: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ConvertError {
    /// Message for a batch record. The record already names the file, so
    /// paths are left out and the same cause reads the same for every file.
    pub fn record_message(&self) -> String {
        match self {
            ConvertError::Read { source, .. } => format!("I/O error reading input: {}", source),
            ConvertError::Write(e) => format!("I/O error writing output: {}", e.record_message()),
            other => other.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move file from '{from}' to '{to}': {source}")]
    RenameFile {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    pub fn record_message(&self) -> String {
        match self {
            StorageError::CreateDirectory { source, .. } => {
                format!("failed to create directory: {}", source)
            }
            StorageError::WriteFile { source, .. } => format!("failed to write file: {}", source),
            StorageError::RenameFile { source, .. } => {
                format!("failed to move staged file into place: {}", source)
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum IntegrityError {
    #[error("File not found: {0}")]
    Missing(PathBuf),

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Checksum ledger error: {0}")]
    Csv(#[from] csv::Error),
}

impl IntegrityError {
    pub fn record_message(&self) -> String {
        match self {
            IntegrityError::Missing(_) => "File not found".to_string(),
            IntegrityError::Io { source, .. } => format!("Failed to hash file: {}", source),
            IntegrityError::Csv(e) => format!("Checksum ledger error: {}", e),
        }
    }
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Report backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Failed to write report '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Spreadsheet generation failed: {0}")]
    Spreadsheet(String),
}
