//! SHA-256 file digests and the checksum ledger used for audit trails.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::IntegrityError;

/// Bytes read per hashing step; memory use does not grow with file size.
pub const CHUNK_SIZE: usize = 8 * 1024;

pub const LEDGER_FILENAME: &str = "checksums.csv";

pub const LEDGER_HEADER: [&str; 6] = [
    "timestamp",
    "filename",
    "file_type",
    "sha256_hash",
    "file_size_bytes",
    "relative_path",
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Input,
    Output,
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileType::Input => f.write_str("input"),
            FileType::Output => f.write_str("output"),
        }
    }
}

/// One ledger row. Field order matches [`LEDGER_HEADER`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecksumRecord {
    #[serde(with = "ledger_timestamp")]
    pub timestamp: NaiveDateTime,
    pub filename: String,
    pub file_type: FileType,
    pub sha256_hash: String,
    #[serde(rename = "file_size_bytes")]
    pub file_size: u64,
    pub relative_path: String,
}

impl ChecksumRecord {
    /// Hashes `path` and records its size. `relative_path` is taken against
    /// `base_dir`, falling back to the file name.
    pub fn capture(
        path: &Path,
        file_type: FileType,
        base_dir: Option<&Path>,
        timestamp: NaiveDateTime,
    ) -> Result<Self, IntegrityError> {
        let sha256_hash = sha256_file(path)?;
        let file_size = std::fs::metadata(path)
            .map_err(|e| io_error(path, e))?
            .len();

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let relative_path = base_dir
            .and_then(|base| path.strip_prefix(base).ok())
            .map(|rel| rel.to_string_lossy().into_owned())
            .unwrap_or_else(|| filename.clone());

        Ok(Self {
            timestamp: timestamp.with_nanosecond(0).unwrap_or(timestamp),
            filename,
            file_type,
            sha256_hash,
            file_size,
            relative_path,
        })
    }
}

mod ledger_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(|e| {
            serde::de::Error::custom(format!("invalid timestamp '{}': {}", raw, e))
        })
    }
}

fn io_error(path: &Path, source: std::io::Error) -> IntegrityError {
    if source.kind() == std::io::ErrorKind::NotFound {
        IntegrityError::Missing(path.to_path_buf())
    } else {
        IntegrityError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Lowercase hex SHA-256 of the file's full content, read in
/// [`CHUNK_SIZE`] pieces.
pub fn sha256_file(path: &Path) -> Result<String, IntegrityError> {
    let mut file = File::open(path).map_err(|e| io_error(path, e))?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; CHUNK_SIZE];

    loop {
        let read = file.read(&mut buffer).map_err(|e| io_error(path, e))?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Writes the ledger. With `append`, rows are added to an existing file and
/// the header is only written when the file is new or empty.
pub fn write_ledger(
    records: &[ChecksumRecord],
    path: &Path,
    append: bool,
) -> Result<(), IntegrityError> {
    let has_rows = append
        && std::fs::metadata(path)
            .map(|m| m.len() > 0)
            .unwrap_or(false);

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)
        .map_err(|e| io_error(path, e))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    if !has_rows {
        writer.write_record(LEDGER_HEADER)?;
    }
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush().map_err(|e| io_error(path, e))?;

    Ok(())
}

pub fn load_ledger(path: &Path) -> Result<Vec<ChecksumRecord>, IntegrityError> {
    if !path.exists() {
        return Err(IntegrityError::Missing(path.to_path_buf()));
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

/// Recomputes the digest and compares it case-insensitively.
/// A missing file is `IntegrityError::Missing`, not `Ok(false)`.
pub fn verify_file(path: &Path, expected_hash: &str) -> Result<bool, IntegrityError> {
    let actual = sha256_file(path)?;
    Ok(actual.eq_ignore_ascii_case(expected_hash.trim()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Ok,
    Mismatch { expected: String, actual: String },
    Missing,
    Unreadable(String),
}

impl Verification {
    pub fn is_ok(&self) -> bool {
        matches!(self, Verification::Ok)
    }
}

impl fmt::Display for Verification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verification::Ok => f.write_str("OK"),
            Verification::Mismatch { expected, actual } => {
                write!(f, "Hash mismatch: expected {}, found {}", expected, actual)
            }
            Verification::Missing => f.write_str("File not found"),
            Verification::Unreadable(reason) => write!(f, "Unreadable: {}", reason),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VerificationResult {
    pub record: ChecksumRecord,
    pub path: PathBuf,
    pub outcome: Verification,
}

/// Checks every ledger entry against the file on disk. Input entries are
/// resolved against `input_dir`, output entries against `output_dir`.
pub fn verify_ledger(
    records: &[ChecksumRecord],
    input_dir: &Path,
    output_dir: &Path,
) -> Vec<VerificationResult> {
    records
        .iter()
        .map(|record| {
            let base = match record.file_type {
                FileType::Input => input_dir,
                FileType::Output => output_dir,
            };
            let path = base.join(&record.relative_path);

            let outcome = match sha256_file(&path) {
                Ok(actual) if actual.eq_ignore_ascii_case(&record.sha256_hash) => Verification::Ok,
                Ok(actual) => Verification::Mismatch {
                    expected: record.sha256_hash.to_ascii_lowercase(),
                    actual,
                },
                Err(IntegrityError::Missing(_)) => Verification::Missing,
                Err(e) => Verification::Unreadable(e.to_string()),
            };

            VerificationResult {
                record: record.clone(),
                path,
                outcome,
            }
        })
        .collect()
}
