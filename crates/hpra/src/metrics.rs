use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Warning,
    Failure,
    Skipped,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Success,
        Status::Warning,
        Status::Failure,
        Status::Skipped,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Warning => "warning",
            Status::Failure => "failure",
            Status::Skipped => "skipped",
        }
    }

    /// Upper-case label used in report rows.
    pub fn label(self) -> &'static str {
        match self {
            Status::Success => "SUCCESS",
            Status::Warning => "WARNING",
            Status::Failure => "FAILURE",
            Status::Skipped => "SKIPPED",
        }
    }

    /// Whether records with this status feed the frequent-issues list.
    pub fn is_issue(self) -> bool {
        match self {
            Status::Warning | Status::Failure => true,
            Status::Success | Status::Skipped => false,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of processing one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionRecord {
    pub filename: String,
    pub status: Status,
    pub timestamp: NaiveDateTime,
    pub records_processed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
}

impl ConversionRecord {
    fn new(
        filename: String,
        status: Status,
        timestamp: NaiveDateTime,
        records_processed: usize,
        message: Option<String>,
        output_path: Option<PathBuf>,
    ) -> Self {
        Self {
            filename,
            status,
            timestamp,
            records_processed,
            message,
            input_hash: None,
            output_hash: None,
            output_path,
        }
    }

    pub fn success(
        filename: impl Into<String>,
        timestamp: NaiveDateTime,
        records_processed: usize,
        output_path: PathBuf,
    ) -> Self {
        Self::new(
            filename.into(),
            Status::Success,
            timestamp,
            records_processed,
            None,
            Some(output_path),
        )
    }

    pub fn warning(
        filename: impl Into<String>,
        timestamp: NaiveDateTime,
        records_processed: usize,
        message: impl Into<String>,
        output_path: PathBuf,
    ) -> Self {
        Self::new(
            filename.into(),
            Status::Warning,
            timestamp,
            records_processed,
            Some(message.into()),
            Some(output_path),
        )
    }

    pub fn failure(
        filename: impl Into<String>,
        timestamp: NaiveDateTime,
        message: impl Into<String>,
    ) -> Self {
        Self::new(
            filename.into(),
            Status::Failure,
            timestamp,
            0,
            Some(message.into()),
            None,
        )
    }

    pub fn skipped(
        filename: impl Into<String>,
        timestamp: NaiveDateTime,
        message: impl Into<String>,
    ) -> Self {
        Self::new(
            filename.into(),
            Status::Skipped,
            timestamp,
            0,
            Some(message.into()),
            None,
        )
    }

    /// Skipped records never carry hashes.
    pub fn with_input_hash(mut self, hash: Option<String>) -> Self {
        if self.status != Status::Skipped {
            self.input_hash = hash;
        }
        self
    }

    /// Only records that produced an output file carry an output hash.
    pub fn with_output_hash(mut self, hash: Option<String>) -> Self {
        if self.output_path.is_some() {
            self.output_hash = hash;
        }
        self
    }

    pub fn message_or_empty(&self) -> &str {
        self.message.as_deref().unwrap_or("")
    }
}

/// Results of one batch run. Totals are derived from the record sequence.
#[derive(Debug, Clone)]
pub struct BatchMetrics {
    start_time: NaiveDateTime,
    end_time: Option<NaiveDateTime>,
    records: Vec<ConversionRecord>,
}

impl BatchMetrics {
    pub fn new(start_time: NaiveDateTime) -> Self {
        Self {
            start_time,
            end_time: None,
            records: Vec::new(),
        }
    }

    pub fn add_result(&mut self, record: ConversionRecord) {
        debug_assert!(self.end_time.is_none(), "batch already finalized");
        self.records.push(record);
    }

    /// Marks the batch as complete. Only the first call takes effect, and
    /// the end time never precedes the start time.
    pub fn finalize(&mut self, end_time: NaiveDateTime) {
        if self.end_time.is_none() {
            self.end_time = Some(end_time.max(self.start_time));
        }
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    pub fn end_time(&self) -> Option<NaiveDateTime> {
        self.end_time
    }

    pub fn is_finalized(&self) -> bool {
        self.end_time.is_some()
    }

    pub fn records(&self) -> &[ConversionRecord] {
        &self.records
    }

    pub fn count(&self, status: Status) -> usize {
        self.records.iter().filter(|r| r.status == status).count()
    }

    pub fn total_files(&self) -> usize {
        self.records.len()
    }

    pub fn total_succeeded(&self) -> usize {
        self.count(Status::Success)
    }

    pub fn total_warnings(&self) -> usize {
        self.count(Status::Warning)
    }

    pub fn total_failures(&self) -> usize {
        self.count(Status::Failure)
    }

    pub fn total_skipped(&self) -> usize {
        self.count(Status::Skipped)
    }

    pub fn total_records(&self) -> usize {
        self.records.iter().map(|r| r.records_processed).sum()
    }

    /// Percentage of files with status `Success`; warnings do not count.
    pub fn success_rate(&self) -> f64 {
        let total = self.total_files();
        if total == 0 {
            return 0.0;
        }
        self.total_succeeded() as f64 / total as f64 * 100.0
    }

    pub fn duration_seconds(&self) -> f64 {
        match self.end_time {
            Some(end) => (end - self.start_time).num_milliseconds() as f64 / 1000.0,
            None => 0.0,
        }
    }

    /// Distinct warning/failure messages with their counts, most frequent
    /// first; ties keep first-seen order.
    pub fn frequent_issues(&self) -> Vec<(String, usize)> {
        let mut issues: Vec<(String, usize)> = Vec::new();

        for record in self.records.iter().filter(|r| r.status.is_issue()) {
            let Some(message) = record.message.as_deref().filter(|m| !m.is_empty()) else {
                continue;
            };
            match issues.iter_mut().find(|(m, _)| m == message) {
                Some((_, count)) => *count += 1,
                None => issues.push((message.to_string(), 1)),
            }
        }

        issues.sort_by(|a, b| b.1.cmp(&a.1));
        issues
    }

    /// The `limit` most frequent issues, in `frequent_issues` order.
    pub fn top_issues(&self, limit: usize) -> Vec<(String, usize)> {
        let mut issues = self.frequent_issues();
        issues.truncate(limit);
        issues
    }
}
