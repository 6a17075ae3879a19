use tracing::{info, warn};

use crate::metrics::Status;

/// Events emitted by the pipeline while a batch runs.
pub enum ProgressEvent<'a> {
    Started {
        filename: &'a str,
        index: usize,
        total: usize,
    },
    Finished {
        filename: &'a str,
        status: Status,
        records_processed: usize,
        message: Option<&'a str>,
    },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent<'_>);
}

/// No-op reporter for unit tests.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent<'_>) {}
}

/// One status line per finished file, through `tracing`.
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report(&self, event: ProgressEvent<'_>) {
        let ProgressEvent::Finished {
            filename,
            status,
            records_processed,
            message,
        } = event
        else {
            return;
        };

        match status {
            Status::Success => info!(
                "[{}] {} ({} records)",
                status.label(),
                filename,
                records_processed
            ),
            Status::Warning | Status::Failure | Status::Skipped => warn!(
                "[{}] {}: {}",
                status.label(),
                filename,
                message.unwrap_or("")
            ),
        }
    }
}
