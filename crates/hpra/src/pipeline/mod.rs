pub mod config;
pub mod error;
pub mod progress;
pub mod runner;

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineWarning};
pub use progress::{LogProgress, NoopProgress, ProgressEvent, ProgressReporter};
pub use runner::{BatchInput, BatchOutcome, Pipeline};
