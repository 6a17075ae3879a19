pub mod clock;
pub mod config;
pub mod convert;
pub mod error;
pub mod integrity;
pub mod metrics;
pub mod pipeline;
pub mod report;
pub mod sanitize;
pub mod scanner;
pub mod storage;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{load_config, load_config_from_str, Config, ReportFormat};
pub use convert::{ConversionOutput, Node, XmlConverter};
pub use error::{ConfigError, ConvertError, IntegrityError, ReportError, StorageError};
pub use integrity::{ChecksumRecord, FileType, Verification};
pub use metrics::{BatchMetrics, ConversionRecord, Status};
pub use pipeline::{BatchInput, BatchOutcome, Pipeline, PipelineConfig, PipelineError};
