pub mod loader;
pub mod schema;

pub use loader::{load_config, load_config_from_str, ConfigSource};
pub use schema::{Config, ReportFormat};
