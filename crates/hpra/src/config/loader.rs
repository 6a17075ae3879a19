use std::path::Path;

use crate::config::schema::Config;
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Json,
    Yaml,
}

impl ConfigSource {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => ConfigSource::Yaml,
            _ => ConfigSource::Json,
        }
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content, ConfigSource::from_path(path))
}

pub fn load_config_from_str(content: &str, source: ConfigSource) -> Result<Config, ConfigError> {
    let config: Config = match source {
        ConfigSource::Json => serde_json::from_str(content)?,
        ConfigSource::Yaml => serde_yaml::from_str(content)?,
    };

    validate_config(&config)?;

    Ok(config)
}

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.input_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation {
            message: "input_dir must not be empty".to_string(),
        });
    }

    if config.output_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation {
            message: "output_dir must not be empty".to_string(),
        });
    }

    if config.input_dir == config.output_dir {
        return Err(ConfigError::Validation {
            message: format!(
                "input_dir and output_dir must differ (both are '{}')",
                config.input_dir.display()
            ),
        });
    }

    Ok(())
}
