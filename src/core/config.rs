//! Configuration management

use clap::Args;
use config::{Config as ConfigBuilder, ConfigBuilder as Builder, ConfigError as BuilderError, Environment, File};
use config::builder::DefaultState;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid api configuration: {0}")]
    InvalidApi(String),

    #[error("Invalid session configuration: {0}")]
    InvalidSession(String),

    #[error("Invalid logging configuration: {0}")]
    InvalidLogging(String),

    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),
}

impl From<BuilderError> for ConfigError {
    fn from(err: BuilderError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

impl From<ConfigError> for crate::core::error::RaterError {
    fn from(err: ConfigError) -> Self {
        crate::core::error::RaterError::ConfigError(err.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration with precedence: CLI args > Environment variables > Config file > Defaults
    pub fn load(overrides: &ConfigArgs) -> Result<Self, ConfigError> {
        let mut builder = with_defaults(ConfigBuilder::builder())?;

        if let Some(config_path) = &overrides.config {
            if !config_path.exists() {
                return Err(ConfigError::FileNotFound(config_path.display().to_string()));
            }
            builder = builder.add_source(File::from(config_path.as_path()));
        }

        // Example: MOVIE_RATER_API__BASE_URL=http://localhost:8000/api
        builder = builder.add_source(
            Environment::with_prefix("MOVIE_RATER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(base_url) = &overrides.base_url {
            builder = builder.set_override("api.base_url", base_url.clone())?;
        }
        if let Some(token_file) = &overrides.token_file {
            builder = builder.set_override("session.store", "file")?;
            builder = builder.set_override("session.token_file", token_file.display().to_string())?;
        }
        if let Some(log_level) = &overrides.log_level {
            builder = builder.set_override("logging.level", log_level.clone())?;
        }

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path, filling gaps with defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let config: Config = with_defaults(ConfigBuilder::builder())?
            .add_source(File::from(path))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Defaults only; used by tests and embedders that configure in code
    pub fn defaults() -> Result<Self, ConfigError> {
        let config: Config = with_defaults(ConfigBuilder::builder())?
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.validate()?;
        self.session.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

fn with_defaults(builder: Builder<DefaultState>) -> Result<Builder<DefaultState>, ConfigError> {
    Ok(builder
        .set_default("api.base_url", "http://127.0.0.1:8000/api")?
        .set_default("api.request_timeout", 30)?
        .set_default("api.connect_timeout", 10)?
        .set_default("api.trailing_slash", true)?
        .set_default("api.default_page_size", 10)?
        .set_default("session.store", "file")?
        .set_default("session.token_file", default_token_file().display().to_string())?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")?)
}

fn default_token_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("movie-rater")
        .join("token")
}

/// Command-line arguments for configuration override
#[derive(Debug, Default, Clone, Args)]
pub struct ConfigArgs {
    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the REST API, e.g. http://127.0.0.1:8000/api
    #[arg(long, value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// File the bearer token is persisted in
    #[arg(long, value_name = "PATH", global = true)]
    pub token_file: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout: u64, // seconds
    pub connect_timeout: u64, // seconds
    /// Append `/` to every endpoint path; the backend's routes are declared with it
    pub trailing_slash: bool,
    pub default_page_size: u32,
}

impl ApiConfig {
    /// Config pointing at `base_url` with every other field at its default
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: 30,
            connect_timeout: 10,
            trailing_slash: true,
            default_page_size: 10,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ConfigError::InvalidApi(format!("base_url is not a valid URL: {}", e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidApi("base_url must use http or https".to_string()));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::InvalidApi("request_timeout must be greater than 0".to_string()));
        }

        if self.connect_timeout == 0 {
            return Err(ConfigError::InvalidApi("connect_timeout must be greater than 0".to_string()));
        }

        if self.default_page_size == 0 {
            return Err(ConfigError::InvalidApi("default_page_size must be greater than 0".to_string()));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub store: String,
    pub token_file: PathBuf,
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_stores = ["memory", "file"];
        if !valid_stores.contains(&self.store.as_str()) {
            return Err(ConfigError::InvalidSession(format!(
                "store must be one of: {:?}",
                valid_stores
            )));
        }

        if self.store == "file" && self.token_file.as_os_str().is_empty() {
            return Err(ConfigError::InvalidSession(
                "token_file cannot be empty when store is 'file'".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub output: String,
    pub log_file: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.as_str()) {
            return Err(ConfigError::InvalidLogging(format!(
                "level must be one of: {:?}",
                valid_levels
            )));
        }

        let valid_formats = ["json", "text"];
        if !valid_formats.contains(&self.format.as_str()) {
            return Err(ConfigError::InvalidLogging(format!(
                "format must be one of: {:?}",
                valid_formats
            )));
        }

        let valid_outputs = ["stderr", "stdout", "file"];
        if !valid_outputs.contains(&self.output.as_str()) {
            return Err(ConfigError::InvalidLogging(format!(
                "output must be one of: {:?}",
                valid_outputs
            )));
        }

        if self.output == "file" && self.log_file.is_none() {
            return Err(ConfigError::InvalidLogging(
                "log_file must be specified when output is 'file'".to_string(),
            ));
        }

        Ok(())
    }
}
