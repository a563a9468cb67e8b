use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default per-request timeout applied to extraction and store calls.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
/// Default Elasticsearch index that receives documents.
const DEFAULT_INDEX: &str = "documents";

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
    /// Configured root directory does not exist or is not a directory.
    #[error("Root directory is not a directory: {0}")]
    InvalidRootDir(PathBuf),
}

/// Runtime configuration for a docdex indexing run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory tree that the run traverses.
    pub root_dir: PathBuf,
    /// Endpoint of the Tika text-extraction service.
    pub tika_url: String,
    /// Base URL of the Elasticsearch instance that stores documents.
    pub elasticsearch_url: String,
    /// Name of the Elasticsearch index documents are written to.
    pub index: String,
    /// Timeout applied to each extraction and store request.
    pub request_timeout: Duration,
}

/// Command-line overrides applied on top of environment configuration.
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    /// Override for `DOCDEX_ROOT_DIR`.
    pub root_dir: Option<PathBuf>,
    /// Override for `DOCDEX_TIKA_URL`.
    pub tika_url: Option<String>,
    /// Override for `DOCDEX_ELASTICSEARCH_URL`.
    pub elasticsearch_url: Option<String>,
    /// Override for `DOCDEX_INDEX`.
    pub index: Option<String>,
    /// Override for `DOCDEX_REQUEST_TIMEOUT_SECS`.
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Load configuration from environment variables, applying CLI overrides
    /// and performing validation along the way.
    pub fn load(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let root_dir = overrides
            .root_dir
            .or_else(|| load_env_optional("DOCDEX_ROOT_DIR").map(PathBuf::from))
            .ok_or_else(|| ConfigError::MissingVariable("DOCDEX_ROOT_DIR".to_string()))?;
        if !root_dir.is_dir() {
            return Err(ConfigError::InvalidRootDir(root_dir));
        }

        let timeout_secs = match overrides.timeout_secs {
            Some(value) => value,
            None => load_env_optional("DOCDEX_REQUEST_TIMEOUT_SECS")
                .map(|value| {
                    value.parse().map_err(|_| {
                        ConfigError::InvalidValue("DOCDEX_REQUEST_TIMEOUT_SECS".to_string())
                    })
                })
                .transpose()?
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        let config = Self {
            root_dir,
            tika_url: overrides
                .tika_url
                .map(Ok)
                .unwrap_or_else(|| load_env("DOCDEX_TIKA_URL"))?,
            elasticsearch_url: overrides
                .elasticsearch_url
                .map(Ok)
                .unwrap_or_else(|| load_env("DOCDEX_ELASTICSEARCH_URL"))?,
            index: overrides
                .index
                .or_else(|| load_env_optional("DOCDEX_INDEX"))
                .unwrap_or_else(|| DEFAULT_INDEX.to_string()),
            request_timeout: Duration::from_secs(timeout_secs),
        };

        tracing::debug!(
            root_dir = %config.root_dir.display(),
            tika_url = %config.tika_url,
            elasticsearch_url = %config.elasticsearch_url,
            index = %config.index,
            timeout_secs,
            "Loaded configuration"
        );
        Ok(config)
    }
}

fn load_env(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
