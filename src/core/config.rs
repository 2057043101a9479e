//! Configuration management with layered hierarchy
//!
//! defaults -> global `config.yaml` -> `ACADEMIA_*` environment -> CLI flags

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config in {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Academia configuration with layered hierarchy
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base url of the REST backend
    pub api_url: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,

    /// Default output format
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // Global user config (~/.config/academia/config.yaml), or ACADEMIA_CONFIG
        if let Some(path) = Self::config_path() {
            if path.exists() {
                match Self::load_from(&path) {
                    Ok(file) => config.merge(file),
                    Err(e) => tracing::warn!(error = %e, "ignoring config file"),
                }
            }
        }

        config.merge(Self::from_env());
        config
    }

    /// Read one YAML config file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Path of the config file that `load` reads
    pub fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("ACADEMIA_CONFIG") {
            return Some(PathBuf::from(path));
        }
        directories::ProjectDirs::from("", "", "academia")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    fn from_env() -> Self {
        let mut config = Config::default();
        if let Ok(url) = std::env::var("ACADEMIA_API_URL") {
            config.api_url = Some(url);
        }
        if let Ok(raw) = std::env::var("ACADEMIA_TIMEOUT_SECS") {
            match raw.trim().parse() {
                Ok(secs) => config.timeout_secs = Some(secs),
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid ACADEMIA_TIMEOUT_SECS"),
            }
        }
        if let Ok(format) = std::env::var("ACADEMIA_FORMAT") {
            config.default_format = Some(format);
        }
        config
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.api_url.is_some() {
            self.api_url = other.api_url;
        }
        if other.timeout_secs.is_some() {
            self.timeout_secs = other.timeout_secs;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    /// Apply a `--api-url` flag
    pub fn with_api_url(mut self, url: Option<String>) -> Self {
        if url.is_some() {
            self.api_url = url;
        }
        self
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }
}
