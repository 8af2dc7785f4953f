//! Widget configuration
//!
//! Read from `$CONFIG_DIR/searchbox/config.json` when present. The result
//! source can be overridden by `SEARCHBOX_SOURCE` and then by the command
//! line.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::backend::api::DataSource;
use crate::backend::InvalidSource;
use crate::widget::Timings;

/// Environment variable that overrides the configured source
pub const SOURCE_ENV: &str = "SEARCHBOX_SOURCE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Source(#[from] InvalidSource),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// URL or path of the JSON result set
    pub source: String,
    pub debounce_ms: u64,
    pub blur_grace_ms: u64,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: "temp.json".to_string(),
            debounce_ms: 300,
            blur_grace_ms: 200,
            window_width: 640.0,
            window_height: 420.0,
        }
    }
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("searchbox").join("config.json"))
    }

    /// Load from the default location, then apply the environment override.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::default_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        if let Ok(source) = std::env::var(SOURCE_ENV) {
            config.set_source(&source);
        }
        Ok(config)
    }

    /// A missing file yields the defaults; an unreadable or malformed one
    /// is an error.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Override the source; blank values are ignored.
    pub fn set_source(&mut self, source: &str) {
        if !source.trim().is_empty() {
            self.source = source.trim().to_string();
        }
    }

    pub fn data_source(&self) -> Result<DataSource, ConfigError> {
        Ok(DataSource::parse(&self.source)?)
    }

    pub fn timings(&self) -> Timings {
        Timings {
            debounce: Duration::from_millis(self.debounce_ms),
            blur_grace: Duration::from_millis(self.blur_grace_ms),
        }
    }
}
