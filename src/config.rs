//! User configuration
//!
//! Optional YAML file in the platform config directory (or `--config`).
//! Every field has a default, so a missing file or a partial one is fine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::toast::ToastTimings;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Ask before running a merge batch
    pub confirm_merge: bool,
    /// Ask before running a delete batch
    pub confirm_delete: bool,
    pub toast: ToastConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            confirm_merge: true,
            confirm_delete: true,
            toast: ToastConfig::default(),
        }
    }
}

/// Toast durations in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToastConfig {
    pub default_ms: u64,
    pub error_ms: u64,
    pub exit_ms: u64,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            default_ms: 3000,
            error_ms: 5000,
            exit_ms: 250,
        }
    }
}

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "twinpane")
}

impl Config {
    /// Default location of the config file, if the platform has one
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Load from `path`, or from the default location when `None`
    ///
    /// An explicit path must exist. A missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => {
                    debug!("No config file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes to unit, not a map
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    pub fn toast_timings(&self) -> ToastTimings {
        ToastTimings {
            default: Duration::from_millis(self.toast.default_ms),
            error: Duration::from_millis(self.toast.error_ms),
            exit: Duration::from_millis(self.toast.exit_ms),
        }
    }
}
