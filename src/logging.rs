//! Log setup
//!
//! The terminal is owned by the UI, so logs go to a file in the data
//! directory instead of stderr.

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::project_dirs;

/// Log file location, falling back to the temp dir
pub fn log_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(std::env::temp_dir)
        .join("twinpane.log")
}

/// Install the global subscriber. `RUST_LOG` overrides the level.
pub fn init(verbose: bool) -> Result<PathBuf> {
    let path = log_path();
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    }
    let file = File::create(&path)
        .with_context(|| format!("Failed to create log file: {}", path.display()))?;

    let log_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("Failed to install logger: {err}"))?;

    Ok(path)
}
