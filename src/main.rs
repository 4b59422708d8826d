//! twinpane - terminal front-end for two-pane folder comparison
//!
//! Browse a comparison tree, build a selection, and merge or delete items
//! across the two panes in batches. Context menus, confirm dialogs and
//! toasts report what happened.
//!
//! # Usage
//!
//! ```bash
//! twinpane compare.yaml                 # Open a comparison snapshot
//! twinpane compare.yaml -c my.yaml      # Use a specific config file
//! RUST_LOG=twinpane=trace twinpane x.yaml
//! ```

mod action;
mod app;
mod batch;
mod config;
mod engine;
mod logging;
mod menu;
mod overlay;
mod selection;
mod stats;
mod toast;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::config::Config;
use crate::engine::{MemoryEngine, Snapshot};

/// Terminal front-end for two-pane folder comparison
#[derive(Parser, Debug)]
#[command(name = "twinpane")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Comparison snapshot (YAML) to open
    snapshot: PathBuf,

    /// Config file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_path = logging::init(args.verbose)?;
    info!("Logging to {}", log_path.display());

    let config = Config::load(args.config.as_deref())?;

    let snapshot = Snapshot::load(&args.snapshot)
        .with_context(|| format!("Failed to open snapshot: {}", args.snapshot.display()))?;
    let title = snapshot.title();
    let engine = Arc::new(MemoryEngine::from_snapshot(&snapshot));

    // Create and run the application
    let mut app = app::App::new(engine, title, config)?;
    app.run()?;

    Ok(())
}
