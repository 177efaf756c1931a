//! Logging initialization.
//!
//! The TUI owns stdout, so all diagnostics go to a log file — including the
//! per-feed poll failures, which are observed here and deliberately never
//! surfaced in the UI.  The file path comes from `FEEDLOOP_LOG` (default
//! `feedloop.log`); the filter from `RUST_LOG` (default `info`).

use std::fs::File;
use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use anyhow::Result;

pub fn init() -> Result<()> {
    let path = std::env::var("FEEDLOOP_LOG").unwrap_or_else(|_| "feedloop.log".to_string());
    let log_file = Arc::new(File::create(&path)?);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(log_file)
                .with_ansi(false)
                .with_target(true),
        )
        .with(filter)
        .init();

    Ok(())
}
