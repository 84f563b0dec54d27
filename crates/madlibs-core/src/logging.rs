//! Logging setup.
//!
//! The TUI owns stdout, so diagnostics go to a log file under the madlibs
//! home directory. Filtering is controlled with the `MADLIBS_LOG` env var
//! (standard `EnvFilter` syntax, e.g. `MADLIBS_LOG=madlibs_core=debug`).

use std::fs;

use anyhow::{Context, Result};
pub use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::paths;

/// Initializes the global tracing subscriber, writing to a log file.
///
/// Returns the appender guard; dropping it flushes and stops the writer,
/// so the caller must hold it for the lifetime of the process.
///
/// # Errors
/// Returns an error if the log directory cannot be created.
pub fn init() -> Result<WorkerGuard> {
    let logs_dir = paths::logs_dir();
    fs::create_dir_all(&logs_dir)
        .with_context(|| format!("Failed to create log directory {}", logs_dir.display()))?;

    let appender = tracing_appender::rolling::daily(&logs_dir, "madlibs.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env("MADLIBS_LOG")
        .unwrap_or_else(|_| EnvFilter::new("madlibs_core=info,madlibs_tui=info,madlibs=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    Ok(guard)
}
