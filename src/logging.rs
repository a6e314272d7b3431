//! File logging. The terminal belongs to the TUI, so nothing is written to
//! stdout or stderr.

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Keep the guard alive for the whole run or buffered lines are lost.
pub struct LoggingContext {
    pub _guard: WorkerGuard,
    pub log_directory: PathBuf,
}

/// `~/.local/state/promptsmith/logs` on Linux, the local data dir elsewhere.
pub fn log_directory() -> Result<PathBuf> {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|base| base.join("promptsmith").join("logs"))
        .ok_or_else(|| anyhow!("Could not determine log directory"))
}

pub fn init() -> Result<LoggingContext> {
    let log_dir = log_directory()?;
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "promptsmith.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))?;

    info!(version = env!("CARGO_PKG_VERSION"), "session_start");

    Ok(LoggingContext {
        _guard: guard,
        log_directory: log_dir,
    })
}
