//! Tracing setup: console output plus a rotating log file

use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log files kept before the oldest is removed
const MAX_LOG_FILES: usize = 180;

/// Install the global subscriber writing to stdout and to `log_dir/app.<date>.log`
///
/// The returned guard flushes the file writer on drop and must be held until
/// the process exits.
pub fn init(log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Error creating log directory {}", log_dir.display()))?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("app")
        .filename_suffix("log")
        .max_log_files(MAX_LOG_FILES)
        .build(log_dir)
        .with_context(|| format!("Error opening log file in {}", log_dir.display()))?;
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .try_init()
        .context("Error installing log subscriber")?;

    Ok(guard)
}
