//! Tracing setup
//!
//! The terminal belongs to the UI, so logs go to a file.

use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Environment variable holding an `EnvFilter` directive
pub const LOG_ENV: &str = "CITYDASH_LOG";

/// Install the global subscriber; keep the guard alive until exit so
/// buffered lines are flushed.
pub fn init(config: &LoggingConfig) -> io::Result<WorkerGuard> {
    let dir = config
        .file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = config
        .file
        .file_name()
        .ok_or_else(|| io::Error::other(format!("invalid log file {}", config.file.display())))?;
    std::fs::create_dir_all(dir)?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&config.filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()
        .map_err(io::Error::other)?;

    Ok(guard)
}
