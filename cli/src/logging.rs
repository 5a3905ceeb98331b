//! Logger setup.
//!
//! Events go to the configured log file through a non-blocking writer, or to
//! stderr when no file is configured. `RUST_LOG` overrides the configured level.

use crate::config::{AppConfig, LogLevel};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Can't open log file {path}: {source}")]
    OpenFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Can't initialize logger: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Logger settings resolved from the configuration and command line.
#[derive(Debug, Clone)]
pub struct LogOptions {
    pub level: LogLevel,
    pub file: Option<PathBuf>,
    pub perms: u32,
    pub color: bool,
}

impl LogOptions {
    pub fn from_config(config: &AppConfig, color: bool) -> Self {
        Self {
            level: config.effective_log_level(),
            file: config.log_file(),
            perms: config.effective_log_perms(),
            color,
        }
    }
}

/// Install the global subscriber.
///
/// The returned guard flushes buffered file output on drop and must be kept
/// alive until the process exits.
pub fn init(options: &LogOptions) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(options.level)));

    match &options.file {
        Some(path) => {
            let file = open_log_file(path, options.perms)?;
            let (writer, guard) = tracing_appender::non_blocking(file);

            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false),
                )
                .try_init()?;

            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_ansi(options.color),
                )
                .try_init()?;

            Ok(None)
        }
    }
}

/// Filter keeping our crates at `level` and dependencies at warn or above.
fn filter_directives(level: LogLevel) -> String {
    let level = level.as_filter();
    let base = if level == "error" { "error" } else { "warn" };

    format!(
        "{},{}={},jira_reindex_api={}",
        base,
        env!("CARGO_CRATE_NAME"),
        level,
        level
    )
}

/// Open the log file for appending, creating it with `perms` when missing.
fn open_log_file(path: &Path, perms: u32) -> Result<File, LoggingError> {
    let mut options = OpenOptions::new();
    options.create(true).append(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(perms);
    }
    #[cfg(not(unix))]
    let _ = perms;

    options.open(path).map_err(|source| LoggingError::OpenFile {
        path: path.display().to_string(),
        source,
    })
}
