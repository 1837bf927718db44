use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level. With a log file configured the
/// returned guard must be held until exit, or buffered lines are lost.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .with_context(|| format!("Invalid log level: {:?}", config.level))?;

    match &config.file {
        Some(path) => {
            let (directory, file_name) = split_log_path(path)?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(file_name)
                .build(&directory)
                .with_context(|| format!("Failed to open log file {:?}", path))?;
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .try_init()
                .map_err(|e| anyhow!("Failed to install log subscriber: {e}"))?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| anyhow!("Failed to install log subscriber: {e}"))?;
            Ok(None)
        }
    }
}

/// Bare file names log into the working directory
fn split_log_path(path: &Path) -> Result<(PathBuf, String)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("Log file path has no file name: {:?}", path))?
        .to_string_lossy()
        .into_owned();
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((directory, file_name))
}
