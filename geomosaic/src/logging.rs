//! Logging setup.
//!
//! Installs a `tracing` subscriber that writes human-readable output to
//! stderr and, optionally, plain text to a log file. `RUST_LOG` overrides
//! the default filter.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Errors that can occur while installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to open log file {path}: {message}")]
    LogFile { path: PathBuf, message: String },

    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Logging options, usually taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Log library internals at debug level.
    pub verbose: bool,
    /// Also write logs to this file.
    pub log_file: Option<PathBuf>,
}

/// Keeps the background log writer alive.
///
/// Buffered file output is flushed when this is dropped, so hold it until
/// the program exits.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Filter used when `RUST_LOG` is not set.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "geomosaic=debug,geomosaic_cli=debug"
    } else {
        "geomosaic=info,geomosaic_cli=info"
    }
}

/// Installs the global subscriber.
pub fn init_logging(options: &LogOptions) -> Result<LoggingGuard, LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(options.verbose)));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(options.verbose);

    let (file_layer, file_guard) = match &options.log_file {
        Some(path) => {
            let appender = open_log_file(path)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_timer(LocalTime::rfc_3339());
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

fn open_log_file(path: &Path) -> Result<RollingFileAppender, LoggingError> {
    let log_error = |message: String| LoggingError::LogFile {
        path: path.to_path_buf(),
        message,
    };

    let file_name = path
        .file_name()
        .ok_or_else(|| log_error("not a file path".to_string()))?;
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(directory)
        .map_err(|e| log_error(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_directive() {
        assert!(default_directive(false).contains("geomosaic=info"));
        assert!(default_directive(true).contains("geomosaic=debug"));
    }

    #[test]
    fn test_open_log_file_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("geomosaic.log");
        let _appender = open_log_file(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_open_log_file_rejects_directory_path() {
        assert!(matches!(
            open_log_file(Path::new("/")),
            Err(LoggingError::LogFile { .. })
        ));
    }
}
