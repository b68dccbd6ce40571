//! Logging setup for hosts embedding script sources.
//!
//! Two entry points:
//! - [`init_logging`] writes to a log file (cleared on start) and to stdout
//! - [`init_console_logging`] writes compact output to stderr, for CLI use
//!
//! Both honour `RUST_LOG`. Script `print`/`debug` output arrives under the
//! `tilescript::script` target.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::config_directory;

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard will flush and close the log file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Initialize file and stdout logging.
///
/// Creates `log_dir` if needed and truncates `log_file` inside it.
///
/// # Errors
///
/// Returns error if the directory cannot be created or the file cannot be cleared
pub fn init_logging(log_dir: &Path, log_file: &str) -> Result<LoggingGuard, io::Error> {
    prepare_log_file(log_dir, log_file)?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter("info"))
        .with(file_layer)
        .with(stdout_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Initialize stderr-only logging; `verbose` lowers the default level to debug.
pub fn init_console_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(verbose)
                .compact(),
        )
        .init();
}

/// Default log directory (`~/.tilescript/logs`).
pub fn default_log_dir() -> PathBuf {
    config_directory().join("logs")
}

/// Default log file name.
pub fn default_log_file() -> &'static str {
    "tilescript.log"
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn prepare_log_file(log_dir: &Path, log_file: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(log_dir)?;
    let log_path = log_dir.join(log_file);
    fs::write(&log_path, "")?;
    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_paths() {
        assert!(default_log_dir().ends_with(".tilescript/logs"));
        assert_eq!(default_log_file(), "tilescript.log");
    }

    // init_logging installs a global subscriber, so only the file handling is tested
    #[test]
    fn test_prepare_creates_nested_directory() {
        let temp = TempDir::new().unwrap();
        let log_dir = temp.path().join("deep/nested");

        let path = prepare_log_file(&log_dir, "test.log").unwrap();
        assert!(log_dir.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_prepare_clears_existing_file() {
        let temp = TempDir::new().unwrap();
        let log_path = temp.path().join("test.log");
        fs::write(&log_path, "old log data").unwrap();

        prepare_log_file(temp.path(), "test.log").unwrap();
        assert_eq!(fs::read_to_string(&log_path).unwrap(), "");
    }
}
