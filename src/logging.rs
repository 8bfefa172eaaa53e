//! File logging for Crypto Monitor
//!
//! The terminal belongs to the TUI, so log records go to a file through a
//! `fern` dispatcher behind the `log` facade.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, LevelFilter};
use thiserror::Error;

/// Errors that can occur while installing the logger
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The log file or its directory could not be created
    #[error("Failed to open log file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A global logger was already installed
    #[error("Logger already initialized: {0}")]
    Init(#[from] log::SetLoggerError),
}

/// Builds the dispatcher writing `[time][LEVEL][target] message` lines to `path`
pub fn build_dispatch(level: LevelFilter, path: &Path) -> Result<fern::Dispatch, LoggingError> {
    let open_error = |source| LoggingError::Open {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(open_error)?;
    }
    let file = fern::log_file(path).map_err(open_error)?;

    Ok(fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .level_for("hyper", LevelFilter::Warn)
        .level_for("hyper_util", LevelFilter::Warn)
        .level_for("reqwest", LevelFilter::Warn)
        .level_for("rustls", LevelFilter::Warn)
        .chain(file))
}

/// Installs the global logger
///
/// With no path, nothing is installed and log macros are no-ops.
pub fn setup_logging(level: LevelFilter, path: Option<&Path>) -> Result<(), LoggingError> {
    let Some(path) = path else {
        return Ok(());
    };
    build_dispatch(level, path)?.apply()?;
    info!("Logging initialized ({})", level);
    Ok(())
}
