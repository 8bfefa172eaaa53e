//! Command-line interface parsing for Crypto Monitor
//!
//! This module handles parsing of CLI arguments using clap and turns them
//! into a validated `StartupConfig`.

use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;
use reqwest::Url;
use thiserror::Error;

use crate::cache::CacheStore;
use crate::data::DEFAULT_TICKER_URL;

/// File name of the log inside the cache directory
const LOG_FILE_NAME: &str = "cryptomonitor.log";

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The endpoint is not an absolute http(s) URL
    #[error("Invalid endpoint: '{0}'. Expected an absolute http or https URL")]
    InvalidEndpoint(String),

    /// The log level name is not recognized
    #[error("Invalid log level: '{0}'. Valid levels: off, error, warn, info, debug, trace")]
    InvalidLogLevel(String),
}

/// Crypto Monitor - Current Bitcoin price with an offline fallback
#[derive(Parser, Debug)]
#[command(name = "cryptomonitor")]
#[command(about = "Current Bitcoin price in the terminal, with an offline cache")]
#[command(version)]
pub struct Cli {
    /// Ticker endpoint to query
    #[arg(long, value_name = "URL", default_value = DEFAULT_TICKER_URL)]
    pub endpoint: String,

    /// Directory holding the last known price (defaults to the XDG cache dir)
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Log file (defaults to cryptomonitor.log in the cache directory)
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Fetch once as soon as the screen opens
    #[arg(long)]
    pub refresh_on_start: bool,

    /// Fetch once, print the result and exit without opening the TUI
    #[arg(long)]
    pub once: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Ticker endpoint
    pub endpoint: Url,
    /// Cache directory, if one could be determined
    pub cache_dir: Option<PathBuf>,
    /// Log destination, if one could be determined
    pub log_file: Option<PathBuf>,
    /// Maximum log level
    pub log_level: LevelFilter,
    /// Whether to trigger a refresh when the TUI opens
    pub refresh_on_start: bool,
    /// Whether to run headless
    pub once: bool,
}

/// Parses and validates an endpoint URL
pub fn parse_endpoint_arg(s: &str) -> Result<Url, CliError> {
    let url = Url::parse(s).map_err(|_| CliError::InvalidEndpoint(s.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(CliError::InvalidEndpoint(s.to_string())),
    }
}

/// Parses a log level name, case-insensitively
pub fn parse_log_level_arg(s: &str) -> Result<LevelFilter, CliError> {
    s.parse::<LevelFilter>()
        .map_err(|_| CliError::InvalidLogLevel(s.to_string()))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with defaults filled in
    /// * `Err(CliError)` if the endpoint or log level is invalid
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let endpoint = parse_endpoint_arg(&cli.endpoint)?;
        let log_level = parse_log_level_arg(&cli.log_level)?;

        let cache_dir = cli
            .cache_dir
            .clone()
            .or_else(|| CacheStore::new().map(|store| store.dir().to_path_buf()));
        let log_file = cli
            .log_file
            .clone()
            .or_else(|| cache_dir.as_ref().map(|dir| dir.join(LOG_FILE_NAME)));

        Ok(StartupConfig {
            endpoint,
            cache_dir,
            log_file,
            log_level,
            refresh_on_start: cli.refresh_on_start,
            once: cli.once,
        })
    }

    /// Cache store for the configured directory
    pub fn cache_store(&self) -> Option<CacheStore> {
        self.cache_dir.clone().map(CacheStore::with_dir)
    }
}
