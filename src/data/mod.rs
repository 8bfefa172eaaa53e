//! Core data models for Crypto Monitor
//!
//! This module contains the ticker snapshot type shared by the HTTP client,
//! the cache store and the display controller.

pub mod ticker;

pub use ticker::{TickerClient, TickerError, DEFAULT_TICKER_URL};

use serde::{Deserialize, Serialize};

/// Display name of the only asset the app tracks
pub const ASSET_LABEL: &str = "Bitcoin (BTC)";

/// A point-in-time reading of the Bitcoin ticker
///
/// `last` is kept exactly as the server sent it so that a value which is not
/// a decimal number can be detected at render time instead of at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerSnapshot {
    /// Last traded price as a decimal string (e.g. "65000.50")
    #[serde(default)]
    pub last: String,
    /// When the price was recorded, in Unix seconds (0 when absent)
    #[serde(default)]
    pub date: i64,
}

impl TickerSnapshot {
    pub fn new(last: impl Into<String>, date: i64) -> Self {
        Self {
            last: last.into(),
            date,
        }
    }
}
