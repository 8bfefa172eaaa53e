//! Mercado Bitcoin ticker API client
//!
//! This module fetches the current BTC/BRL ticker and parses it into a
//! `TickerSnapshot`. It performs exactly one request per call; fallback
//! behavior is left to the caller.

use log::debug;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::TickerSnapshot;

/// Default ticker endpoint
pub const DEFAULT_TICKER_URL: &str = "https://www.mercadobitcoin.net/api/BTC/ticker/";

/// Errors that can occur when fetching the ticker
#[derive(Debug, Error)]
pub enum TickerError {
    /// Server answered with a non-2xx status
    #[error("HTTP status {0}")]
    Status(u16),

    /// HTTP request failed (connectivity, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Top-level ticker response
#[derive(Debug, Deserialize)]
struct TickerResponse {
    ticker: TickerSnapshot,
}

/// Client for fetching the ticker from a fixed endpoint
#[derive(Debug, Clone)]
pub struct TickerClient {
    client: Client,
    url: String,
}

impl Default for TickerClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TickerClient {
    /// Create a new TickerClient pointed at the default endpoint
    pub fn new() -> Self {
        Self::with_url(DEFAULT_TICKER_URL)
    }

    /// Create a new TickerClient for a custom endpoint
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    /// Create a new TickerClient with a custom HTTP client
    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// The endpoint this client talks to
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the current ticker
    ///
    /// # Returns
    /// * `Ok(TickerSnapshot)` - 2xx response with a parseable body
    /// * `Err(TickerError::Status)` - non-2xx response, carrying the code
    /// * `Err(TickerError::Request | Parse)` - transport or body failure
    pub async fn fetch(&self) -> Result<TickerSnapshot, TickerError> {
        debug!("GET {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TickerError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        parse_response(&text)
    }
}

/// Parse a ticker response body into a snapshot
pub fn parse_response(body: &str) -> Result<TickerSnapshot, TickerError> {
    let response: TickerResponse = serde_json::from_str(body)?;
    Ok(response.ticker)
}
