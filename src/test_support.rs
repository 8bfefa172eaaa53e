//! Helpers for unit tests

#[path = "../tests/common/stub_server.rs"]
mod stub_server;

pub use stub_server::{closed_port_url, spawn_stub_server, TICKER_BODY};

use crate::data::TickerClient;

/// Ticker client for a stub URL that ignores proxy environment variables
pub fn stub_client(url: &str) -> TickerClient {
    let client = reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("Failed to build HTTP client");
    TickerClient::with_client(client, url)
}
