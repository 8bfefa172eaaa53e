//! Crypto Monitor Library
//!
//! This module exposes the controller, data, cache and UI modules for use by
//! the binary and in integration tests.

pub mod app;
pub mod cache;
pub mod cli;
pub mod data;
pub mod format;
pub mod logging;
pub mod refresh;
pub mod ui;

#[cfg(test)]
mod test_support;
