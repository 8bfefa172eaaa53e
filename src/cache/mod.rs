//! Cache module for the last known ticker
//!
//! This module persists the most recent successful ticker reading to disk so
//! it can be shown, marked as offline, when a later fetch fails. Entries
//! never expire; each successful fetch overwrites the previous one.

mod store;

pub use store::{CacheRecord, CacheStore, CACHE_NAMESPACE};
