//! UI rendering module for Crypto Monitor
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod help_overlay;
pub mod ticker_view;

pub use help_overlay::render as render_help_overlay;
pub use ticker_view::render as render_ticker_view;
