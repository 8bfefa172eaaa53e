//! Helpers shared by integration tests

#![allow(dead_code, unused_imports)]

use std::process::{Command, Output};

mod stub_server;

pub use stub_server::{closed_port_url, spawn_stub_server, TICKER_BODY};

/// Runs the binary with the given args and captures output
pub fn run_cli(args: &[&str]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_cryptomonitor"));
    // Stub servers run on loopback; keep proxies out of the way
    for var in [
        "HTTP_PROXY",
        "http_proxy",
        "HTTPS_PROXY",
        "https_proxy",
        "ALL_PROXY",
        "all_proxy",
    ] {
        command.env_remove(var);
    }
    command
        .args(args)
        .output()
        .expect("Failed to execute cryptomonitor")
}
