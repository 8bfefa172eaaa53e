//! Throwaway loopback HTTP responder
//!
//! Shared by the library's unit tests and the integration tests.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

/// Serves every incoming connection with the same status and JSON body.
///
/// Returns the ticker URL pointing at the responder. The listener thread is
/// detached and lives until the test process exits.
pub fn spawn_stub_server(status: u16, body: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind stub server");
    let addr = listener.local_addr().expect("Stub server has no address");
    let body = body.to_string();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };

            // Read until the end of the request headers
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        request.extend_from_slice(&buf[..n]);
                        if request.windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
    });

    format!("http://{}/api/BTC/ticker/", addr)
}

/// Returns a URL on a local port that nothing listens on
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind port listener");
    let addr = listener.local_addr().expect("Port listener has no address");
    drop(listener);
    format!("http://{}/api/BTC/ticker/", addr)
}

/// A well-formed ticker body as served by the exchange
pub const TICKER_BODY: &str = r#"{
    "ticker": {
        "high": "66120.00000000",
        "low": "64010.12000000",
        "vol": "41.93412000",
        "last": "65000.50",
        "buy": "64990.00000000",
        "sell": "65010.00000000",
        "open": "64500.00000000",
        "date": 1700000000
    }
}"#;
