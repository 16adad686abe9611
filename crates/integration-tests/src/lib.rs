//! Integration tests for Paperback.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p paperback-integration-tests
//! ```
//!
//! Everything here is self-contained: live-mode behavior is exercised
//! against [`StubGateway`], a one-socket HTTP responder, or against an
//! address nothing listens on. No external gateway is required.
//!
//! # Test Categories
//!
//! - `fixture_walkthrough` - full shopping flow in fixture mode
//! - `degraded_fallbacks` - every operation's fallback when the gateway is down
//! - `gateway_responses` - status and parse handling for live responses
//! - `session_expiry` - credential teardown and event emission on 401

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A minimal HTTP server that answers every request with one canned
/// status and body.
///
/// Intended only for tests; it reads each request just far enough to
/// answer it and never inspects the contents.
pub struct StubGateway {
    /// Base URL to point a `BackendConfig` at.
    pub base_url: String,
    handle: JoinHandle<()>,
}

impl StubGateway {
    /// Bind an ephemeral port and serve `status`/`body` to every request.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound; tests cannot proceed
    /// without it.
    pub async fn start(status: u16, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub gateway");
        let addr = listener.local_addr().expect("stub gateway address");
        let response = format!(
            "HTTP/1.1 {status} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            reason(status),
            body.len(),
        );

        let handle = tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let response = response.clone();
                tokio::spawn(async move {
                    // Drain enough of the request to be polite, then answer.
                    let mut buf = [0u8; 4096];
                    let _ = socket.read(&mut buf).await;
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self {
            base_url: format!("http://{addr}/api"),
            handle,
        }
    }
}

impl Drop for StubGateway {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    }
}

/// A base URL nothing listens on; connections are refused immediately.
#[must_use]
pub fn unreachable_base_url() -> &'static str {
    // Port 9 (discard) is never bound in the test environment.
    "http://127.0.0.1:9/api"
}
