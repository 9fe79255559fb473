//! Error types for the titlecast engine
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// Main error type for the titlecast engine
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Network-level failure: DNS, connect, TLS, timeout
    #[error("{}", friendly_network_error(.0))]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("Stream rejected the request: HTTP {0}")]
    BadStatus(reqwest::StatusCode),

    /// The stream answered, but without an `icy-metaint` header
    #[error("Stream does not support title metadata")]
    NoMetadata,

    /// Read failure on an established stream
    #[error("Stream read failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the titlecast engine
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Convert reqwest errors into user-friendly messages
fn friendly_network_error(e: &reqwest::Error) -> String {
    if e.is_builder() {
        if let Some(url) = e.url() {
            return format!("Invalid URL: {url}");
        }
        return "Invalid URL".to_string();
    }
    if e.is_connect() {
        if let Some(url) = e.url() {
            return format!(
                "Could not connect to {}",
                url.host_str().unwrap_or("server")
            );
        }
        return "Could not connect to server".to_string();
    }
    if e.is_timeout() {
        return "Connection timed out".to_string();
    }
    format!("Network error: {e}")
}
