//! Error types for the titlecast CLI

use thiserror::Error;

/// Frontend error type.
///
/// Engine failures never surface here; the monitor reports them through
/// its title placeholders. What remains is startup plumbing.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the titlecast CLI
pub type Result<T> = std::result::Result<T, AppError>;
