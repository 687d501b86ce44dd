//! Casefile CLI — error types.

use casefile_core::error::DomainError;
use thiserror::Error;

/// Startup and runtime errors for the terminal driver.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Mission loading, traversal or persistence failed.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Terminal I/O failed.
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),
}
