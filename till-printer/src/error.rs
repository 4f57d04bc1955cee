//! Error types for the printer transport

use thiserror::Error;

/// Transport error types
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection error
    #[error("Connection failed: {0}")]
    Connection(String),

    /// IO error while writing to or closing the connection
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Timeout waiting for printer
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Endpoint could not be parsed or resolved
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl TransportError {
    /// Whether the error happened because a deadline expired
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout(_))
    }
}

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;
