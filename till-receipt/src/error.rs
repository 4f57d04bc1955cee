//! Error types for receipt printing

use thiserror::Error;
use till_printer::{PrinterEndpoint, TransportError};

/// Terminal outcome of a failed print request
///
/// Formatting and encoding cannot fail, so every variant comes from the
/// network side. Timeouts are carried inside [`TransportError::Timeout`].
#[derive(Debug, Error)]
pub enum PrintError {
    /// No candidate endpoint answered during discovery
    #[error("Printer offline: none of {candidates} configured endpoints is reachable")]
    ConnectionUnavailable { candidates: usize },

    /// A reachable endpoint accepted the connection but the job did not get through
    #[error("Transmission to {endpoint} failed: {source}")]
    TransmissionFailed {
        endpoint: PrinterEndpoint,
        #[source]
        source: TransportError,
    },
}

impl PrintError {
    /// Whether the printer should be reported to the user as offline
    pub fn is_offline(&self) -> bool {
        matches!(self, PrintError::ConnectionUnavailable { .. })
    }

    /// Whether a deadline expiry caused the failure
    pub fn is_timeout(&self) -> bool {
        match self {
            PrintError::TransmissionFailed { source, .. } => source.is_timeout(),
            PrintError::ConnectionUnavailable { .. } => false,
        }
    }
}

/// Result type for print operations
pub type PrintResult<T> = Result<T, PrintError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid printer endpoint '{value}': {source}")]
    InvalidEndpoint {
        value: String,
        #[source]
        source: TransportError,
    },

    #[error("No printer endpoints configured")]
    NoEndpoints,
}
