use std::time::Duration;

use chrono_tz::Tz;
use serde::Serialize;
use till_printer::{CodePage, PrinterEndpoint};

use crate::error::ConfigError;

const DEFAULT_PRINTERS: &str = "printer=127.0.0.1:9100";
const DEFAULT_RESTAURANT_NAME: &str = "KEBAB HOUSE";
const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Berlin;

/// Receipt printing configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | RECEIPT_PRINTERS | printer=127.0.0.1:9100 | Candidate endpoints in priority order (`label=host:port,...`) |
/// | PRINTER_PROBE_TIMEOUT_MS | 1000 | Per-candidate probe timeout |
/// | PRINTER_SEND_TIMEOUT_MS | 5000 | Per-attempt send timeout |
/// | RESTAURANT_NAME | KEBAB HOUSE | Receipt header |
/// | RECEIPT_TIMEZONE | Europe/Berlin | Time zone for printed timestamps |
/// | RECEIPT_CODE_PAGE | utf8 | `utf8` or `cp1252` |
/// | LOG_LEVEL | info | Log level when `RUST_LOG` is unset |
/// | LOG_DIR | (unset) | Directory for daily rolling log files |
///
/// # Example
///
/// ```ignore
/// RECEIPT_PRINTERS="front=192.168.1.50:9100,backup=192.168.1.51" till-receipt discover
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptConfig {
    /// Candidate printer endpoints, earlier entries preferred
    pub endpoints: Vec<PrinterEndpoint>,
    pub probe_timeout_ms: u64,
    pub send_timeout_ms: u64,
    pub restaurant_name: String,
    #[serde(serialize_with = "serialize_display")]
    pub timezone: Tz,
    #[serde(serialize_with = "serialize_display")]
    pub code_page: CodePage,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl ReceiptConfig {
    /// Load from environment variables
    ///
    /// Unset variables use defaults. A malformed endpoint list is an error;
    /// other malformed values fall back to their default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let printers = lookup("RECEIPT_PRINTERS").unwrap_or_else(|| DEFAULT_PRINTERS.into());

        Ok(Self {
            endpoints: parse_endpoints(&printers)?,
            probe_timeout_ms: parse_or(&lookup, "PRINTER_PROBE_TIMEOUT_MS", 1000),
            send_timeout_ms: parse_or(&lookup, "PRINTER_SEND_TIMEOUT_MS", 5000),
            restaurant_name: lookup("RESTAURANT_NAME")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_RESTAURANT_NAME.into()),
            timezone: parse_or(&lookup, "RECEIPT_TIMEZONE", DEFAULT_TIMEZONE),
            code_page: parse_or(&lookup, "RECEIPT_CODE_PAGE", CodePage::Utf8),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: lookup("LOG_DIR").filter(|s| !s.is_empty()),
        })
    }

    /// Defaults with the given endpoints
    ///
    /// Commonly used by hosts that keep printer settings elsewhere, and in tests.
    pub fn with_endpoints(endpoints: Vec<PrinterEndpoint>) -> Self {
        Self {
            endpoints,
            probe_timeout_ms: 1000,
            send_timeout_ms: 5000,
            restaurant_name: DEFAULT_RESTAURANT_NAME.into(),
            timezone: DEFAULT_TIMEZONE,
            code_page: CodePage::Utf8,
            log_level: "info".into(),
            log_dir: None,
        }
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }
}

/// Parse a comma-separated endpoint list, keeping its order
pub fn parse_endpoints(value: &str) -> Result<Vec<PrinterEndpoint>, ConfigError> {
    let endpoints = value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<PrinterEndpoint>()
                .map_err(|source| ConfigError::InvalidEndpoint {
                    value: s.to_string(),
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if endpoints.is_empty() {
        return Err(ConfigError::NoEndpoints);
    }
    Ok(endpoints)
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Invalid config value, using default");
            default
        }),
        None => default,
    }
}

fn serialize_display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: std::fmt::Display,
    S: serde::Serializer,
{
    serializer.collect_str(value)
}
