//! Network printer endpoints

use crate::error::{TransportError, TransportResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::SocketAddr;
use std::str::FromStr;

/// Raw printing port used by most thermal printers
pub const DEFAULT_PORT: u16 = 9100;

/// A candidate network path to a printer
///
/// Identity is `(host, port)`; the label is only for humans and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrinterEndpoint {
    pub label: String,
    pub host: String,
    pub port: u16,
}

impl PrinterEndpoint {
    pub fn new(label: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            label: label.into(),
            host: host.into(),
            port,
        }
    }

    /// `host:port`, with IPv6 literals bracketed
    pub fn address(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Resolve to the first socket address of the host
    pub async fn resolve(&self) -> TransportResult<SocketAddr> {
        let addr = self.address();
        tokio::net::lookup_host(addr.as_str())
            .await
            .map_err(|e| TransportError::InvalidEndpoint(format!("{}: {}", addr, e)))?
            .next()
            .ok_or_else(|| TransportError::InvalidEndpoint(format!("No address for {}", addr)))
    }
}

impl PartialEq for PrinterEndpoint {
    fn eq(&self, other: &Self) -> bool {
        self.host == other.host && self.port == other.port
    }
}

impl Eq for PrinterEndpoint {}

impl Hash for PrinterEndpoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.host.hash(state);
        self.port.hash(state);
    }
}

impl fmt::Display for PrinterEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.address())
    }
}

/// Parses `label=host:port`, `host:port` or `host` (port 9100)
impl FromStr for PrinterEndpoint {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (label, addr) = match s.split_once('=') {
            Some((label, addr)) => (label.trim(), addr.trim()),
            None => ("", s),
        };

        if addr.is_empty() {
            return Err(TransportError::InvalidEndpoint(format!(
                "Missing host: {}",
                s
            )));
        }

        let (host, port) = split_host_port(addr)?;
        let label = if label.is_empty() { host } else { label };

        Ok(Self::new(label, host, port))
    }
}

fn split_host_port(addr: &str) -> TransportResult<(&str, u16)> {
    // [v6]:port or [v6]
    if let Some(rest) = addr.strip_prefix('[') {
        let (host, tail) = rest
            .split_once(']')
            .ok_or_else(|| TransportError::InvalidEndpoint(format!("Unclosed '[': {}", addr)))?;
        let port = match tail.strip_prefix(':') {
            Some(p) => parse_port(p, addr)?,
            None if tail.is_empty() => DEFAULT_PORT,
            None => {
                return Err(TransportError::InvalidEndpoint(format!(
                    "Invalid address: {}",
                    addr
                )));
            }
        };
        return Ok((host, port));
    }

    match addr.rsplit_once(':') {
        // bare IPv6 literal without port
        Some((host, _)) if host.contains(':') => Ok((addr, DEFAULT_PORT)),
        Some((host, port)) if !host.is_empty() => Ok((host, parse_port(port, addr)?)),
        Some(_) => Err(TransportError::InvalidEndpoint(format!(
            "Missing host: {}",
            addr
        ))),
        None => Ok((addr, DEFAULT_PORT)),
    }
}

fn parse_port(port: &str, addr: &str) -> TransportResult<u16> {
    match port.parse::<u16>() {
        Ok(p) if p != 0 => Ok(p),
        _ => Err(TransportError::InvalidEndpoint(format!(
            "Invalid port in {}",
            addr
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full() {
        let ep: PrinterEndpoint = "counter=192.168.1.50:9101".parse().unwrap();
        assert_eq!(ep.label, "counter");
        assert_eq!(ep.host, "192.168.1.50");
        assert_eq!(ep.port, 9101);
    }

    #[test]
    fn test_parse_default_port_and_label() {
        let ep: PrinterEndpoint = "printer.local".parse().unwrap();
        assert_eq!(ep.label, "printer.local");
        assert_eq!(ep.port, DEFAULT_PORT);
        assert_eq!(ep.address(), "printer.local:9100");
    }

    #[test]
    fn test_parse_ipv6() {
        let ep: PrinterEndpoint = "[fe80::1]:9100".parse().unwrap();
        assert_eq!(ep.host, "fe80::1");
        assert_eq!(ep.address(), "[fe80::1]:9100");
    }

    #[test]
    fn test_invalid() {
        assert!("x=".parse::<PrinterEndpoint>().is_err());
        assert!("host:notaport".parse::<PrinterEndpoint>().is_err());
        assert!("host:0".parse::<PrinterEndpoint>().is_err());
        assert!(":9100".parse::<PrinterEndpoint>().is_err());
    }

    #[test]
    fn test_identity_ignores_label() {
        let a = PrinterEndpoint::new("front", "10.0.0.5", 9100);
        let b = PrinterEndpoint::new("back", "10.0.0.5", 9100);
        let c = PrinterEndpoint::new("front", "10.0.0.5", 9101);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
