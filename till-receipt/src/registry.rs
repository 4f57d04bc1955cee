//! Endpoint registry and discovery
//!
//! Candidates are probed strictly one after another, in the order they were
//! configured, and discovery stops at the first one that answers. Earlier
//! entries therefore act as primaries and later ones as backups.

use std::time::Duration;
use till_printer::{PrinterEndpoint, Transport};
use tracing::{debug, info, instrument, warn};

/// Fixed, ordered list of candidate printer endpoints
#[derive(Debug, Clone)]
pub struct EndpointRegistry {
    candidates: Vec<PrinterEndpoint>,
}

impl EndpointRegistry {
    /// Create a registry; duplicate `(host, port)` entries keep their first position
    pub fn new(candidates: impl IntoIterator<Item = PrinterEndpoint>) -> Self {
        let mut unique: Vec<PrinterEndpoint> = Vec::new();
        for endpoint in candidates {
            if unique.contains(&endpoint) {
                warn!(endpoint = %endpoint, "Duplicate printer endpoint ignored");
                continue;
            }
            unique.push(endpoint);
        }
        Self { candidates: unique }
    }

    pub fn candidates(&self) -> &[PrinterEndpoint] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// First reachable candidate, see [`discover`]
    pub async fn discover<T: Transport>(
        &self,
        transport: &T,
        timeout: Duration,
    ) -> Option<PrinterEndpoint> {
        discover(transport, &self.candidates, timeout).await
    }
}

/// Probe candidates in order and return the first reachable one
///
/// The timeout applies per candidate, so the worst case is
/// `timeout × candidates.len()`.
#[instrument(skip(transport, candidates), fields(candidates = candidates.len()))]
pub async fn discover<T: Transport>(
    transport: &T,
    candidates: &[PrinterEndpoint],
    timeout: Duration,
) -> Option<PrinterEndpoint> {
    for endpoint in candidates {
        debug!(endpoint = %endpoint, "Probing printer endpoint");
        if transport.probe(endpoint, timeout).await {
            info!(endpoint = %endpoint, "Printer endpoint discovered");
            return Some(endpoint.clone());
        }
    }

    warn!("No reachable printer endpoint");
    None
}
