//! Print dispatcher
//!
//! Orchestrates format → encode → send and owns the "last known good"
//! printer endpoint.
//!
//! Sending uses two tiers, bounded to at most two send attempts and one
//! discovery pass per request:
//! 1. Fast path: send straight to the remembered endpoint.
//! 2. On failure (or with nothing remembered): forget it, discover the first
//!    reachable candidate and send once more through it.
//!
//! Discovery only performs a bare handshake; the send that follows opens its
//! own connection.

use chrono::{DateTime, Utc};
use std::time::Duration;
use till_printer::{Encoder, PrinterEndpoint, TcpTransport, Transport};
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

use crate::config::ReceiptConfig;
use crate::error::{PrintError, PrintResult};
use crate::formatter::ReceiptFormatter;
use crate::order::Order;
use crate::registry::EndpointRegistry;

/// Encoded job, created once per print request
#[derive(Debug, Clone)]
pub struct PrintJob {
    payload: Vec<u8>,
    description: String,
}

impl PrintJob {
    pub fn new(payload: Vec<u8>, description: impl Into<String>) -> Self {
        Self {
            payload,
            description: description.into(),
        }
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Which tier delivered the job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryPath {
    /// Sent to the remembered endpoint without probing
    FastPath,
    /// Sent after a discovery pass
    Rediscovered,
}

/// Successful print acknowledgement
#[derive(Debug, Clone)]
pub struct Ack {
    pub endpoint: PrinterEndpoint,
    pub bytes_sent: usize,
    pub path: DeliveryPath,
    pub description: String,
}

/// Process-wide printer connection memory
///
/// Lives for the lifetime of the dispatcher, never persisted.
#[derive(Debug, Clone, Default)]
pub struct ConnectionState {
    pub active_endpoint: Option<PrinterEndpoint>,
    /// When the active endpoint last accepted a job or a probe
    pub last_verified_at: Option<DateTime<Utc>>,
}

impl ConnectionState {
    fn mark_verified(&mut self, endpoint: PrinterEndpoint) {
        self.active_endpoint = Some(endpoint);
        self.last_verified_at = Some(Utc::now());
    }

    /// Forget the active endpoint; the last verification time is kept
    fn clear(&mut self) {
        self.active_endpoint = None;
    }
}

/// Print dispatcher
///
/// Requests are serialized: the connection state lock is held for the whole
/// send/discover sequence, so concurrent callers queue up behind each other.
/// A queued job also waits out the sender's close wait, up to
/// [`till_printer::CLOSE_WAIT`] per job when the printer keeps its side open.
pub struct PrintDispatcher<T: Transport = TcpTransport> {
    transport: T,
    registry: EndpointRegistry,
    formatter: ReceiptFormatter,
    encoder: Encoder,
    probe_timeout: Duration,
    send_timeout: Duration,
    state: Mutex<ConnectionState>,
}

impl PrintDispatcher<TcpTransport> {
    /// Dispatcher sending over raw TCP
    pub fn from_config(config: &ReceiptConfig) -> Self {
        Self::with_transport(TcpTransport, config)
    }
}

impl<T: Transport> PrintDispatcher<T> {
    pub fn with_transport(transport: T, config: &ReceiptConfig) -> Self {
        Self {
            transport,
            registry: EndpointRegistry::new(config.endpoints.iter().cloned()),
            formatter: ReceiptFormatter::new(config.restaurant_name.clone(), config.timezone),
            encoder: Encoder::new(config.code_page),
            probe_timeout: config.probe_timeout(),
            send_timeout: config.send_timeout(),
            state: Mutex::new(ConnectionState::default()),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn registry(&self) -> &EndpointRegistry {
        &self.registry
    }

    /// Snapshot of the current connection state
    pub async fn connection_state(&self) -> ConnectionState {
        self.state.lock().await.clone()
    }

    /// Format and encode an order without sending it
    pub fn prepare(&self, order: &Order) -> PrintJob {
        let directives = self.formatter.format(order);
        let payload = self.encoder.encode(&directives);
        PrintJob::new(payload, format!("Receipt for order {}", order.order_id))
    }

    /// Print the receipt for an order
    #[instrument(skip(self, order), fields(order_id = %order.order_id))]
    pub async fn print(&self, order: &Order) -> PrintResult<Ack> {
        let job = self.prepare(order);
        self.print_job(job).await
    }

    /// Send an already encoded job using the two-tier policy
    #[instrument(skip(self, job), fields(description = %job.description(), bytes = job.payload().len()))]
    pub async fn print_job(&self, job: PrintJob) -> PrintResult<Ack> {
        let mut state = self.state.lock().await;

        // Tier 1: remembered endpoint
        if let Some(endpoint) = state.active_endpoint.clone() {
            match self
                .transport
                .send(&endpoint, job.payload(), self.send_timeout)
                .await
            {
                Ok(()) => {
                    info!(endpoint = %endpoint, "Print job sent via active endpoint");
                    state.mark_verified(endpoint.clone());
                    return Ok(Self::ack(endpoint, &job, DeliveryPath::FastPath));
                }
                Err(e) => {
                    warn!(endpoint = %endpoint, error = %e, "Active endpoint failed, rediscovering");
                    state.clear();
                }
            }
        }

        // Tier 2: rediscover and retry once
        let Some(endpoint) = self
            .registry
            .discover(&self.transport, self.probe_timeout)
            .await
        else {
            error!(candidates = self.registry.len(), "Printer offline");
            return Err(PrintError::ConnectionUnavailable {
                candidates: self.registry.len(),
            });
        };

        match self
            .transport
            .send(&endpoint, job.payload(), self.send_timeout)
            .await
        {
            Ok(()) => {
                info!(endpoint = %endpoint, "Print job sent via discovered endpoint");
                state.mark_verified(endpoint.clone());
                Ok(Self::ack(endpoint, &job, DeliveryPath::Rediscovered))
            }
            Err(source) => {
                error!(endpoint = %endpoint, error = %source, "Print job failed after rediscovery");
                Err(PrintError::TransmissionFailed { endpoint, source })
            }
        }
    }

    /// Run discovery without printing
    ///
    /// A reachable endpoint becomes the active one; otherwise the active
    /// endpoint is forgotten.
    #[instrument(skip(self))]
    pub async fn check_connection(&self) -> Option<PrinterEndpoint> {
        let mut state = self.state.lock().await;
        match self
            .registry
            .discover(&self.transport, self.probe_timeout)
            .await
        {
            Some(endpoint) => {
                state.mark_verified(endpoint.clone());
                Some(endpoint)
            }
            None => {
                state.clear();
                None
            }
        }
    }

    fn ack(endpoint: PrinterEndpoint, job: &PrintJob, path: DeliveryPath) -> Ack {
        Ack {
            endpoint,
            bytes_sent: job.payload().len(),
            path,
            description: job.description().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_state_clear_keeps_timestamp() {
        let mut state = ConnectionState::default();
        assert!(state.active_endpoint.is_none());
        assert!(state.last_verified_at.is_none());

        state.mark_verified(PrinterEndpoint::new("p", "10.0.0.1", 9100));
        let verified = state.last_verified_at;
        assert!(verified.is_some());

        state.clear();
        assert!(state.active_endpoint.is_none());
        assert_eq!(state.last_verified_at, verified);
    }

    #[test]
    fn test_prepare_describes_job() {
        let config = ReceiptConfig::with_endpoints(vec![PrinterEndpoint::new("p", "10.0.0.1", 9100)]);
        let dispatcher = PrintDispatcher::from_config(&config);
        let order = Order {
            order_id: "77".to_string(),
            created_at: 0,
            customer: Default::default(),
            pickup_location: String::new(),
            items: vec![],
            subtotal: Default::default(),
            tax: Default::default(),
            total: Default::default(),
            special_instructions: None,
            estimated_ready_at: None,
        };

        let job = dispatcher.prepare(&order);
        assert_eq!(job.description(), "Receipt for order 77");
        assert_eq!(&job.payload()[..2], &[0x1B, 0x40]);
    }
}
