//! Printer transport for sending ESC/POS data
//!
//! Network printers accept a raw byte stream on TCP port 9100 with no
//! framing; the job prints when the connection closes or the buffer flushes.

use crate::endpoint::PrinterEndpoint;
use crate::error::{TransportError, TransportResult};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{Instant, timeout, timeout_at};
use tracing::{info, instrument, warn};

/// Longest wait for the printer to close after the job is written
pub const CLOSE_WAIT: Duration = Duration::from_secs(1);

/// Trait for printer transports
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Check if the endpoint accepts connections
    ///
    /// Only a connection handshake is performed, no data is sent. Any error or
    /// an expired timeout counts as unreachable.
    async fn probe(&self, endpoint: &PrinterEndpoint, timeout: Duration) -> bool;

    /// Deliver a complete job to the endpoint within `timeout`
    async fn send(
        &self,
        endpoint: &PrinterEndpoint,
        data: &[u8],
        timeout: Duration,
    ) -> TransportResult<()>;
}

/// Raw TCP transport (port 9100)
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpTransport;

impl Transport for TcpTransport {
    #[instrument(skip(self), fields(addr = %endpoint.address(), label = %endpoint.label))]
    async fn probe(&self, endpoint: &PrinterEndpoint, check_timeout: Duration) -> bool {
        let connect = async {
            let addr = endpoint.resolve().await?;
            TcpStream::connect(addr)
                .await
                .map_err(|e| TransportError::Connection(format!("{}: {}", addr, e)))
        };

        match timeout(check_timeout, connect).await {
            Ok(Ok(_stream)) => {
                info!("Printer online");
                true
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Printer offline");
                false
            }
            Err(_) => {
                warn!("Printer check timeout");
                false
            }
        }
    }

    #[instrument(skip(self, data), fields(addr = %endpoint.address(), data_len = data.len()))]
    async fn send(
        &self,
        endpoint: &PrinterEndpoint,
        data: &[u8],
        send_timeout: Duration,
    ) -> TransportResult<()> {
        let deadline = Instant::now() + send_timeout;
        let address = endpoint.address();

        let addr = timeout_at(deadline, endpoint.resolve())
            .await
            .map_err(|_| TransportError::Timeout(format!("Resolve timeout: {}", address)))??;

        info!("Connecting to printer");

        let mut stream = timeout_at(deadline, TcpStream::connect(addr))
            .await
            .map_err(|_| TransportError::Timeout(format!("Connection timeout: {}", addr)))?
            .map_err(|e| TransportError::Connection(format!("{}: {}", addr, e)))?;

        info!("Connected, sending {} bytes", data.len());

        let write = async {
            stream.write_all(data).await?;
            stream.flush().await?;
            // FIN tells the printer the job is complete
            stream.shutdown().await
        };
        timeout_at(deadline, write)
            .await
            .map_err(|_| TransportError::Timeout(format!("Write timeout: {}", addr)))?
            .map_err(|e| {
                TransportError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Write failed: {}", e),
                ))
            })?;

        // Wait for the printer to close its side; status bytes are discarded
        let close_deadline = deadline.min(Instant::now() + CLOSE_WAIT);
        match timeout_at(close_deadline, drain(&mut stream)).await {
            Ok(Ok(received)) => {
                info!(received, "Printer closed connection, print job sent");
                Ok(())
            }
            Ok(Err(e)) => Err(TransportError::Io(std::io::Error::new(
                e.kind(),
                format!("Close failed: {}", e),
            ))),
            Err(_) => {
                warn!("Printer kept connection open, assuming job delivered");
                Ok(())
            }
        }
    }
}

/// Read until EOF, returning how many bytes the peer sent
async fn drain(stream: &mut TcpStream) -> std::io::Result<usize> {
    let mut buf = [0u8; 256];
    let mut total = 0;
    loop {
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            return Ok(total);
        }
        total += n;
    }
}
