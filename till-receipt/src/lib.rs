//! # till-receipt
//!
//! Customer receipt printing for completed orders.
//!
//! Turns an [`Order`] into a printed thermal receipt on one of several
//! candidate network printers:
//!
//! ```text
//! Order → ReceiptFormatter → directives → Encoder → bytes → PrintDispatcher
//!                                                            ├─ active endpoint (fast path)
//!                                                            └─ discover → retry once
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use till_receipt::{PrintDispatcher, ReceiptConfig};
//!
//! let config = ReceiptConfig::from_env()?;
//! let dispatcher = PrintDispatcher::from_config(&config);
//!
//! match dispatcher.print(&order).await {
//!     Ok(ack) => tracing::info!(endpoint = %ack.endpoint, "Receipt printed"),
//!     Err(e) if e.is_offline() => tracing::warn!("Printer offline"),
//!     Err(e) => tracing::error!(error = %e, "Receipt failed"),
//! }
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod formatter;
pub mod logger;
pub mod order;
pub mod registry;

pub use config::ReceiptConfig;
pub use dispatcher::{Ack, ConnectionState, DeliveryPath, PrintDispatcher, PrintJob};
pub use error::{ConfigError, PrintError, PrintResult};
pub use formatter::ReceiptFormatter;
pub use order::{CustomerContact, LineItem, Order};
pub use registry::{EndpointRegistry, discover};
