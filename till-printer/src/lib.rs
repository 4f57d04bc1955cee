//! # till-printer
//!
//! ESC/POS receipt printer plumbing - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - Print directives (text, alignment, emphasis, size, feed, cut)
//! - Encoding directives into an ESC/POS byte stream
//! - Code page conversion for printers without UTF-8 support
//! - Network printer endpoints and the raw TCP transport (port 9100)
//!
//! Business logic (WHAT to print, WHERE to print it) stays in `till-receipt`.
//!
//! ## Example
//!
//! ```ignore
//! use till_printer::{Alignment, Encoder, PrintDirective, PrinterEndpoint, TcpTransport, Transport};
//!
//! let bytes = Encoder::default().encode(&[
//!     PrintDirective::SetAlignment(Alignment::Center),
//!     PrintDirective::Text("KEBAB HOUSE\n".into()),
//!     PrintDirective::CutPaper,
//! ]);
//!
//! let endpoint = PrinterEndpoint::new("counter", "192.168.1.100", 9100);
//! TcpTransport.send(&endpoint, &bytes, Duration::from_secs(5)).await?;
//! ```

mod directive;
mod encoding;
mod endpoint;
mod error;
mod escpos;
mod transport;

// Re-exports
pub use directive::{Alignment, Emphasis, PrintDirective, TextSize};
pub use encoding::{CodePage, encode_text};
pub use endpoint::{DEFAULT_PORT, PrinterEndpoint};
pub use error::{TransportError, TransportResult};
pub use escpos::{Encoder, encode};
pub use transport::{CLOSE_WAIT, TcpTransport, Transport};
