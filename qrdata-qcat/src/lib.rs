//! QCAT transit tickets
//!
//! A QCAT ticket is a BER payload nested in the EMV customer-presented
//! transparent template. This crate provides the immutable [`Ticket`] entity,
//! its validating [`TicketBuilder`] and the codec that reads and writes the
//! wire form.
//!
//! # Usage
//!
//! ```rust,no_run
//! use qrdata_core::MemoryReporter;
//! use qrdata_qcat::Ticket;
//!
//! let mut reporter = MemoryReporter::new();
//! let ticket = Ticket::decode_base64("hQVDUFYwMWFu...", &mut reporter)?;
//! println!("ticket {} valid until {:?}", ticket.ticket_id(), ticket.expiry_time());
//! let bytes = ticket.encode()?;
//! # Ok::<(), qrdata_core::QrDataError>(())
//! ```
//!
//! Signatures are framed but never computed or verified.

pub mod codec;
pub mod poi;
pub mod signature;
pub mod ticket;

pub use codec::PAYLOAD_FORMAT_INDICATOR;
pub use poi::{EmvPoiData, QCAT_ADF_NAME};
pub use signature::{SignatureVersion, placeholder_signature};
pub use ticket::{MAX_SEAT_LENGTH, Ticket, TicketBuilder};
