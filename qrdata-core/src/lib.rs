//! Core types and utilities for QR payload processing
//!
//! This crate provides the error type, the byte cursor and writer used by
//! the transcoders, and the diagnostic reporters.

pub mod cursor;
pub mod error;
pub mod reporter;

pub use cursor::{ByteCursor, ByteWriter, minimal_be_bytes};
pub use error::{QrDataError, QrDataResult};
pub use reporter::{MemoryReporter, NullReporter, Reporter};
