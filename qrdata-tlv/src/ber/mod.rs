//! BER transcoder
//!
//! The subset of ASN.1 BER used by EMV customer-presented QR codes:
//!
//! ```text
//! [Tag: 1 byte] [Length: 1-4 bytes] [Value]
//! ```
//!
//! - Tags are a single byte. Bit 0x20 marks a constructed tag whose value is
//!   itself a sequence of TLVs.
//! - Lengths are definite only. Short form covers 0-127; long form announces
//!   1-3 following big-endian length bytes, so at most 0xFFFFFF.
//! - Indefinite length and multi-byte tags are not supported.

pub mod decoder;
pub mod encoder;
pub mod length;

pub use decoder::{BerDecoder, CONSTRUCTED_BIT};
pub use encoder::BerEncoder;
pub use length::{BerLength, MAX_LENGTH};

use crate::tlv::TlvNode;
use qrdata_core::QrDataResult;

/// Build a constructed node whose raw value is the BER encoding of `children`
pub fn constructed(tag: u32, children: Vec<TlvNode>) -> QrDataResult<TlvNode> {
    let mut encoder = BerEncoder::new();
    encoder.encode_nodes(&children)?;
    let value = encoder.into_bytes();
    Ok(TlvNode::new(tag, value.len(), value, children))
}
