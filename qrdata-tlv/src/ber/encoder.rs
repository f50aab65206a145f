//! BER encoder for TLV trees
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use qrdata_tlv::ber::BerEncoder;
//! use qrdata_tlv::TlvNode;
//!
//! let mut encoder = BerEncoder::new();
//! encoder.encode_nodes(&[TlvNode::primitive(0x85, b"CPV01".to_vec())])?;
//! let bytes = encoder.into_bytes();
//! # Ok::<(), qrdata_core::QrDataError>(())
//! ```

use super::length::BerLength;
use crate::tlv::TlvNode;
use qrdata_core::{ByteWriter, QrDataError, QrDataResult};

/// Encoder for single-byte-tag, definite-length BER
///
/// Lengths are always written in the minimal form. For constructed nodes
/// the written length is that of the re-encoded children; the stored raw
/// `value` is not used.
///
/// # Error Handling
///
/// Fails with [`QrDataError::EncodingConstraint`] if:
/// - A tag does not fit into one byte
/// - A length exceeds 0xFFFFFF
/// - A leaf's `length` differs from its value size
#[derive(Debug, Default)]
pub struct BerEncoder {
    writer: ByteWriter,
}

impl BerEncoder {
    pub fn new() -> Self {
        Self {
            writer: ByteWriter::new(),
        }
    }

    /// Create a new BER encoder with initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            writer: ByteWriter::with_capacity(capacity),
        }
    }

    /// Encode a sequence of sibling nodes
    pub fn encode_nodes(&mut self, nodes: &[TlvNode]) -> QrDataResult<()> {
        for node in nodes {
            self.encode_node(node)?;
        }
        Ok(())
    }

    /// Encode one node and its subtree
    pub fn encode_node(&mut self, node: &TlvNode) -> QrDataResult<()> {
        let tag = u8::try_from(node.tag).map_err(|_| {
            QrDataError::EncodingConstraint(format!(
                "Tag 0x{:X} does not fit into a single BER tag byte",
                node.tag
            ))
        })?;

        if node.is_constructed() {
            let mut inner = BerEncoder::new();
            inner.encode_nodes(&node.children)?;
            self.encode_tlv(tag, inner.as_bytes())
        } else {
            if node.length != node.value.len() {
                return Err(QrDataError::EncodingConstraint(format!(
                    "Size of value of tag 0x{:02X} not the same as TLV length. Was size {} vs. {}",
                    tag,
                    node.value.len(),
                    node.length
                )));
            }
            self.encode_tlv(tag, &node.value)
        }
    }

    /// Write `tag | length | value`
    pub fn encode_tlv(&mut self, tag: u8, value: &[u8]) -> QrDataResult<()> {
        let length = BerLength::new(value.len())?;
        self.writer.write_byte(tag);
        length.encode(&mut self.writer);
        self.writer.write(value);
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.writer.as_bytes()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.writer.into_bytes()
    }
}
