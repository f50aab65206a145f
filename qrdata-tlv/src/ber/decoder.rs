//! BER decoder for TLV trees
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use qrdata_core::NullReporter;
//! use qrdata_tlv::ber::BerDecoder;
//!
//! let data = [0x85, 0x05, b'C', b'P', b'V', b'0', b'1'];
//! let nodes = BerDecoder::new().decode(&data, &mut NullReporter)?;
//! # Ok::<(), qrdata_core::QrDataError>(())
//! ```

use super::length::BerLength;
use crate::config::DecoderConfig;
use crate::tlv::TlvNode;
use qrdata_core::{ByteCursor, QrDataError, QrDataResult, Reporter};

/// Bit of the tag byte that marks a constructed value
pub const CONSTRUCTED_BIT: u8 = 0x20;

/// Decoder for single-byte-tag, definite-length BER
///
/// # Error Handling
///
/// A malformed item fails the whole decode. Nothing is skipped and no
/// partial tree is returned. Errors can occur due to:
/// - Buffer underflow inside a tag, length or value
/// - More than three length bytes
/// - Nesting deeper than [`DecoderConfig::max_depth`]
#[derive(Debug, Clone, Default)]
pub struct BerDecoder {
    config: DecoderConfig,
}

impl BerDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Decode all TLV objects in `data`
    ///
    /// # Arguments
    /// * `data` - BER encoded bytes, consumed to the end
    /// * `reporter` - Receives the failure description if decoding fails
    pub fn decode(&self, data: &[u8], reporter: &mut dyn Reporter) -> QrDataResult<Vec<TlvNode>> {
        let mut cursor = ByteCursor::new(data);
        match self.decode_level(&mut cursor, 0) {
            Ok(nodes) => {
                log::debug!("BER decoded {} top-level nodes from {} bytes", nodes.len(), data.len());
                Ok(nodes)
            }
            Err(e) => {
                reporter.add_report(e.to_string());
                Err(e)
            }
        }
    }

    fn decode_level(&self, cursor: &mut ByteCursor<'_>, depth: usize) -> QrDataResult<Vec<TlvNode>> {
        if depth > self.config.max_depth {
            return Err(QrDataError::StructuralDecode(format!(
                "Nesting deeper than {} levels",
                self.config.max_depth
            )));
        }

        let mut nodes = Vec::new();

        while cursor.has_remaining() {
            let position = cursor.position();
            let tag = cursor.read_byte()?;
            let length = BerLength::decode(cursor)?.value();

            let value = cursor.peek(length).map_err(|_| {
                QrDataError::StructuralDecode(format!(
                    "Value of tag 0x{:02X} at position {} truncated: need {} bytes, have {}",
                    tag,
                    position,
                    length,
                    cursor.remaining()
                ))
            })?;

            let children = if tag & CONSTRUCTED_BIT != 0 {
                let mut inner = ByteCursor::new(value);
                self.decode_level(&mut inner, depth + 1)?
            } else {
                Vec::new()
            };
            cursor.seek_by(length as isize)?;

            log::trace!("BER T:0x{:02X} L:{} at {} depth {}", tag, length, position, depth);
            nodes.push(TlvNode::new(tag as u32, length, value.to_vec(), children));
        }

        Ok(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qrdata_core::{MemoryReporter, NullReporter};

    #[test]
    fn test_decode_primitive_and_constructed() {
        let data = hex::decode("8505435056303161074F054743415348").unwrap();
        let nodes = BerDecoder::new().decode(&data, &mut NullReporter).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0], TlvNode::primitive(0x85, b"CPV01".to_vec()));
        assert_eq!(nodes[1].tag, 0x61);
        assert_eq!(nodes[1].length, 7);
        assert_eq!(nodes[1].value, hex::decode("4F054743415348").unwrap());
        assert_eq!(nodes[1].children, vec![TlvNode::primitive(0x4F, b"GCASH".to_vec())]);
    }

    #[test]
    fn test_decode_children_stay_within_length() {
        // 0x61 holds one child, 0xC1 follows at top level
        let data = hex::decode("6103C10101C10102").unwrap();
        let nodes = BerDecoder::new().decode(&data, &mut NullReporter).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].children.len(), 1);
        assert_eq!(nodes[1], TlvNode::primitive(0xC1, vec![0x02]));
    }

    #[test]
    fn test_decode_empty_input() {
        let nodes = BerDecoder::new().decode(&[], &mut NullReporter).unwrap();
        assert!(nodes.is_empty());
    }

    #[test]
    fn test_truncated_value_fails_whole_decode() {
        let data = hex::decode("C10101C10501").unwrap();
        let mut reporter = MemoryReporter::new();
        let result = BerDecoder::new().decode(&data, &mut reporter);
        match result {
            Err(QrDataError::StructuralDecode(msg)) => {
                assert!(msg.contains("0xC1"));
                assert!(msg.contains("position 3"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(reporter.message_number(), 1);
    }

    #[test]
    fn test_malformed_child_fails_parent() {
        let data = hex::decode("6103C10501").unwrap();
        assert!(BerDecoder::new().decode(&data, &mut NullReporter).is_err());
    }

    #[test]
    fn test_depth_limit() {
        let data = hex::decode("610461026100").unwrap();
        let shallow = BerDecoder::with_config(DecoderConfig { max_depth: 1 });
        assert!(shallow.decode(&data, &mut NullReporter).is_err());
        assert!(BerDecoder::new().decode(&data, &mut NullReporter).is_ok());
    }
}
