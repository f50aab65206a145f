//! EMV merchant-presented encoder

use super::MAX_TWO_DIGITS;
use crate::tlv::TlvNode;
use qrdata_core::{ByteWriter, QrDataError, QrDataResult};

/// Encoder writing tag and length as two zero-padded decimal digits
///
/// Constructed nodes are written with the length of their re-encoded
/// children. Encoding fails with [`QrDataError::EncodingConstraint`] if a tag
/// or length exceeds 99 or a leaf's length differs from its value size.
#[derive(Debug, Default)]
pub struct EmvMpEncoder {
    writer: ByteWriter,
}

impl EmvMpEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encode_nodes(&mut self, nodes: &[TlvNode]) -> QrDataResult<()> {
        for node in nodes {
            self.encode_node(node)?;
        }
        Ok(())
    }

    pub fn encode_node(&mut self, node: &TlvNode) -> QrDataResult<()> {
        if node.tag > MAX_TWO_DIGITS {
            return Err(QrDataError::EncodingConstraint(format!(
                "Tag larger than 99 cannot be encoded using EMV MP rules. Was: {}",
                node.tag
            )));
        }

        if node.is_constructed() {
            let mut inner = EmvMpEncoder::new();
            inner.encode_nodes(&node.children)?;
            self.encode_tlv(node.tag, inner.writer.as_bytes())
        } else {
            if node.length != node.value.len() {
                return Err(QrDataError::EncodingConstraint(format!(
                    "Size of value of tag {:02} not the same as TLV length. Was size {} vs. {}",
                    node.tag,
                    node.value.len(),
                    node.length
                )));
            }
            self.encode_tlv(node.tag, &node.value)
        }
    }

    fn encode_tlv(&mut self, tag: u32, value: &[u8]) -> QrDataResult<()> {
        if value.len() > MAX_TWO_DIGITS as usize {
            return Err(QrDataError::EncodingConstraint(format!(
                "Length larger than 99 cannot be encoded using EMV MP rules. Was: {} (tag {:02})",
                value.len(),
                tag
            )));
        }
        self.writer.write(format!("{:02}{:02}", tag, value.len()).as_bytes());
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
