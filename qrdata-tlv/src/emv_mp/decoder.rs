//! EMV merchant-presented decoder
//!
//! Unlike [`crate::ber::BerDecoder`], this decoder never fails on malformed
//! input. Real-world merchant payloads often carry trailing garbage, so
//! decoding stops at the first unreadable tag, length or value and returns
//! everything read up to that point. Each stop is recorded in the reporter.

use super::is_template_tag;
use crate::config::DecoderConfig;
use crate::tlv::TlvNode;
use qrdata_core::{ByteCursor, QrDataError, QrDataResult, Reporter};

#[derive(Debug, Clone, Default)]
pub struct EmvMpDecoder {
    config: DecoderConfig,
}

impl EmvMpDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Decode `data` into a list of TLV objects, stopping at the first malformed item
    pub fn decode(&self, data: &[u8], reporter: &mut dyn Reporter) -> Vec<TlvNode> {
        let mut cursor = ByteCursor::new(data);
        // only the depth limit fails a level, and the top level is depth 0
        let nodes = self.decode_level(&mut cursor, 0, reporter).unwrap_or_default();
        log::debug!("EMV MP decoded {} top-level nodes from {} bytes", nodes.len(), data.len());
        nodes
    }

    fn decode_level(
        &self,
        cursor: &mut ByteCursor<'_>,
        depth: usize,
        reporter: &mut dyn Reporter,
    ) -> QrDataResult<Vec<TlvNode>> {
        if depth > self.config.max_depth {
            return Err(QrDataError::StructuralDecode(format!(
                "Nesting deeper than {} levels",
                self.config.max_depth
            )));
        }

        let mut nodes = Vec::new();

        while cursor.has_remaining() {
            let position = cursor.position();

            let tag = match read_two_digits(cursor) {
                Ok(tag) => tag,
                Err(e) => {
                    stop(reporter, format!("Reading tag at position: {}", position), e);
                    break;
                }
            };

            let length = match read_two_digits(cursor) {
                Ok(length) => length as usize,
                Err(e) => {
                    stop(reporter, format!("Reading length at position: {}", position + 2), e);
                    cursor.seek_to(position)?;
                    break;
                }
            };

            let value = match cursor.peek(length) {
                Ok(value) => value,
                Err(e) => {
                    stop(reporter, format!("Reading value at position: {}", position + 4), e);
                    cursor.seek_to(position)?;
                    break;
                }
            };

            let children = if is_template_tag(tag) {
                let mut inner = ByteCursor::new(value);
                match self.decode_level(&mut inner, depth + 1, reporter) {
                    Ok(children) => children,
                    Err(e) => {
                        reporter.add_report(format!("Template {:02} at position {}: {}", tag, position, e));
                        Vec::new()
                    }
                }
            } else {
                Vec::new()
            };
            cursor.seek_by(length as isize)?;

            log::trace!("EMV MP T:{:02} L:{} at {} depth {}", tag, length, position, depth);
            nodes.push(TlvNode::new(tag, length, value.to_vec(), children));
        }

        Ok(nodes)
    }
}

/// Read a tag or length: exactly two ASCII decimal digits
fn read_two_digits(cursor: &mut ByteCursor<'_>) -> QrDataResult<u32> {
    let digits = cursor.peek(2)?;
    if !digits.iter().all(u8::is_ascii_digit) {
        return Err(QrDataError::StructuralDecode(format!(
            "Expected two decimal digits. Is: {:?}",
            String::from_utf8_lossy(digits)
        )));
    }
    cursor.seek_by(2)?;
    Ok(((digits[0] - b'0') * 10 + (digits[1] - b'0')) as u32)
}

fn stop(reporter: &mut dyn Reporter, location: String, error: QrDataError) {
    log::warn!("EMV MP decoding stopped early. {}: {}", location, error);
    reporter.add_report(location);
    reporter.add_report(error.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use qrdata_core::{MemoryReporter, NullReporter};

    #[test]
    fn test_decode_flat() {
        let nodes = EmvMpDecoder::new().decode(b"000201010211", &mut NullReporter);
        assert_eq!(
            nodes,
            vec![
                TlvNode::primitive(0, b"01".to_vec()),
                TlvNode::primitive(1, b"11".to_vec()),
            ]
        );
    }

    #[test]
    fn test_template_tags_are_decoded_recursively() {
        let data = b"80200010com.alipay0102ab5303608";
        let nodes = EmvMpDecoder::new().decode(data, &mut NullReporter);
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].tag, 80);
        assert_eq!(
            nodes[0].children,
            vec![
                TlvNode::primitive(0, b"com.alipay".to_vec()),
                TlvNode::primitive(1, b"ab".to_vec()),
            ]
        );
        assert!(nodes[1].children.is_empty());
        assert_eq!(nodes[1].value, b"608");
    }

    #[test]
    fn test_non_template_tag_is_leaf() {
        // 59 is a plain value even if it looks like TLV data
        let nodes = EmvMpDecoder::new().decode(b"59080002ab01", &mut NullReporter);
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].children.is_empty());
    }

    #[test]
    fn test_invalid_tag_after_valid_objects_returns_prefix() {
        let mut reporter = MemoryReporter::new();
        let nodes = EmvMpDecoder::new().decode(b"000201010211X1", &mut reporter);
        assert_eq!(nodes.len(), 2);
        assert_eq!(reporter.reports()[0], "Reading tag at position: 12");
    }

    #[test]
    fn test_invalid_length_and_short_value_stop_decoding() {
        let mut reporter = MemoryReporter::new();
        let nodes = EmvMpDecoder::new().decode(b"00020159XX", &mut reporter);
        assert_eq!(nodes.len(), 1);
        assert!(reporter.message_number() > 0);

        let nodes = EmvMpDecoder::new().decode(b"00020159101234", &mut NullReporter);
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn test_signed_digits_rejected() {
        assert!(EmvMpDecoder::new().decode(b"+1020A", &mut NullReporter).is_empty());
    }

    #[test]
    fn test_template_with_garbage_keeps_partial_children() {
        let nodes = EmvMpDecoder::new().decode(b"26080002abZZ", &mut NullReporter);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].children, vec![TlvNode::primitive(0, b"ab".to_vec())]);
    }

    #[test]
    fn test_depth_limit_gives_empty_children() {
        let decoder = EmvMpDecoder::with_config(DecoderConfig { max_depth: 0 });
        let mut reporter = MemoryReporter::new();
        let nodes = decoder.decode(b"26060002ab", &mut reporter);
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].children.is_empty());
        assert_eq!(reporter.message_number(), 1);
    }
}
