//! Encoding-independent entry points

use crate::ber::{BerDecoder, BerEncoder};
use crate::config::DecoderConfig;
use crate::emv_mp::{EmvMpDecoder, EmvMpEncoder};
use crate::tlv::TlvNode;
use qrdata_core::{QrDataResult, Reporter};
use serde::{Deserialize, Serialize};

/// Wire encoding of a TLV payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encoding {
    /// Single-byte tags with BER definite lengths
    Ber,
    /// Two-digit ASCII tags and lengths
    EmvMp,
}

/// Decode `bytes` with the default configuration
///
/// BER input fails as a whole on the first malformed item. EMV MP input
/// never fails; decoding stops at the first malformed item and the reason is
/// recorded in `reporter`.
pub fn decode(bytes: &[u8], encoding: Encoding, reporter: &mut dyn Reporter) -> QrDataResult<Vec<TlvNode>> {
    decode_with_config(bytes, encoding, DecoderConfig::default(), reporter)
}

pub fn decode_with_config(
    bytes: &[u8],
    encoding: Encoding,
    config: DecoderConfig,
    reporter: &mut dyn Reporter,
) -> QrDataResult<Vec<TlvNode>> {
    match encoding {
        Encoding::Ber => BerDecoder::with_config(config).decode(bytes, reporter),
        Encoding::EmvMp => Ok(EmvMpDecoder::with_config(config).decode(bytes, reporter)),
    }
}

/// Encode a list of sibling nodes
pub fn encode(nodes: &[TlvNode], encoding: Encoding, reporter: &mut dyn Reporter) -> QrDataResult<Vec<u8>> {
    let result = match encoding {
        Encoding::Ber => {
            let mut encoder = BerEncoder::new();
            encoder.encode_nodes(nodes).map(|_| encoder.into_bytes())
        }
        Encoding::EmvMp => {
            let mut encoder = EmvMpEncoder::new();
            encoder.encode_nodes(nodes).map(|_| encoder.into_bytes())
        }
    };
    match result {
        Ok(bytes) => {
            log::debug!("Encoded {} nodes into {} bytes ({:?})", nodes.len(), bytes.len(), encoding);
            Ok(bytes)
        }
        Err(e) => {
            reporter.add_report(e.to_string());
            Err(e)
        }
    }
}
