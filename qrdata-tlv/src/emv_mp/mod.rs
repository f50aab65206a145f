//! EMV merchant-presented transcoder
//!
//! ```text
//! [Tag: 2 ASCII digits] [Length: 2 ASCII digits] [Value]
//! ```
//!
//! There is no structural marker for templates. A tag is constructed only if
//! it is in the template allow-list: merchant account information (26-51),
//! additional data field (62), merchant information language (64) and
//! unreserved templates (80).

pub mod crc;
pub mod decoder;
pub mod encoder;

pub use crc::{append_crc, crc16, verify_crc};
pub use decoder::EmvMpDecoder;
pub use encoder::EmvMpEncoder;

use crate::tlv::TlvNode;
use qrdata_core::QrDataResult;

pub(crate) const MAX_TWO_DIGITS: u32 = 99;

const MERCHANT_ACCOUNT_INFO_TAGS: std::ops::RangeInclusive<u32> = 26..=51;
const ADDITIONAL_DATA_FIELD_TAG: u32 = 62;
const MERCHANT_INFO_LANGUAGE_TAG: u32 = 64;
const UNRESERVED_TEMPLATE_TAG: u32 = 80;

/// Whether `tag` holds nested TLV objects
pub fn is_template_tag(tag: u32) -> bool {
    MERCHANT_ACCOUNT_INFO_TAGS.contains(&tag)
        || matches!(
            tag,
            ADDITIONAL_DATA_FIELD_TAG | MERCHANT_INFO_LANGUAGE_TAG | UNRESERVED_TEMPLATE_TAG
        )
}

/// Build a template node whose raw value is the EMV MP encoding of `children`
pub fn constructed(tag: u32, children: Vec<TlvNode>) -> QrDataResult<TlvNode> {
    let mut encoder = EmvMpEncoder::new();
    encoder.encode_nodes(&children)?;
    let value = encoder.into_bytes();
    Ok(TlvNode::new(tag, value.len(), value, children))
}
