use crate::context::{
    ADDITIONAL_DATA_FIELD_TEMPLATE, Context, PROPRIETARY_MERCHANT_INFO_TEMPLATE, ROOT, Standard,
    UNRESERVED_TEMPLATE,
};
use crate::registry::{TlvInfo, TlvInfoService, ValueFormat};

/// EMV merchant-presented root objects and the scheme-independent templates
#[derive(Debug, Clone, Copy, Default)]
pub struct EmvMerchantProvider;

impl EmvMerchantProvider {
    fn root_info(tag: u32) -> Option<TlvInfo> {
        let info = match tag {
            0 => TlvInfo::leaf(tag, "Payload Format Indicator", ValueFormat::PayloadFormatIndicator),
            1 => TlvInfo::leaf(tag, "Point of Initiation Method", ValueFormat::PointOfInitiation),
            26..=51 => TlvInfo::template(tag, "Proprietary Merchant Account Information"),
            52 => TlvInfo::leaf(tag, "Merchant Category Code", ValueFormat::MerchantCategory),
            53 => TlvInfo::leaf(tag, "Transaction Currency", ValueFormat::Currency),
            54 => TlvInfo::leaf(tag, "Transaction Amount", ValueFormat::Ascii),
            58 => TlvInfo::leaf(tag, "Country Code", ValueFormat::Country),
            59 => TlvInfo::leaf(tag, "Merchant Name", ValueFormat::Ascii),
            60 => TlvInfo::leaf(tag, "Merchant City", ValueFormat::Ascii),
            61 => TlvInfo::leaf(tag, "Postal Code", ValueFormat::Ascii),
            62 => TlvInfo::template(tag, "Additional Data Field Template"),
            63 => TlvInfo::leaf(tag, "CRC", ValueFormat::Crc),
            64 => TlvInfo::template(tag, "Merchant Information Language Template"),
            80..=99 => TlvInfo::template(tag, "Unreserved Template"),
            _ => return None,
        };
        Some(info)
    }

    fn additional_data_info(tag: u32) -> Option<TlvInfo> {
        match tag {
            0 => Some(TlvInfo::leaf(tag, "Unique Id", ValueFormat::Ascii)),
            3 => Some(TlvInfo::leaf(tag, "Store Label", ValueFormat::Ascii)),
            5 => Some(TlvInfo::leaf(tag, "Reference Label", ValueFormat::Ascii)),
            7 => Some(TlvInfo::leaf(tag, "Terminal Label", ValueFormat::Ascii)),
            _ => None,
        }
    }
}

impl TlvInfoService for EmvMerchantProvider {
    fn name(&self) -> &'static str {
        "EmvMerchantProvider"
    }

    fn is_responsible_for(&self, standard: Standard, context: &Context) -> bool {
        standard == Standard::EmvMerchantPresented
            && [
                ROOT,
                PROPRIETARY_MERCHANT_INFO_TEMPLATE,
                UNRESERVED_TEMPLATE,
                ADDITIONAL_DATA_FIELD_TEMPLATE,
            ]
            .iter()
            .any(|name| context.is(name))
    }

    fn info(&self, tag: u32, context: &Context) -> Option<TlvInfo> {
        match context.name() {
            ROOT => Self::root_info(tag),
            PROPRIETARY_MERCHANT_INFO_TEMPLATE | UNRESERVED_TEMPLATE if tag == 0 => {
                Some(TlvInfo::leaf(tag, "Globally Unique Identifier", ValueFormat::Ascii))
            }
            ADDITIONAL_DATA_FIELD_TEMPLATE => Self::additional_data_info(tag),
            _ => None,
        }
    }
}
