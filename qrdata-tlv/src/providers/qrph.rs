use crate::context::{Context, Standard};
use crate::registry::{TlvInfo, TlvInfoService, ValueFormat};

const P2M_MERCHANT_INFO: &str = "PROPRIETARY_MERCHANT_INFO_ph.ppmi.p2m";

/// QR Ph person-to-merchant account information
///
/// Tags without a dedicated entry are reported as proprietary data rather
/// than as unknown.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrPhProvider;

impl TlvInfoService for QrPhProvider {
    fn name(&self) -> &'static str {
        "QrPhProvider"
    }

    fn is_responsible_for(&self, standard: Standard, context: &Context) -> bool {
        standard == Standard::EmvMerchantPresented && context.is(P2M_MERCHANT_INFO)
    }

    fn info(&self, tag: u32, context: &Context) -> Option<TlvInfo> {
        if !context.is(P2M_MERCHANT_INFO) {
            return None;
        }
        let info = match tag {
            1 => TlvInfo::leaf(tag, "Account SWIFT code", ValueFormat::Ascii),
            3 => TlvInfo::leaf(tag, "Account Number", ValueFormat::Ascii),
            _ => TlvInfo::proprietary(tag),
        };
        Some(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_p2m_entries() {
        let context = Context::new(P2M_MERCHANT_INFO);
        assert_eq!(QrPhProvider.info(1, &context).map(|i| i.name), Some("Account SWIFT code"));
        assert_eq!(QrPhProvider.info(5, &context).map(|i| i.name), Some("Proprietary"));
        assert!(QrPhProvider.info(1, &Context::new("PROPRIETARY_MERCHANT_INFO_other")).is_none());
    }
}
