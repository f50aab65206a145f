use crate::context::{Context, Standard};
use crate::registry::{TlvInfo, TlvInfoService, ValueFormat};

const UNRESERVED_TEMPLATE_ALIPAY: &str = "UNRESERVED TEMPLATE_com.alipay";

/// Alipay data carried in an unreserved template
#[derive(Debug, Clone, Copy, Default)]
pub struct AlipayProvider;

impl TlvInfoService for AlipayProvider {
    fn name(&self) -> &'static str {
        "AlipayProvider"
    }

    fn is_responsible_for(&self, standard: Standard, context: &Context) -> bool {
        standard == Standard::EmvMerchantPresented && context.is(UNRESERVED_TEMPLATE_ALIPAY)
    }

    fn info(&self, tag: u32, context: &Context) -> Option<TlvInfo> {
        match (context.name(), tag) {
            (UNRESERVED_TEMPLATE_ALIPAY, 1) => {
                Some(TlvInfo::leaf(tag, "Alipay Data", ValueFormat::AlipayData))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alipay_data() {
        let context = Context::new(UNRESERVED_TEMPLATE_ALIPAY);
        assert!(AlipayProvider.is_responsible_for(Standard::EmvMerchantPresented, &context));
        assert_eq!(AlipayProvider.info(1, &context).map(|i| i.name), Some("Alipay Data"));
        assert!(AlipayProvider.info(2, &context).is_none());
    }
}
