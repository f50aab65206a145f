use super::emv_cp::application_template_info;
use crate::context::{Context, Standard};
use crate::registry::{TlvInfo, TlvInfoService, ValueFormat};

const APPLICATION_TEMPLATE_GCASH: &str = "APPLICATION TEMPLATE_GCASH";
const TRANSPARENT_TEMPLATE_GCASH: &str = "APPLICATION SPECIFIC TRANSPARENT TEMPLATE_GCASH";

/// GCash wallet QR codes
#[derive(Debug, Clone, Copy, Default)]
pub struct GCashProvider;

impl TlvInfoService for GCashProvider {
    fn name(&self) -> &'static str {
        "GCashProvider"
    }

    fn is_responsible_for(&self, standard: Standard, context: &Context) -> bool {
        standard == Standard::EmvCustomerPresented
            && (context.is(APPLICATION_TEMPLATE_GCASH) || context.is(TRANSPARENT_TEMPLATE_GCASH))
    }

    fn info(&self, tag: u32, context: &Context) -> Option<TlvInfo> {
        match context.name() {
            APPLICATION_TEMPLATE_GCASH => application_template_info(tag),
            TRANSPARENT_TEMPLATE_GCASH => match tag {
                0xC1 => Some(TlvInfo::leaf(tag, "Ticket ID", ValueFormat::Ascii)),
                0xC2 => Some(TlvInfo::leaf(tag, "Ticket Creator ID", ValueFormat::UniqueId)),
                0xC4 => Some(TlvInfo::leaf(tag, "Validity Period", ValueFormat::Timestamp)),
                0xC8 => Some(TlvInfo::leaf(tag, "Refresh Time", ValueFormat::Timestamp)),
                0xDE => Some(TlvInfo::leaf(tag, "Signature", ValueFormat::NestedTlv)),
                _ => None,
            },
            _ => None,
        }
    }
}
