use crate::context::{APPLICATION_TEMPLATE, Context, ROOT, Standard};
use crate::registry::{TlvInfo, TlvInfoService, ValueFormat};

/// Entries valid inside every application template
pub(crate) fn application_template_info(tag: u32) -> Option<TlvInfo> {
    match tag {
        0x4F => Some(TlvInfo::leaf(tag, "ADF Name", ValueFormat::Ascii)),
        0x5A => Some(TlvInfo::leaf(tag, "Application PAN", ValueFormat::Ascii)),
        0x63 => Some(TlvInfo::template(tag, "Application Specific Transparent Template")),
        _ => None,
    }
}

/// EMV customer-presented payload root and the unspecialised application template
#[derive(Debug, Clone, Copy, Default)]
pub struct EmvCustomerPoiProvider;

impl TlvInfoService for EmvCustomerPoiProvider {
    fn name(&self) -> &'static str {
        "EmvCustomerPoiProvider"
    }

    fn is_responsible_for(&self, standard: Standard, context: &Context) -> bool {
        standard == Standard::EmvCustomerPresented
            && (context.is(ROOT) || context.is(APPLICATION_TEMPLATE))
    }

    fn info(&self, tag: u32, context: &Context) -> Option<TlvInfo> {
        if context.is(ROOT) {
            match tag {
                0x85 => Some(TlvInfo::leaf(tag, "EMV Payload Format Indicator", ValueFormat::Ascii)),
                0x61 => Some(TlvInfo::template(tag, "Application Template")),
                _ => None,
            }
        } else if context.starts_with(APPLICATION_TEMPLATE) {
            application_template_info(tag)
        } else {
            None
        }
    }
}

/// Application template of an ADF no scheme-specific provider knows
#[derive(Debug, Clone, Copy, Default)]
pub struct EmvCustomerPoiApplicationProvider;

impl TlvInfoService for EmvCustomerPoiApplicationProvider {
    fn name(&self) -> &'static str {
        "EmvCustomerPoiApplicationProvider"
    }

    fn is_responsible_for(&self, standard: Standard, context: &Context) -> bool {
        standard == Standard::EmvCustomerPresented && context.starts_with(APPLICATION_TEMPLATE)
    }

    fn info(&self, tag: u32, context: &Context) -> Option<TlvInfo> {
        if context.starts_with(APPLICATION_TEMPLATE) {
            application_template_info(tag)
        } else {
            None
        }
    }
}
