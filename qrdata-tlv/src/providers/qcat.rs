use super::emv_cp::application_template_info;
use crate::context::{Context, Standard};
use crate::registry::{TlvInfo, TlvInfoService, ValueFormat};

const APPLICATION_TEMPLATE_QCAT: &str = "APPLICATION TEMPLATE_QCAT01";
const TRANSPARENT_TEMPLATE_QCAT: &str = "APPLICATION SPECIFIC TRANSPARENT TEMPLATE_QCAT01";

/// QCAT transit tickets
#[derive(Debug, Clone, Copy, Default)]
pub struct QcatProvider;

impl QcatProvider {
    fn ticket_info(tag: u32) -> Option<TlvInfo> {
        use ValueFormat::*;

        let (name, format) = match tag {
            0xC1 => ("Ticket ID", Number),
            0xC2 => ("Ticket Creator ID", UniqueId),
            0xC3 => ("Creation Time", Timestamp),
            0xC4 => ("Validity Period", Duration),
            0xC5 => ("Validity Domain", UniqueId),
            0xC6 => ("Operator", UniqueId),
            0xC7 => ("Effective Time", Timestamp),
            0xC8 => ("Refresh Time", Timestamp),
            0xC9 => ("Ticket Type", UniqueId),
            0xCA => ("Account ID", Ascii),
            0xCB => ("Boarding Station", UniqueId),
            0xCC => ("Destination Station", UniqueId),
            0xCD => ("Vehicle ID", Number),
            0xCE => ("Route ID", Number),
            0xCF => ("Seat Number", Ascii),
            0xD0 => ("Seat Class", Ascii),
            0xD1 => ("Max Auth Amount", Amount),
            0xD2 => ("Signature key ID", Ascii),
            0xD3 => ("Terminal ID", Ascii),
            0xD4 => ("Funding Source Type", UniqueId),
            0xD5 => ("Funding Source Provider", Ascii),
            0xDE => ("Signature", QcatSignature),
            _ => return None,
        };
        Some(TlvInfo::leaf(tag, name, format))
    }
}

impl TlvInfoService for QcatProvider {
    fn name(&self) -> &'static str {
        "QcatProvider"
    }

    fn is_responsible_for(&self, standard: Standard, context: &Context) -> bool {
        standard == Standard::EmvCustomerPresented
            && (context.is(APPLICATION_TEMPLATE_QCAT) || context.is(TRANSPARENT_TEMPLATE_QCAT))
    }

    fn info(&self, tag: u32, context: &Context) -> Option<TlvInfo> {
        match context.name() {
            APPLICATION_TEMPLATE_QCAT => application_template_info(tag),
            TRANSPARENT_TEMPLATE_QCAT => Self::ticket_info(tag),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_dictionary() {
        let transparent = Context::new(TRANSPARENT_TEMPLATE_QCAT);
        assert!(QcatProvider.is_responsible_for(Standard::EmvCustomerPresented, &transparent));
        for tag in (0xC1..=0xD5).chain([0xDE]) {
            assert!(QcatProvider.info(tag, &transparent).is_some(), "tag 0x{:02X}", tag);
        }
        assert!(QcatProvider.info(0xD6, &transparent).is_none());
        assert_eq!(
            QcatProvider.info(0xC4, &transparent).map(|i| (i.name, i.format)),
            Some(("Validity Period", Some(ValueFormat::Duration)))
        );
    }
}
