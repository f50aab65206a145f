use crate::context::{Context, Standard};
use crate::registry::{TlvInfo, TlvInfoService, ValueFormat};

/// Flat dictionary for generic ASN.1 structures
#[derive(Debug, Clone, Copy, Default)]
pub struct Asn1Provider;

impl TlvInfoService for Asn1Provider {
    fn name(&self) -> &'static str {
        "Asn1Provider"
    }

    fn is_responsible_for(&self, standard: Standard, _context: &Context) -> bool {
        standard == Standard::Asn1
    }

    fn info(&self, tag: u32, _context: &Context) -> Option<TlvInfo> {
        match tag {
            0x02 => Some(TlvInfo::leaf(tag, "Number", ValueFormat::LargeInteger)),
            0x30 => Some(TlvInfo::template(tag, "Sequence")),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dictionary_ignores_context() {
        let nested = Context::new("ANYTHING");
        assert!(Asn1Provider.is_responsible_for(Standard::Asn1, &nested));
        assert!(!Asn1Provider.is_responsible_for(Standard::EmvCustomerPresented, &Context::root()));
        assert_eq!(Asn1Provider.info(0x30, &nested).map(|i| i.is_template), Some(true));
        assert_eq!(Asn1Provider.info(0x02, &Context::root()).map(|i| i.name), Some("Number"));
        assert!(Asn1Provider.info(0x04, &nested).is_none());
    }
}
