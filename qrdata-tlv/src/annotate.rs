//! Context-aware tree walk
//!
//! [`walk`] visits a tree in pre-order and tells the visitor which context
//! each node is read in. [`annotate`] uses it to attach registry metadata to
//! every node, the input a display layer needs.
//!
//! Context flow:
//! - a leaf updates the context of the siblings that follow it
//! - a constructed node hands the next context to its children only; its
//!   siblings keep the current one

use crate::context::{Context, Standard, next_context};
use crate::registry::{TlvInfo, TlvInfoRegistry};
use crate::tlv::TlvNode;
use qrdata_core::Reporter;
use serde::Serialize;
use std::fmt;

/// Name shown for tags without registry metadata
pub const UNKNOWN_TAG_NAME: &str = "No Tag Name";

/// Visit every node with the context it is read in and its depth
pub fn walk<F>(nodes: &[TlvNode], standard: Standard, start: &Context, visitor: &mut F)
where
    F: FnMut(&TlvNode, &Context, usize),
{
    walk_level(nodes, standard, start, 0, visitor);
}

fn walk_level<F>(nodes: &[TlvNode], standard: Standard, start: &Context, depth: usize, visitor: &mut F)
where
    F: FnMut(&TlvNode, &Context, usize),
{
    let mut current = start.clone();
    for node in nodes {
        visitor(node, &current, depth);
        let next = next_context(standard, &current, node.tag, &node.value);
        if node.is_constructed() {
            walk_level(&node.children, standard, &next, depth + 1, visitor);
        } else {
            current = next;
        }
    }
}

/// A node together with the metadata found for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedNode {
    pub depth: usize,
    pub tag: u32,
    pub length: usize,
    pub context: Context,
    pub info: Option<TlvInfo>,
}

impl AnnotatedNode {
    pub fn name(&self) -> &'static str {
        self.info.as_ref().map_or(UNKNOWN_TAG_NAME, |i| i.name)
    }
}

impl fmt::Display for AnnotatedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:indent$}T:0x{:02X} L:{} {}",
            "",
            self.tag,
            self.length,
            self.name(),
            indent = self.depth * 4
        )
    }
}

/// Look up metadata for every node in pre-order
///
/// Lookup misses never abort the walk. A missing provider or a missing
/// dictionary entry is recorded in `reporter` and the node is annotated
/// without info.
pub fn annotate(
    nodes: &[TlvNode],
    standard: Standard,
    start: &Context,
    registry: &TlvInfoRegistry,
    reporter: &mut dyn Reporter,
) -> Vec<AnnotatedNode> {
    let mut annotated = Vec::new();
    walk(nodes, standard, start, &mut |node, context, depth| {
        let info = match registry.info(standard, context, node.tag) {
            Ok(Some(info)) => Some(info),
            Ok(None) => {
                reporter.add_report(format!(
                    "Unknown tag 0x{:02X} in {}: {}",
                    node.tag, standard, context
                ));
                None
            }
            Err(e) => {
                reporter.add_report(format!("Unknown tag 0x{:02X}: {}", node.tag, e));
                None
            }
        };
        log::trace!("T:0x{:02X} L:{} in {} depth {}", node.tag, node.length, context, depth);
        annotated.push(AnnotatedNode {
            depth,
            tag: node.tag,
            length: node.length,
            context: context.clone(),
            info,
        });
    });
    annotated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ber::BerDecoder;
    use crate::emv_mp::EmvMpDecoder;
    use base64::Engine;
    use qrdata_core::{MemoryReporter, NullReporter};

    const GCASH_PAYLOAD: &str = "hQVDUFYwMWGBl08FR0NBU0haGzExMDcwMDQwMDAwMDAwMDAwMDEwODkwMzA5MGNxwRZHQy0wNzI1MjAyNS0wMDAwMDkzOTA4wgIAAcQEaINZd8gEaIM9a95HMEUCIGWdjueZsFZHMkVQSy/jlqQubfpvMk4BsQKeHJuIn5aJAiEAvNpixJCHfUCj6T/8Q8/V3ay0GmNFgAUdDzE+c/Ilny0=";

    const MERCHANT_PAYLOAD: &str = "00020101021128620011ph.ppmi.p2m0111GXCHPHM2XXX032121702000000551861785205030005204549953036085802PH5913Mi Store 95806006Quezon6104110662640012ph.ppmi.qrph0307C39015V05212170500000725083318550708GEN0000380660010com.alipay0148https://payqr.gcash.com/28101005101488519611265763046D64";

    fn contexts_by_tag(annotated: &[AnnotatedNode]) -> Vec<(u32, String)> {
        annotated
            .iter()
            .map(|a| (a.tag, a.context.name().to_string()))
            .collect()
    }

    #[test]
    fn test_adf_name_specialises_following_siblings() {
        let data = hex::decode("8505435056303161074F054743415348").unwrap();
        let nodes = BerDecoder::new().decode(&data, &mut NullReporter).unwrap();

        let mut seen = Vec::new();
        walk(&nodes, Standard::EmvCustomerPresented, &Context::root(), &mut |node, context, _| {
            seen.push((node.tag, context.name().to_string()))
        });
        assert_eq!(
            seen,
            vec![
                (0x85, "ROOT".to_string()),
                (0x61, "ROOT".to_string()),
                (0x4F, "APPLICATION TEMPLATE".to_string()),
            ]
        );
        assert_eq!(crate::tlv::find_first(&nodes, 0x4F), Some(&b"GCASH"[..]));

        // a sibling after the ADF name sees the specialised context
        let data = hex::decode("85054350563031610B4F0547434153485A021234").unwrap();
        let nodes = BerDecoder::new().decode(&data, &mut NullReporter).unwrap();
        let mut last = None;
        walk(&nodes, Standard::EmvCustomerPresented, &Context::root(), &mut |node, context, _| {
            if node.tag == 0x5A {
                last = Some(context.clone());
            }
        });
        assert_eq!(last, Some(Context::new("APPLICATION TEMPLATE_GCASH")));
    }

    #[test]
    fn test_gcash_payload_annotation() {
        let data = base64::engine::general_purpose::STANDARD.decode(GCASH_PAYLOAD).unwrap();
        let nodes = BerDecoder::new().decode(&data, &mut NullReporter).unwrap();
        let mut reporter = MemoryReporter::new();
        let annotated = annotate(
            &nodes,
            Standard::EmvCustomerPresented,
            &Context::root(),
            &TlvInfoRegistry::with_default_providers(),
            &mut reporter,
        );

        let names: Vec<&str> = annotated.iter().map(|a| a.name()).collect();
        assert_eq!(
            names,
            vec![
                "EMV Payload Format Indicator",
                "Application Template",
                "ADF Name",
                "Application PAN",
                "Application Specific Transparent Template",
                "Ticket ID",
                "Ticket Creator ID",
                "Validity Period",
                "Refresh Time",
                "Signature",
            ]
        );
        assert_eq!(reporter.message_number(), 0);
        assert_eq!(
            annotated[5].context.name(),
            "APPLICATION SPECIFIC TRANSPARENT TEMPLATE_GCASH"
        );
        assert_eq!(annotated[5].depth, 2);
        assert_eq!(annotated[0].to_string(), "T:0x85 L:5 EMV Payload Format Indicator");
        assert_eq!(annotated[2].to_string(), "    T:0x4F L:5 ADF Name");
    }

    #[test]
    fn test_gcash_and_qcat_contexts_differ() {
        let gcash = hex::decode("85054350563031610C4F054743415348630303C10101").unwrap();
        let qcat = hex::decode("85054350563031610D4F06514341543031630303C10101").unwrap();

        let transparent_context = |data: &[u8]| {
            let nodes = BerDecoder::new().decode(data, &mut NullReporter).unwrap();
            let mut found = None;
            walk(&nodes, Standard::EmvCustomerPresented, &Context::root(), &mut |node, context, _| {
                if node.tag == 0xC1 {
                    found = Some(context.clone());
                }
            });
            found
        };

        let gcash_context = transparent_context(&gcash).unwrap();
        let qcat_context = transparent_context(&qcat).unwrap();
        assert_ne!(gcash_context, qcat_context);

        let registry = TlvInfoRegistry::with_default_providers();
        let standard = Standard::EmvCustomerPresented;
        assert_eq!(registry.lookup(standard, &gcash_context).unwrap().name(), "GCashProvider");
        assert_eq!(registry.lookup(standard, &qcat_context).unwrap().name(), "QcatProvider");
        let c1 = |ctx: &Context| registry.info(standard, ctx, 0xC1).unwrap().unwrap().format;
        assert_ne!(c1(&gcash_context), c1(&qcat_context));
    }

    #[test]
    fn test_merchant_payload_annotation() {
        let nodes = EmvMpDecoder::new().decode(MERCHANT_PAYLOAD.as_bytes(), &mut NullReporter);
        assert_eq!(nodes.len(), 12);

        let mut reporter = MemoryReporter::new();
        let annotated = annotate(
            &nodes,
            Standard::EmvMerchantPresented,
            &Context::root(),
            &TlvInfoRegistry::with_default_providers(),
            &mut reporter,
        );
        let contexts = contexts_by_tag(&annotated);

        assert!(contexts.contains(&(1, "PROPRIETARY_MERCHANT_INFO_ph.ppmi.p2m".to_string())));
        assert!(contexts.contains(&(1, "UNRESERVED TEMPLATE_com.alipay".to_string())));

        let swift = annotated
            .iter()
            .find(|a| a.context.is("PROPRIETARY_MERCHANT_INFO_ph.ppmi.p2m") && a.tag == 1)
            .unwrap();
        assert_eq!(swift.name(), "Account SWIFT code");

        let alipay = annotated
            .iter()
            .find(|a| a.context.is("UNRESERVED TEMPLATE_com.alipay"))
            .unwrap();
        assert_eq!(alipay.name(), "Alipay Data");
        assert_eq!(reporter.message_number(), 0);
    }

    #[test]
    fn test_misses_are_reported_not_fatal() {
        let data = hex::decode("99015A8501AA").unwrap();
        let nodes = BerDecoder::new().decode(&data, &mut NullReporter).unwrap();
        let mut reporter = MemoryReporter::new();
        let annotated = annotate(
            &nodes,
            Standard::EmvCustomerPresented,
            &Context::root(),
            &TlvInfoRegistry::with_default_providers(),
            &mut reporter,
        );
        assert_eq!(annotated.len(), 2);
        assert!(annotated[0].info.is_none());
        assert_eq!(annotated[0].name(), UNKNOWN_TAG_NAME);
        assert!(annotated[1].info.is_some());
        assert_eq!(reporter.message_number(), 1);

        let empty = TlvInfoRegistry::builder().build();
        let mut reporter = MemoryReporter::new();
        let annotated = annotate(&nodes, Standard::Asn1, &Context::root(), &empty, &mut reporter);
        assert_eq!(annotated.len(), 2);
        assert_eq!(reporter.message_number(), 2);
    }
}
