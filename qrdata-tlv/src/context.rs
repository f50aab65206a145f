//! Standards, contexts and the context transition function
//!
//! The meaning of a tag depends on the standard and on the container it
//! sits in. [`next_context`] derives the container label from the tag and
//! value that was just read; it is recomputed on every walk and never stored
//! on the tree.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment or ticketing standard that selects the tag dictionaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Standard {
    Asn1,
    EmvCustomerPresented,
    EmvMerchantPresented,
}

impl fmt::Display for Standard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Standard::Asn1 => "ASN.1",
            Standard::EmvCustomerPresented => "EMV customer-presented",
            Standard::EmvMerchantPresented => "EMV merchant-presented",
        };
        f.write_str(name)
    }
}

pub const ROOT: &str = "ROOT";
pub const APPLICATION_TEMPLATE: &str = "APPLICATION TEMPLATE";
pub const TRANSPARENT_TEMPLATE: &str = "APPLICATION SPECIFIC TRANSPARENT TEMPLATE";
pub const PROPRIETARY_MERCHANT_INFO_TEMPLATE: &str = "PROPRIETARY MERCHANT INFO TEMPLATE";
pub const PROPRIETARY_MERCHANT_INFO_PREFIX: &str = "PROPRIETARY_MERCHANT_INFO_";
pub const ADDITIONAL_DATA_FIELD_TEMPLATE: &str = "ADDITIONAL DATA FIELD TEMPLATE";
pub const UNRESERVED_TEMPLATE: &str = "UNRESERVED TEMPLATE";

/// Label of the container currently being walked
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Context(String);

impl Context {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn root() -> Self {
        Self::new(ROOT)
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn is(&self, name: &str) -> bool {
        self.0 == name
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    /// Context specialised with a key such as an ADF name or a GUID
    fn keyed(base: &str, key: &str) -> Self {
        Self(format!("{}_{}", base, key))
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Context that applies after a node with `tag`/`value` has been read in `context`
///
/// For a constructed node the result is the context of its children. For a
/// leaf it is the context of the following siblings.
pub fn next_context(standard: Standard, context: &Context, tag: u32, value: &[u8]) -> Context {
    match standard {
        Standard::EmvCustomerPresented => next_customer_context(context, tag, value),
        Standard::EmvMerchantPresented => next_merchant_context(context, tag, value),
        Standard::Asn1 => context.clone(),
    }
}

fn next_customer_context(context: &Context, tag: u32, value: &[u8]) -> Context {
    if context.is(ROOT) {
        return match tag {
            0x61 => Context::new(APPLICATION_TEMPLATE),
            _ => context.clone(),
        };
    }

    if context.starts_with(APPLICATION_TEMPLATE) {
        return match tag {
            0x4F => Context::keyed(APPLICATION_TEMPLATE, &String::from_utf8_lossy(value)),
            0x63 => match adf_suffix(context) {
                Some(adf) => Context::keyed(TRANSPARENT_TEMPLATE, adf),
                None => Context::new(TRANSPARENT_TEMPLATE),
            },
            _ => context.clone(),
        };
    }

    context.clone()
}

fn next_merchant_context(context: &Context, tag: u32, value: &[u8]) -> Context {
    if context.is(ROOT) {
        return match tag {
            26..=51 => Context::new(PROPRIETARY_MERCHANT_INFO_TEMPLATE),
            62 => Context::new(ADDITIONAL_DATA_FIELD_TEMPLATE),
            80 => Context::new(UNRESERVED_TEMPLATE),
            _ => context.clone(),
        };
    }

    if tag == 0 {
        let guid = String::from_utf8_lossy(value);
        if context.is(PROPRIETARY_MERCHANT_INFO_TEMPLATE) {
            return Context::new(format!("{}{}", PROPRIETARY_MERCHANT_INFO_PREFIX, guid));
        }
        if context.is(UNRESERVED_TEMPLATE) {
            return Context::keyed(UNRESERVED_TEMPLATE, &guid);
        }
    }

    context.clone()
}

/// ADF name carried by an `APPLICATION TEMPLATE_<adf>` context
fn adf_suffix(context: &Context) -> Option<&str> {
    context
        .name()
        .strip_prefix(APPLICATION_TEMPLATE)
        .and_then(|rest| rest.strip_prefix('_'))
}
