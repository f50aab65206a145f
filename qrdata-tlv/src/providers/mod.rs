//! Built-in tag dictionaries
//!
//! | provider                             | standard  | contexts                                        |
//! |--------------------------------------|-----------|-------------------------------------------------|
//! | [`Asn1Provider`]                     | ASN.1     | all                                             |
//! | [`EmvCustomerPoiProvider`]           | EMV CP    | `ROOT`, `APPLICATION TEMPLATE`                  |
//! | [`EmvMerchantProvider`]              | EMV MP    | `ROOT` and the generic templates                |
//! | [`GCashProvider`]                    | EMV CP    | application and transparent template of `GCASH` |
//! | [`QcatProvider`]                     | EMV CP    | application and transparent template of `QCAT01`|
//! | [`AlipayProvider`]                   | EMV MP    | `UNRESERVED TEMPLATE_com.alipay`                |
//! | [`QrPhProvider`]                     | EMV MP    | `PROPRIETARY_MERCHANT_INFO_ph.ppmi.p2m`         |
//! | [`EmvCustomerPoiApplicationProvider`]| EMV CP    | any other `APPLICATION TEMPLATE_<adf>`          |

mod alipay;
mod asn1;
mod emv_cp;
mod emv_mp;
mod gcash;
mod qcat;
mod qrph;

pub use alipay::AlipayProvider;
pub use asn1::Asn1Provider;
pub use emv_cp::{EmvCustomerPoiApplicationProvider, EmvCustomerPoiProvider};
pub use emv_mp::EmvMerchantProvider;
pub use gcash::GCashProvider;
pub use qcat::QcatProvider;
pub use qrph::QrPhProvider;

use crate::registry::TlvInfoService;

/// Built-in providers in lookup order
///
/// The POI application provider is last so that scheme-specific providers
/// win for their own ADF names.
pub fn default_providers() -> Vec<Box<dyn TlvInfoService>> {
    vec![
        Box::new(Asn1Provider),
        Box::new(EmvCustomerPoiProvider),
        Box::new(EmvMerchantProvider),
        Box::new(GCashProvider),
        Box::new(QcatProvider),
        Box::new(AlipayProvider),
        Box::new(QrPhProvider),
        Box::new(EmvCustomerPoiApplicationProvider),
    ]
}
