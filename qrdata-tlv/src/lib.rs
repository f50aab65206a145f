//! TLV transcoding for payment and ticketing QR codes
//!
//! This crate provides:
//! - the [`TlvNode`] tree and its read-only queries
//! - the BER and EMV merchant-presented transcoders
//! - the EMV merchant-presented CRC
//! - the context model that decides which tag dictionary applies
//! - the [`TlvInfoRegistry`] with the built-in dictionaries
//! - a context-aware walk that annotates a tree with tag metadata
//!
//! # Usage
//!
//! ```rust,no_run
//! use qrdata_core::MemoryReporter;
//! use qrdata_tlv::{Context, Encoding, Standard, annotate, decode, global};
//!
//! let mut reporter = MemoryReporter::new();
//! let nodes = decode(b"000201010211", Encoding::EmvMp, &mut reporter)?;
//! for node in annotate(&nodes, Standard::EmvMerchantPresented, &Context::root(), global(), &mut reporter) {
//!     println!("{}", node);
//! }
//! # Ok::<(), qrdata_core::QrDataError>(())
//! ```

pub mod annotate;
pub mod ber;
pub mod config;
pub mod context;
pub mod emv_mp;
pub mod providers;
pub mod registry;
pub mod tlv;
pub mod transcode;

pub use annotate::{AnnotatedNode, UNKNOWN_TAG_NAME, annotate, walk};
pub use config::DecoderConfig;
pub use context::{Context, Standard, next_context};
pub use registry::{
    TlvInfo, TlvInfoRegistry, TlvInfoRegistryBuilder, TlvInfoService, ValueFormat, global,
    install_global,
};
pub use tlv::{TlvNode, find_all, find_first, flatten, visit_all};
pub use transcode::{Encoding, decode, decode_with_config, encode};
