//! qrdata - decode and encode TLV payloads of payment and ticketing QR codes
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `qrdata-core`: error type, byte cursor and writer, reporters
//! - `qrdata-tlv`: TLV tree, BER and EMV merchant-presented transcoders,
//!   contexts, the tag info registry and its built-in providers
//! - `qrdata-qcat`: the QCAT transit ticket and its codec
//!
//! # Usage
//!
//! ```no_run
//! use qrdata::{Context, Encoding, MemoryReporter, Standard, annotate, decode, global};
//!
//! let mut reporter = MemoryReporter::new();
//! let nodes = decode(b"000201010211", Encoding::EmvMp, &mut reporter)?;
//! for line in annotate(&nodes, Standard::EmvMerchantPresented, &Context::root(), global(), &mut reporter) {
//!     println!("{}", line);
//! }
//! # Ok::<(), qrdata::QrDataError>(())
//! ```

// Re-export core types
pub use qrdata_core::{
    ByteCursor, ByteWriter, MemoryReporter, NullReporter, QrDataError, QrDataResult, Reporter,
};

// Re-export the TLV layer
pub use qrdata_tlv::{
    AnnotatedNode, Context, DecoderConfig, Encoding, Standard, TlvInfo, TlvInfoRegistry,
    TlvInfoRegistryBuilder, TlvInfoService, TlvNode, ValueFormat, annotate, decode,
    decode_with_config, encode, find_all, find_first, flatten, global, install_global,
    next_context, visit_all,
};

pub mod ber {
    pub use qrdata_tlv::ber::*;
}

pub mod emv_mp {
    pub use qrdata_tlv::emv_mp::*;
}

pub mod providers {
    pub use qrdata_tlv::providers::*;
}

// Re-export tickets
pub mod qcat {
    pub use qrdata_qcat::*;
}

pub use qrdata_qcat::{EmvPoiData, SignatureVersion, Ticket, TicketBuilder};
