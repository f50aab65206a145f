use thiserror::Error;

/// Main error type for QR payload processing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QrDataError {
    /// Malformed tag or length, truncated buffer, unsupported length encoding
    #[error("Structural decode error: {0}")]
    StructuralDecode(String),

    /// A provider was found but has no entry for the tag
    #[error("No TLV info: {0}")]
    LookupMiss(String),

    /// No provider is responsible for a standard/context combination
    #[error("No TLV info provider: {0}")]
    ProviderNotFound(String),

    #[error("Ticket validation error: {0}")]
    TicketValidation(String),

    /// Value or length outside what the wire format can represent
    #[error("Encoding constraint violated: {0}")]
    EncodingConstraint(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type alias for QR payload operations
pub type QrDataResult<T> = Result<T, QrDataError>;
