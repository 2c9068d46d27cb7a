//! Error types for the webhook core.

use thiserror::Error;

/// A field value that cannot be rendered into its canonical text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("decimal precision {precision} exceeds the supported maximum of {max}")]
    PrecisionOutOfRange { precision: u32, max: u32 },

    #[error("duplicate canonical field: {0}")]
    DuplicateField(String),

    #[error("cannot encode fields for transport: {0}")]
    Transport(String),
}

/// Text that cannot be parsed into a typed field value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("invalid integer: {0:?}")]
    InvalidInteger(String),

    #[error("invalid decimal: {0:?}")]
    InvalidDecimal(String),

    #[error("decimal {0} must be sent as text to preserve its precision")]
    InexactDecimal(String),

    #[error("invalid date {value:?}, expected {format}")]
    InvalidDate { value: String, format: &'static str },

    #[error("invalid boolean: {0:?}")]
    InvalidBool(String),

    #[error("invalid marketing consent: {0:?}")]
    InvalidConsent(String),

    #[error("invalid IP address: {0:?}")]
    InvalidIp(String),

    #[error("invalid value: {0}")]
    Invalid(String),
}

/// Signature verification failures.
///
/// These are always surfaced to the caller; a mismatch is never retried.
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("empty signature")]
    EmptySignature,

    #[error("malformed signature encoding: {0}")]
    MalformedSignature(#[from] base64::DecodeError),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("cannot canonicalize event: {0}")]
    Canonicalization(#[from] FormatError),

    #[error("signature verification failed")]
    SignatureMismatch,
}
