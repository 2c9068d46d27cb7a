//! # Paddle Webhook Core
//!
//! Pure primitives for authenticating Paddle webhooks: field value formatting,
//! canonical serialization, event-name sniffing, and RSA signature verification.
//!
//! This crate contains no I/O and no networking. It is pure computation over
//! request bytes and key material.
//!
//! ## Key Types
//!
//! - [`FieldSet`] - The signed fields of one event, as text
//! - [`SignedPayload`] - A decoded record that can reproduce its signed bytes
//! - [`Amount`] - A decimal that remembers its fractional digits
//! - [`Consent`] - Tri-state marketing consent
//! - [`RsaVerifier`] - RSA PKCS#1 v1.5 verifier with a pluggable digest
//!
//! ## Canonicalization
//!
//! Signatures are computed over a PHP `serialize()`d map of the event's
//! fields. See [`canonical`] module.

pub mod canonical;
pub mod crypto;
pub mod error;
pub mod sniff;
pub mod value;

pub use canonical::{canonicalize, CanonicalField, FieldSet, SignedPayload, SIGNATURE_FIELD};
pub use crypto::{DigestAlg, RsaVerifier, SignatureEncoding, Verifier};
pub use error::{FormatError, ValueError, VerificationError};
pub use sniff::{sniff_event_name, EVENT_NAME_FIELD};
pub use value::{
    deserialize_field, deserialize_wire, Amount, Consent, ConsentPolicy, FieldValue, TextBool, TextValue, WireValue,
    DATETIME_FORMAT, DATE_FORMAT,
};
