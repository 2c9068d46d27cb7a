//! # Paddle Webhook Events
//!
//! Typed records for every supported Paddle webhook, and selection of the
//! record a body decodes into.
//!
//! ## Overview
//!
//! A webhook body is a flat map of string fields. Its `alert_name` selects
//! one of the records below; the rest of the body is bound to that record's
//! typed fields. Each record can reproduce the exact field text the sender
//! signed (see [`SignedPayload`](paddle_webhook_core::SignedPayload)).
//!
//! ## Decoding
//!
//! 1. [`Encoding::from_content_type`] picks form or JSON decoding
//! 2. [`Encoding::sniff`] reads `alert_name` without binding the body
//! 3. [`resolve`] maps the name to an [`EventKind`]
//! 4. [`EventKind::decode`] binds the body into an [`Event`]
//!
//! ## Usage
//!
//! ```rust
//! use paddle_webhook_events::{resolve, Encoding, Event};
//!
//! let body = b"alert_name=transfer_paid&amount=120.00&currency=USD&p_signature=c2ln";
//! let encoding = Encoding::from_content_type("application/x-www-form-urlencoded").unwrap();
//! let kind = resolve(&encoding.sniff(body).unwrap()).unwrap();
//!
//! match kind.decode(body, encoding).unwrap() {
//!     Event::TransferPaid(paid) => assert_eq!(paid.currency, "USD"),
//!     other => panic!("unexpected {}", other.alert_name()),
//! }
//! ```

#[macro_use]
mod macros;

pub mod alerts;
pub mod decode;
pub mod error;
pub mod event;
pub mod products;
pub mod subscription;

pub use alerts::{
    HighRiskTransactionCreated, HighRiskTransactionUpdated, LockerProcessed, NewAudienceMember,
    PaymentDisputeClosed, PaymentDisputeCreated, PaymentRefunded, PaymentSucceeded,
    TransferCreated, TransferPaid, UpdateAudienceMember,
};
pub use decode::{decode_record, Encoding};
pub use error::{DecodeError, UnsupportedEventError};
pub use event::{resolve, Event, EventKind, EventRecord};
pub use products::AudienceProducts;
pub use subscription::{
    SubscriptionCancelled, SubscriptionCreated, SubscriptionPaymentFailed,
    SubscriptionPaymentRefunded, SubscriptionPaymentSucceeded, SubscriptionUpdated,
};
