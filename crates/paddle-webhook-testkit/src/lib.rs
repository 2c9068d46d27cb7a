//! # Paddle Webhook Testkit
//!
//! Testing utilities for Paddle webhook ingestion.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: A deterministic signer that plays the sender
//! - **Golden events**: One fully populated field set per event kind
//! - **Generators**: Proptest strategies for canonical wire values
//!
//! ## Signing a Golden Event
//!
//! ```rust
//! use paddle_webhook_events::EventKind;
//! use paddle_webhook_testkit::{fixture, TestSigner};
//!
//! let signer = TestSigner::new();
//! let signed = signer.sign(fixture(EventKind::TransferPaid).fields);
//! let body = signed.form_body();
//! assert!(body.starts_with("alert_name=transfer_paid"));
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use paddle_webhook_testkit::generators::amount_text;
//!
//! proptest! {
//!     #[test]
//!     fn amount_survives_signing(amount in amount_text()) {
//!         let signed = TestSigner::new().sign(&[("alert_name", "transfer_paid"), ("amount", &amount)]);
//!         // deliver signed.form_body() ...
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{php_serialize, SignedFixture, TestSigner};
pub use vectors::{all_fixtures, fixture, EventFixture};
