//! # Paddle Webhook
//!
//! Verification middleware and typed routing for Paddle webhooks.
//!
//! ## Overview
//!
//! Every incoming request passes through the same pipeline:
//!
//! - **Sniff**: read `alert_name` without binding the body
//! - **Decode**: bind the body into the record for that event
//! - **Verify**: check `p_signature` over the canonical field text
//! - **Dispatch**: hand the record to the handler registered for its type
//!
//! A request that fails any stage never reaches a handler.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use paddle_webhook::events::{PaymentSucceeded, SubscriptionCreated};
//! use paddle_webhook::{
//!     HandlerRegistry, Router, VerificationMiddleware, VerifierConfig, WebhookConfig,
//! };
//!
//! async fn example(public_key_pem: &str, content_type: &str, body: &[u8]) {
//!     let verifier = VerifierConfig::from_pem(public_key_pem).build().unwrap();
//!     let middleware = VerificationMiddleware::new(verifier, WebhookConfig::default());
//!
//!     let handlers = HandlerRegistry::new()
//!         .on::<PaymentSucceeded, _>(|payment: PaymentSucceeded| async move {
//!             println!("order {} paid", payment.order_id);
//!         })
//!         .on::<SubscriptionCreated, _>(|sub: SubscriptionCreated| async move {
//!             println!("subscription {:?} created", sub.subscription_id);
//!         });
//!
//!     let router = Router::new(middleware, handlers);
//!     match router.route(content_type, body).await {
//!         Ok(()) => {}
//!         Err(e) => eprintln!("rejected with {}: {e}", e.status()),
//!     }
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `paddle_webhook::webhook_core` - Canonical form, verifiers, value types
//! - `paddle_webhook::events` - Event records and decoding

pub mod config;
pub mod error;
pub mod middleware;
pub mod pool;
pub mod router;

// Re-export component crates
pub use paddle_webhook_core as webhook_core;
pub use paddle_webhook_events as events;

// Re-export main types for convenience
pub use config::{ErrorPolicy, KeySource, PoolConfig, VerifierConfig, WebhookConfig};
pub use error::{ConfigError, ErrorClass, Result, WebhookError};
pub use middleware::{content_type, Delivery, Outcome, VerificationMiddleware};
pub use pool::{BufferPool, PooledBuffer};
pub use router::{Handler, HandlerRegistry, Routable, Router};

// Re-export commonly used component types
pub use paddle_webhook_core::{DigestAlg, RsaVerifier, SignatureEncoding, SignedPayload, Verifier};
pub use paddle_webhook_events::{Encoding, Event, EventKind, EventRecord};
