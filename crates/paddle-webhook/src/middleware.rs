//! The verification pipeline: sniff, decode, verify.
//!
//! Each request moves through the stages in order and ends either
//! [`Outcome::Accepted`] with its decoded event or [`Outcome::Rejected`]
//! with the error of the first stage that failed. The outcome depends only
//! on the request bytes and the configured key, so replaying a request
//! yields the same outcome.

use std::future::Future;
use std::sync::Arc;

use bytes::{Buf, BufMut, Bytes};
use http::header::CONTENT_TYPE;
use http::{HeaderMap, Request};
use paddle_webhook_core::Verifier;
use paddle_webhook_events::{resolve, Encoding, Event};
use tracing::{debug, warn};

use crate::config::{ErrorPolicy, WebhookConfig};
use crate::error::{Result, WebhookError};
use crate::pool::BufferPool;

/// Terminal state of one request.
#[derive(Debug)]
pub enum Outcome {
    Accepted(Event),
    Rejected(WebhookError),
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    pub fn event(&self) -> Option<&Event> {
        match self {
            Self::Accepted(event) => Some(event),
            Self::Rejected(_) => None,
        }
    }

    pub fn error(&self) -> Option<&WebhookError> {
        match self {
            Self::Accepted(_) => None,
            Self::Rejected(error) => Some(error),
        }
    }

    pub fn into_result(self) -> Result<Event> {
        match self {
            Self::Accepted(event) => Ok(event),
            Self::Rejected(error) => Err(error),
        }
    }
}

impl From<Result<Event>> for Outcome {
    fn from(result: Result<Event>) -> Self {
        match result {
            Ok(event) => Self::Accepted(event),
            Err(error) => Self::Rejected(error),
        }
    }
}

/// What downstream receives for one request.
#[derive(Debug)]
pub struct Delivery {
    pub outcome: Outcome,
    /// Copy of the raw body, when [`WebhookConfig::retain_body`] is set.
    pub body: Option<Bytes>,
}

/// Authenticates webhook bodies before they reach handlers.
///
/// Built once at startup and shared; holds no per-request state besides
/// the buffer pool.
#[derive(Clone)]
pub struct VerificationMiddleware {
    verifier: Option<Arc<dyn Verifier>>,
    config: WebhookConfig,
    pool: Arc<BufferPool>,
}

impl VerificationMiddleware {
    /// A middleware that verifies every event with `verifier`.
    pub fn new(verifier: impl Verifier + 'static, config: WebhookConfig) -> Self {
        Self::build(Some(Arc::new(verifier)), config)
    }

    /// A middleware that decodes without checking signatures.
    pub fn unverified(config: WebhookConfig) -> Self {
        Self::build(None, config)
    }

    fn build(verifier: Option<Arc<dyn Verifier>>, config: WebhookConfig) -> Self {
        let pool = Arc::new(BufferPool::new(config.pool));
        Self {
            verifier,
            config,
            pool,
        }
    }

    pub fn config(&self) -> &WebhookConfig {
        &self.config
    }

    pub fn pool(&self) -> &BufferPool {
        &self.pool
    }

    /// Run the pipeline over one body.
    ///
    /// The body is gathered into a pooled scratch buffer, which is returned
    /// to the pool before this function returns.
    pub fn run<B: Buf>(&self, content_type: &str, body: B) -> Delivery {
        let mut buf = self.pool.acquire();
        buf.put(body);

        let body = self.config.retain_body.then(|| Bytes::copy_from_slice(&buf));
        let outcome = self.process(content_type, &buf).into();
        Delivery { outcome, body }
    }

    /// Run the pipeline over a request and pass the result to `next`.
    ///
    /// Under [`ErrorPolicy::FailFast`] a rejected request returns its error
    /// and `next` is not called. Under [`ErrorPolicy::Continue`] `next` is
    /// always called and receives the rejection in [`Delivery::outcome`].
    pub async fn handle<B, F, Fut, T>(&self, request: Request<B>, next: F) -> Result<T>
    where
        B: Buf,
        F: FnOnce(Delivery) -> Fut,
        Fut: Future<Output = T>,
    {
        let (parts, body) = request.into_parts();
        let delivery = self.run(content_type(&parts.headers), body);

        let delivery = match (self.config.error_policy, delivery) {
            (
                ErrorPolicy::FailFast,
                Delivery {
                    outcome: Outcome::Rejected(error),
                    ..
                },
            ) => return Err(error),
            (_, delivery) => delivery,
        };
        Ok(next(delivery).await)
    }

    fn process(&self, content_type: &str, body: &[u8]) -> Result<Event> {
        let encoding = Encoding::from_content_type(content_type)
            .ok_or_else(|| WebhookError::UnsupportedMediaType(content_type.to_owned()))?;

        let alert_name = encoding.sniff(body)?;
        let kind = resolve(&alert_name).map_err(|e| {
            debug!(alert_name = %alert_name, %encoding, "unsupported event");
            e
        })?;

        debug!(alert_name = %kind, %encoding, "decoding event");
        let event = kind.decode(body, encoding)?;

        match &self.verifier {
            Some(verifier) => verifier.verify_payload(&event).map_err(|e| {
                warn!(alert_name = %kind, error = %e, "signature verification failed");
                e
            })?,
            None => debug!(alert_name = %kind, "signature verification disabled"),
        }

        debug!(alert_name = %kind, "event accepted");
        Ok(event)
    }
}

impl std::fmt::Debug for VerificationMiddleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationMiddleware")
            .field("verified", &self.verifier.is_some())
            .field("config", &self.config)
            .finish()
    }
}

/// The `Content-Type` header value, or `""` when absent or not text.
pub fn content_type(headers: &HeaderMap) -> &str {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}
