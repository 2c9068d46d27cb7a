//! Type-routed dispatch of verified events to handlers.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Buf;
use http::Request;
use paddle_webhook_events::*;
use tracing::{debug, warn};

use crate::error::{Result, WebhookError};
use crate::middleware::{content_type, VerificationMiddleware};

/// Handles events of record type `E`, producing `R`.
///
/// Any `Fn(E) -> impl Future<Output = R>` closure is a handler.
#[async_trait]
pub trait Handler<E: Send + 'static, R: Send + 'static>: Send + Sync {
    async fn handle(&self, event: E) -> R;
}

#[async_trait]
impl<E, R, F, Fut> Handler<E, R> for F
where
    E: Send + 'static,
    R: Send + 'static,
    F: Fn(E) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send,
{
    async fn handle(&self, event: E) -> R {
        (self)(event).await
    }
}

/// A record type with a handler slot in [`HandlerRegistry`].
pub trait Routable<R: Send + 'static>: EventRecord {
    #[doc(hidden)]
    fn slot(registry: &mut HandlerRegistry<R>) -> &mut Option<Arc<dyn Handler<Self, R>>>;
}

macro_rules! registry {
    ($($record:ident => $slot:ident),* $(,)?) => {
        /// One optional handler per event record type.
        ///
        /// Built once at startup and read-only afterwards. Events without a
        /// handler resolve to [`WebhookError::NoHandler`].
        pub struct HandlerRegistry<R: Send + 'static> {
            $($slot: Option<Arc<dyn Handler<$record, R>>>,)*
        }

        impl<R: Send + 'static> Default for HandlerRegistry<R> {
            fn default() -> Self {
                Self {
                    $($slot: None,)*
                }
            }
        }

        $(
            impl<R: Send + 'static> Routable<R> for $record {
                fn slot(registry: &mut HandlerRegistry<R>) -> &mut Option<Arc<dyn Handler<Self, R>>> {
                    &mut registry.$slot
                }
            }
        )*

        impl<R: Send + 'static> HandlerRegistry<R> {
            /// Whether a handler is registered for `kind`.
            pub fn handles(&self, kind: EventKind) -> bool {
                match kind {
                    $(EventKind::$record => self.$slot.is_some(),)*
                }
            }

            /// Invoke the handler registered for the event's record type.
            pub async fn dispatch(&self, event: Event) -> Result<R> {
                match event {
                    $(Event::$record(record) => invoke(&self.$slot, record).await,)*
                }
            }
        }
    };
}

registry! {
    HighRiskTransactionCreated => high_risk_transaction_created,
    HighRiskTransactionUpdated => high_risk_transaction_updated,
    LockerProcessed => locker_processed,
    NewAudienceMember => new_audience_member,
    PaymentDisputeClosed => payment_dispute_closed,
    PaymentDisputeCreated => payment_dispute_created,
    PaymentRefunded => payment_refunded,
    PaymentSucceeded => payment_succeeded,
    TransferCreated => transfer_created,
    TransferPaid => transfer_paid,
    UpdateAudienceMember => update_audience_member,
    SubscriptionCancelled => subscription_cancelled,
    SubscriptionCreated => subscription_created,
    SubscriptionPaymentFailed => subscription_payment_failed,
    SubscriptionPaymentRefunded => subscription_payment_refunded,
    SubscriptionPaymentSucceeded => subscription_payment_succeeded,
    SubscriptionUpdated => subscription_updated,
}

impl<R: Send + 'static> HandlerRegistry<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler for record type `E`, replacing any previous one.
    pub fn on<E, H>(mut self, handler: H) -> Self
    where
        E: Routable<R>,
        H: Handler<E, R> + 'static,
    {
        let handler: Arc<dyn Handler<E, R>> = Arc::new(handler);
        *E::slot(&mut self) = Some(handler);
        self
    }

    /// Kinds that have a handler.
    pub fn registered(&self) -> Vec<EventKind> {
        EventKind::ALL
            .into_iter()
            .filter(|kind| self.handles(*kind))
            .collect()
    }
}

impl<R: Send + 'static> fmt::Debug for HandlerRegistry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("registered", &self.registered())
            .finish()
    }
}

async fn invoke<E, R>(handler: &Option<Arc<dyn Handler<E, R>>>, event: E) -> Result<R>
where
    E: EventRecord,
    R: Send + 'static,
{
    match handler {
        Some(handler) => {
            debug!(alert_name = E::ALERT_NAME, "dispatching event");
            Ok(handler.handle(event).await)
        }
        None => {
            warn!(alert_name = E::ALERT_NAME, "no handler registered");
            Err(WebhookError::NoHandler(E::KIND))
        }
    }
}

/// Verifies incoming webhooks and routes them to their handlers.
#[derive(Debug)]
pub struct Router<R: Send + 'static> {
    middleware: VerificationMiddleware,
    handlers: HandlerRegistry<R>,
}

impl<R: Send + 'static> Router<R> {
    pub fn new(middleware: VerificationMiddleware, handlers: HandlerRegistry<R>) -> Self {
        Self {
            middleware,
            handlers,
        }
    }

    pub fn middleware(&self) -> &VerificationMiddleware {
        &self.middleware
    }

    pub fn handlers(&self) -> &HandlerRegistry<R> {
        &self.handlers
    }

    /// Verify one body and dispatch it.
    ///
    /// Pipeline errors are always returned, whatever the middleware's error
    /// policy: without an event there is nothing to dispatch.
    pub async fn route<B: Buf>(&self, content_type: &str, body: B) -> Result<R> {
        let event = self.middleware.run(content_type, body).outcome.into_result()?;
        self.handlers.dispatch(event).await
    }

    /// [`route`](Self::route) using the request's `Content-Type` header.
    pub async fn handle<B: Buf>(&self, request: Request<B>) -> Result<R> {
        let (parts, body) = request.into_parts();
        self.route(content_type(&parts.headers), body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WebhookConfig;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Count(Arc<AtomicUsize>);

    #[async_trait]
    impl Handler<TransferPaid, &'static str> for Count {
        async fn handle(&self, _event: TransferPaid) -> &'static str {
            self.0.fetch_add(1, Ordering::SeqCst);
            "counted"
        }
    }

    #[tokio::test]
    async fn test_dispatch_to_struct_and_closure_handlers() {
        let count = Arc::new(AtomicUsize::new(0));
        let registry: HandlerRegistry<&'static str> = HandlerRegistry::new()
            .on::<TransferPaid, _>(Count(Arc::clone(&count)))
            .on::<TransferCreated, _>(|event: TransferCreated| async move {
                if event.status == "unpaid" {
                    "closure"
                } else {
                    "other"
                }
            });

        assert_eq!(
            registry.registered(),
            vec![EventKind::TransferCreated, EventKind::TransferPaid]
        );

        let paid = registry.dispatch(TransferPaid::default().into()).await.unwrap();
        assert_eq!(paid, "counted");
        assert_eq!(count.load(Ordering::SeqCst), 1);

        let created = TransferCreated {
            status: "unpaid".into(),
            ..Default::default()
        };
        assert_eq!(registry.dispatch(created.into()).await.unwrap(), "closure");
    }

    #[tokio::test]
    async fn test_missing_handler_falls_back() {
        let registry: HandlerRegistry<()> = HandlerRegistry::new();
        let err = registry
            .dispatch(SubscriptionUpdated::default().into())
            .await
            .unwrap_err();
        assert!(matches!(err, WebhookError::NoHandler(EventKind::SubscriptionUpdated)));
        assert_eq!(err.status(), http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_router_surfaces_pipeline_errors() {
        let router = Router::new(
            VerificationMiddleware::unverified(WebhookConfig::default()),
            HandlerRegistry::<u8>::new().on::<TransferPaid, _>(|_: TransferPaid| async { 1 }),
        );

        let ok = router
            .route("application/x-www-form-urlencoded", &b"alert_name=transfer_paid"[..])
            .await
            .unwrap();
        assert_eq!(ok, 1);

        let err = router
            .route("application/x-www-form-urlencoded", &b"alert_name=nope"[..])
            .await
            .unwrap_err();
        assert!(matches!(err, WebhookError::UnsupportedEvent(_)));
    }
}
