//! The closed set of event records and selection by alert name.

use std::fmt;
use std::str::FromStr;

use paddle_webhook_core::{FieldSet, FormatError, SignedPayload};
use serde::de::DeserializeOwned;

use crate::alerts::*;
use crate::decode::{decode_record, Encoding};
use crate::error::{DecodeError, UnsupportedEventError};
use crate::subscription::*;

/// A typed event record bound to its alert name.
pub trait EventRecord: SignedPayload + DeserializeOwned + Into<Event> + Send + 'static {
    /// Value of `alert_name` that selects this record.
    const ALERT_NAME: &'static str;

    const KIND: EventKind;

    /// Every signed wire key, in declaration order.
    const FIELDS: &'static [&'static str];
}

/// Discriminant of [`Event`]: which record a body decodes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    HighRiskTransactionCreated,
    HighRiskTransactionUpdated,
    LockerProcessed,
    NewAudienceMember,
    PaymentDisputeClosed,
    PaymentDisputeCreated,
    PaymentRefunded,
    PaymentSucceeded,
    TransferCreated,
    TransferPaid,
    UpdateAudienceMember,
    SubscriptionCancelled,
    SubscriptionCreated,
    SubscriptionPaymentFailed,
    SubscriptionPaymentRefunded,
    SubscriptionPaymentSucceeded,
    SubscriptionUpdated,
}

impl EventKind {
    /// Every supported event kind.
    pub const ALL: [EventKind; 17] = [
        Self::HighRiskTransactionCreated,
        Self::HighRiskTransactionUpdated,
        Self::LockerProcessed,
        Self::NewAudienceMember,
        Self::PaymentDisputeClosed,
        Self::PaymentDisputeCreated,
        Self::PaymentRefunded,
        Self::PaymentSucceeded,
        Self::TransferCreated,
        Self::TransferPaid,
        Self::UpdateAudienceMember,
        Self::SubscriptionCancelled,
        Self::SubscriptionCreated,
        Self::SubscriptionPaymentFailed,
        Self::SubscriptionPaymentRefunded,
        Self::SubscriptionPaymentSucceeded,
        Self::SubscriptionUpdated,
    ];

    pub fn alert_name(self) -> &'static str {
        match self {
            Self::HighRiskTransactionCreated => HighRiskTransactionCreated::ALERT_NAME,
            Self::HighRiskTransactionUpdated => HighRiskTransactionUpdated::ALERT_NAME,
            Self::LockerProcessed => LockerProcessed::ALERT_NAME,
            Self::NewAudienceMember => NewAudienceMember::ALERT_NAME,
            Self::PaymentDisputeClosed => PaymentDisputeClosed::ALERT_NAME,
            Self::PaymentDisputeCreated => PaymentDisputeCreated::ALERT_NAME,
            Self::PaymentRefunded => PaymentRefunded::ALERT_NAME,
            Self::PaymentSucceeded => PaymentSucceeded::ALERT_NAME,
            Self::TransferCreated => TransferCreated::ALERT_NAME,
            Self::TransferPaid => TransferPaid::ALERT_NAME,
            Self::UpdateAudienceMember => UpdateAudienceMember::ALERT_NAME,
            Self::SubscriptionCancelled => SubscriptionCancelled::ALERT_NAME,
            Self::SubscriptionCreated => SubscriptionCreated::ALERT_NAME,
            Self::SubscriptionPaymentFailed => SubscriptionPaymentFailed::ALERT_NAME,
            Self::SubscriptionPaymentRefunded => SubscriptionPaymentRefunded::ALERT_NAME,
            Self::SubscriptionPaymentSucceeded => SubscriptionPaymentSucceeded::ALERT_NAME,
            Self::SubscriptionUpdated => SubscriptionUpdated::ALERT_NAME,
        }
    }

    /// Signed wire keys of this kind's record.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            Self::HighRiskTransactionCreated => HighRiskTransactionCreated::FIELDS,
            Self::HighRiskTransactionUpdated => HighRiskTransactionUpdated::FIELDS,
            Self::LockerProcessed => LockerProcessed::FIELDS,
            Self::NewAudienceMember => NewAudienceMember::FIELDS,
            Self::PaymentDisputeClosed => PaymentDisputeClosed::FIELDS,
            Self::PaymentDisputeCreated => PaymentDisputeCreated::FIELDS,
            Self::PaymentRefunded => PaymentRefunded::FIELDS,
            Self::PaymentSucceeded => PaymentSucceeded::FIELDS,
            Self::TransferCreated => TransferCreated::FIELDS,
            Self::TransferPaid => TransferPaid::FIELDS,
            Self::UpdateAudienceMember => UpdateAudienceMember::FIELDS,
            Self::SubscriptionCancelled => SubscriptionCancelled::FIELDS,
            Self::SubscriptionCreated => SubscriptionCreated::FIELDS,
            Self::SubscriptionPaymentFailed => SubscriptionPaymentFailed::FIELDS,
            Self::SubscriptionPaymentRefunded => SubscriptionPaymentRefunded::FIELDS,
            Self::SubscriptionPaymentSucceeded => SubscriptionPaymentSucceeded::FIELDS,
            Self::SubscriptionUpdated => SubscriptionUpdated::FIELDS,
        }
    }

    pub fn from_alert_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.alert_name() == name)
    }

    /// Decode `body` into this kind's record.
    pub fn decode(self, body: &[u8], encoding: Encoding) -> Result<Event, DecodeError> {
        match self {
            Self::HighRiskTransactionCreated => decode_as::<HighRiskTransactionCreated>(body, encoding),
            Self::HighRiskTransactionUpdated => decode_as::<HighRiskTransactionUpdated>(body, encoding),
            Self::LockerProcessed => decode_as::<LockerProcessed>(body, encoding),
            Self::NewAudienceMember => decode_as::<NewAudienceMember>(body, encoding),
            Self::PaymentDisputeClosed => decode_as::<PaymentDisputeClosed>(body, encoding),
            Self::PaymentDisputeCreated => decode_as::<PaymentDisputeCreated>(body, encoding),
            Self::PaymentRefunded => decode_as::<PaymentRefunded>(body, encoding),
            Self::PaymentSucceeded => decode_as::<PaymentSucceeded>(body, encoding),
            Self::TransferCreated => decode_as::<TransferCreated>(body, encoding),
            Self::TransferPaid => decode_as::<TransferPaid>(body, encoding),
            Self::UpdateAudienceMember => decode_as::<UpdateAudienceMember>(body, encoding),
            Self::SubscriptionCancelled => decode_as::<SubscriptionCancelled>(body, encoding),
            Self::SubscriptionCreated => decode_as::<SubscriptionCreated>(body, encoding),
            Self::SubscriptionPaymentFailed => decode_as::<SubscriptionPaymentFailed>(body, encoding),
            Self::SubscriptionPaymentRefunded => {
                decode_as::<SubscriptionPaymentRefunded>(body, encoding)
            }
            Self::SubscriptionPaymentSucceeded => {
                decode_as::<SubscriptionPaymentSucceeded>(body, encoding)
            }
            Self::SubscriptionUpdated => decode_as::<SubscriptionUpdated>(body, encoding),
        }
    }
}

fn decode_as<R: EventRecord>(body: &[u8], encoding: Encoding) -> Result<Event, DecodeError> {
    decode_record::<R>(R::ALERT_NAME, body, encoding).map(Into::into)
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.alert_name())
    }
}

impl FromStr for EventKind {
    type Err = UnsupportedEventError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        resolve(name)
    }
}

/// Select the record type for an alert name.
pub fn resolve(alert_name: &str) -> Result<EventKind, UnsupportedEventError> {
    EventKind::from_alert_name(alert_name).ok_or_else(|| UnsupportedEventError::new(alert_name))
}

/// A decoded webhook event of any supported kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    HighRiskTransactionCreated(HighRiskTransactionCreated),
    HighRiskTransactionUpdated(HighRiskTransactionUpdated),
    LockerProcessed(LockerProcessed),
    NewAudienceMember(NewAudienceMember),
    PaymentDisputeClosed(PaymentDisputeClosed),
    PaymentDisputeCreated(PaymentDisputeCreated),
    PaymentRefunded(PaymentRefunded),
    PaymentSucceeded(PaymentSucceeded),
    TransferCreated(TransferCreated),
    TransferPaid(TransferPaid),
    UpdateAudienceMember(UpdateAudienceMember),
    SubscriptionCancelled(SubscriptionCancelled),
    SubscriptionCreated(SubscriptionCreated),
    SubscriptionPaymentFailed(SubscriptionPaymentFailed),
    SubscriptionPaymentRefunded(SubscriptionPaymentRefunded),
    SubscriptionPaymentSucceeded(SubscriptionPaymentSucceeded),
    SubscriptionUpdated(SubscriptionUpdated),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::HighRiskTransactionCreated(_) => EventKind::HighRiskTransactionCreated,
            Self::HighRiskTransactionUpdated(_) => EventKind::HighRiskTransactionUpdated,
            Self::LockerProcessed(_) => EventKind::LockerProcessed,
            Self::NewAudienceMember(_) => EventKind::NewAudienceMember,
            Self::PaymentDisputeClosed(_) => EventKind::PaymentDisputeClosed,
            Self::PaymentDisputeCreated(_) => EventKind::PaymentDisputeCreated,
            Self::PaymentRefunded(_) => EventKind::PaymentRefunded,
            Self::PaymentSucceeded(_) => EventKind::PaymentSucceeded,
            Self::TransferCreated(_) => EventKind::TransferCreated,
            Self::TransferPaid(_) => EventKind::TransferPaid,
            Self::UpdateAudienceMember(_) => EventKind::UpdateAudienceMember,
            Self::SubscriptionCancelled(_) => EventKind::SubscriptionCancelled,
            Self::SubscriptionCreated(_) => EventKind::SubscriptionCreated,
            Self::SubscriptionPaymentFailed(_) => EventKind::SubscriptionPaymentFailed,
            Self::SubscriptionPaymentRefunded(_) => EventKind::SubscriptionPaymentRefunded,
            Self::SubscriptionPaymentSucceeded(_) => EventKind::SubscriptionPaymentSucceeded,
            Self::SubscriptionUpdated(_) => EventKind::SubscriptionUpdated,
        }
    }

    pub fn alert_name(&self) -> &'static str {
        self.kind().alert_name()
    }

    fn payload(&self) -> &dyn SignedPayload {
        match self {
            Self::HighRiskTransactionCreated(e) => e,
            Self::HighRiskTransactionUpdated(e) => e,
            Self::LockerProcessed(e) => e,
            Self::NewAudienceMember(e) => e,
            Self::PaymentDisputeClosed(e) => e,
            Self::PaymentDisputeCreated(e) => e,
            Self::PaymentRefunded(e) => e,
            Self::PaymentSucceeded(e) => e,
            Self::TransferCreated(e) => e,
            Self::TransferPaid(e) => e,
            Self::UpdateAudienceMember(e) => e,
            Self::SubscriptionCancelled(e) => e,
            Self::SubscriptionCreated(e) => e,
            Self::SubscriptionPaymentFailed(e) => e,
            Self::SubscriptionPaymentRefunded(e) => e,
            Self::SubscriptionPaymentSucceeded(e) => e,
            Self::SubscriptionUpdated(e) => e,
        }
    }
}

impl SignedPayload for Event {
    fn canonical_fields(&self) -> Result<FieldSet, FormatError> {
        self.payload().canonical_fields()
    }

    fn signature(&self) -> &str {
        self.payload().signature()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paddle_webhook_core::SIGNATURE_FIELD;
    use std::collections::HashSet;

    #[test]
    fn test_resolve_every_kind() {
        for kind in EventKind::ALL {
            assert_eq!(resolve(kind.alert_name()), Ok(kind));
            assert_eq!(kind.to_string().parse::<EventKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_alert_names_are_distinct() {
        let names: HashSet<_> = EventKind::ALL.iter().map(|k| k.alert_name()).collect();
        assert_eq!(names.len(), EventKind::ALL.len());
    }

    #[test]
    fn test_resolve_unknown() {
        let err = resolve("subscription_paused").unwrap_err();
        assert_eq!(err.alert_name, "subscription_paused");
        assert!(!err.is_missing());

        assert!(resolve("").unwrap_err().is_missing());
        assert!(resolve("Payment_Succeeded").is_err());
    }

    #[test]
    fn test_fields_exclude_signature() {
        for kind in EventKind::ALL {
            let fields = kind.fields();
            assert!(fields.contains(&"alert_name"), "{kind} lacks alert_name");
            assert!(!fields.contains(&SIGNATURE_FIELD), "{kind} signs its signature");
        }
    }

    #[test]
    fn test_default_record_canonicalizes_every_field() {
        let event: Event = TransferPaid::default().into();
        assert_eq!(event.kind(), EventKind::TransferPaid);

        let fields = event.canonical_fields().unwrap();
        assert_eq!(fields.len(), TransferPaid::FIELDS.len());
        assert!(fields.iter().all(|f| f.value.is_empty()));
        assert_eq!(
            String::from_utf8(event.canonical_bytes().unwrap()).unwrap(),
            concat!(
                r#"a:6:{s:10:"alert_name";s:0:"";s:6:"amount";s:0:"";"#,
                r#"s:8:"currency";s:0:"";s:10:"event_time";s:0:"";"#,
                r#"s:9:"payout_id";s:0:"";s:6:"status";s:0:"";}"#,
            )
        );
    }

    #[test]
    fn test_event_delegates_signature() {
        let record = PaymentRefunded {
            p_signature: "c2ln".into(),
            ..Default::default()
        };
        let event = Event::from(record);
        assert_eq!(event.signature(), "c2ln");
        assert_eq!(event.alert_name(), "payment_refunded");
    }
}
