//! Error types for event selection and decoding.

use thiserror::Error;

use crate::decode::Encoding;

/// The body names an event this crate has no record for.
///
/// An empty name (missing or blank `alert_name`) is reported the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported event type {alert_name:?}")]
pub struct UnsupportedEventError {
    pub alert_name: String,
}

impl UnsupportedEventError {
    pub fn new(alert_name: impl Into<String>) -> Self {
        Self {
            alert_name: alert_name.into(),
        }
    }

    /// Whether the body carried no event name at all.
    pub fn is_missing(&self) -> bool {
        self.alert_name.is_empty()
    }
}

/// A body that does not bind to the selected record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot decode {encoding} body for event {alert_name:?}: {message}")]
pub struct DecodeError {
    /// Event the body was decoded as, empty if decoding failed before selection.
    pub alert_name: String,
    pub encoding: Encoding,
    /// Message from the underlying binder.
    pub message: String,
}

impl DecodeError {
    pub fn new(alert_name: impl Into<String>, encoding: Encoding, message: impl ToString) -> Self {
        Self {
            alert_name: alert_name.into(),
            encoding,
            message: message.to_string(),
        }
    }
}
