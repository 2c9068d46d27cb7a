//! Error types for webhook ingestion.

use std::path::PathBuf;

use http::StatusCode;
use paddle_webhook_core::VerificationError;
use paddle_webhook_events::{DecodeError, EventKind, UnsupportedEventError};
use thiserror::Error;

/// Why a webhook was not handed to a handler.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Content type is neither form nor JSON.
    #[error("unsupported media type: {0:?}")]
    UnsupportedMediaType(String),

    /// Missing or unknown `alert_name`.
    #[error(transparent)]
    UnsupportedEvent(#[from] UnsupportedEventError),

    /// Body does not bind to the selected record.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Signature is missing, malformed or does not match.
    #[error("verification error: {0}")]
    Verification(#[from] VerificationError),

    /// No handler was registered for a supported event.
    #[error("missing handler for event {0}")]
    NoHandler(EventKind),
}

/// Who has to act on an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// The request was bad; the sender may redeliver.
    Client,
    /// The receiver is not set up for this request.
    Configuration,
}

impl WebhookError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::UnsupportedMediaType(_)
            | Self::UnsupportedEvent(_)
            | Self::Decode(_)
            | Self::Verification(_) => ErrorClass::Client,
            Self::NoHandler(_) => ErrorClass::Configuration,
        }
    }

    /// Transport status for this error.
    pub fn status(&self) -> StatusCode {
        match self.class() {
            ErrorClass::Client => StatusCode::BAD_REQUEST,
            ErrorClass::Configuration => StatusCode::NOT_FOUND,
        }
    }

    pub fn is_verification(&self) -> bool {
        matches!(self, Self::Verification(_))
    }
}

/// Errors building components from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read public key from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid public key: {0}")]
    Key(#[from] VerificationError),
}

/// Result type for webhook operations.
pub type Result<T> = std::result::Result<T, WebhookError>;
