//! Body encodings, event-name sniffing and record binding.

use std::borrow::Cow;
use std::fmt;

use paddle_webhook_core::{deserialize_wire, sniff_event_name, WireValue};
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;

use crate::error::DecodeError;

/// Transport encoding of a webhook body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// `application/x-www-form-urlencoded`
    Form,
    /// `application/json`
    Json,
}

impl Encoding {
    pub const FORM_MEDIA_TYPE: &'static str = "application/x-www-form-urlencoded";
    pub const JSON_MEDIA_TYPE: &'static str = "application/json";

    /// Select an encoding from a `Content-Type` header value.
    ///
    /// Only the media type counts: everything from the first `;` or `,` is
    /// ignored, surrounding whitespace is trimmed and case is ignored.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let media_type = content_type
            .split([';', ','])
            .next()
            .unwrap_or_default()
            .trim();
        if media_type.eq_ignore_ascii_case(Self::FORM_MEDIA_TYPE) {
            Some(Self::Form)
        } else if media_type.eq_ignore_ascii_case(Self::JSON_MEDIA_TYPE) {
            Some(Self::Json)
        } else {
            None
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            Self::Form => Self::FORM_MEDIA_TYPE,
            Self::Json => Self::JSON_MEDIA_TYPE,
        }
    }

    /// Read `alert_name` without binding the whole body.
    ///
    /// Form bodies are scanned in place. JSON bodies are parsed, but only
    /// `alert_name` is kept, borrowed from `body` when it has no escapes.
    /// Returns `""` when the name is missing.
    pub fn sniff<'a>(&self, body: &'a [u8]) -> Result<Cow<'a, str>, DecodeError> {
        match self {
            Self::Form => Ok(sniff_event_name(body)),
            Self::Json => {
                let probe: NameProbe<'a> =
                    serde_json::from_slice(body).map_err(|e| DecodeError::new("", *self, e))?;
                Ok(probe.alert_name.unwrap_or(Cow::Borrowed("")))
            }
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Form => "form",
            Self::Json => "json",
        })
    }
}

#[derive(Deserialize)]
struct NameProbe<'a> {
    #[serde(borrow, default, deserialize_with = "borrowed_name")]
    alert_name: Option<Cow<'a, str>>,
}

fn borrowed_name<'de, D>(deserializer: D) -> Result<Option<Cow<'de, str>>, D::Error>
where
    D: Deserializer<'de>,
{
    match deserialize_wire(deserializer)? {
        WireValue::Text(name) => Ok(Some(name)),
        WireValue::Absent => Ok(None),
        other => Err(de::Error::custom(format!(
            "alert_name must be a string, got {other:?}"
        ))),
    }
}

/// Bind a whole body to record type `T`.
pub fn decode_record<T: DeserializeOwned>(
    alert_name: &str,
    body: &[u8],
    encoding: Encoding,
) -> Result<T, DecodeError> {
    match encoding {
        Encoding::Form => serde_urlencoded::from_bytes(body)
            .map_err(|e| DecodeError::new(alert_name, encoding, e)),
        Encoding::Json => {
            serde_json::from_slice(body).map_err(|e| DecodeError::new(alert_name, encoding, e))
        }
    }
}
