//! Audience member product lists.

use paddle_webhook_core::{FieldValue, FormatError, ValueError, WireValue};

/// Product ids an audience member is subscribed to, sent as `"12,34,56"`.
///
/// Empty text is the empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AudienceProducts(pub Vec<i64>);

impl AudienceProducts {
    pub fn parse(text: &str) -> Result<Self, ValueError> {
        if text.is_empty() {
            return Ok(Self::default());
        }
        text.split(',')
            .map(|id| {
                if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(ValueError::Invalid(format!("product id {id:?} in {text:?}")));
                }
                id.parse::<i64>()
                    .map_err(|_| ValueError::InvalidInteger(id.to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    pub fn ids(&self) -> &[i64] {
        &self.0
    }
}

impl FieldValue for AudienceProducts {
    fn from_wire(value: WireValue<'_>) -> Result<Self, ValueError> {
        match value {
            WireValue::Absent => Ok(Self::default()),
            WireValue::Text(text) => Self::parse(&text),
            WireValue::Integer(n) => i64::try_from(n)
                .map(|id| Self(vec![id]))
                .map_err(|_| ValueError::InvalidInteger(n.to_string())),
            other => Err(ValueError::Invalid(format!("product list {other:?}"))),
        }
    }

    fn to_text(&self) -> Result<String, FormatError> {
        let ids: Vec<String> = self.0.iter().map(i64::to_string).collect();
        Ok(ids.join(","))
    }
}
