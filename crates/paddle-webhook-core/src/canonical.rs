//! Canonical serialization of event fields for signature verification.
//!
//! The sender signs a PHP `serialize()`d associative array of all declared
//! fields except the signature itself:
//!
//! ```text
//! a:<count>:{s:<len>:"<name>";s:<len>:"<value>";...}
//! ```
//!
//! - Entries are sorted by field name (byte order)
//! - Every value is a string, lengths are byte lengths
//! - Absent values still participate as empty strings
//!
//! **CRITICAL**: This framing is fixed by the sender. Any deviation breaks
//! every signature.

use serde_json::{Map, Value};

use crate::error::FormatError;
use crate::value::FieldValue;

/// Transport key of the signature field. Never canonicalized.
pub const SIGNATURE_FIELD: &str = "p_signature";

/// A single field in canonical text form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalField {
    pub name: String,
    pub value: String,
}

/// The signed fields of one event, in declaration order.
///
/// Order of insertion does not matter; [`canonicalize`] sorts by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    fields: Vec<CanonicalField>,
}

impl FieldSet {
    /// Create an empty field set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty field set with room for `capacity` fields.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Build from raw `(name, text)` pairs, dropping the signature field.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, FormatError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut set = Self::new();
        for (name, value) in pairs {
            if name != SIGNATURE_FIELD {
                set.insert_text(name, value)?;
            }
        }
        Ok(set)
    }

    /// Render `value` and add it under `name`.
    pub fn push<V: FieldValue>(&mut self, name: &str, value: &V) -> Result<(), FormatError> {
        let text = value.to_text()?;
        self.insert_text(name, text)
    }

    /// Add already-rendered text under `name`.
    pub fn insert_text(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), FormatError> {
        if self.fields.iter().any(|f| f.name == name) {
            return Err(FormatError::DuplicateField(name.to_owned()));
        }
        self.fields.push(CanonicalField {
            name: name.to_owned(),
            value: value.into(),
        });
        Ok(())
    }

    /// Look up a field's text by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CanonicalField> {
        self.fields.iter()
    }

    /// Fields sorted by name, the order used on the wire and for signing.
    pub fn sorted(&self) -> Vec<&CanonicalField> {
        let mut sorted: Vec<&CanonicalField> = self.fields.iter().collect();
        sorted.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
        sorted
    }

    /// Re-encode as an `application/x-www-form-urlencoded` body.
    pub fn to_form(&self, signature: Option<&str>) -> Result<String, FormatError> {
        let mut pairs: Vec<(&str, &str)> = self
            .sorted()
            .into_iter()
            .map(|f| (f.name.as_str(), f.value.as_str()))
            .collect();
        if let Some(signature) = signature {
            pairs.push((SIGNATURE_FIELD, signature));
        }
        serde_urlencoded::to_string(pairs).map_err(|e| FormatError::Transport(e.to_string()))
    }

    /// Re-encode as a flat JSON object of strings.
    pub fn to_json(&self, signature: Option<&str>) -> Value {
        let mut map = Map::with_capacity(self.fields.len() + 1);
        for field in self.sorted() {
            map.insert(field.name.clone(), Value::String(field.value.clone()));
        }
        if let Some(signature) = signature {
            map.insert(SIGNATURE_FIELD.to_owned(), Value::String(signature.to_owned()));
        }
        Value::Object(map)
    }
}

/// A decoded record that carries a transport signature over its own fields.
pub trait SignedPayload {
    /// All declared fields except the signature, rendered as text.
    fn canonical_fields(&self) -> Result<FieldSet, FormatError>;

    /// The base64 signature supplied with the payload.
    fn signature(&self) -> &str;

    /// The exact bytes the sender signed.
    fn canonical_bytes(&self) -> Result<Vec<u8>, FormatError> {
        Ok(canonicalize(&self.canonical_fields()?))
    }
}

/// Encode a field set to its canonical signed bytes.
pub fn canonicalize(fields: &FieldSet) -> Vec<u8> {
    let sorted = fields.sorted();

    let mut buf = Vec::with_capacity(16 + sorted.len() * 48);
    buf.extend_from_slice(b"a:");
    push_len(&mut buf, sorted.len());
    buf.extend_from_slice(b":{");
    for field in sorted {
        encode_string(&mut buf, &field.name);
        encode_string(&mut buf, &field.value);
    }
    buf.push(b'}');
    buf
}

/// Encode a length-prefixed string: `s:<len>:"<bytes>";`
fn encode_string(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(b"s:");
    push_len(buf, s.len());
    buf.extend_from_slice(b":\"");
    buf.extend_from_slice(s.as_bytes());
    buf.extend_from_slice(b"\";");
}

fn push_len(buf: &mut Vec<u8>, len: usize) {
    buf.extend_from_slice(len.to_string().as_bytes());
}
