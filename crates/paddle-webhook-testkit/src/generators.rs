//! Proptest generators for wire values and field sets.
//!
//! Every generator yields text already in canonical form, so a value that
//! survives decoding must canonicalize back to exactly the generated text.

use std::collections::BTreeMap;

use proptest::prelude::*;

/// Decimal text with 0 to 6 fractional digits, trailing zeros included.
pub fn amount_text() -> impl Strategy<Value = String> {
    (any::<bool>(), 0u64..1_000_000, prop::option::of("[0-9]{1,6}")).prop_map(
        |(negative, int, frac)| {
            let nonzero = int > 0 || frac.as_deref().is_some_and(|f| f.bytes().any(|b| b != b'0'));
            let sign = if negative && nonzero { "-" } else { "" };
            match frac {
                Some(frac) => format!("{sign}{int}.{frac}"),
                None => format!("{sign}{int}"),
            }
        },
    )
}

/// Integer text without leading zeros.
pub fn integer_text() -> impl Strategy<Value = String> {
    any::<i64>().prop_map(|n| n.to_string())
}

/// `YYYY-MM-DD`
pub fn date_text() -> impl Strategy<Value = String> {
    (2000u32..2040, 1u32..=12, 1u32..=28)
        .prop_map(|(year, month, day)| format!("{year:04}-{month:02}-{day:02}"))
}

/// `YYYY-MM-DD HH:MM:SS`
pub fn datetime_text() -> impl Strategy<Value = String> {
    (date_text(), 0u32..24, 0u32..60, 0u32..60)
        .prop_map(|(date, h, m, s)| format!("{date} {h:02}:{m:02}:{s:02}"))
}

/// Marketing consent in canonical form: unset, refused or granted.
pub fn consent_text() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just(""), Just("0"), Just("1")]
}

/// Legacy boolean in canonical form.
pub fn bool_text() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("0"), Just("1")]
}

/// Free text, including multi-byte characters and form metacharacters.
pub fn free_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[ -~]{0,24}",
        "[a-zA-Z0-9 ąęłńóśźżÄÖÜß]{0,16}",
        Just("a=b&c=d+e%20f".to_owned()),
    ]
}

/// A wire field name.
pub fn field_name() -> impl Strategy<Value = String> {
    "[a-z][a-z_]{0,23}"
}

/// A flat field map with unique names, excluding the signature field.
pub fn field_map(max_fields: usize) -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map(field_name(), free_text(), 0..=max_fields)
        .prop_map(|mut map| {
            map.remove(paddle_webhook_core::SIGNATURE_FIELD);
            map
        })
}
