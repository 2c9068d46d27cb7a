//! Event-name extraction from raw form bodies.
//!
//! The record type a body decodes into is only known once `alert_name` has
//! been read, so it is located with a byte scan over the undecoded body.

use std::borrow::Cow;

use percent_encoding::percent_decode;

/// Wire key that selects the event record type.
pub const EVENT_NAME_FIELD: &str = "alert_name";

const EVENT_NAME_KEY: &[u8] = b"alert_name=";

/// Find the value of `alert_name` in an `application/x-www-form-urlencoded` body.
///
/// The key only matches at the start of the body or right after `&`. The first
/// occurrence wins. Returns `""` when the key is missing or its value is empty.
///
/// The result borrows from `body` unless the value had to be percent-decoded.
pub fn sniff_event_name(body: &[u8]) -> Cow<'_, str> {
    body.split(|&b| b == b'&')
        .find_map(|pair| pair.strip_prefix(EVENT_NAME_KEY))
        .map(decode_component)
        .unwrap_or(Cow::Borrowed(""))
}

/// Form-decode a single value: `+` is a space, `%XX` is a byte.
fn decode_component(raw: &[u8]) -> Cow<'_, str> {
    if !raw.contains(&b'+') {
        return percent_decode(raw).decode_utf8_lossy();
    }
    let spaced: Vec<u8> = raw
        .iter()
        .map(|&b| if b == b'+' { b' ' } else { b })
        .collect();
    Cow::Owned(percent_decode(&spaced).decode_utf8_lossy().into_owned())
}
