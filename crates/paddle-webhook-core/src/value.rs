//! Typed field values and their text forms.
//!
//! Every event field is decoded from the wire into a typed value and later
//! rendered back into the exact text the sender signed. The rendering rules:
//!
//! - strings: verbatim
//! - integers: base-10, no leading zeros, sign only if negative
//! - amounts: the original number of fractional digits is preserved
//! - dates: `YYYY-MM-DD`, datetimes: `YYYY-MM-DD HH:MM:SS`
//! - marketing consent: `""` (unset), `"0"` (refused), `"1"` (granted)
//! - legacy PHP booleans: `"1"` / `"0"`
//! - [`TextBool`]: `"true"` / `"false"`
//!
//! Absent values render as empty text.

use std::borrow::Cow;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::{self, Deserializer, Visitor};

use crate::error::{FormatError, ValueError};

/// Wire format of day-precision dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Wire format of second-precision datetimes.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A raw value as it arrived on the wire, before typing.
///
/// Form bodies only ever produce [`WireValue::Text`]; JSON bodies may also
/// carry numbers, booleans and `null`.
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue<'a> {
    Absent,
    Text(Cow<'a, str>),
    Integer(i128),
    Float(f64),
    Bool(bool),
}

/// A non-empty value with a single text representation.
pub trait TextValue: Sized {
    /// Parse from non-empty wire text.
    fn parse_text(text: &str) -> Result<Self, ValueError>;

    /// Render to the text the sender signed.
    fn format_text(&self) -> Result<String, FormatError>;

    /// Parse from a JSON floating point number.
    fn parse_float(value: f64) -> Result<Self, ValueError> {
        Self::parse_text(&value.to_string())
    }
}

/// A declared event field: decodes from any wire value, including absence.
pub trait FieldValue: Default + Sized {
    fn from_wire(value: WireValue<'_>) -> Result<Self, ValueError>;

    /// Plain text used both for canonicalization and transport re-encoding.
    fn to_text(&self) -> Result<String, FormatError>;
}

impl FieldValue for String {
    fn from_wire(value: WireValue<'_>) -> Result<Self, ValueError> {
        Ok(match value {
            WireValue::Absent => String::new(),
            WireValue::Text(text) => text.into_owned(),
            WireValue::Integer(n) => n.to_string(),
            WireValue::Float(f) => f.to_string(),
            WireValue::Bool(b) => php_bool(b).to_string(),
        })
    }

    fn to_text(&self) -> Result<String, FormatError> {
        Ok(self.clone())
    }
}

impl<T: TextValue> FieldValue for Option<T> {
    fn from_wire(value: WireValue<'_>) -> Result<Self, ValueError> {
        match value {
            WireValue::Absent => Ok(None),
            WireValue::Text(text) if text.is_empty() => Ok(None),
            WireValue::Text(text) => T::parse_text(&text).map(Some),
            WireValue::Integer(n) => T::parse_text(&n.to_string()).map(Some),
            WireValue::Float(f) => T::parse_float(f).map(Some),
            WireValue::Bool(b) => T::parse_text(if b { "true" } else { "false" }).map(Some),
        }
    }

    fn to_text(&self) -> Result<String, FormatError> {
        match self {
            Some(value) => value.format_text(),
            None => Ok(String::new()),
        }
    }
}

/// Serde adapter that binds any wire value into a [`FieldValue`].
///
/// Use with `#[serde(default, deserialize_with = "...")]` so that missing keys
/// fall back to the field's absent state.
pub fn deserialize_field<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FieldValue,
{
    let wire = deserialize_wire(deserializer)?;
    T::from_wire(wire).map_err(de::Error::custom)
}

/// Read one raw wire value, borrowing text from the input where it can.
pub fn deserialize_wire<'de, D>(deserializer: D) -> Result<WireValue<'de>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(WireVisitor)
}

struct WireVisitor;

impl<'de> Visitor<'de> for WireVisitor {
    type Value = WireValue<'de>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number, boolean or null")
    }

    fn visit_borrowed_str<E: de::Error>(self, v: &'de str) -> Result<Self::Value, E> {
        Ok(WireValue::Text(Cow::Borrowed(v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(WireValue::Text(Cow::Owned(v.to_owned())))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(WireValue::Text(Cow::Owned(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(WireValue::Integer(v.into()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(WireValue::Integer(v.into()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(WireValue::Float(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(WireValue::Bool(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(WireValue::Absent)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(WireValue::Absent)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scalars
// ─────────────────────────────────────────────────────────────────────────────

impl TextValue for i64 {
    fn parse_text(text: &str) -> Result<Self, ValueError> {
        text.parse()
            .map_err(|_| ValueError::InvalidInteger(text.to_owned()))
    }

    fn format_text(&self) -> Result<String, FormatError> {
        Ok(self.to_string())
    }
}

fn php_bool(b: bool) -> &'static str {
    if b {
        "1"
    } else {
        "0"
    }
}

fn parse_bool(text: &str) -> Result<bool, ValueError> {
    match text {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(ValueError::InvalidBool(text.to_owned())),
    }
}

/// Legacy PHP-style booleans: accepted as `1`/`0`/`true`/`false`, rendered as `1`/`0`.
impl TextValue for bool {
    fn parse_text(text: &str) -> Result<Self, ValueError> {
        parse_bool(text)
    }

    fn format_text(&self) -> Result<String, FormatError> {
        Ok(php_bool(*self).to_owned())
    }
}

/// A boolean the sender signs as `"true"` / `"false"`.
///
/// Accepts the same input spellings as the PHP-style `bool`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TextBool(pub bool);

impl TextBool {
    pub fn get(self) -> bool {
        self.0
    }
}

impl From<bool> for TextBool {
    fn from(value: bool) -> Self {
        Self(value)
    }
}

impl TextValue for TextBool {
    fn parse_text(text: &str) -> Result<Self, ValueError> {
        parse_bool(text).map(Self)
    }

    fn format_text(&self) -> Result<String, FormatError> {
        Ok(if self.0 { "true" } else { "false" }.to_owned())
    }
}

impl TextValue for IpAddr {
    fn parse_text(text: &str) -> Result<Self, ValueError> {
        text.parse()
            .map_err(|_| ValueError::InvalidIp(text.to_owned()))
    }

    fn format_text(&self) -> Result<String, FormatError> {
        Ok(self.to_string())
    }
}

impl TextValue for NaiveDate {
    fn parse_text(text: &str) -> Result<Self, ValueError> {
        NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| ValueError::InvalidDate {
            value: text.to_owned(),
            format: DATE_FORMAT,
        })
    }

    fn format_text(&self) -> Result<String, FormatError> {
        Ok(self.format(DATE_FORMAT).to_string())
    }
}

impl TextValue for NaiveDateTime {
    fn parse_text(text: &str) -> Result<Self, ValueError> {
        NaiveDateTime::parse_from_str(text, DATETIME_FORMAT).map_err(|_| {
            ValueError::InvalidDate {
                value: text.to_owned(),
                format: DATETIME_FORMAT,
            }
        })
    }

    fn format_text(&self) -> Result<String, FormatError> {
        Ok(self.format(DATETIME_FORMAT).to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Amounts
// ─────────────────────────────────────────────────────────────────────────────

/// A decimal amount that remembers how many fractional digits it was sent with.
///
/// `"49.99"` and `"49.990"` are numerically equal, but they are different
/// amounts here because they render to different text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Amount {
    value: Decimal,
    precision: u32,
}

impl Amount {
    /// Largest fractional digit count a [`Decimal`] can carry.
    pub const MAX_PRECISION: u32 = 28;

    /// Create an amount rendered with `precision` fractional digits.
    pub fn new(value: Decimal, precision: u32) -> Self {
        Self { value, precision }
    }

    /// The numeric value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// The remembered fractional digit count.
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Render with the remembered precision, truncating or zero-padding.
    pub fn to_canonical_string(&self) -> Result<String, FormatError> {
        if self.precision > Self::MAX_PRECISION {
            return Err(FormatError::PrecisionOutOfRange {
                precision: self.precision,
                max: Self::MAX_PRECISION,
            });
        }
        let mut value = self
            .value
            .round_dp_with_strategy(self.precision, RoundingStrategy::ToZero);
        value.rescale(self.precision);
        Ok(value.to_string())
    }
}

impl FromStr for Amount {
    type Err = ValueError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || ValueError::InvalidDecimal(text.to_owned());
        let Some(precision) = plain_decimal_precision(text) else {
            return Err(invalid());
        };
        let value = Decimal::from_str(text).map_err(|_| invalid())?;
        // Rounded input or a negative zero would not render back to `text`.
        if value.scale() != precision || (value.is_zero() && text.starts_with('-')) {
            return Err(invalid());
        }
        Ok(Self {
            value,
            precision: value.scale(),
        })
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_canonical_string() {
            Ok(text) => f.write_str(&text),
            Err(_) => write!(f, "{}", self.value),
        }
    }
}

impl TextValue for Amount {
    fn parse_text(text: &str) -> Result<Self, ValueError> {
        text.parse()
    }

    fn format_text(&self) -> Result<String, FormatError> {
        self.to_canonical_string()
    }

    /// Floats have already lost the sender's text, so they are refused.
    fn parse_float(value: f64) -> Result<Self, ValueError> {
        Err(ValueError::InexactDecimal(value.to_string()))
    }
}

/// Fractional digit count of `-?digits(.digits)?`, or `None` for anything
/// else: exponents, sign prefixes and separators are not plain decimals.
fn plain_decimal_precision(text: &str) -> Option<u32> {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (int, frac) = match unsigned.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (unsigned, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int) || !frac.map_or(true, all_digits) {
        return None;
    }
    u32::try_from(frac.map_or(0, str::len)).ok()
}

// ─────────────────────────────────────────────────────────────────────────────
// Marketing consent
// ─────────────────────────────────────────────────────────────────────────────

/// Tri-state marketing consent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Consent {
    /// Never answered. Renders as empty text.
    #[default]
    Unset,
    /// Explicitly declined (`"0"`).
    Refused,
    /// Explicitly granted (`"1"`).
    Granted,
}

/// How to treat consent text other than empty, `"0"` or `"1"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ConsentPolicy {
    /// Reject with [`ValueError::InvalidConsent`].
    #[default]
    Strict,
    /// Degrade silently to [`Consent::Unset`].
    Lenient,
}

impl Consent {
    /// The policy applied when decoding event records.
    pub const DECODE_POLICY: ConsentPolicy = ConsentPolicy::Strict;

    /// Parse consent text. Whitespace-only text is unset.
    pub fn parse(text: &str, policy: ConsentPolicy) -> Result<Self, ValueError> {
        match text.trim() {
            "" => Ok(Self::Unset),
            "0" => Ok(Self::Refused),
            "1" => Ok(Self::Granted),
            _ => match policy {
                ConsentPolicy::Strict => Err(ValueError::InvalidConsent(text.to_owned())),
                ConsentPolicy::Lenient => Ok(Self::Unset),
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::Refused => "0",
            Self::Granted => "1",
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

impl FieldValue for Consent {
    fn from_wire(value: WireValue<'_>) -> Result<Self, ValueError> {
        match value {
            WireValue::Absent => Ok(Self::Unset),
            WireValue::Text(text) => Self::parse(&text, Self::DECODE_POLICY),
            WireValue::Integer(n) => Self::parse(&n.to_string(), Self::DECODE_POLICY),
            WireValue::Float(f) => Self::parse(&f.to_string(), Self::DECODE_POLICY),
            WireValue::Bool(b) => Ok(if b { Self::Granted } else { Self::Refused }),
        }
    }

    fn to_text(&self) -> Result<String, FormatError> {
        Ok(self.as_str().to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> WireValue<'_> {
        WireValue::Text(Cow::Borrowed(s))
    }

    #[test]
    fn test_amount_preserves_trailing_zeros() {
        let amount: Amount = "49.990".parse().unwrap();
        assert_eq!(amount.precision(), 3);
        assert_eq!(amount.format_text().unwrap(), "49.990");

        let shorter: Amount = "49.99".parse().unwrap();
        assert_eq!(shorter.value(), amount.value());
        assert_ne!(shorter, amount);
        assert_eq!(shorter.format_text().unwrap(), "49.99");
    }

    #[test]
    fn test_amount_zero_precision_has_no_point() {
        let amount: Amount = "12".parse().unwrap();
        assert_eq!(amount.format_text().unwrap(), "12");

        let rounded = Amount::new(Decimal::new(1299, 2), 0);
        assert_eq!(rounded.format_text().unwrap(), "12");
    }

    #[test]
    fn test_amount_truncates_and_pads() {
        let amount = Amount::new(Decimal::new(123456, 4), 2);
        assert_eq!(amount.format_text().unwrap(), "12.34");

        let padded = Amount::new(Decimal::new(5, 1), 3);
        assert_eq!(padded.format_text().unwrap(), "0.500");

        let negative = Amount::new(Decimal::new(-1999, 3), 1);
        assert_eq!(negative.format_text().unwrap(), "-1.9");
    }

    #[test]
    fn test_amount_precision_out_of_range() {
        let amount = Amount::new(Decimal::ONE, 29);
        assert_eq!(
            amount.format_text(),
            Err(FormatError::PrecisionOutOfRange {
                precision: 29,
                max: 28
            })
        );
    }

    #[test]
    fn test_amount_rejects_non_plain_text() {
        for bad in ["1e5", "+1", "1_000", "1.", ".5", "", "-", "abc", "1.2.3"] {
            assert!(bad.parse::<Amount>().is_err(), "accepted {bad:?}");
        }
        assert!("-0.50".parse::<Amount>().is_ok());
    }

    #[test]
    fn test_amount_rejects_text_it_cannot_reproduce() {
        // Negative zero loses its sign; 29 fractional digits get rounded.
        for bad in ["-0", "-0.00", "0.00000000000000000000000000001"] {
            assert!(
                matches!(bad.parse::<Amount>(), Err(ValueError::InvalidDecimal(_))),
                "accepted {bad:?}"
            );
        }
        let finest: Amount = "0.0000000000000000000000000001".parse().unwrap();
        assert_eq!(finest.format_text().unwrap(), "0.0000000000000000000000000001");
    }

    #[test]
    fn test_amount_refuses_json_float() {
        let result = Option::<Amount>::from_wire(WireValue::Float(49.99));
        assert!(matches!(result, Err(ValueError::InexactDecimal(_))));

        let whole = Option::<Amount>::from_wire(WireValue::Integer(49)).unwrap();
        assert_eq!(whole.unwrap().format_text().unwrap(), "49");
    }

    #[test]
    fn test_consent_tri_state() {
        assert_eq!(Consent::from_wire(WireValue::Absent).unwrap(), Consent::Unset);
        assert_eq!(Consent::from_wire(text("")).unwrap(), Consent::Unset);
        assert_eq!(Consent::from_wire(text("  ")).unwrap(), Consent::Unset);
        assert_eq!(Consent::from_wire(text("0")).unwrap(), Consent::Refused);
        assert_eq!(Consent::from_wire(text("1")).unwrap(), Consent::Granted);

        assert_eq!(Consent::Unset.to_text().unwrap(), "");
        assert_eq!(Consent::Refused.to_text().unwrap(), "0");
        assert_eq!(Consent::Granted.to_text().unwrap(), "1");
    }

    #[test]
    fn test_consent_policy() {
        assert!(matches!(
            Consent::from_wire(text("yes")),
            Err(ValueError::InvalidConsent(_))
        ));
        assert_eq!(
            Consent::parse("yes", ConsentPolicy::Lenient).unwrap(),
            Consent::Unset
        );
        assert_eq!(
            Consent::parse("1", ConsentPolicy::Lenient).unwrap(),
            Consent::Granted
        );
    }

    #[test]
    fn test_php_bool() {
        for input in ["1", "true"] {
            let value = Option::<bool>::from_wire(text(input)).unwrap();
            assert_eq!(value.to_text().unwrap(), "1");
        }
        for input in ["0", "false"] {
            let value = Option::<bool>::from_wire(text(input)).unwrap();
            assert_eq!(value.to_text().unwrap(), "0");
        }
        let json = Option::<bool>::from_wire(WireValue::Bool(true)).unwrap();
        assert_eq!(json, Some(true));
        assert!(Option::<bool>::from_wire(text("yes")).is_err());
    }

    #[test]
    fn test_text_bool() {
        for (input, expected) in [("true", "true"), ("1", "true"), ("false", "false"), ("0", "false")] {
            let value = Option::<TextBool>::from_wire(text(input)).unwrap();
            assert_eq!(value.to_text().unwrap(), expected, "{input}");
        }
        let json = Option::<TextBool>::from_wire(WireValue::Bool(true)).unwrap();
        assert_eq!(json, Some(TextBool(true)));
        assert_eq!(json.to_text().unwrap(), "true");
        assert_eq!(Option::<TextBool>::from_wire(text("")).unwrap(), None);
        assert!(Option::<TextBool>::from_wire(text("yes")).is_err());
    }

    #[test]
    fn test_integer_rendering() {
        let value = Option::<i64>::from_wire(text("007")).unwrap();
        assert_eq!(value.to_text().unwrap(), "7");
        let negative = Option::<i64>::from_wire(WireValue::Integer(-42)).unwrap();
        assert_eq!(negative.to_text().unwrap(), "-42");
        assert!(Option::<i64>::from_wire(text("4.5")).is_err());
    }

    #[test]
    fn test_dates() {
        let date = Option::<NaiveDate>::from_wire(text("2019-04-15")).unwrap();
        assert_eq!(date.to_text().unwrap(), "2019-04-15");

        let datetime = Option::<NaiveDateTime>::from_wire(text("2019-04-15 07:37:53")).unwrap();
        assert_eq!(datetime.to_text().unwrap(), "2019-04-15 07:37:53");

        let absent = Option::<NaiveDate>::from_wire(text("")).unwrap();
        assert_eq!(absent, None);
        assert_eq!(absent.to_text().unwrap(), "");

        assert!(Option::<NaiveDate>::from_wire(text("15/04/2019")).is_err());
        assert!(Option::<NaiveDateTime>::from_wire(text("2019-04-15")).is_err());
    }

    #[test]
    fn test_strings_are_verbatim() {
        let value = String::from_wire(text("  Jan Kowalski ")).unwrap();
        assert_eq!(value.to_text().unwrap(), "  Jan Kowalski ");
        assert_eq!(String::from_wire(WireValue::Absent).unwrap(), "");
    }

    #[test]
    fn test_ip_address() {
        let ip = Option::<IpAddr>::from_wire(text("127.0.0.1")).unwrap();
        assert_eq!(ip.to_text().unwrap(), "127.0.0.1");
        assert!(Option::<IpAddr>::from_wire(text("localhost")).is_err());
    }
}
