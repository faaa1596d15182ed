use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// Width the receiving system expects for municipal registration numbers.
pub const REGISTRATION_WIDTH: usize = 7;

/// A monetary or percentage amount as supplied by the caller.
///
/// The text is kept verbatim so that fields emitted without reformatting
/// (e.g. `ValorLiquidoNfse`) reach the document untouched. Parsing happens
/// at render time, where a non-numeric value becomes a formatting error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Amount(String);

impl Amount {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Parse the amount as a decimal.
    pub fn to_decimal(&self) -> Option<Decimal> {
        parse_decimal(&self.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Decimal> for Amount {
    fn from(d: Decimal) -> Self {
        Self(d.to_string())
    }
}

impl From<&str> for Amount {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Amount {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TextVisitor).map(Amount)
    }
}

/// Accepts strings and JSON numbers alike, yielding their text form.
struct TextVisitor;

impl Visitor<'_> for TextVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or a number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
        // Loosely-typed payloads carry flags as booleans; 1 = yes, 2 = no.
        Ok(if v { "1" } else { "2" }.to_string())
    }

    fn visit_unit<E: de::Error>(self) -> Result<String, E> {
        Ok(String::new())
    }
}

/// Serde helpers for code fields that may arrive as numbers.
pub(crate) mod text {
    use super::TextVisitor;
    use serde::Deserializer;

    pub fn required<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        deserializer.deserialize_any(TextVisitor)
    }

    pub fn optional<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        let s = deserializer.deserialize_any(TextVisitor)?;
        Ok(if s.is_empty() { None } else { Some(s) })
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    let t = text.trim();
    // rust_decimal skips `_` separators; plain numbers only.
    let numeric = t
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'));
    if t.is_empty() || !numeric {
        return None;
    }
    Decimal::from_str(t)
        .or_else(|_| Decimal::from_scientific(t))
        .ok()
}

fn fixed_places(text: &str, places: u32) -> Option<String> {
    let mut d = parse_decimal(text)?
        .round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    d.rescale(places);
    // Too many integer digits to carry the decimals.
    if d.scale() != places {
        return None;
    }
    if d.is_zero() {
        d.set_sign_positive(true);
    }
    Some(d.to_string())
}

/// Format an amount with exactly 2 decimals, rounding half away from zero.
///
/// Returns `None` when `text` is not a decimal number.
pub fn format_amount(text: &str) -> Option<String> {
    fixed_places(text, 2)
}

/// Format a tax rate with exactly 4 decimals, rounding half away from zero.
pub fn format_rate(text: &str) -> Option<String> {
    fixed_places(text, 4)
}

/// Left-pad a municipal registration number with zeros to 7 characters.
/// Longer input passes through unchanged.
pub fn pad_registration(text: &str) -> String {
    format!("{text:0>width$}", width = REGISTRATION_WIDTH)
}
