//! Lenient numeric decoding for values captured from portal forms.
//!
//! Form fields arrive as JSON numbers, numeric strings, empty strings or
//! nulls. Anything that does not parse as a finite decimal decodes as zero;
//! decoding never fails.

use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parse a raw text value. Blank or malformed text yields `None`.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Interpret an arbitrary JSON value as a decimal, if it holds one.
pub fn to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string())
            .or_else(|| n.as_f64().and_then(Decimal::from_f64)),
        Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

/// Same as [`to_decimal`] with absent/invalid mapped to zero.
pub fn decimal_or_zero(value: &Value) -> Decimal {
    to_decimal(value).unwrap_or(Decimal::ZERO)
}

/// Text form of [`decimal_or_zero`], used for edits typed on the command line.
pub fn parse_or_zero(raw: &str) -> Decimal {
    parse_decimal(raw).unwrap_or(Decimal::ZERO)
}

/// `deserialize_with` target for required money/percent fields.
pub fn lenient<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decimal_or_zero(&value))
}

/// `deserialize_with` target for optional fields: null, blank and malformed
/// values all decode as absent.
pub fn lenient_opt<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(to_decimal(&value))
}
