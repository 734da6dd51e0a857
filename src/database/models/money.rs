//! Serde helpers for monetary amounts.
//!
//! Amounts are stored as `BigDecimal` in `NUMERIC(12,2)` columns. On the wire
//! they are plain JSON numbers; clients may also send numeric strings.

use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, ToPrimitive};
use serde::{Deserializer, Serializer, de};

pub const SCALE: i64 = 2;

/// Digits left of the decimal point in a `NUMERIC(12,2)` column.
const INTEGER_DIGITS: i64 = 10;

/// Finer input than this is refused rather than rounded.
const MAX_INPUT_SCALE: i64 = 20;

pub fn normalize(value: BigDecimal) -> BigDecimal {
    value.round(SCALE)
}

/// Largest amount a column can hold: 9999999999.99.
pub fn max_amount() -> BigDecimal {
    BigDecimal::new(999_999_999_999_i64.into(), SCALE)
}

pub fn within_limit(value: &BigDecimal) -> bool {
    value.abs() <= max_amount()
}

/// Parses and rounds an amount, refusing anything a column cannot store.
///
/// The exponent is checked before rounding, which would otherwise expand
/// `1e40000000` into a forty million digit integer.
pub fn parse_amount(raw: &str) -> Result<BigDecimal, String> {
    let value = BigDecimal::from_str(raw).map_err(|_| format!("invalid amount: {}", raw))?;

    let (_, exponent) = value.as_bigint_and_exponent();
    if !(-INTEGER_DIGITS..=MAX_INPUT_SCALE).contains(&exponent) {
        return Err(format!("amount out of range: {}", raw));
    }

    let value = normalize(value);
    if !within_limit(&value) {
        return Err(format!("amount out of range: {}", raw));
    }
    Ok(value)
}

/// JSON representation of an amount.
pub fn to_number(value: &BigDecimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

pub fn serialize<S>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(to_number(value))
}

pub fn serialize_option<S>(value: &Option<BigDecimal>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(v) => serialize(v, serializer),
        None => serializer.serialize_none(),
    }
}

/// Accepts a number, a numeric string, or null. Empty strings count as absent.
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<BigDecimal>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(AmountVisitor)
}

struct AmountVisitor;

impl<'de> de::Visitor<'de> for AmountVisitor {
    type Value = Option<BigDecimal>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number or a numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        let value = BigDecimal::from(v);
        if !within_limit(&value) {
            return Err(E::custom(format!("amount out of range: {}", v)));
        }
        Ok(Some(normalize(value)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        let value = BigDecimal::from(v);
        if !within_limit(&value) {
            return Err(E::custom(format!("amount out of range: {}", v)));
        }
        Ok(Some(normalize(value)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if !v.is_finite() {
            return Err(E::custom("amount must be finite"));
        }
        // Display gives the shortest round-tripping form, so 10.1 stays 10.1
        parse_amount(&v.to_string()).map(Some).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        parse_amount(trimmed).map(Some).map_err(E::custom)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }
}
