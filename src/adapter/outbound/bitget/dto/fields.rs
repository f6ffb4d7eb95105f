//! Alias-tolerant field readers for Bitget JSON objects.
//!
//! Bitget renames fields between API versions (`size`/`amt`, `coin`/`ccy`,
//! `withdrawalId`/`wdId`, ...). Every reader takes an ordered list of aliases
//! and uses the first one that is present. `null` and `""` count as absent.
//! Malformed values degrade to `None` instead of failing the record.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};

/// A decoded JSON object as returned inside `data`.
pub type Document = Map<String, Value>;

/// First present value under any of `keys`.
pub fn first<'a>(obj: &'a Document, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find(|value| is_present(value))
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Render a scalar JSON value as a string. Objects and arrays yield `None`.
#[must_use]
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn first_string(obj: &Document, keys: &[&str]) -> Option<String> {
    first(obj, keys).and_then(scalar_string)
}

/// Parse a decimal of either sign from a string or number.
#[must_use]
pub fn parse_signed_decimal(value: &Value) -> Option<Decimal> {
    let raw = scalar_string(value)?;
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Parse a non-negative decimal from a string or number.
#[must_use]
pub fn parse_decimal(value: &Value) -> Option<Decimal> {
    parse_signed_decimal(value).filter(|parsed| *parsed >= Decimal::ZERO)
}

pub fn first_decimal(obj: &Document, keys: &[&str]) -> Option<Decimal> {
    first(obj, keys).and_then(parse_decimal)
}

/// First alias whose value parses as a non-negative decimal.
///
/// Unlike [`first_decimal`], a present but malformed alias does not stop the
/// search.
pub fn first_parsed_decimal(obj: &Document, keys: &[&str]) -> Option<Decimal> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find_map(parse_decimal)
}

/// Magnitude of a decimal Bitget may report with a sign (fees are negative).
pub fn first_abs_decimal(obj: &Document, keys: &[&str]) -> Option<Decimal> {
    first(obj, keys)
        .and_then(parse_signed_decimal)
        .map(|parsed| parsed.abs())
}

/// Integer from a string or number. Floats are truncated.
pub fn first_i64(obj: &Document, keys: &[&str]) -> Option<i64> {
    let value = first(obj, keys)?;
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
        _ => {
            let raw = scalar_string(value)?;
            let raw = raw.trim();
            raw.parse()
                .ok()
                .or_else(|| raw.parse::<f64>().ok().and_then(truncate))
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn truncate(value: f64) -> Option<i64> {
    value.is_finite().then(|| value.trunc() as i64)
}

pub fn first_bool(obj: &Document, keys: &[&str]) -> Option<bool> {
    match first(obj, keys)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.to_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_i64().map(|v| v != 0),
        _ => None,
    }
}

/// Timestamp in whole seconds from a millisecond field. `0` when absent.
pub fn first_seconds(obj: &Document, keys: &[&str]) -> i64 {
    first_i64(obj, keys).map_or(0, |ms| ms / 1000)
}

/// Numeric identifier from a raw id string.
///
/// Falls back to the digits of a non-numeric id (`"wd-123"` → `123`).
#[must_use]
pub fn numeric_id(raw: &str) -> Option<u64> {
    if let Ok(id) = raw.trim().parse() {
        return Some(id);
    }
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

pub fn first_numeric_id(obj: &Document, keys: &[&str]) -> Option<u64> {
    first_string(obj, keys).and_then(|raw| numeric_id(&raw))
}

/// Borrow the `data` payload of a response as a list of objects.
///
/// Non-object entries are skipped.
pub fn data_rows<'a>(value: Option<&'a Value>, nested_keys: &[&str]) -> Vec<&'a Document> {
    let rows = match value {
        Some(Value::Array(rows)) => Some(rows),
        Some(Value::Object(obj)) => nested_keys.iter().find_map(|key| match obj.get(*key) {
            Some(Value::Array(rows)) if !rows.is_empty() => Some(rows),
            _ => None,
        }),
        _ => None,
    };
    rows.map(|rows| rows.iter().filter_map(Value::as_object).collect())
        .unwrap_or_default()
}
