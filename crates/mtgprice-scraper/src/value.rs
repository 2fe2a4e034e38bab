//! Defensive readers for loosely-typed store JSON.
//!
//! Stores disagree on whether prices are numbers or strings and whether ids
//! are numeric. These helpers never fail; unusable input reads as `None`/0.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;

/// Reads a non-negative price from a JSON number or numeric string.
///
/// Accepts `2.5`, `"2.50"`, `" $1,299.99 "`. Negative, empty, and
/// unparsable values read as `None`.
pub(crate) fn parse_price(value: &Value) -> Option<Decimal> {
    let parsed = match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => {
            let cleaned: String = s
                .trim()
                .trim_start_matches('$')
                .chars()
                .filter(|c| *c != ',')
                .collect();
            parse_decimal(cleaned.trim())
        }
        _ => None,
    }?;

    (!parsed.is_sign_negative()).then_some(parsed)
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    if raw.is_empty() {
        return None;
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Reads a stock quantity. Missing or unparsable quantities read as 0.
pub(crate) fn parse_quantity(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| {
                n.as_f64()
                    .and_then(|f| Decimal::try_from(f).ok())
                    .and_then(|q| q.trunc().to_i64())
            })
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<i64>().unwrap_or(0),
        Some(Value::Bool(true)) => 1,
        _ => 0,
    }
}

/// Reads an identifier that may be a JSON string or number.
pub(crate) fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Returns the array at `path` (e.g. `["products", "items"]`), or an empty
/// slice when any segment is missing or not the expected type.
pub(crate) fn array_at<'a>(value: &'a Value, path: &[&str]) -> &'a [Value] {
    path.iter()
        .try_fold(value, |current, key| current.get(*key))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}
