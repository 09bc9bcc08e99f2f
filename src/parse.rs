//! Precision-safe JSON parsing.
//!
//! `serde_json` runs with `arbitrary_precision`, so every number keeps its
//! literal text. Integers a double cannot hold exactly come back as numeral
//! strings, which is what wide fields carry everywhere else in this crate.
use serde_json::Number;

use crate::error::Result;
use crate::value::Value;

/// Largest integer an IEEE-754 double represents exactly (2^53 - 1).
pub const MAX_SAFE_INTEGER: i64 = (1i64 << 53) - 1;

pub fn parse(text: &str) -> Result<Value> {
    let json: serde_json::Value = serde_json::from_str(text)?;
    Ok(lift(json))
}

/// Integer literal outside ±[`MAX_SAFE_INTEGER`].
pub fn is_unsafe_integer(n: &Number) -> bool {
    let literal = n.to_string();
    if literal.contains(['.', 'e', 'E']) {
        return false;
    }
    match n.as_i64() {
        Some(i) => !(-MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(&i),
        None => true,
    }
}

fn lift(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Number(n) if is_unsafe_integer(&n) => Value::String(n.to_string()),
        serde_json::Value::Array(xs) => Value::Array(xs.into_iter().map(lift).collect()),
        serde_json::Value::Object(m) => Value::Object(m.into_iter().map(|(k, v)| (k, lift(v))).collect()),
        other => Value::from(other),
    }
}
