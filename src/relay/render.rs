//! Text rendering of caller-supplied JSON values.
//!
//! The frontend is JavaScript, so values are rendered the way a browser
//! would: key order kept, integral floats without a fraction, and
//! non-string prompts coerced like `String(value)`.

use serde_json::{Number, Value};

/// Integral floats up to 2^53 render as integers, as in JavaScript.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

fn integral(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER).then_some(f as i64)
}

fn normalize_numbers(value: &Value) -> Value {
    match value {
        Value::Number(n) if n.is_f64() => match n.as_f64().and_then(integral) {
            // -0 collapses to 0 here as well.
            Some(i) => Value::Number(Number::from(i)),
            None => value.clone(),
        },
        Value::Array(items) => Value::Array(items.iter().map(normalize_numbers).collect()),
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), normalize_numbers(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Compact JSON text, `JSON.stringify` style.
pub fn stringify(value: &Value) -> String {
    normalize_numbers(value).to_string()
}

/// `String(value)` coercion.
pub fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(_) => stringify(value),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => coerce_to_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}
