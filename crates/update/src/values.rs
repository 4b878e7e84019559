//! JSON value ordering and numeric arithmetic for update operators
//!
//! `$min`/`$max` compare across types using the canonical ordering
//! Null < Number < String < Object < Array < Boolean; within a type,
//! numbers compare numerically, strings lexicographically, arrays
//! element-wise then by length, and objects entry-wise (key then value)
//! then by length.

use serde_json::{Map, Number, Value};
use std::cmp::Ordering;

/// Total order over JSON values
pub(crate) fn compare(a: &Value, b: &Value) -> Ordering {
    let rank = type_rank(a).cmp(&type_rank(b));
    if rank != Ordering::Equal {
        return rank;
    }
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Object(x), Value::Object(y)) => compare_objects(x, y),
        (Value::Array(x), Value::Array(y)) => compare_arrays(x, y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        // Ranks matched, so the kinds match too.
        _ => Ordering::Equal,
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Object(_) => 3,
        Value::Array(_) => 4,
        Value::Bool(_) => 5,
    }
}

fn compare_numbers(x: &Number, y: &Number) -> Ordering {
    if let (Some(a), Some(b)) = (x.as_i64(), y.as_i64()) {
        return a.cmp(&b);
    }
    if let (Some(a), Some(b)) = (x.as_u64(), y.as_u64()) {
        return a.cmp(&b);
    }
    let a = x.as_f64().unwrap_or_default();
    let b = y.as_f64().unwrap_or_default();
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

fn compare_arrays(x: &[Value], y: &[Value]) -> Ordering {
    for (a, b) in x.iter().zip(y.iter()) {
        let ord = compare(a, b);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    x.len().cmp(&y.len())
}

fn compare_objects(x: &Map<String, Value>, y: &Map<String, Value>) -> Ordering {
    for ((ka, va), (kb, vb)) in x.iter().zip(y.iter()) {
        let key_ord = ka.cmp(kb);
        if key_ord != Ordering::Equal {
            return key_ord;
        }
        let value_ord = compare(va, vb);
        if value_ord != Ordering::Equal {
            return value_ord;
        }
    }
    x.len().cmp(&y.len())
}

/// Sum of two numbers: integer arithmetic while it fits, float otherwise
///
/// `None` only when the float result is not a representable JSON number.
pub(crate) fn add_numbers(a: &Number, b: &Number) -> Option<Number> {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        if let Some(sum) = x.checked_add(y) {
            return Some(Number::from(sum));
        }
    }
    Number::from_f64(a.as_f64()? + b.as_f64()?)
}

/// Product of two numbers, with the same promotion rules as [`add_numbers`]
pub(crate) fn mul_numbers(a: &Number, b: &Number) -> Option<Number> {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        if let Some(product) = x.checked_mul(y) {
            return Some(Number::from(product));
        }
    }
    Number::from_f64(a.as_f64()? * b.as_f64()?)
}
