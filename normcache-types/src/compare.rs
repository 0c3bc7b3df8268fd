//! Loose comparators for wire values.
//!
//! Row ids arrive from the API as either JSON strings or numbers, and the two
//! spellings of the same id must compare equal. Query-variable objects are
//! compared structurally so consumers can detect whether a resubscribe is
//! actually needed.

use serde_json::Value;
use std::collections::BTreeSet;

/// Compares two row identifiers loosely.
///
/// Only JSON strings and numbers are valid identifiers; any other type makes
/// the comparison `false` rather than an error. Comparison is by string
/// coercion, so `1` and `"1"` are equal.
pub fn compare_ids(a: &Value, b: &Value) -> bool {
    match (id_string(a), id_string(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// The canonical string form of a row identifier, or `None` when the value
/// is not a valid identifier type.
pub fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// The `id` carried by a row, with null standing in for an absent field.
pub fn row_id(row: &Value) -> &Value {
    row.get("id").unwrap_or(&Value::Null)
}

/// Presence test for wire values: null, `false`, zero, and the empty string
/// count as absent.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Deep structural equality over two query-variable values.
///
/// Null on both sides is equal; null on exactly one side is not. An empty
/// object on either side short-circuits: differently-shaped "no filters"
/// objects count as equivalent. Objects compare over the union of their
/// keys, recursing into object- and array-valued fields; a key missing on
/// one side compares as null.
pub fn compare_values(a: &Value, b: &Value) -> bool {
    if a.is_null() && b.is_null() {
        return true;
    }
    if a.is_null() || b.is_null() {
        return false;
    }
    let a_empty = a.as_object().is_some_and(|m| m.is_empty());
    let b_empty = b.as_object().is_some_and(|m| m.is_empty());
    if a_empty || b_empty {
        return a_empty == b_empty;
    }
    match (a, b) {
        (Value::Object(a), Value::Object(b)) => {
            let keys: BTreeSet<&String> = a.keys().chain(b.keys()).collect();
            keys.into_iter().all(|key| {
                let value = a.get(key).unwrap_or(&Value::Null);
                let new_value = b.get(key).unwrap_or(&Value::Null);
                if value.is_object() || value.is_array() {
                    compare_values(value, new_value)
                } else {
                    value == new_value
                }
            })
        }
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| compare_values(x, y))
        }
        _ => a == b,
    }
}
