//! Linear scanner
//!
//! Field-equality queries over index values. Every call visits values one
//! by one until the first match, so cost grows with the number of live keys.
//! Not suitable for large collections.

use serde_json::Value;

use crate::log::is_falsy;

/// Return the first value whose `field` is truthy and strictly equal to `target`
pub fn find_first<'a, I>(values: I, field: &str, target: &Value) -> Option<&'a Value>
where
    I: IntoIterator<Item = &'a Value>,
{
    values
        .into_iter()
        .find(|value| field_matches(value, field, target))
}

/// True if `value` has a `field` that is present, truthy and equal to `target`
///
/// Objects are looked up by member name. Arrays are looked up by index when
/// `field` is a canonical decimal index (`"0"`, `"12"`, not `"01"`).
/// A falsy field never matches, even when `target` is the same falsy value.
pub fn field_matches(value: &Value, field: &str, target: &Value) -> bool {
    match lookup(value, field) {
        Some(found) => !is_falsy(found) && strict_eq(found, target),
        None => false,
    }
}

fn lookup<'a>(value: &'a Value, field: &str) -> Option<&'a Value> {
    match value {
        Value::Object(object) => object.get(field),
        Value::Array(items) => field
            .parse::<usize>()
            .ok()
            .filter(|i| i.to_string() == field)
            .and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Equality where numbers compare by numeric value (`1 == 1.0`)
pub fn strict_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        _ => a == b,
    }
}
