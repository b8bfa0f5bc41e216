use serde_json::{Map, Value};

/// Deep-merge a sparse `partial` structure onto a complete `base` structure.
///
/// Semantics, key by key:
/// - a key holding an object recurses;
/// - a key holding anything else (primitive or array) replaces the base value
///   wholesale — arrays are never merged element-wise;
/// - an explicit `null` overwrites the base value with `null`.
///
/// A `partial` that is not an object (or is empty) leaves `base` untouched.
/// Non-destructive: both inputs are borrowed immutably and the result is a new value.
pub fn merge(base: &Value, partial: &Value) -> Value {
    let Value::Object(overlay) = partial else {
        return base.clone();
    };
    if overlay.is_empty() {
        return base.clone();
    }

    let mut merged = match base {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    for (key, value) in overlay {
        match value {
            Value::Object(_) => {
                let current = merged.get(key).cloned().unwrap_or(Value::Null);
                merged.insert(key.clone(), merge(&current, value));
            }
            other => {
                merged.insert(key.clone(), other.clone());
            }
        }
    }
    Value::Object(merged)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/merge.rs"]
mod tests;
