//! Helpers over runtime values.
//!
//! Runtime input and output values are plain `serde_json::Value`s. A field
//! that is absent from its container ("undefined") is modelled as `None`,
//! while an explicit `null` is `Some(Value::Null)`.

use serde_json::Value;

/// A field exists when it is present and not `null`.
pub fn exists(value: Option<&Value>) -> bool {
    !matches!(value, None | Some(Value::Null))
}

/// True only for key-value structures. Arrays and primitives are rejected.
pub fn is_object(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Object(_)))
}

/// True only for sequences.
pub fn is_array(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Array(_)))
}

/// Read a named member of an object. Anything else yields undefined.
pub fn get_field<'v>(container: Option<&'v Value>, name: &str) -> Option<&'v Value> {
    match container {
        Some(Value::Object(map)) => map.get(name),
        _ => None,
    }
}

/// Read the element at `index` of an array. Anything else yields undefined.
pub fn get_index(container: Option<&Value>, index: usize) -> Option<&Value> {
    match container {
        Some(Value::Array(items)) => items.get(index),
        _ => None,
    }
}

/// Human readable name of a value's type, used in rule messages.
pub fn type_name(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}
