//! Primitive type-guard predicates.
//!
//! Pure, stateless tests over `serde_json::Value` consumed by the type
//! compilers. Integer means an exact integer representation, never a float
//! that happens to be whole-valued after coercion.

use serde_json::Value;

/// Returns true if the value is a JSON object.
pub fn is_object(value: &Value) -> bool {
    value.is_object()
}

/// Returns true if the value is a JSON array.
pub fn is_array(value: &Value) -> bool {
    value.is_array()
}

/// Returns true if the value is a JSON string.
pub fn is_string(value: &Value) -> bool {
    value.is_string()
}

/// Returns true if the value is a JSON boolean.
pub fn is_boolean(value: &Value) -> bool {
    value.is_boolean()
}

/// Returns true if the value is JSON null.
pub fn is_null(value: &Value) -> bool {
    value.is_null()
}

/// Returns true if the value is any JSON number.
pub fn is_number(value: &Value) -> bool {
    value.is_number()
}

/// Returns true if the value is an exact integer (no float coercion).
pub fn is_integer(value: &Value) -> bool {
    value.is_i64() || value.is_u64()
}

/// Returns true if the value equals one of the given options.
pub fn is_enum(value: &Value, options: &[Value]) -> bool {
    options.iter().any(|option| option == value)
}

/// Returns true if the value is schema-shaped: a keyword mapping or a
/// boolean (`true` accepts everything, `false` rejects everything).
pub fn is_schema(value: &Value) -> bool {
    value.is_object() || value.is_boolean()
}

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "number"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
