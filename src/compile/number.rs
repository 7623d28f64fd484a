//! Number compiler.
//!
//! Compiles `maximum`, `minimum`, `exclusiveMaximum`, `exclusiveMinimum` and
//! `multipleOf` for `type: "number"` and `type: "integer"` nodes. Both
//! exclusivity conventions are honored: `exclusiveMaximum`/`exclusiveMinimum`
//! may be a boolean modifier of `maximum`/`minimum` (older convention) or a
//! standalone numeric bound (newer convention).
//!
//! All bound keywords fold into one combined check that evaluates conditions
//! in a fixed order, so the first failing condition determines the reported
//! violation. Bound values are read from the live node at call time.

use serde_json::Value;

use crate::errors::{CompileResult, SchemaError, ValidationError};
use crate::guards;
use crate::node::SchemaNode;
use crate::runtime::{Check, CheckList};

const BOUND_KEYWORDS: &[&str] = &[
    "maximum",
    "minimum",
    "exclusiveMaximum",
    "exclusiveMinimum",
    "multipleOf",
];

/// Relative tolerance for the multipleOf quotient test. Remainder-based
/// divisibility on floats misclassifies exactly-representable multiples, so
/// the check compares `value / multipleOf` to its nearest integer instead.
const MULTIPLE_EPSILON: f64 = 1e-9;

/// Compile the numeric-keyword checks for a node.
pub fn compile(node: &SchemaNode) -> CompileResult<CheckList> {
    let declared_type = node.declared_type();
    let declared = matches!(declared_type, Some("number") | Some("integer"));
    let integer_only = declared_type == Some("integer");
    let has_bounds = BOUND_KEYWORDS.iter().any(|kw| node.keyword(kw).is_some());

    if !has_bounds {
        if declared {
            return Ok(vec![Check::new("type", move |value, _| {
                type_gate(value, integer_only, true).map(|_| ())
            })]);
        }
        return Ok(CheckList::new());
    }

    validate_bound_keywords(node, integer_only)?;

    let check = Check::new("number", move |value, schema| {
        let Some(v) = type_gate(value, integer_only, declared)? else {
            return Ok(());
        };

        if let Some(max) = numeric_keyword(schema, "maximum") {
            let exclusive = boolean_keyword(schema, "exclusiveMaximum");
            if exclusive && v >= max {
                return Err(ValidationError::out_of_bounds("maximum", v, "<", max));
            }
            if v > max {
                return Err(ValidationError::out_of_bounds("maximum", v, "<=", max));
            }
        }
        if let Some(max) = numeric_keyword(schema, "exclusiveMaximum") {
            if v >= max {
                return Err(ValidationError::out_of_bounds("exclusiveMaximum", v, "<", max));
            }
        }
        if let Some(min) = numeric_keyword(schema, "minimum") {
            let exclusive = boolean_keyword(schema, "exclusiveMinimum");
            if exclusive && v <= min {
                return Err(ValidationError::out_of_bounds("minimum", v, ">", min));
            }
            if v < min {
                return Err(ValidationError::out_of_bounds("minimum", v, ">=", min));
            }
        }
        if let Some(min) = numeric_keyword(schema, "exclusiveMinimum") {
            if v <= min {
                return Err(ValidationError::out_of_bounds("exclusiveMinimum", v, ">", min));
            }
        }
        if let Some(multiple) = numeric_keyword(schema, "multipleOf") {
            let quotient = v / multiple;
            if (quotient - quotient.round()).abs() > MULTIPLE_EPSILON {
                return Err(ValidationError::not_multiple(v, multiple));
            }
        }
        Ok(())
    });

    Ok(vec![check])
}

/// Applies the type-appropriate numeric test. Returns the value as f64 when
/// it is in scope for numeric keywords, `None` to skip, or a type error when
/// the node declares a numeric type the value fails to meet.
fn type_gate(value: &Value, integer_only: bool, declared: bool) -> Result<Option<f64>, ValidationError> {
    let fits = if integer_only {
        guards::is_integer(value)
    } else {
        guards::is_number(value)
    };
    if !fits {
        if declared {
            let expected = if integer_only { "integer" } else { "number" };
            return Err(ValidationError::type_mismatch(expected, guards::json_type_name(value)));
        }
        return Ok(None);
    }
    Ok(value.as_f64())
}

/// A keyword's current value as a number, read from the live node.
fn numeric_keyword(node: &SchemaNode, keyword: &str) -> Option<f64> {
    node.keyword(keyword).and_then(Value::as_f64)
}

/// A keyword's current value as a boolean modifier, read from the live node.
fn boolean_keyword(node: &SchemaNode, keyword: &str) -> bool {
    node.keyword(keyword).and_then(Value::as_bool).unwrap_or(false)
}

/// Compile-time keyword validation: bounds must be of the matching numeric
/// kind, exclusivity flags must be booleans or numbers, multipleOf must be a
/// positive number.
fn validate_bound_keywords(node: &SchemaNode, integer_only: bool) -> CompileResult<()> {
    for keyword in ["maximum", "minimum"] {
        if let Some(bound) = node.keyword(keyword) {
            let fits = if integer_only {
                guards::is_integer(bound)
            } else {
                guards::is_number(bound)
            };
            if !fits {
                let expected = if integer_only { "integer" } else { "number" };
                return Err(SchemaError::wrong_type(keyword, expected, guards::json_type_name(bound)));
            }
        }
    }
    for keyword in ["exclusiveMaximum", "exclusiveMinimum"] {
        if let Some(flag) = node.keyword(keyword) {
            if !flag.is_boolean() && !flag.is_number() {
                return Err(SchemaError::wrong_type(
                    keyword,
                    "boolean or number",
                    guards::json_type_name(flag),
                ));
            }
        }
    }
    if let Some(multiple) = node.keyword("multipleOf") {
        match multiple.as_f64() {
            Some(m) if m > 0.0 => {}
            _ => {
                return Err(SchemaError::wrong_shape(
                    "multipleOf",
                    format!("expected a positive number, got {}", multiple),
                ));
            }
        }
    }
    Ok(())
}
