//! Array compiler.
//!
//! Compiles `maxItems`, `minItems` (through the shared size-threshold
//! factory), `items` (single-schema form, applied to every element in index
//! order) and `uniqueItems` (structural equality). Non-array values fail
//! only when the node declares `type: "array"`.

use serde_json::Value;

use crate::errors::{CompileResult, SchemaError, ValidationError};
use crate::guards;
use crate::node::{CompiledSchema, SchemaNode};
use crate::runtime::{size_threshold, Check, CheckList, CountCheckFn, Threshold};

const ARRAY_KEYWORDS: &[&str] = &["maxItems", "minItems", "items", "uniqueItems"];

/// Compile the array-keyword checks for a node.
pub fn compile(node: &SchemaNode) -> CompileResult<CheckList> {
    let declared = node.declared_type() == Some("array");
    let has_keywords = ARRAY_KEYWORDS.iter().any(|kw| node.keyword(kw).is_some());

    if !has_keywords {
        if declared {
            return Ok(vec![Check::new("type", |value, _| {
                if guards::is_array(value) {
                    Ok(())
                } else {
                    Err(ValidationError::type_mismatch("array", guards::json_type_name(value)))
                }
            })]);
        }
        return Ok(CheckList::new());
    }

    let max_items = threshold_check(node, "maxItems", Threshold::Max)?;
    let min_items = threshold_check(node, "minItems", Threshold::Min)?;
    let items = compile_items(node)?;
    let unique = compile_unique(node)?;

    let check = Check::new("array", move |value, schema| {
        let Some(elements) = value.as_array() else {
            if declared {
                return Err(ValidationError::type_mismatch("array", guards::json_type_name(value)));
            }
            return Ok(());
        };

        if let Some(max) = &max_items {
            max(elements.len(), schema)?;
        }
        if let Some(min) = &min_items {
            min(elements.len(), schema)?;
        }
        if let Some(item_schema) = &items {
            for element in elements {
                item_schema.validate(element)?;
            }
        }
        if unique {
            for (i, a) in elements.iter().enumerate() {
                for (j, b) in elements.iter().enumerate().skip(i + 1) {
                    if a == b {
                        return Err(ValidationError::not_unique(i, j));
                    }
                }
            }
        }
        Ok(())
    });

    Ok(vec![check])
}

fn threshold_check(
    node: &SchemaNode,
    keyword: &'static str,
    mode: Threshold,
) -> CompileResult<Option<CountCheckFn>> {
    match node.keyword(keyword) {
        None => Ok(None),
        Some(size) => size_threshold(size, keyword, mode).map(Some),
    }
}

fn compile_items(node: &SchemaNode) -> CompileResult<Option<CompiledSchema>> {
    match node.keyword("items") {
        None => Ok(None),
        Some(sub) => Ok(Some(CompiledSchema::new("items", sub)?)),
    }
}

fn compile_unique(node: &SchemaNode) -> CompileResult<bool> {
    match node.keyword("uniqueItems") {
        None => Ok(false),
        Some(value) => value
            .as_bool()
            .ok_or_else(|| SchemaError::wrong_type("uniqueItems", "boolean", guards::json_type_name(value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ViolationKind;
    use crate::runtime::run_compiled;
    use serde_json::json;

    fn validate(schema: Value, value: Value) -> crate::errors::ValidateResult {
        let node = SchemaNode::new(schema).unwrap();
        let checks = node.checks().unwrap();
        run_compiled(&value, &node, &checks)
    }

    #[test]
    fn test_non_array_skipped_without_declared_type() {
        assert!(validate(json!({"maxItems": 1}), json!("not an array")).is_ok());
    }

    #[test]
    fn test_type_gate() {
        assert!(validate(json!({"type": "array"}), json!([])).is_ok());
        let err = validate(json!({"type": "array", "minItems": 1}), json!({})).unwrap_err();
        assert_eq!(err.kind(), ViolationKind::TypeMismatch);
    }

    #[test]
    fn test_item_count_thresholds() {
        let schema = json!({"minItems": 1, "maxItems": 3});
        assert_eq!(validate(schema.clone(), json!([])).unwrap_err().keyword(), "minItems");
        assert!(validate(schema.clone(), json!([1])).is_ok());
        assert!(validate(schema.clone(), json!([1, 2, 3])).is_ok());
        assert_eq!(
            validate(schema, json!([1, 2, 3, 4])).unwrap_err().keyword(),
            "maxItems"
        );
    }

    #[test]
    fn test_items_schema_applies_to_every_element() {
        let schema = json!({"items": {"type": "integer", "minimum": 0}});
        assert!(validate(schema.clone(), json!([0, 1, 2])).is_ok());
        let err = validate(schema.clone(), json!([0, -1])).unwrap_err();
        assert_eq!(err.keyword(), "minimum");
        let err = validate(schema, json!([0, "x"])).unwrap_err();
        assert_eq!(err.kind(), ViolationKind::TypeMismatch);
    }

    #[test]
    fn test_unique_items() {
        let schema = json!({"uniqueItems": true});
        assert!(validate(schema.clone(), json!([1, 2, 3])).is_ok());
        assert!(validate(schema.clone(), json!([{"a": 1}, {"a": 2}])).is_ok());
        let err = validate(schema.clone(), json!([1, 2, 1])).unwrap_err();
        assert_eq!(err.kind(), ViolationKind::NotUnique);
        let err = validate(schema, json!([{"a": 1}, {"a": 1}])).unwrap_err();
        assert_eq!(err.keyword(), "uniqueItems");
    }

    #[test]
    fn test_unique_items_false_is_inert() {
        assert!(validate(json!({"uniqueItems": false}), json!([1, 1])).is_ok());
    }

    #[test]
    fn test_compile_rejects_bad_items_and_unique() {
        let node = SchemaNode::new(json!({"items": 3})).unwrap();
        assert_eq!(node.checks().unwrap_err().keyword(), "items");
        let node = SchemaNode::new(json!({"uniqueItems": "yes"})).unwrap();
        assert_eq!(node.checks().unwrap_err().keyword(), "uniqueItems");
    }
}
