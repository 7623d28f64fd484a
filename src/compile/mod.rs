//! Type compilers: one per schema value type.
//!
//! Each compiler exposes `compile(node) -> CompileResult<CheckList>`, reads
//! only the keywords relevant to its type, and returns zero or more checks.
//! A compiler whose keywords are all absent (and whose type is not declared)
//! contributes nothing, so a node pays only for the constraints it states.
//!
//! Compilation happens once per node; the orchestrator caches the combined
//! list on the node and replays it for every later value.

pub mod array;
pub mod boolean;
pub mod number;
pub mod object;
pub mod string;

use serde_json::Value;

use crate::errors::{CompileResult, SchemaError};
use crate::guards;
use crate::node::SchemaNode;
use crate::runtime::CheckList;

/// Type names the `type` keyword may declare.
const KNOWN_TYPES: &[&str] = &[
    "object", "array", "string", "number", "integer", "boolean", "null",
];

/// Compile a schema node into its ordered check list.
///
/// Boolean schemas compile to an empty list: `true` constrains nothing and
/// `false` is rejected by the executor before any keyword logic runs.
///
/// # Errors
///
/// Returns a schema-definition error on any structurally invalid keyword
/// value; no partial list is produced.
pub fn compile(node: &SchemaNode) -> CompileResult<CheckList> {
    match node.raw() {
        Value::Bool(_) => Ok(CheckList::new()),
        Value::Object(_) => {
            validate_type_keyword(node)?;
            let mut checks = CheckList::new();
            checks.extend(object::compile(node)?);
            checks.extend(array::compile(node)?);
            checks.extend(string::compile(node)?);
            checks.extend(number::compile(node)?);
            checks.extend(boolean::compile(node)?);
            Ok(checks)
        }
        other => Err(SchemaError::wrong_shape(
            "schema",
            format!("a schema must be an object or a boolean, got {}", guards::json_type_name(other)),
        )),
    }
}

/// The `type` keyword, when present, must name a known type.
fn validate_type_keyword(node: &SchemaNode) -> CompileResult<()> {
    let Some(declared) = node.keyword("type") else {
        return Ok(());
    };
    let Some(name) = declared.as_str() else {
        return Err(SchemaError::wrong_type("type", "string", guards::json_type_name(declared)));
    };
    if !KNOWN_TYPES.contains(&name) {
        return Err(SchemaError::wrong_shape(
            "type",
            format!("unknown type '{}'", name),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(raw: Value) -> SchemaNode {
        SchemaNode::new(raw).unwrap()
    }

    #[test]
    fn test_empty_schema_compiles_to_no_checks() {
        assert!(compile(&node(json!({}))).unwrap().is_empty());
    }

    #[test]
    fn test_boolean_schemas_compile_to_no_checks() {
        assert!(compile(&node(json!(true))).unwrap().is_empty());
        assert!(compile(&node(json!(false))).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_type_name_rejected() {
        let err = compile(&node(json!({"type": "tuple"}))).unwrap_err();
        assert_eq!(err.keyword(), "type");
    }

    #[test]
    fn test_non_string_type_rejected() {
        let err = compile(&node(json!({"type": 3}))).unwrap_err();
        assert_eq!(err.keyword(), "type");
    }

    #[test]
    fn test_compilers_compose_in_fixed_order() {
        // Object keywords compile ahead of numeric keywords.
        let checks = compile(&node(json!({
            "minProperties": 1,
            "minimum": 0
        })))
        .unwrap();
        let keywords: Vec<&str> = checks.iter().map(|c| c.keyword()).collect();
        assert_eq!(keywords, vec!["object", "number"]);
    }

    #[test]
    fn test_compile_twice_is_result_equivalent() {
        let schema = node(json!({"type": "object", "required": ["a"]}));
        let first = compile(&schema).unwrap();
        let second = compile(&schema).unwrap();
        let value = json!({"b": 1});
        let via_first = crate::runtime::run_compiled(&value, &schema, &first);
        let via_second = crate::runtime::run_compiled(&value, &schema, &second);
        assert_eq!(via_first.is_err(), via_second.is_err());
        assert_eq!(
            via_first.unwrap_err().keyword(),
            via_second.unwrap_err().keyword()
        );
    }
}
