//! Schema orchestrator.
//!
//! `Schema` owns a schema tree's root node, decides when compilation
//! happens (lazily on first validation, or eagerly via `compile`), and is
//! the caller of `run_compiled` at validation time. Compilation is a
//! one-time cost per node; every later validation replays the cached checks.

use serde_json::Value;

use crate::errors::{CompileResult, Error};
use crate::node::SchemaNode;
use crate::runtime::run_compiled;

/// A validatable schema: the root node plus its compiled-check cache.
#[derive(Debug)]
pub struct Schema {
    root: SchemaNode,
}

impl Schema {
    /// Wrap a schema definition.
    ///
    /// Only the overall shape is checked here; keyword values are validated
    /// when the node is compiled.
    ///
    /// # Errors
    ///
    /// Returns a schema-definition error if the definition is not an object
    /// or a boolean.
    pub fn new(definition: Value) -> CompileResult<Self> {
        Ok(Self {
            root: SchemaNode::new(definition)?,
        })
    }

    /// Force eager compilation of the root node.
    ///
    /// Validation after a successful `compile` can only fail with a
    /// validation error.
    ///
    /// # Errors
    ///
    /// Returns a schema-definition error on structurally invalid keyword
    /// values; the schema stays uncompiled and unvalidatable.
    pub fn compile(&self) -> CompileResult<()> {
        self.root.checks().map(|_| ())
    }

    /// Validate a value, compiling on first use.
    ///
    /// # Errors
    ///
    /// Returns `Error::Schema` if lazy compilation fails, or
    /// `Error::Validation` on the first violated check. A validation error
    /// leaves the schema and its cache intact for the next value.
    pub fn validate(&self, value: &Value) -> Result<(), Error> {
        let checks = self.root.checks()?;
        run_compiled(value, &self.root, &checks)?;
        Ok(())
    }

    /// Returns true if the value satisfies the schema.
    ///
    /// A schema that fails to compile satisfies nothing.
    pub fn is_valid(&self, value: &Value) -> bool {
        self.validate(value).is_ok()
    }

    /// Returns the root schema node.
    pub fn node(&self) -> &SchemaNode {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ViolationKind;
    use serde_json::json;

    #[test]
    fn test_lazy_compilation_on_first_validation() {
        let schema = Schema::new(json!({"type": "integer"})).unwrap();
        assert!(!schema.node().is_compiled());
        assert!(schema.validate(&json!(3)).is_ok());
        assert!(schema.node().is_compiled());
    }

    #[test]
    fn test_eager_compilation() {
        let schema = Schema::new(json!({"type": "string", "minLength": 2})).unwrap();
        schema.compile().unwrap();
        assert!(schema.node().is_compiled());
        assert!(schema.is_valid(&json!("ok")));
        assert!(!schema.is_valid(&json!("x")));
    }

    #[test]
    fn test_compile_error_surfaces_through_validate() {
        let schema = Schema::new(json!({"maxLength": -1})).unwrap();
        let err = schema.validate(&json!("x")).unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
        assert!(!schema.is_valid(&json!("x")));
    }

    #[test]
    fn test_validation_error_leaves_schema_reusable() {
        let schema = Schema::new(json!({"type": "number", "minimum": 5})).unwrap();
        let err = schema.validate(&json!(4)).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        // The cache survives a rejection.
        assert!(schema.validate(&json!(6)).is_ok());
        assert!(schema.validate(&json!(4)).is_err());
    }

    #[test]
    fn test_false_schema_rejects_everything() {
        let schema = Schema::new(json!(false)).unwrap();
        for value in [json!(null), json!(0), json!(""), json!([]), json!({})] {
            let err = schema.validate(&value).unwrap_err();
            match err {
                Error::Validation(v) => assert_eq!(v.kind(), ViolationKind::SchemaDeniesAll),
                other => panic!("expected a validation error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_true_schema_accepts_everything() {
        let schema = Schema::new(json!(true)).unwrap();
        for value in [json!(null), json!(0), json!(""), json!([]), json!({})] {
            assert!(schema.is_valid(&value));
        }
    }

    #[test]
    fn test_non_schema_definition_rejected() {
        assert!(Schema::new(json!([1, 2])).is_err());
        assert!(Schema::new(json!("object")).is_err());
    }
}
