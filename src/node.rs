//! Schema nodes and their compiled-check cache.
//!
//! A `SchemaNode` pairs the raw keyword mapping with a reserved cache slot
//! for its compiled check list. The slot is a struct field, not an entry in
//! the keyword map, so it can never collide with a keyword name and keyword
//! enumeration never observes it.
//!
//! The cache is write-once: the first call to `checks` compiles the node and
//! populates the slot; every later call returns the same `Arc`. A
//! compilation failure leaves the slot empty, so a malformed node is never
//! treated as validatable.

use std::sync::{Arc, OnceLock};

use serde_json::Value;

use crate::errors::{CompileResult, SchemaError, ValidateResult};
use crate::guards;
use crate::runtime::{run_compiled, CheckList};

/// One schema node: a keyword mapping, or a literal boolean.
///
/// `false` rejects every value unconditionally; `true` accepts every value.
/// Sub-schema-valued keywords hold further schema nodes, compiled and cached
/// recursively during this node's compile phase.
pub struct SchemaNode {
    raw: Value,
    compiled: OnceLock<Arc<CheckList>>,
}

impl SchemaNode {
    /// Wrap a raw schema value.
    ///
    /// # Errors
    ///
    /// Returns a schema-definition error if the value is not schema-shaped
    /// (a keyword mapping or a boolean).
    pub fn new(raw: Value) -> CompileResult<Self> {
        if !guards::is_schema(&raw) {
            return Err(SchemaError::wrong_shape(
                "schema",
                format!("a schema must be an object or a boolean, got {}", guards::json_type_name(&raw)),
            ));
        }
        Ok(Self {
            raw,
            compiled: OnceLock::new(),
        })
    }

    /// Returns the raw schema value as authored.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Returns a keyword's current value, if present.
    ///
    /// Checks call this at run time so they observe the node's live keyword
    /// values, not values frozen at compile time.
    pub fn keyword(&self, name: &str) -> Option<&Value> {
        self.raw.as_object().and_then(|map| map.get(name))
    }

    /// Iterates the node's keywords. The compiled-check cache never appears
    /// here.
    pub fn keywords(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.raw.as_object().into_iter().flatten()
    }

    /// Returns the declared `type` keyword when it is a string.
    pub fn declared_type(&self) -> Option<&str> {
        self.keyword("type").and_then(Value::as_str)
    }

    /// Returns true for the literal `false` schema.
    pub fn denies_all(&self) -> bool {
        self.raw == Value::Bool(false)
    }

    /// Returns true once the compiled check list has been cached.
    pub fn is_compiled(&self) -> bool {
        self.compiled.get().is_some()
    }

    /// Returns the node's compiled check list, compiling on first use.
    ///
    /// Repeated calls return the same cached list (`Arc` identity holds).
    ///
    /// # Errors
    ///
    /// Returns a schema-definition error if any keyword value is
    /// structurally invalid; the cache stays empty in that case.
    pub fn checks(&self) -> CompileResult<Arc<CheckList>> {
        if let Some(cached) = self.compiled.get() {
            return Ok(Arc::clone(cached));
        }
        let list = Arc::new(crate::compile::compile(self)?);
        Ok(Arc::clone(self.compiled.get_or_init(|| list)))
    }
}

impl std::fmt::Debug for SchemaNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaNode")
            .field("raw", &self.raw)
            .field("compiled", &self.is_compiled())
            .finish()
    }
}

/// An eagerly compiled sub-schema handle.
///
/// Parent compilers build one of these per sub-schema-valued keyword; the
/// node is compiled exactly once, at parent compile time, and the handle is
/// captured by the parent's closures. Cloning shares the node and its
/// checks.
#[derive(Clone)]
pub struct CompiledSchema {
    node: Arc<SchemaNode>,
    checks: Arc<CheckList>,
}

impl CompiledSchema {
    /// Compile a sub-schema value found under `keyword`.
    ///
    /// # Errors
    ///
    /// Returns a schema-definition error if the value is not schema-shaped,
    /// or if the sub-schema itself fails to compile.
    pub fn new(keyword: &'static str, raw: &Value) -> CompileResult<Self> {
        if !guards::is_schema(raw) {
            return Err(SchemaError::invalid_subschema(keyword, guards::json_type_name(raw)));
        }
        let node = SchemaNode::new(raw.clone())?;
        let checks = node.checks()?;
        Ok(Self {
            node: Arc::new(node),
            checks,
        })
    }

    /// Validate a value against this sub-schema's cached checks.
    pub fn validate(&self, value: &Value) -> ValidateResult {
        run_compiled(value, &self.node, &self.checks)
    }

    /// Returns the underlying schema node.
    pub fn node(&self) -> &SchemaNode {
        &self.node
    }
}

impl std::fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CompiledSchema").field(self.node.raw()).finish()
    }
}
