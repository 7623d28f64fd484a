//! jsonvet - A strict, deterministic, compile-once schema validator
//!
//! Validates `serde_json::Value` data against declarative schema
//! definitions: nested constraint objects in a JSON-Schema-like grammar
//! (type, numeric bounds, object shape, dependencies, pattern-keyed
//! properties).
//!
//! # Design Principles
//!
//! - Compile once, validate many: each schema node is compiled into a
//!   minimal ordered check list, cached on the node, and replayed cheaply
//!   for every later value
//! - First violation wins: checks short-circuit in a deterministic order,
//!   no error aggregation
//! - Two disjoint error kinds: schema-definition errors at compile time,
//!   validation errors at run time, both prefixed `#<keyword>:`
//! - Deterministic validation, no coercion, no defaults
//!
//! # Example
//!
//! ```
//! use jsonvet::Schema;
//! use serde_json::json;
//!
//! let schema = Schema::new(json!({
//!     "type": "object",
//!     "required": ["name"],
//!     "properties": {
//!         "name": {"type": "string", "minLength": 1},
//!         "age": {"type": "integer", "minimum": 0}
//!     },
//!     "additionalProperties": false
//! })).unwrap();
//!
//! assert!(schema.is_valid(&json!({"name": "Alice", "age": 30})));
//! assert!(!schema.is_valid(&json!({"name": "", "age": 30})));
//! assert!(!schema.is_valid(&json!({"name": "Alice", "admin": true})));
//! ```

pub mod compile;
pub mod errors;
pub mod guards;
pub mod node;
pub mod runtime;
pub mod schema;

pub use errors::{
    CompileResult, Error, SchemaError, SchemaErrorKind, ValidateResult, ValidationError,
    ViolationKind,
};
pub use node::{CompiledSchema, SchemaNode};
pub use runtime::{run_compiled, size_threshold, Check, CheckList, Threshold};
pub use schema::Schema;
