//! Scalar compiler for `boolean` and `null`.
//!
//! These types carry no companion keywords, so compilation yields a single
//! type gate when one of them is declared and nothing otherwise.

use crate::errors::{CompileResult, ValidationError};
use crate::guards;
use crate::node::SchemaNode;
use crate::runtime::{Check, CheckList};

/// Compile the scalar type gates for a node.
pub fn compile(node: &SchemaNode) -> CompileResult<CheckList> {
    match node.declared_type() {
        Some("boolean") => Ok(vec![Check::new("type", |value, _| {
            if guards::is_boolean(value) {
                Ok(())
            } else {
                Err(ValidationError::type_mismatch("boolean", guards::json_type_name(value)))
            }
        })]),
        Some("null") => Ok(vec![Check::new("type", |value, _| {
            if guards::is_null(value) {
                Ok(())
            } else {
                Err(ValidationError::type_mismatch("null", guards::json_type_name(value)))
            }
        })]),
        _ => Ok(CheckList::new()),
    }
}
