//! String compiler.
//!
//! Compiles `maxLength`, `minLength` (through the shared size-threshold
//! factory, counting characters rather than bytes) and `pattern`. Non-string
//! values fail only when the node declares `type: "string"`.

use serde_json::Value;

use crate::errors::{CompileResult, SchemaError, ValidationError};
use crate::guards;
use crate::node::SchemaNode;
use crate::runtime::{size_threshold, Check, CheckList, CountCheckFn, Threshold};

use regex::Regex;

const STRING_KEYWORDS: &[&str] = &["maxLength", "minLength", "pattern"];

/// Compile the string-keyword checks for a node.
pub fn compile(node: &SchemaNode) -> CompileResult<CheckList> {
    let declared = node.declared_type() == Some("string");
    let has_keywords = STRING_KEYWORDS.iter().any(|kw| node.keyword(kw).is_some());

    if !has_keywords {
        if declared {
            return Ok(vec![Check::new("type", |value, _| {
                if guards::is_string(value) {
                    Ok(())
                } else {
                    Err(ValidationError::type_mismatch("string", guards::json_type_name(value)))
                }
            })]);
        }
        return Ok(CheckList::new());
    }

    let max_length = threshold_check(node, "maxLength", Threshold::Max)?;
    let min_length = threshold_check(node, "minLength", Threshold::Min)?;
    let pattern = compile_pattern(node)?;

    let check = Check::new("string", move |value, schema| {
        let Some(s) = value.as_str() else {
            if declared {
                return Err(ValidationError::type_mismatch("string", guards::json_type_name(value)));
            }
            return Ok(());
        };

        // Length keywords count characters, not bytes.
        let length = s.chars().count();
        if let Some(max) = &max_length {
            max(length, schema)?;
        }
        if let Some(min) = &min_length {
            min(length, schema)?;
        }
        if let Some(regex) = &pattern {
            if !regex.is_match(s) {
                return Err(ValidationError::pattern_mismatch(regex.as_str()));
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

fn compile_pattern(node: &SchemaNode) -> CompileResult<Option<Regex>> {
    let Some(value) = node.keyword("pattern") else {
        return Ok(None);
    };
    let Some(source) = value.as_str() else {
        return Err(SchemaError::wrong_type("pattern", "string", guards::json_type_name(value)));
    };
    Regex::new(source)
        .map(Some)
        .map_err(|e| SchemaError::invalid_pattern("pattern", source, e))
}
