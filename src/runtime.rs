//! Execution primitives for compiled checks.
//!
//! `run_compiled` walks a node's cached check list against a value, in
//! order, short-circuiting on the first failure. `size_threshold` is the
//! shared factory behind every "maximum/minimum count" keyword: object
//! property counts, array lengths, and string lengths all reuse it.
//!
//! Checks read scalar thresholds from the live schema node at call time
//! rather than from values captured at compile time, so a node whose
//! threshold keyword is later mutated is observed without recompilation.

use serde_json::Value;

use crate::errors::{CompileResult, SchemaError, ValidateResult, ValidationError};
use crate::node::SchemaNode;

/// A compiled check over a whole value.
type CheckFn = Box<dyn Fn(&Value, &SchemaNode) -> ValidateResult + Send + Sync>;

/// A compiled check over one own-key of an object, given
/// `(container, key, key_value, node)`.
pub type KeyCheckFn = Box<dyn Fn(&Value, &str, &Value, &SchemaNode) -> ValidateResult + Send + Sync>;

/// A count-comparison check produced by [`size_threshold`], given the
/// measured count and the live schema node.
pub type CountCheckFn = Box<dyn Fn(usize, &SchemaNode) -> ValidateResult + Send + Sync>;

/// One executable check derived from a schema node's keywords.
pub struct Check {
    keyword: &'static str,
    run: CheckFn,
}

impl Check {
    /// Wrap a closure as a check tagged with the keyword group it enforces.
    pub fn new<F>(keyword: &'static str, run: F) -> Self
    where
        F: Fn(&Value, &SchemaNode) -> ValidateResult + Send + Sync + 'static,
    {
        Self {
            keyword,
            run: Box::new(run),
        }
    }

    /// Returns the keyword group this check enforces
    pub fn keyword(&self) -> &'static str {
        self.keyword
    }

    /// Run the check against a value and its live schema node
    pub fn run(&self, value: &Value, node: &SchemaNode) -> ValidateResult {
        (self.run)(value, node)
    }
}

impl std::fmt::Debug for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Check(#{})", self.keyword)
    }
}

/// Ordered list of compiled checks; order is execution order.
pub type CheckList = Vec<Check>;

/// Runs a cached check list against a value.
///
/// A literal `false` node rejects every value before any keyword logic.
/// Otherwise checks run in list order and the first failure propagates;
/// if all pass, the value is valid for this node.
pub fn run_compiled(value: &Value, node: &SchemaNode, checks: &CheckList) -> ValidateResult {
    if node.denies_all() {
        return Err(ValidationError::denies_all());
    }
    for check in checks {
        check.run(value, node)?;
    }
    Ok(())
}

/// Which side of the bound a threshold keyword enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    /// Fail when the count exceeds the threshold
    Max,
    /// Fail when the count falls below the threshold
    Min,
}

/// Compile-time factory for count-comparison checks.
///
/// Fails with a schema-definition error unless `size` is a whole number of
/// at least 1. The returned check reads the threshold from the live node by
/// keyword name, so the same check stays correct if the keyword's value is
/// later replaced with a different positive bound.
pub fn size_threshold(size: &Value, keyword: &'static str, mode: Threshold) -> CompileResult<CountCheckFn> {
    match size.as_u64() {
        Some(n) if n >= 1 => {}
        _ => return Err(SchemaError::non_positive_threshold(keyword, size)),
    }

    Ok(Box::new(move |count, node| {
        // Threshold removed after compilation means nothing to enforce.
        let Some(limit) = node.keyword(keyword).and_then(Value::as_u64) else {
            return Ok(());
        };
        match mode {
            Threshold::Max if count > limit as usize => {
                Err(ValidationError::too_many(keyword, count, limit))
            }
            Threshold::Min if count < limit as usize => {
                Err(ValidationError::too_few(keyword, count, limit))
            }
            _ => Ok(()),
        }
    }))
}
