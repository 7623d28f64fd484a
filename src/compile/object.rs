//! Object compiler.
//!
//! Compiles `properties`, `patternProperties`, `additionalProperties`,
//! `dependencies`, `propertyNames`, `required`, `maxProperties` and
//! `minProperties` into a single-pass check: per-key checks run once per
//! own-key of the value in registration order, the required-key tally
//! accumulates during that same pass, and the whole-object checks (required
//! count, property-count thresholds) run after the pass. Folding the key
//! logic into one iteration keeps first-failure reporting deterministic:
//! first violation in key order, then in check-registration order, wins.
//!
//! Non-object values are out of scope for object keywords: they fail only
//! when the node declares `type: "object"`, and are skipped otherwise.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use regex::Regex;
use serde_json::{Map, Value};

use crate::errors::{CompileResult, SchemaError, ValidationError};
use crate::guards;
use crate::node::{CompiledSchema, SchemaNode};
use crate::runtime::{size_threshold, Check, CheckList, CountCheckFn, KeyCheckFn, Threshold};

const OBJECT_KEYWORDS: &[&str] = &[
    "properties",
    "patternProperties",
    "additionalProperties",
    "dependencies",
    "propertyNames",
    "required",
    "maxProperties",
    "minProperties",
];

/// A `patternProperties` entry: a compiled pattern and the sub-schema keys
/// matching it must satisfy.
struct PatternProperty {
    regex: Regex,
    schema: CompiledSchema,
}

/// A `dependencies` entry, activated when its key is present on the value.
enum Dependency {
    /// Companion keys that must also be present
    Keys(Vec<String>),
    /// A schema the whole object must satisfy
    Schema(CompiledSchema),
}

/// What `additionalProperties` demands of keys matching neither a named
/// property nor any pattern.
enum Additional {
    Denied,
    Schema(CompiledSchema),
}

/// Compile the object-keyword checks for a node.
pub fn compile(node: &SchemaNode) -> CompileResult<CheckList> {
    let declared = node.declared_type() == Some("object");
    let has_keywords = OBJECT_KEYWORDS.iter().any(|kw| node.keyword(kw).is_some());

    if !has_keywords {
        if declared {
            return Ok(vec![Check::new("type", |value, _| {
                if guards::is_object(value) {
                    Ok(())
                } else {
                    Err(ValidationError::type_mismatch("object", guards::json_type_name(value)))
                }
            })]);
        }
        return Ok(CheckList::new());
    }

    let properties = compile_properties(node)?;
    let patterns = compile_pattern_properties(node)?;
    let additional = compile_additional(node)?;
    let dependencies = compile_dependencies(node)?;
    let property_names = compile_property_names(node)?;
    let required = compile_required(node)?;
    let max_count = threshold_check(node, "maxProperties", Threshold::Max)?;
    let min_count = threshold_check(node, "minProperties", Threshold::Min)?;

    // Per-key checks, in the order they short-circuit at run time.
    let mut key_checks: Vec<KeyCheckFn> = Vec::new();

    if let Some(props) = &properties {
        let props = Arc::clone(props);
        key_checks.push(Box::new(move |_, key, entry, _| {
            match props.get(key) {
                Some(schema) => schema.validate(entry),
                None => Ok(()),
            }
        }));
    }

    if let Some(pats) = &patterns {
        let pats = Arc::clone(pats);
        key_checks.push(Box::new(move |_, key, entry, _| {
            // A key may match several patterns; every match must pass.
            for pat in pats.iter().filter(|p| p.regex.is_match(key)) {
                pat.schema.validate(entry)?;
            }
            Ok(())
        }));
    }

    if let Some(mode) = additional {
        let props = properties.as_ref().map(Arc::clone);
        let pats = patterns.as_ref().map(Arc::clone);
        key_checks.push(Box::new(move |_, key, entry, _| {
            let named = props.as_ref().is_some_and(|p| p.contains_key(key));
            let patterned = pats
                .as_ref()
                .is_some_and(|p| p.iter().any(|pat| pat.regex.is_match(key)));
            if named || patterned {
                return Ok(());
            }
            match &mode {
                Additional::Denied => Err(ValidationError::undeclared_property(key)),
                Additional::Schema(schema) => schema.validate(entry),
            }
        }));
    }

    if let Some(deps) = dependencies {
        key_checks.push(Box::new(move |container, key, _, _| {
            let Some(dep) = deps.get(key) else {
                return Ok(());
            };
            match dep {
                Dependency::Keys(companions) => {
                    let present = container.as_object();
                    for companion in companions {
                        let found = present.is_some_and(|map| map.contains_key(companion));
                        if !found {
                            return Err(ValidationError::unsatisfied_dependency(key, companion));
                        }
                    }
                    Ok(())
                }
                Dependency::Schema(schema) => schema.validate(container),
            }
        }));
    }

    if let Some(names) = property_names {
        key_checks.push(Box::new(move |_, key, _, _| {
            names
                .validate(&Value::String(key.to_owned()))
                .map_err(|cause| ValidationError::invalid_property_name(key, &cause))
        }));
    }

    let check = Check::new("object", move |value, schema| {
        let Some(map) = value.as_object() else {
            if declared {
                return Err(ValidationError::type_mismatch("object", guards::json_type_name(value)));
            }
            return Ok(());
        };

        // One pass: per-key checks plus the required tally, no second scan.
        let mut present = 0usize;
        for (key, entry) in map {
            for key_check in &key_checks {
                key_check(value, key, entry, schema)?;
            }
            if required.as_ref().is_some_and(|set| set.contains(key)) {
                present += 1;
            }
        }

        if let Some(set) = &required {
            if present != set.len() {
                return Err(ValidationError::missing_required(present, set.len()));
            }
        }
        if let Some(max) = &max_count {
            max(map.len(), schema)?;
        }
        if let Some(min) = &min_count {
            min(map.len(), schema)?;
        }
        Ok(())
    });

    Ok(vec![check])
}

fn keyword_object<'a>(node: &'a SchemaNode, keyword: &'static str) -> CompileResult<Option<&'a Map<String, Value>>> {
    match node.keyword(keyword) {
        None => Ok(None),
        Some(value) => value
            .as_object()
            .map(Some)
            .ok_or_else(|| SchemaError::wrong_type(keyword, "object", guards::json_type_name(value))),
    }
}

fn compile_properties(node: &SchemaNode) -> CompileResult<Option<Arc<BTreeMap<String, CompiledSchema>>>> {
    let Some(map) = keyword_object(node, "properties")? else {
        return Ok(None);
    };
    let mut compiled = BTreeMap::new();
    for (key, sub) in map {
        compiled.insert(key.clone(), CompiledSchema::new("properties", sub)?);
    }
    Ok(Some(Arc::new(compiled)))
}

fn compile_pattern_properties(node: &SchemaNode) -> CompileResult<Option<Arc<Vec<PatternProperty>>>> {
    let Some(map) = keyword_object(node, "patternProperties")? else {
        return Ok(None);
    };
    let mut compiled = Vec::with_capacity(map.len());
    for (pattern, sub) in map {
        let regex = Regex::new(pattern)
            .map_err(|e| SchemaError::invalid_pattern("patternProperties", pattern, e))?;
        compiled.push(PatternProperty {
            regex,
            schema: CompiledSchema::new("patternProperties", sub)?,
        });
    }
    Ok(Some(Arc::new(compiled)))
}

fn compile_additional(node: &SchemaNode) -> CompileResult<Option<Additional>> {
    match node.keyword("additionalProperties") {
        None | Some(Value::Bool(true)) => Ok(None),
        Some(Value::Bool(false)) => Ok(Some(Additional::Denied)),
        Some(sub) => Ok(Some(Additional::Schema(CompiledSchema::new(
            "additionalProperties",
            sub,
        )?))),
    }
}

fn compile_dependencies(node: &SchemaNode) -> CompileResult<Option<BTreeMap<String, Dependency>>> {
    let Some(map) = keyword_object(node, "dependencies")? else {
        return Ok(None);
    };
    let mut compiled = BTreeMap::new();
    for (key, entry) in map {
        let dep = match entry {
            Value::Array(items) => {
                if items.is_empty() {
                    return Err(SchemaError::invalid_dependency(key, "companion key list must not be empty"));
                }
                let mut companions = Vec::with_capacity(items.len());
                for item in items {
                    let Some(name) = item.as_str() else {
                        return Err(SchemaError::invalid_dependency(
                            key,
                            format!("companion keys must be strings, got {}", guards::json_type_name(item)),
                        ));
                    };
                    companions.push(name.to_owned());
                }
                Dependency::Keys(companions)
            }
            other if guards::is_schema(other) => {
                Dependency::Schema(CompiledSchema::new("dependencies", other)?)
            }
            other => {
                return Err(SchemaError::invalid_dependency(
                    key,
                    format!(
                        "expected a key list or a sub-schema, got {}",
                        guards::json_type_name(other)
                    ),
                ));
            }
        };
        compiled.insert(key.clone(), dep);
    }
    Ok(Some(compiled))
}

fn compile_property_names(node: &SchemaNode) -> CompileResult<Option<CompiledSchema>> {
    match node.keyword("propertyNames") {
        None => Ok(None),
        Some(sub) => Ok(Some(CompiledSchema::new("propertyNames", sub)?)),
    }
}

fn compile_required(node: &SchemaNode) -> CompileResult<Option<HashSet<String>>> {
    let Some(value) = node.keyword("required") else {
        return Ok(None);
    };
    let Some(items) = value.as_array() else {
        return Err(SchemaError::wrong_type("required", "array of strings", guards::json_type_name(value)));
    };
    let mut set = HashSet::with_capacity(items.len());
    for item in items {
        let Some(name) = item.as_str() else {
            return Err(SchemaError::wrong_type("required", "array of strings", guards::json_type_name(item)));
        };
        set.insert(name.to_owned());
    }
    Ok(Some(set))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{SchemaErrorKind, ViolationKind};
    use crate::runtime::run_compiled;
    use serde_json::json;

    fn validate(schema: Value, value: Value) -> crate::errors::ValidateResult {
        let node = SchemaNode::new(schema).unwrap();
        let checks = node.checks().unwrap();
        run_compiled(&value, &node, &checks)
    }

    fn compile_err(schema: Value) -> SchemaError {
        let node = SchemaNode::new(schema).unwrap();
        node.checks().unwrap_err()
    }

    #[test]
    fn test_non_object_skipped_without_declared_type() {
        assert!(validate(json!({"required": ["a"]}), json!("not an object")).is_ok());
        assert!(validate(json!({"minProperties": 3}), json!(42)).is_ok());
    }

    #[test]
    fn test_non_object_fails_with_declared_type() {
        let err = validate(json!({"type": "object"}), json!([1, 2])).unwrap_err();
        assert_eq!(err.kind(), ViolationKind::TypeMismatch);
        assert_eq!(err.keyword(), "type");
    }

    #[test]
    fn test_required_is_order_independent() {
        let schema = json!({"type": "object", "required": ["b", "a"]});
        assert!(validate(schema.clone(), json!({"a": 1, "b": 2})).is_ok());
        assert!(validate(schema, json!({"b": 2, "a": 1})).is_ok());
    }

    #[test]
    fn test_required_tally_mismatch_fails() {
        let schema = json!({
            "type": "object",
            "required": ["a", "b"],
            "properties": {"a": {"type": "number"}}
        });
        let err = validate(schema.clone(), json!({"a": 1})).unwrap_err();
        assert_eq!(err.keyword(), "required");
        assert!(validate(schema, json!({"a": 1, "b": 2})).is_ok());
    }

    #[test]
    fn test_property_schema_applies_per_key() {
        let schema = json!({"properties": {"age": {"type": "integer", "minimum": 0}}});
        assert!(validate(schema.clone(), json!({"age": 30})).is_ok());
        let err = validate(schema.clone(), json!({"age": -1})).unwrap_err();
        assert_eq!(err.keyword(), "minimum");
        // Keys without a declared property schema are unconstrained here.
        assert!(validate(schema, json!({"name": "x"})).is_ok());
    }

    #[test]
    fn test_pattern_properties_every_match_must_pass() {
        let schema = json!({
            "patternProperties": {
                "^x_": {"type": "string"},
                "_id$": {"minLength": 3}
            }
        });
        // "x_user_id" matches both patterns; both sub-schemas apply.
        assert!(validate(schema.clone(), json!({"x_user_id": "abc"})).is_ok());
        let err = validate(schema.clone(), json!({"x_user_id": "ab"})).unwrap_err();
        assert_eq!(err.keyword(), "minLength");
        let err = validate(schema, json!({"x_flag": 1})).unwrap_err();
        assert_eq!(err.keyword(), "type");
    }

    #[test]
    fn test_additional_properties_false_rejects_undeclared() {
        let schema = json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {"a": {"type": "string"}}
        });
        assert!(validate(schema.clone(), json!({"a": "x"})).is_ok());
        let err = validate(schema, json!({"a": "x", "b": 2})).unwrap_err();
        assert_eq!(err.keyword(), "additionalProperties");
        assert_eq!(err.kind(), ViolationKind::UndeclaredProperty);
    }

    #[test]
    fn test_additional_properties_schema_applies_to_unmatched_keys() {
        let schema = json!({
            "properties": {"a": {"type": "string"}},
            "patternProperties": {"^n_": {"type": "number"}},
            "additionalProperties": {"type": "boolean"}
        });
        assert!(validate(schema.clone(), json!({"a": "x", "n_count": 2, "extra": true})).is_ok());
        let err = validate(schema, json!({"extra": "not a bool"})).unwrap_err();
        assert_eq!(err.keyword(), "type");
    }

    #[test]
    fn test_additional_properties_true_allows_everything() {
        let schema = json!({"additionalProperties": true, "properties": {"a": {"type": "string"}}});
        assert!(validate(schema, json!({"b": [1, 2, 3]})).is_ok());
    }

    #[test]
    fn test_key_dependency_requires_companions() {
        let schema = json!({"dependencies": {"credit_card": ["billing_address"]}});
        assert!(validate(schema.clone(), json!({"name": "x"})).is_ok());
        assert!(validate(
            schema.clone(),
            json!({"credit_card": "4111", "billing_address": "1 Main St"})
        )
        .is_ok());
        let err = validate(schema, json!({"credit_card": "4111"})).unwrap_err();
        assert_eq!(err.kind(), ViolationKind::UnsatisfiedDependency);
        assert!(err.reason().contains("billing_address"));
        assert!(err.reason().contains("credit_card"));
    }

    #[test]
    fn test_schema_dependency_validates_whole_object() {
        let schema = json!({
            "dependencies": {
                "credit_card": {"required": ["billing_address"]}
            }
        });
        assert!(validate(
            schema.clone(),
            json!({"credit_card": "4111", "billing_address": "1 Main St"})
        )
        .is_ok());
        let err = validate(schema, json!({"credit_card": "4111"})).unwrap_err();
        assert_eq!(err.keyword(), "required");
    }

    #[test]
    fn test_property_names_validates_keys() {
        let schema = json!({"propertyNames": {"maxLength": 3}});
        assert!(validate(schema.clone(), json!({"abc": 1, "x": 2})).is_ok());
        let err = validate(schema, json!({"abcd": 1})).unwrap_err();
        assert_eq!(err.keyword(), "propertyNames");
        assert_eq!(err.kind(), ViolationKind::InvalidPropertyName);
        assert!(err.reason().contains("abcd"));
    }

    #[test]
    fn test_property_count_thresholds() {
        let schema = json!({"minProperties": 1, "maxProperties": 2});
        let err = validate(schema.clone(), json!({})).unwrap_err();
        assert_eq!(err.keyword(), "minProperties");
        assert!(validate(schema.clone(), json!({"a": 1})).is_ok());
        assert!(validate(schema.clone(), json!({"a": 1, "b": 2})).is_ok());
        let err = validate(schema, json!({"a": 1, "b": 2, "c": 3})).unwrap_err();
        assert_eq!(err.keyword(), "maxProperties");
    }

    #[test]
    fn test_false_subschema_rejects_matching_keys() {
        let schema = json!({"properties": {"forbidden": false}});
        assert!(validate(schema.clone(), json!({"other": 1})).is_ok());
        let err = validate(schema, json!({"forbidden": null})).unwrap_err();
        assert_eq!(err.kind(), ViolationKind::SchemaDeniesAll);
    }

    #[test]
    fn test_first_violation_in_key_order_wins() {
        let schema = json!({
            "properties": {
                "a": {"type": "string"},
                "b": {"type": "string"}
            }
        });
        // Keys iterate in a stable order; "a" fails before "b" is reached.
        let err = validate(schema, json!({"a": 1, "b": 2})).unwrap_err();
        assert_eq!(err.keyword(), "type");
    }

    // Compile-time rejection of malformed keywords.

    #[test]
    fn test_malformed_properties_rejected() {
        assert_eq!(compile_err(json!({"properties": ["a"]})).keyword(), "properties");
        let err = compile_err(json!({"properties": {"a": 3}}));
        assert_eq!(err.kind(), SchemaErrorKind::InvalidSubschema);
    }

    #[test]
    fn test_malformed_pattern_rejected() {
        let err = compile_err(json!({"patternProperties": {"[unclosed": {}}}));
        assert_eq!(err.kind(), SchemaErrorKind::InvalidPattern);
        assert_eq!(err.keyword(), "patternProperties");
    }

    #[test]
    fn test_malformed_dependencies_rejected() {
        for entry in [json!([]), json!([1]), json!("billing"), json!(3)] {
            let err = compile_err(json!({"dependencies": {"a": entry}}));
            assert_eq!(err.kind(), SchemaErrorKind::InvalidDependency, "entry should be rejected");
        }
    }

    #[test]
    fn test_malformed_required_rejected() {
        assert_eq!(compile_err(json!({"required": "a"})).keyword(), "required");
        assert_eq!(compile_err(json!({"required": ["a", 2]})).keyword(), "required");
    }

    #[test]
    fn test_malformed_property_names_rejected() {
        let err = compile_err(json!({"propertyNames": ["x"]}));
        assert_eq!(err.kind(), SchemaErrorKind::InvalidSubschema);
    }

    #[test]
    fn test_non_positive_property_thresholds_rejected() {
        assert_eq!(
            compile_err(json!({"maxProperties": 0})).kind(),
            SchemaErrorKind::NonPositiveThreshold
        );
        assert_eq!(
            compile_err(json!({"minProperties": 1.5})).kind(),
            SchemaErrorKind::NonPositiveThreshold
        );
    }

    #[test]
    fn test_pattern_source_is_kept() {
        // The authored pattern stays available for diagnostics.
        let node = SchemaNode::new(json!({"patternProperties": {"^a": {}}})).unwrap();
        let patterns = compile_pattern_properties(&node).unwrap().unwrap();
        assert_eq!(patterns[0].regex.as_str(), "^a");
    }
}
