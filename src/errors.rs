//! Error types for schema compilation and validation.
//!
//! Two disjoint error kinds:
//! - `SchemaError`: raised only during compilation, when a keyword's declared
//!   value is structurally wrong for its keyword. Fatal to compilation; no
//!   partial check list is ever cached.
//! - `ValidationError`: raised only at validation time, when a value violates
//!   a keyword's constraint. Aborts only the current validation call; the
//!   schema node and its cache remain valid for the next value.
//!
//! Both kinds display as `#<keyword>: <reason>` so callers can classify
//! failures by offending keyword, and both carry a machine-checkable kind so
//! callers never need to match on message text.

use serde::Serialize;
use thiserror::Error;

/// Result type for the compile phase.
pub type CompileResult<T> = Result<T, SchemaError>;

/// Result type for the validation phase.
pub type ValidateResult = Result<(), ValidationError>;

/// Structural categories of schema-definition failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SchemaErrorKind {
    /// Keyword value has the wrong JSON type
    WrongType,
    /// Keyword value has the right type but an invalid shape
    WrongShape,
    /// Count threshold is zero, negative, or fractional
    NonPositiveThreshold,
    /// Regular expression failed to compile
    InvalidPattern,
    /// Dependency entry is neither a key list nor a sub-schema
    InvalidDependency,
    /// Sub-schema-valued keyword does not hold a schema
    InvalidSubschema,
}

/// Schema-definition error: the schema itself is malformed.
#[derive(Debug, Clone, Error)]
#[error("#{keyword}: {reason}")]
pub struct SchemaError {
    keyword: String,
    kind: SchemaErrorKind,
    reason: String,
}

impl SchemaError {
    /// Create a wrong-type error for a keyword value
    pub fn wrong_type(keyword: impl Into<String>, expected: &str, actual: &str) -> Self {
        Self {
            keyword: keyword.into(),
            kind: SchemaErrorKind::WrongType,
            reason: format!("expected {}, got {}", expected, actual),
        }
    }

    /// Create a wrong-shape error for a keyword value
    pub fn wrong_shape(keyword: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            kind: SchemaErrorKind::WrongShape,
            reason: reason.into(),
        }
    }

    /// Create a non-positive-threshold error
    pub fn non_positive_threshold(keyword: impl Into<String>, value: &serde_json::Value) -> Self {
        Self {
            keyword: keyword.into(),
            kind: SchemaErrorKind::NonPositiveThreshold,
            reason: format!("threshold must be a positive whole number, got {}", value),
        }
    }

    /// Create an invalid-pattern error from a regex failure
    pub fn invalid_pattern(keyword: impl Into<String>, pattern: &str, detail: impl std::fmt::Display) -> Self {
        Self {
            keyword: keyword.into(),
            kind: SchemaErrorKind::InvalidPattern,
            reason: format!("invalid pattern '{}': {}", pattern, detail),
        }
    }

    /// Create an invalid-dependency error
    pub fn invalid_dependency(key: &str, reason: impl Into<String>) -> Self {
        Self {
            keyword: "dependencies".into(),
            kind: SchemaErrorKind::InvalidDependency,
            reason: format!("entry '{}': {}", key, reason.into()),
        }
    }

    /// Create an invalid-subschema error
    pub fn invalid_subschema(keyword: impl Into<String>, actual: &str) -> Self {
        Self {
            keyword: keyword.into(),
            kind: SchemaErrorKind::InvalidSubschema,
            reason: format!("expected a sub-schema (object or boolean), got {}", actual),
        }
    }

    /// Returns the offending keyword name
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Returns the structural kind
    pub fn kind(&self) -> SchemaErrorKind {
        self.kind
    }

    /// Returns the human-readable reason
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Constraint categories of validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ViolationKind {
    /// The schema is literally `false` and admits no value
    SchemaDeniesAll,
    /// Value is not of the declared type
    TypeMismatch,
    /// Numeric value violates a bound keyword
    OutOfBounds,
    /// Numeric value is not an exact multiple
    NotMultiple,
    /// One or more required keys are absent
    MissingRequired,
    /// Key matched no declared property and additional properties are denied
    UndeclaredProperty,
    /// String does not match the declared pattern
    PatternMismatch,
    /// A present key's companion keys are absent
    UnsatisfiedDependency,
    /// A property name violates the name schema
    InvalidPropertyName,
    /// Count exceeds a maximum threshold
    TooMany,
    /// Count falls below a minimum threshold
    TooFew,
    /// Array elements are not unique
    NotUnique,
}

/// Validation error: a concrete value violated a keyword's constraint.
#[derive(Debug, Clone, Error)]
#[error("#{keyword}: {reason}")]
pub struct ValidationError {
    keyword: String,
    kind: ViolationKind,
    reason: String,
}

impl ValidationError {
    /// Create an error for a keyword and kind with a free-form reason
    pub fn new(keyword: impl Into<String>, kind: ViolationKind, reason: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            kind,
            reason: reason.into(),
        }
    }

    /// Create the false-schema rejection error
    pub fn denies_all() -> Self {
        Self {
            keyword: "schema".into(),
            kind: ViolationKind::SchemaDeniesAll,
            reason: "false schema invalidates all values".into(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(expected: &str, actual: &str) -> Self {
        Self {
            keyword: "type".into(),
            kind: ViolationKind::TypeMismatch,
            reason: format!("expected {}, got {}", expected, actual),
        }
    }

    /// Create a bound violation error for a numeric keyword
    pub fn out_of_bounds(keyword: impl Into<String>, value: f64, relation: &str, bound: f64) -> Self {
        Self {
            keyword: keyword.into(),
            kind: ViolationKind::OutOfBounds,
            reason: format!("{} must be {} {}", value, relation, bound),
        }
    }

    /// Create a multipleOf violation error
    pub fn not_multiple(value: f64, multiple: f64) -> Self {
        Self {
            keyword: "multipleOf".into(),
            kind: ViolationKind::NotMultiple,
            reason: format!("{} is not a multiple of {}", value, multiple),
        }
    }

    /// Create a missing-required-keys error from the presence tally
    pub fn missing_required(present: usize, total: usize) -> Self {
        Self {
            keyword: "required".into(),
            kind: ViolationKind::MissingRequired,
            reason: format!("{} of {} required properties missing", total - present, total),
        }
    }

    /// Create an undeclared-property error
    pub fn undeclared_property(key: &str) -> Self {
        Self {
            keyword: "additionalProperties".into(),
            kind: ViolationKind::UndeclaredProperty,
            reason: format!("property '{}' is not declared and additional properties are not allowed", key),
        }
    }

    /// Create a pattern mismatch error
    pub fn pattern_mismatch(pattern: &str) -> Self {
        Self {
            keyword: "pattern".into(),
            kind: ViolationKind::PatternMismatch,
            reason: format!("value does not match pattern '{}'", pattern),
        }
    }

    /// Create an unsatisfied-dependency error naming both keys
    pub fn unsatisfied_dependency(dependent: &str, missing: &str) -> Self {
        Self {
            keyword: "dependencies".into(),
            kind: ViolationKind::UnsatisfiedDependency,
            reason: format!("dependency of '{}' requires missing key '{}'", dependent, missing),
        }
    }

    /// Create an invalid-property-name error wrapping the name-schema failure
    pub fn invalid_property_name(key: &str, cause: &ValidationError) -> Self {
        Self {
            keyword: "propertyNames".into(),
            kind: ViolationKind::InvalidPropertyName,
            reason: format!("property name '{}' is invalid: {}", key, cause),
        }
    }

    /// Create a maximum-count violation error
    pub fn too_many(keyword: impl Into<String>, count: usize, limit: u64) -> Self {
        Self {
            keyword: keyword.into(),
            kind: ViolationKind::TooMany,
            reason: format!("count {} exceeds maximum {}", count, limit),
        }
    }

    /// Create a minimum-count violation error
    pub fn too_few(keyword: impl Into<String>, count: usize, limit: u64) -> Self {
        Self {
            keyword: keyword.into(),
            kind: ViolationKind::TooFew,
            reason: format!("count {} is below minimum {}", count, limit),
        }
    }

    /// Create a uniqueItems violation error
    pub fn not_unique(first: usize, second: usize) -> Self {
        Self {
            keyword: "uniqueItems".into(),
            kind: ViolationKind::NotUnique,
            reason: format!("items at indexes {} and {} are equal", first, second),
        }
    }

    /// Returns the offending keyword name
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Returns the violation kind
    pub fn kind(&self) -> ViolationKind {
        self.kind
    }

    /// Returns the human-readable reason
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Umbrella error for callers that compile and validate in one step.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The schema definition itself is malformed
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// The value violated the schema
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
