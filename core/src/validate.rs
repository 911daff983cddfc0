//! Development-time consistency checks for field lists.
//!
//! Catches structural mistakes in merged fields, such as duplicate names,
//! constraints that do not apply to the field's compiled type, and enum
//! values of the wrong type, before they reach a registered tool schema.
//! Runtime values submitted to a tool are not checked here.
//!
//! # Examples
//!
//! ```
//! use tool_schema_core::*;
//!
//! let fields = vec![FieldDefinition::new("email"), FieldDefinition::new("email")];
//! let issues = collect_issues(&fields);
//! assert_eq!(issues, vec![SchemaIssue::DuplicateName("email".into())]);
//!
//! let strict = ValidateOptions { dev_mode: true, strict: true };
//! let err = validate_fields(&fields, &strict).unwrap_err();
//! assert!(err.to_string().starts_with(ISSUE_PREFIX));
//! ```

use std::collections::HashSet;

use regex::Regex;
use thiserror::Error;
use tracing::warn;

use crate::{FieldDefinition, SchemaType};

/// Fixed prefix of every strict-mode validation error message.
pub const ISSUE_PREFIX: &str = "[tool-schema]";

/// A consistency problem found in a field list.
///
/// The `Display` impl is the human-readable issue text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaIssue {
    /// A name already used by an earlier field in the list.
    #[error("duplicate field name: {0}")]
    DuplicateName(String),
    /// `pattern` on a field that does not compile to a string.
    #[error("field `{name}` has a pattern but compiles to {schema_type}")]
    PatternOnNonString {
        name: String,
        schema_type: SchemaType,
    },
    /// `min`/`max` on a field that does not compile to a number.
    #[error("field `{name}` has min/max bounds but compiles to {schema_type}")]
    NumericBoundsOnNonNumber {
        name: String,
        schema_type: SchemaType,
    },
    /// `minLength`/`maxLength` on a field that does not compile to a string.
    #[error("field `{name}` has length bounds but compiles to {schema_type}")]
    LengthBoundsOnNonString {
        name: String,
        schema_type: SchemaType,
    },
    /// An enum value whose type differs from the field's compiled type.
    #[error("field `{name}` enum value {value} is a {value_type}, expected {schema_type}")]
    EnumTypeMismatch {
        name: String,
        value: String,
        value_type: &'static str,
        schema_type: SchemaType,
    },
    /// A pattern that is not a valid regular expression.
    #[error("field `{name}` has an invalid pattern: {reason}")]
    InvalidPattern { name: String, reason: String },
    /// `oneOf` values that disagree with `enumValues`.
    #[error("field `{name}` has oneOf values that differ from its enum values")]
    OptionsMismatch { name: String },
}

/// Error raised by [`validate_fields`] in strict mode.
///
/// The message is the issue text behind [`ISSUE_PREFIX`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[tool-schema] {0}")]
pub struct ValidationError(pub SchemaIssue);

/// Controls whether and how [`validate_fields`] reports issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidateOptions {
    /// When `false`, validation is skipped entirely.
    pub dev_mode: bool,
    /// Raise the first issue instead of logging all of them.
    pub strict: bool,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            dev_mode: cfg!(debug_assertions),
            strict: false,
        }
    }
}

/// Validates a field list according to `options`.
///
/// Outside development mode this returns immediately without scanning. In
/// strict mode the first issue is returned as an error; otherwise every issue
/// is logged as a warning and returned.
///
/// # Errors
///
/// Returns [`ValidationError`] with the first issue when `options.strict`
/// is set and at least one issue was found.
pub fn validate_fields(
    fields: &[FieldDefinition],
    options: &ValidateOptions,
) -> Result<Vec<SchemaIssue>, ValidationError> {
    if !options.dev_mode {
        return Ok(Vec::new());
    }
    report(collect_issues(fields), options)
}

/// Validates the result of a merge according to `options`.
///
/// Duplicate names are looked for in `tree_fields`, where the merge would
/// otherwise collapse them silently; every other check runs on `merged`.
///
/// # Errors
///
/// Same as [`validate_fields`].
///
/// # Examples
///
/// ```
/// use tool_schema_core::*;
///
/// let tree = vec![
///     FieldDefinition::new("size").with_enum(["s"]),
///     FieldDefinition::new("size").with_enum(["m"]),
/// ];
/// let merged = merge_fields(&tree, &OverrideMap::new(), &FieldRegistry::new());
/// let options = ValidateOptions { dev_mode: true, strict: false };
///
/// let issues = validate_merge(&tree, &merged.to_fields(), &options).unwrap();
/// assert_eq!(issues, vec![SchemaIssue::DuplicateName("size".into())]);
/// ```
pub fn validate_merge(
    tree_fields: &[FieldDefinition],
    merged: &[FieldDefinition],
    options: &ValidateOptions,
) -> Result<Vec<SchemaIssue>, ValidationError> {
    if !options.dev_mode {
        return Ok(Vec::new());
    }

    let mut issues = duplicate_names(tree_fields);
    for field in merged {
        issues.extend(check_field(field));
    }
    report(issues, options)
}

fn report(
    issues: Vec<SchemaIssue>,
    options: &ValidateOptions,
) -> Result<Vec<SchemaIssue>, ValidationError> {
    if options.strict {
        if let Some(first) = issues.into_iter().next() {
            return Err(ValidationError(first));
        }
        return Ok(Vec::new());
    }

    for issue in &issues {
        warn!("{ISSUE_PREFIX} {issue}");
    }
    Ok(issues)
}

/// Runs every check and returns all issues in discovery order.
///
/// Checks are independent: one field may produce several issues.
///
/// # Examples
///
/// ```
/// use tool_schema_core::*;
///
/// let count = FieldDefinition::new("count")
///     .with_type("number")
///     .with_enum(["one", "two"]);
/// let issues = collect_issues(&[count]);
/// assert_eq!(issues.len(), 2);
/// assert!(issues[0].to_string().contains("\"one\""));
/// assert!(issues[1].to_string().contains("\"two\""));
/// ```
pub fn collect_issues(fields: &[FieldDefinition]) -> Vec<SchemaIssue> {
    let mut issues = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for field in fields {
        if !seen.insert(field.name.as_str()) {
            issues.push(SchemaIssue::DuplicateName(field.name.clone()));
        }
        issues.extend(check_field(field));
    }

    issues
}

/// One issue per repeated name, in list order.
fn duplicate_names(fields: &[FieldDefinition]) -> Vec<SchemaIssue> {
    let mut seen: HashSet<&str> = HashSet::new();
    fields
        .iter()
        .filter(|field| !seen.insert(field.name.as_str()))
        .map(|field| SchemaIssue::DuplicateName(field.name.clone()))
        .collect()
}

fn check_field(field: &FieldDefinition) -> Vec<SchemaIssue> {
    let mut issues = Vec::new();
    let schema_type = field.schema_type();
    let name = || field.name.clone();

    if let Some(pattern) = &field.pattern {
        if schema_type != SchemaType::String {
            issues.push(SchemaIssue::PatternOnNonString {
                name: name(),
                schema_type,
            });
        }
        if let Err(err) = Regex::new(pattern) {
            issues.push(SchemaIssue::InvalidPattern {
                name: name(),
                reason: err.to_string(),
            });
        }
    }

    if (field.min.is_some() || field.max.is_some()) && schema_type != SchemaType::Number {
        issues.push(SchemaIssue::NumericBoundsOnNonNumber {
            name: name(),
            schema_type,
        });
    }

    if (field.min_length.is_some() || field.max_length.is_some())
        && schema_type != SchemaType::String
    {
        issues.push(SchemaIssue::LengthBoundsOnNonString {
            name: name(),
            schema_type,
        });
    }

    if let Some(values) = &field.enum_values {
        for value in values {
            if value.schema_type() != schema_type {
                issues.push(SchemaIssue::EnumTypeMismatch {
                    name: name(),
                    // JSON form, so string literals show up quoted
                    value: serde_json::to_string(value).unwrap_or_else(|_| value.to_string()),
                    value_type: value.type_name(),
                    schema_type,
                });
            }
        }
    }

    if let Some(options) = &field.one_of {
        let projected = options.iter().map(|o| &o.value);
        let matches = field
            .enum_values
            .as_ref()
            .is_some_and(|values| values.iter().eq(projected));
        if !matches {
            issues.push(SchemaIssue::OptionsMismatch { name: name() });
        }
    }

    issues
}
