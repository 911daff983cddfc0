//! Field collection, merging, and schema compilation for agent-callable tools.
//!
//! This crate defines the engine that turns field descriptions into the input
//! schema of a tool:
//!
//! - [`FieldDefinition`]: one declared parameter with type hint and
//!   constraints; [`FieldOverride`] is its partial form.
//! - [`merge_fields`]: layers tree-extracted fields, an [`OverrideMap`], and
//!   a [`FieldRegistry`] of dynamically registered fields, in that priority.
//! - [`compile`]: renders fields into a deterministic, name-ordered
//!   [`CompiledSchema`].
//! - [`fingerprint_field`] and friends: canonical strings used to skip
//!   recomputation when nothing changed.
//!
//! Validation ([`collect_issues`], [`validate_fields`]) catches structural
//! mistakes such as duplicate names and constraints that do not fit the
//! compiled type.
//!
//! # Example
//!
//! ```
//! use tool_schema_core::*;
//!
//! let tree = vec![
//!     FieldDefinition::new("email").with_type("email").required(true),
//!     FieldDefinition::new("count").with_type("number").with_min(1),
//! ];
//! let mut overrides = OverrideMap::new();
//! overrides.insert("email".into(), FieldOverride::default().with_description("Recipient"));
//!
//! let merged = merge_fields(&tree, &overrides, &FieldRegistry::new());
//! assert!(collect_issues(&merged.to_fields()).is_empty());
//!
//! let schema = compile_merged(&merged);
//! assert_eq!(schema.property_names(), vec!["count", "email"]);
//! assert_eq!(schema.required, vec!["email"]);
//! ```

mod compile;
mod fingerprint;
mod merge;
mod types;
mod validate;

pub use compile::{
    CompiledSchema, ConstOption, Properties, PropertySchema, compare_names, compile,
    compile_merged,
};
pub use fingerprint::{
    ATTRIBUTE_SEPARATOR, RECORD_SEPARATOR, fingerprint_field, fingerprint_fields,
    fingerprint_override, fingerprint_override_map,
};
pub use merge::{FieldRegistry, MergedFields, merge_fields};
pub use types::*;
pub use validate::{
    ISSUE_PREFIX, SchemaIssue, ValidateOptions, ValidationError, collect_issues, validate_fields,
    validate_merge,
};
