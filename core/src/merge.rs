//! Three-way field merging with fixed precedence.
//!
//! Fields for one tool come from three sources. [`merge_fields`] layers them
//! in increasing priority:
//!
//! 1. fields extracted from the UI tree,
//! 2. the static [`OverrideMap`],
//! 3. fields registered at runtime through a [`FieldRegistry`].
//!
//! A higher-priority source only wins for the attributes it actually sets;
//! anything it leaves unset falls back to the lower sources. The result holds
//! the union of every source's names.
//!
//! # Example
//!
//! ```
//! use tool_schema_core::*;
//!
//! let tree = vec![FieldDefinition::new("email").with_type("email")];
//!
//! let mut overrides = OverrideMap::new();
//! overrides.insert("email".into(), FieldOverride::default().with_description("Recipient"));
//!
//! let mut registry = FieldRegistry::new();
//! registry.register(FieldDefinition::new("email").with_description("Context override"));
//!
//! let merged = merge_fields(&tree, &overrides, &registry);
//! let email = merged.get("email").unwrap();
//! assert_eq!(email.field_type.as_deref(), Some("email"));
//! assert_eq!(email.description.as_deref(), Some("Context override"));
//! ```

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::fingerprint::{RECORD_SEPARATOR, fingerprint_field};
use crate::{FieldDefinition, FieldOverride, OverrideMap};

/// Name-keyed table of dynamically registered fields.
///
/// Owned by a single tool instance; it is never shared between tools.
///
/// # Examples
///
/// ```
/// use tool_schema_core::{FieldDefinition, FieldRegistry};
///
/// let mut registry = FieldRegistry::new();
/// registry.register(FieldDefinition::new("topic"));
/// assert!(registry.contains("topic"));
///
/// registry.unregister("topic");
/// registry.unregister("never-registered"); // no-op
/// assert!(registry.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRegistry {
    fields: BTreeMap<String, FieldDefinition>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a field, replacing any field previously registered under
    /// the same name.
    ///
    /// Fields with an empty name are ignored with a warning.
    pub fn register(&mut self, field: FieldDefinition) {
        if field.name.trim().is_empty() {
            warn!("ignoring registration of a field with an empty name");
            return;
        }
        self.fields.insert(field.name.clone(), field);
    }

    /// Removes a registered field. Unknown names are ignored.
    pub fn unregister(&mut self, name: &str) -> Option<FieldDefinition> {
        self.fields.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    /// Registered fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.values()
    }

    /// Fingerprints the table in name order, independent of the order in
    /// which fields were registered.
    pub fn fingerprint(&self) -> String {
        self.fields
            .values()
            .map(fingerprint_field)
            .collect::<Vec<_>>()
            .join(&RECORD_SEPARATOR.to_string())
    }
}

/// Result of [`merge_fields`]: exactly one field per name.
///
/// Iteration order is by name; the compiler applies its own ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedFields {
    fields: BTreeMap<String, FieldDefinition>,
}

impl MergedFields {
    pub fn get(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.values()
    }

    /// Returns the merged fields as a list, ordered by name.
    pub fn to_fields(&self) -> Vec<FieldDefinition> {
        self.fields.values().cloned().collect()
    }

    fn layer(&mut self, name: &str, attributes: &FieldOverride) {
        match self.fields.get_mut(name) {
            Some(existing) => existing.apply(attributes),
            None => {
                self.fields.insert(
                    name.to_string(),
                    FieldDefinition::from_override(name, attributes),
                );
            }
        }
    }
}

/// Merges tree-extracted fields, static overrides, and registered fields.
///
/// Tree fields are keyed by name; a later duplicate replaces an earlier one.
/// Overrides and registered fields are then layered attribute by attribute,
/// registered fields last. Insertion order of the override map and the
/// registry has no effect on the result.
pub fn merge_fields(
    tree_fields: &[FieldDefinition],
    overrides: &OverrideMap,
    registry: &FieldRegistry,
) -> MergedFields {
    let mut merged = MergedFields::default();

    for field in tree_fields {
        if field.name.is_empty() {
            continue;
        }
        if merged.fields.insert(field.name.clone(), field.clone()).is_some() {
            debug!(field = %field.name, "Duplicate tree field replaces an earlier one");
        }
    }

    for (name, attributes) in overrides {
        if name.is_empty() {
            continue;
        }
        merged.layer(name, attributes);
    }

    for field in registry.iter() {
        merged.layer(&field.name, &FieldOverride::from(field));
    }

    merged
}
