//! Tool scopes with fingerprint-gated recomputation.
//!
//! A [`ToolScope`] is one logical tool instance. It owns the tool's table of
//! dynamically registered fields, its static overrides, and a cache of the
//! last compiled result. Recomputation is keyed by a [`CacheKey`] built from
//! the fingerprints of all three field sources: when the key is unchanged,
//! [`ToolScope::compute`] hands back the cached [`CompiledTool`] itself, even
//! if the caller rebuilt its inputs from scratch.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use tool_schema_core::{FieldDefinition, FieldOverride, OverrideMap};
//! use tool_schema_host::{EngineConfig, ToolDefinition, ToolScope};
//!
//! let mut overrides = OverrideMap::new();
//! overrides.insert("email".into(), FieldOverride::default().with_description("Recipient"));
//!
//! let mut scope = ToolScope::builder(ToolDefinition::new("send", "Send mail", |v| Ok(v)))
//!     .config(EngineConfig::development())
//!     .overrides(overrides)
//!     .build();
//!
//! let tree = vec![FieldDefinition::new("email").with_type("email")];
//! let first = scope.compute(&tree).unwrap();
//! let again = scope.compute(&tree.clone()).unwrap();
//! assert!(Arc::ptr_eq(&first, &again));
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tool_schema_core::{
    CompiledSchema, FieldDefinition, FieldOverride, FieldRegistry, MergedFields, OverrideMap,
    SchemaIssue, compile, fingerprint_fields, fingerprint_override_map, merge_fields,
    validate_merge,
};
use tool_schema_extract::{Node, extract_fields};
use tracing::{debug, trace};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::fields::FieldScope;
use crate::sink::{RegistrationSink, ToolDefinition, ToolRegistration, ToolSignal};

/// Fingerprints of the three field sources behind a compiled tool.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub tree: String,
    pub overrides: String,
    pub registered: String,
}

/// Result of one recomputation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTool {
    /// Merged fields the schema was compiled from.
    pub merged: MergedFields,
    /// Compiled input schema.
    pub schema: Arc<CompiledSchema>,
    /// SHA-256 hex digest of the serialized schema.
    pub checksum: String,
    /// Issues reported by non-strict validation.
    pub issues: Vec<SchemaIssue>,
}

/// Computes the SHA-256 hex digest of a schema's compact JSON form.
///
/// # Examples
///
/// ```
/// use tool_schema_core::compile;
/// use tool_schema_host::schema_checksum;
///
/// let checksum = schema_checksum(&compile(&[]));
/// assert_eq!(checksum.len(), 64);
/// ```
pub fn schema_checksum(schema: &CompiledSchema) -> String {
    let hash = Sha256::digest(schema.to_json_string().as_bytes());
    format!("{:x}", hash)
}

/// Builder for [`ToolScope`].
#[derive(Debug)]
pub struct ToolScopeBuilder {
    definition: ToolDefinition,
    config: EngineConfig,
    overrides: OverrideMap,
}

impl ToolScopeBuilder {
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn overrides(mut self, overrides: OverrideMap) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn build(self) -> ToolScope {
        ToolScope {
            definition: self.definition,
            config: self.config,
            overrides: self.overrides,
            registry: Rc::new(RefCell::new(FieldRegistry::new())),
            cache: None,
            published: None,
        }
    }
}

/// One logical tool: its definition, field sources, and compiled cache.
///
/// The registration table belongs to this scope alone; nested contributors
/// get [`FieldScope`] handles to it through [`field_scope`](Self::field_scope).
#[derive(Debug)]
pub struct ToolScope {
    definition: ToolDefinition,
    config: EngineConfig,
    overrides: OverrideMap,
    registry: Rc<RefCell<FieldRegistry>>,
    cache: Option<(CacheKey, Arc<CompiledTool>)>,
    published: Option<String>,
}

impl ToolScope {
    /// Creates a scope with default configuration and no overrides.
    pub fn new(definition: ToolDefinition) -> Self {
        Self::builder(definition).build()
    }

    pub fn builder(definition: ToolDefinition) -> ToolScopeBuilder {
        ToolScopeBuilder {
            definition,
            config: EngineConfig::default(),
            overrides: OverrideMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn overrides(&self) -> &OverrideMap {
        &self.overrides
    }

    /// Replaces the static override map.
    pub fn set_overrides(&mut self, overrides: OverrideMap) {
        self.overrides = overrides;
    }

    /// Sets or replaces the override for one field.
    pub fn set_override(&mut self, name: impl Into<String>, attributes: FieldOverride) {
        self.overrides.insert(name.into(), attributes);
    }

    /// Returns a new registration handle for this tool's field table.
    pub fn field_scope(&self) -> FieldScope {
        FieldScope::new(&self.registry)
    }

    /// Names of the currently registered fields, sorted.
    pub fn registered_names(&self) -> Vec<String> {
        self.registry
            .borrow()
            .names()
            .into_iter()
            .map(String::from)
            .collect()
    }

    /// Current cache key for the given tree fields.
    pub fn cache_key(&self, tree_fields: &[FieldDefinition]) -> CacheKey {
        CacheKey {
            tree: fingerprint_fields(tree_fields),
            overrides: fingerprint_override_map(&self.overrides),
            registered: self.registry.borrow().fingerprint(),
        }
    }

    /// Merges, validates, and compiles the tool's fields.
    ///
    /// When the fingerprints of all three sources match the previous call,
    /// the previous result is returned as the same `Arc`.
    ///
    /// # Errors
    ///
    /// Returns [`Validation`](crate::HostError::Validation) when strict
    /// validation is configured and the merged fields have an issue, or the
    /// tree fields repeat a name. Failed
    /// computations are not cached.
    pub fn compute(&mut self, tree_fields: &[FieldDefinition]) -> Result<Arc<CompiledTool>> {
        let key = self.cache_key(tree_fields);
        if let Some((cached_key, tool)) = &self.cache {
            if *cached_key == key {
                trace!(tool = %self.definition.name, "Field fingerprints unchanged; reusing schema");
                return Ok(Arc::clone(tool));
            }
        }

        let merged = merge_fields(tree_fields, &self.overrides, &self.registry.borrow());
        let fields = merged.to_fields();
        let issues = validate_merge(tree_fields, &fields, &self.config.validate_options())?;
        let schema = compile(&fields);
        let checksum = schema_checksum(&schema);

        debug!(
            tool = %self.definition.name,
            fields = fields.len(),
            issues = issues.len(),
            checksum = %checksum,
            "Compiled tool schema"
        );

        let tool = Arc::new(CompiledTool {
            merged,
            schema: Arc::new(schema),
            checksum,
            issues,
        });
        self.cache = Some((key, Arc::clone(&tool)));
        Ok(tool)
    }

    /// Extracts fields from a UI tree, then [`compute`](Self::compute)s.
    ///
    /// # Errors
    ///
    /// Same as [`compute`](Self::compute).
    pub fn compute_from_tree(&mut self, tree: &Node) -> Result<Arc<CompiledTool>> {
        let tree_fields = extract_fields(tree);
        self.compute(&tree_fields)
    }

    /// Computes the tool and registers it with `sink`.
    ///
    /// The sink is only called when the schema checksum differs from the
    /// last successful publish.
    ///
    /// # Errors
    ///
    /// Returns validation errors from [`compute`](Self::compute) and any
    /// error the sink reports.
    pub fn publish(
        &mut self,
        tree_fields: &[FieldDefinition],
        sink: &mut dyn RegistrationSink,
    ) -> Result<Arc<CompiledTool>> {
        let tool = self.compute(tree_fields)?;
        if self.published.as_deref() == Some(tool.checksum.as_str()) {
            trace!(tool = %self.definition.name, "Schema unchanged; skipping re-registration");
            return Ok(tool);
        }

        let registration = ToolRegistration::new(
            &self.definition,
            Arc::clone(&tool.schema),
            tool.checksum.clone(),
        );
        sink.register_tool(registration)?;
        debug!(tool = %self.definition.name, checksum = %tool.checksum, "Registered tool");
        self.published = Some(tool.checksum.clone());
        Ok(tool)
    }

    /// Withdraws the tool from `sink`.
    pub fn unpublish(&mut self, sink: &mut dyn RegistrationSink) {
        sink.unregister_tool(&self.definition.name);
        self.published = None;
    }

    /// Returns `true` when `signal` is addressed to this tool.
    pub fn matches_signal(&self, signal: &ToolSignal) -> bool {
        signal.target() == self.definition.name
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tool_schema_core::ValidationError;

    use super::*;
    use crate::error::HostError;
    use crate::sink::MemorySink;

    fn scope(config: EngineConfig) -> ToolScope {
        ToolScope::builder(ToolDefinition::new("send", "Send a message", |_| Ok(json!(null))))
            .config(config)
            .build()
    }

    #[test]
    fn test_compute_reuses_cache_for_equal_inputs() {
        let mut scope = scope(EngineConfig::development());
        let first = scope
            .compute(&[FieldDefinition::new("to").with_enum(["a", "b"])])
            .unwrap();
        let second = scope
            .compute(&[FieldDefinition::new("to").with_enum(vec!["a".to_string(), "b".to_string()])])
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_compute_recomputes_when_registry_changes() {
        let mut scope = scope(EngineConfig::development());
        let tree = vec![FieldDefinition::new("to")];
        let before = scope.compute(&tree).unwrap();

        let mut fields = scope.field_scope();
        fields.register(FieldDefinition::new("to").with_description("Recipient"));
        let during = scope.compute(&tree).unwrap();
        assert!(!Arc::ptr_eq(&before, &during));
        assert_ne!(before.checksum, during.checksum);

        drop(fields);
        let after = scope.compute(&tree).unwrap();
        assert_eq!(after.schema, before.schema);
        assert_eq!(after.checksum, before.checksum);
    }

    #[test]
    fn test_compute_recomputes_when_overrides_change() {
        let mut scope = scope(EngineConfig::development());
        let tree = vec![FieldDefinition::new("to")];
        let before = scope.compute(&tree).unwrap();

        scope.set_override("to", FieldOverride::default().required(true));
        let after = scope.compute(&tree).unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.schema.required, vec!["to"]);
    }

    #[test]
    fn test_strict_config_surfaces_validation_error() {
        let mut scope = scope(EngineConfig {
            dev_mode: true,
            strict: true,
        });
        let err = scope
            .compute(&[FieldDefinition::new("n").with_type("number").with_enum(["x"])])
            .unwrap_err();
        assert!(matches!(err, HostError::Validation(ValidationError(_))));
        assert!(err.to_string().starts_with("[tool-schema]"));
    }

    #[test]
    fn test_non_strict_config_records_issues() {
        let mut scope = scope(EngineConfig::development());
        let tool = scope
            .compute(&[FieldDefinition::new("flag").with_type("checkbox").with_max(1)])
            .unwrap();
        assert_eq!(tool.issues.len(), 1);
    }

    #[test]
    fn test_tree_duplicates_are_reported() {
        let radio = vec![
            FieldDefinition::new("plan").with_enum(["free"]),
            FieldDefinition::new("plan").with_enum(["pro"]),
        ];

        let mut lenient = scope(EngineConfig::development());
        let tool = lenient.compute(&radio).unwrap();
        assert_eq!(tool.issues, vec![SchemaIssue::DuplicateName("plan".into())]);
        assert_eq!(tool.merged.len(), 1);

        let mut strict = scope(EngineConfig {
            dev_mode: true,
            strict: true,
        });
        let err = strict.compute(&radio).unwrap_err();
        assert_eq!(err.to_string(), "[tool-schema] duplicate field name: plan");
    }

    #[test]
    fn test_production_config_skips_validation() {
        let mut scope = scope(EngineConfig::production());
        let tool = scope
            .compute(&[FieldDefinition::new("flag").with_type("checkbox").with_max(1)])
            .unwrap();
        assert!(tool.issues.is_empty());
    }

    #[test]
    fn test_publish_skips_unchanged_schema() {
        let mut scope = scope(EngineConfig::development());
        let mut sink = MemorySink::new();
        let tree = vec![FieldDefinition::new("to")];

        scope.publish(&tree, &mut sink).unwrap();
        scope.publish(&tree, &mut sink).unwrap();
        assert_eq!(sink.registration_count(), 1);

        scope.set_override("to", FieldOverride::default().with_title("To"));
        scope.publish(&tree, &mut sink).unwrap();
        assert_eq!(sink.registration_count(), 2);

        scope.unpublish(&mut sink);
        assert!(sink.is_empty());
        scope.publish(&tree, &mut sink).unwrap();
        assert_eq!(sink.registration_count(), 3);
    }

    #[test]
    fn test_matches_signal_by_target() {
        let scope = scope(EngineConfig::production());
        assert!(scope.matches_signal(&ToolSignal::Activated("send".into())));
        assert!(!scope.matches_signal(&ToolSignal::Cancelled("other".into())));
    }
}
