//! Tool scopes, cached schema computation, and registration sinks.
//!
//! This crate wires the engine in `tool-schema-core` into the lifecycle of a
//! host application:
//!
//! - [`ToolScope`]: one logical tool. Owns its dynamic field table, static
//!   overrides, and a fingerprint-keyed cache of the compiled schema.
//! - [`FieldScope`]: a registration handle that unregisters its fields on
//!   drop.
//! - [`RegistrationSink`]: where compiled tools go; [`MemorySink`] keeps
//!   them in memory.
//! - [`EngineConfig`]: YAML-loadable validation settings.
//!
//! # Quick start
//!
//! ```
//! use serde_json::json;
//! use tool_schema_core::FieldDefinition;
//! use tool_schema_extract::{Node, extract_fields};
//! use tool_schema_host::{EngineConfig, MemorySink, ToolDefinition, ToolScope};
//!
//! let tree: Node = serde_json::from_value(json!({
//!     "children": [{"props": {"name": "city", "required": true}}]
//! }))
//! .unwrap();
//!
//! let mut scope = ToolScope::builder(ToolDefinition::new("weather", "Get the forecast", |v| Ok(v)))
//!     .config(EngineConfig::development())
//!     .build();
//!
//! let mut units = scope.field_scope();
//! units.register(FieldDefinition::new("units").with_enum(["metric", "imperial"]));
//!
//! let tool = scope.compute_from_tree(&tree).unwrap();
//! assert_eq!(tool.schema.property_names(), vec!["city", "units"]);
//!
//! let mut sink = MemorySink::new();
//! scope.publish(&extract_fields(&tree), &mut sink).unwrap();
//! assert!(sink.get("weather").is_some());
//! ```

mod config;
mod error;
mod fields;
mod scope;
mod sink;

pub use config::EngineConfig;
pub use error::{HostError, Result};
pub use fields::FieldScope;
pub use scope::{CacheKey, CompiledTool, ToolScope, ToolScopeBuilder, schema_checksum};
pub use sink::{
    MemorySink, RegistrationSink, ToolDefinition, ToolDescriptor, ToolHandler, ToolRegistration,
    ToolSignal,
};
