//! The boundary between a tool scope and whatever runtime exposes tools.
//!
//! A [`RegistrationSink`] receives a [`ToolRegistration`]: the compiled input
//! schema produced by this workspace plus everything else the host declared
//! about the tool ([`ToolDefinition`]), passed through unchanged. The execute
//! handler is opaque; it is never compared, hashed, or fingerprinted.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tool_schema_core::CompiledSchema;

use crate::error::{HostError, Result};

/// Callback invoked when an agent calls the tool.
pub type ToolHandler = Arc<dyn Fn(Value) -> std::result::Result<Value, String> + Send + Sync>;

/// Everything a host declares about a tool except its input schema.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tool_schema_host::ToolDefinition;
///
/// let tool = ToolDefinition::new("send_email", "Send an email", |input| Ok(input))
///     .with_annotations(json!({"destructiveHint": false}));
/// assert_eq!(tool.invoke(json!({"to": "a@b.c"})), Ok(json!({"to": "a@b.c"})));
/// ```
#[derive(Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub output_schema: Option<Value>,
    pub annotations: Option<Value>,
    pub execute: ToolHandler,
}

impl ToolDefinition {
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, execute: F) -> Self
    where
        F: Fn(Value) -> std::result::Result<Value, String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            output_schema: None,
            annotations: None,
            execute: Arc::new(execute),
        }
    }

    pub fn with_output_schema(mut self, schema: Value) -> Self {
        self.output_schema = Some(schema);
        self
    }

    pub fn with_annotations(mut self, annotations: Value) -> Self {
        self.annotations = Some(annotations);
        self
    }

    /// Calls the execute handler.
    pub fn invoke(&self, input: Value) -> std::result::Result<Value, String> {
        (self.execute)(input)
    }
}

impl fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("output_schema", &self.output_schema)
            .field("annotations", &self.annotations)
            .finish_non_exhaustive()
    }
}

/// A tool ready to be exposed: definition plus compiled input schema.
#[derive(Clone)]
pub struct ToolRegistration {
    pub name: String,
    pub description: String,
    pub input_schema: Arc<CompiledSchema>,
    /// SHA-256 hex digest of the serialized input schema.
    pub schema_checksum: String,
    pub output_schema: Option<Value>,
    pub annotations: Option<Value>,
    pub execute: ToolHandler,
}

impl ToolRegistration {
    pub(crate) fn new(
        definition: &ToolDefinition,
        input_schema: Arc<CompiledSchema>,
        schema_checksum: String,
    ) -> Self {
        Self {
            name: definition.name.clone(),
            description: definition.description.clone(),
            input_schema,
            schema_checksum,
            output_schema: definition.output_schema.clone(),
            annotations: definition.annotations.clone(),
            execute: Arc::clone(&definition.execute),
        }
    }

    /// Renders the registration in the `{name, description, inputSchema, ...}`
    /// shape tool runtimes expect. The handler is not part of it.
    pub fn descriptor(&self) -> ToolDescriptor<'_> {
        ToolDescriptor {
            name: &self.name,
            description: &self.description,
            input_schema: &self.input_schema,
            output_schema: self.output_schema.as_ref(),
            annotations: self.annotations.as_ref(),
        }
    }

    /// Calls the execute handler.
    pub fn invoke(&self, input: Value) -> std::result::Result<Value, String> {
        (self.execute)(input)
    }
}

impl fmt::Debug for ToolRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistration")
            .field("name", &self.name)
            .field("schema_checksum", &self.schema_checksum)
            .finish_non_exhaustive()
    }
}

/// Serializable view of a [`ToolRegistration`].
///
/// Borrows the compiled schema, so `inputSchema` keeps the compiler's
/// property order when written out.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub input_schema: &'a CompiledSchema,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<&'a Value>,
}

impl ToolDescriptor<'_> {
    /// Serializes to compact JSON.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Consumer of compiled tools.
///
/// Registering a name that is already registered replaces the previous
/// registration.
pub trait RegistrationSink {
    /// Exposes (or re-exposes) a tool.
    ///
    /// # Errors
    ///
    /// Returns [`Rejected`](HostError::Rejected) when the sink refuses the
    /// tool.
    fn register_tool(&mut self, registration: ToolRegistration) -> Result<()>;

    /// Withdraws a tool. Unknown names are ignored.
    fn unregister_tool(&mut self, name: &str);
}

/// In-memory sink keyed by tool name.
///
/// # Examples
///
/// ```
/// use tool_schema_host::{MemorySink, ToolDefinition, ToolScope};
///
/// let mut scope = ToolScope::new(ToolDefinition::new("noop", "Does nothing", |v| Ok(v)));
/// let mut sink = MemorySink::new();
/// scope.publish(&[], &mut sink).unwrap();
///
/// assert_eq!(sink.names(), vec!["noop"]);
/// assert_eq!(sink.registration_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemorySink {
    tools: BTreeMap<String, ToolRegistration>,
    registrations: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ToolRegistration> {
        self.tools.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Number of successful `register_tool` calls, including replacements.
    pub fn registration_count(&self) -> usize {
        self.registrations
    }
}

impl RegistrationSink for MemorySink {
    fn register_tool(&mut self, registration: ToolRegistration) -> Result<()> {
        if registration.name.trim().is_empty() {
            return Err(HostError::Rejected("tool name cannot be empty".to_string()));
        }
        self.tools.insert(registration.name.clone(), registration);
        self.registrations += 1;
        Ok(())
    }

    fn unregister_tool(&mut self, name: &str) {
        self.tools.remove(name);
    }
}

/// External activation and cancellation events addressed to a tool.
///
/// # Examples
///
/// ```
/// use tool_schema_host::ToolSignal;
///
/// let signal: ToolSignal =
///     serde_json::from_str(r#"{"event":"activated","target":"send_email"}"#).unwrap();
/// assert_eq!(signal.target(), "send_email");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "target", rename_all = "snake_case")]
pub enum ToolSignal {
    /// The tool was invoked from outside.
    Activated(String),
    /// A running invocation was cancelled.
    Cancelled(String),
}

impl ToolSignal {
    /// Name of the tool the signal is addressed to.
    pub fn target(&self) -> &str {
        match self {
            Self::Activated(target) | Self::Cancelled(target) => target,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tool_schema_core::{FieldDefinition, compile};

    use super::*;

    fn registration(name: &str) -> ToolRegistration {
        let definition = ToolDefinition::new(name, "test tool", |_| Ok(json!("done")))
            .with_output_schema(json!({"type": "string"}));
        let schema = compile(&[FieldDefinition::new("q").required(true)]);
        ToolRegistration::new(&definition, Arc::new(schema), "abc".to_string())
    }

    #[test]
    fn test_descriptor_passes_definition_through() {
        let registration = registration("search");
        let descriptor = serde_json::to_value(registration.descriptor()).unwrap();
        assert_eq!(
            descriptor,
            json!({
                "name": "search",
                "description": "test tool",
                "inputSchema": {
                    "type": "object",
                    "properties": {"q": {"type": "string"}},
                    "required": ["q"]
                },
                "outputSchema": {"type": "string"}
            })
        );
    }

    #[test]
    fn test_descriptor_keeps_compiled_property_order() {
        let definition = ToolDefinition::new("pick", "Pick fruit", |v| Ok(v));
        let schema = compile(&[
            FieldDefinition::new("Banana"),
            FieldDefinition::new("apple").required(true),
        ]);
        let expected = schema.to_json_string();
        let registration = ToolRegistration::new(&definition, Arc::new(schema), "abc".into());

        let rendered = registration.descriptor().to_json_string();
        assert_eq!(
            rendered,
            format!(r#"{{"name":"pick","description":"Pick fruit","inputSchema":{expected}}}"#)
        );
        assert!(rendered.find("\"apple\"").unwrap() < rendered.find("\"Banana\"").unwrap());
    }

    #[test]
    fn test_memory_sink_replaces_and_unregisters() {
        let mut sink = MemorySink::new();
        sink.register_tool(registration("search")).unwrap();
        sink.register_tool(registration("search")).unwrap();
        assert_eq!(sink.names(), vec!["search"]);
        assert_eq!(sink.registration_count(), 2);

        sink.unregister_tool("search");
        sink.unregister_tool("never-there");
        assert!(sink.is_empty());
    }

    #[test]
    fn test_memory_sink_rejects_empty_name() {
        let mut sink = MemorySink::new();
        let err = sink.register_tool(registration(" ")).unwrap_err();
        assert!(matches!(err, HostError::Rejected(_)));
    }

    #[test]
    fn test_registration_invokes_handler() {
        assert_eq!(registration("x").invoke(json!({})), Ok(json!("done")));
    }

    #[test]
    fn test_signal_serde_shape() {
        let signal = ToolSignal::Cancelled("search".into());
        assert_eq!(
            serde_json::to_value(&signal).unwrap(),
            json!({"event": "cancelled", "target": "search"})
        );
    }
}
