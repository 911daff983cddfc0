//! End-to-end pipeline for a single form.
//!
//! Extracts fields from a UI tree, layers static overrides on top, compiles
//! the input schema, and publishes the tool to an in-memory sink.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p tool-schema-demos --example contact_form
//! ```

use serde_json::json;
use tool_schema_core::{FieldOverride, OverrideMap};
use tool_schema_extract::{Node, extract_fields};
use tool_schema_host::{EngineConfig, MemorySink, ToolDefinition, ToolScope};

fn main() {
    let tree: Node = serde_json::from_value(json!({
        "props": {"className": "contact"},
        "children": [
            {"props": {"name": "email", "type": "email", "required": true}},
            {"props": {"inputProps": {"name": "subject", "maxLength": 120}}},
            {"props": {"name": "priority"}, "children": [
                {"props": {"value": "low"}, "children": ["Low"]},
                {"props": {"value": "normal"}, "children": ["Normal"]},
                {"props": {"value": "high"}, "children": ["High"]}
            ]},
            "Fields marked * are required"
        ]
    }))
    .unwrap();

    let fields = extract_fields(&tree);
    println!("Extracted {} fields:", fields.len());
    for field in &fields {
        println!(
            "  {} ({}){}",
            field.name,
            field.schema_type(),
            if field.is_required() { " *" } else { "" }
        );
    }
    println!();

    let mut overrides = OverrideMap::new();
    overrides.insert(
        "email".to_string(),
        FieldOverride::default().with_description("Where the reply is sent"),
    );
    overrides.insert(
        "subject".to_string(),
        FieldOverride::default().with_title("Subject line"),
    );

    let definition = ToolDefinition::new("send_message", "Send a contact message", |input| {
        Ok(json!({"queued": true, "input": input}))
    })
    .with_annotations(json!({"destructiveHint": false}));

    let mut scope = ToolScope::builder(definition)
        .config(EngineConfig::development())
        .overrides(overrides)
        .build();

    let mut sink = MemorySink::new();
    let tool = scope.publish(&fields, &mut sink).unwrap();

    println!("Compiled schema:");
    println!("{}", tool.schema.to_json_string_pretty());
    println!();
    println!("Checksum: {}", tool.checksum);
    println!("Issues:   {}", tool.issues.len());

    // Publishing again with the same inputs reuses the cached result.
    scope.publish(&fields, &mut sink).unwrap();
    println!("Registrations sent to sink: {}", sink.registration_count());

    if let Some(registration) = sink.get("send_message") {
        let reply = registration
            .invoke(json!({"email": "ada@example.com", "subject": "Hello"}))
            .unwrap();
        println!("Invocation result: {reply}");
    }
}
