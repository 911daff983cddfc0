//! Fields contributed at runtime by nested components.
//!
//! A `FieldScope` registers fields into its tool; dropping the handle
//! removes them again, and the next compile reflects that.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p tool-schema-demos --example dynamic_fields
//! ```

use tool_schema_core::{FieldDefinition, OptionPair};
use tool_schema_host::{ToolDefinition, ToolScope};

fn main() {
    let tree_fields = vec![FieldDefinition::new("query").required(true)];
    let mut scope = ToolScope::new(ToolDefinition::new("search", "Search the catalog", |v| Ok(v)));

    let before = scope.compute(&tree_fields).unwrap();
    println!("Without filters: {:?}", before.schema.property_names());

    {
        let mut filters = scope.field_scope();
        filters.register(
            FieldDefinition::new("category").with_options(vec![
                OptionPair::new("books", "Books"),
                OptionPair::new("music", "Music"),
            ]),
        );
        filters.register(
            FieldDefinition::new("max_price")
                .with_type("number")
                .with_min(0),
        );

        let with_filters = scope.compute(&tree_fields).unwrap();
        println!("With filters:    {:?}", with_filters.schema.property_names());
        println!("{}", with_filters.schema.to_json_string_pretty());
    }

    let after = scope.compute(&tree_fields).unwrap();
    println!("After teardown:  {:?}", after.schema.property_names());
    println!("Leftover registrations: {:?}", scope.registered_names());
}
