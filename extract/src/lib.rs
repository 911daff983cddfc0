//! Tool input field extraction from declarative UI trees.
//!
//! This crate walks a framework-independent [`Node`] tree and derives the
//! [`FieldDefinition`]s a tool's inputs are made of, the way a form's named
//! controls describe what the form submits. Enumerable controls also yield
//! their value/label [`OptionPair`]s.
//!
//! # Main entry points
//!
//! - [`extract_fields`]: collect field candidates in pre-order.
//! - [`extract_options`]: collect value/label pairs beneath a node.
//!
//! # Example
//!
//! ```
//! use tool_schema_extract::{Element, Node, extract_fields};
//!
//! let form = Node::from(
//!     Element::new()
//!         .with_child(Element::new().with_prop("name", "email").with_prop("type", "email"))
//!         .with_child(Element::new().with_child("Just a caption")),
//! );
//!
//! let fields = extract_fields(&form);
//! assert_eq!(fields.len(), 1);
//! assert_eq!(fields[0].field_type.as_deref(), Some("email"));
//! ```
//!
//! [`FieldDefinition`]: tool_schema_core::FieldDefinition
//! [`OptionPair`]: tool_schema_core::OptionPair

pub mod extractor;
pub mod node;

pub use extractor::{NAME_PATHS, extract_fields, extract_options};
pub use node::{Element, Node};
