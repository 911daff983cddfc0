//! Framework-independent UI node model.
//!
//! Hosts adapt their native component tree into [`Node`] values before
//! handing them to the extractor. The model is deliberately small: an element
//! is a property bag plus ordered children, and everything else is either text
//! or empty content.
//!
//! Nodes deserialize from plain JSON: a string or number is a text node,
//! `null` and booleans are empty content, an array is an anonymous wrapper
//! element, and an object with optional `props` and `children` keys is an
//! element. Deserialization never fails on shape: a `props` that is not an
//! object becomes an empty bag, and a single non-array `children` value is
//! treated as the only child.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use tool_schema_extract::{Element, Node};
//!
//! let from_json: Node = serde_json::from_value(json!({
//!     "props": {"name": "email", "type": "email"},
//!     "children": ["Email"]
//! }))
//! .unwrap();
//!
//! let built = Node::from(
//!     Element::new()
//!         .with_prop("name", "email")
//!         .with_prop("type", "email")
//!         .with_child("Email"),
//! );
//! assert_eq!(from_json, built);
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One node of a UI tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    /// Empty content (e.g. a conditional that rendered nothing).
    Empty,
    /// Literal text content.
    Text(String),
    /// An element with a property bag and children.
    Element(Element),
}

impl Node {
    /// Creates a text node.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Converts arbitrary JSON into a node without failing.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null | Value::Bool(_) => Self::Empty,
            Value::Number(n) => Self::Text(n.to_string()),
            Value::String(s) => Self::Text(s),
            Value::Array(items) => Self::Element(Element {
                props: Map::new(),
                children: items.into_iter().map(Self::from_value).collect(),
            }),
            Value::Object(object) => Self::Element(Element::from_object(object)),
        }
    }

    /// Returns the element, if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Empty | Self::Text(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(value))
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// An element node: properties plus ordered children.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Element {
    /// Property bag, as the host framework exposes it
    pub props: Map<String, Value>,
    /// Child content in document order
    pub children: Vec<Node>,
}

impl Element {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_object(mut object: Map<String, Value>) -> Self {
        let props = match object.remove("props") {
            Some(Value::Object(props)) => props,
            _ => Map::new(),
        };
        let children = match object.remove("children") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items.into_iter().map(Node::from_value).collect(),
            Some(single) => vec![Node::from_value(single)],
        };
        Self { props, children }
    }

    /// Sets a property.
    pub fn with_prop(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.props.insert(key.to_string(), value.into());
        self
    }

    /// Appends a child.
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Returns a property, treating `null` as absent.
    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.props.get(key).filter(|value| !value.is_null())
    }

    /// Returns the text of an element whose only child is a text node.
    pub fn text_content(&self) -> Option<&str> {
        match self.children.as_slice() {
            [Node::Text(text)] => Some(text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_node_deserializes_each_shape() {
        let nodes: Vec<Node> = serde_json::from_value(json!([null, "hi", {}])).unwrap();
        assert_eq!(
            nodes,
            vec![Node::Empty, Node::text("hi"), Node::Element(Element::new())]
        );
    }

    #[test]
    fn test_non_element_children_do_not_reject_the_tree() {
        let tree: Node = serde_json::from_str(
            r#"{"children": [false, 0, true, {"props": {"name": "email"}}]}"#,
        )
        .unwrap();
        let element = tree.as_element().unwrap();
        assert_eq!(
            element.children,
            vec![
                Node::Empty,
                Node::text("0"),
                Node::Empty,
                Node::from(Element::new().with_prop("name", "email")),
            ]
        );
    }

    #[test]
    fn test_malformed_element_shapes_degrade() {
        let tree: Node = serde_json::from_value(json!({
            "props": "not a bag",
            "children": {"props": {"value": 1}}
        }))
        .unwrap();
        let element = tree.as_element().unwrap();
        assert!(element.props.is_empty());
        assert_eq!(
            element.children,
            vec![Node::from(Element::new().with_prop("value", 1))]
        );

        let fragment: Node = serde_json::from_value(json!(["a", null])).unwrap();
        assert_eq!(
            fragment,
            Node::from(Element::new().with_child("a").with_child(Node::Empty))
        );
    }

    #[test]
    fn test_text_content_requires_single_text_child() {
        let single = Element::new().with_child("Red");
        assert_eq!(single.text_content(), Some("Red"));

        let mixed = Element::new()
            .with_child("Red")
            .with_child(Element::new());
        assert_eq!(mixed.text_content(), None);
        assert_eq!(Element::new().text_content(), None);
    }

    #[test]
    fn test_prop_treats_null_as_absent() {
        let element = Element::new().with_prop("value", Value::Null);
        assert!(element.prop("value").is_none());
    }
}
