//! Field extraction from UI node trees.
//!
//! The walk is depth-first and pre-order. An element is a *field candidate*
//! when a non-empty name is found through one of [`NAME_PATHS`]; a candidate
//! ends the walk for its subtree, except for option scanning. Elements
//! without a name are transparent and their children are searched in order.
//!
//! Extraction is best-effort: text, empty content, and property values of the
//! wrong shape are skipped silently.

use serde_json::{Map, Number, Value};
use tool_schema_core::{FieldDefinition, OptionPair, Primitive, normalize_number};
use tracing::{debug, trace};

use crate::node::{Element, Node};

/// Property paths that may carry a field name, tried in order.
///
/// A direct `name`, an input adapter's `name`, then a slot's input `name`.
pub const NAME_PATHS: &[&[&str]] = &[
    &["name"],
    &["inputProps", "name"],
    &["slotProps", "input", "name"],
];

/// Extracts field candidates from a tree, in discovery order.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tool_schema_extract::{Node, extract_fields};
///
/// let tree: Node = serde_json::from_value(json!({
///     "props": {},
///     "children": [
///         {"props": {"name": "email", "type": "email", "required": true}},
///         {"props": {"name": "plan"}, "children": [
///             {"props": {"value": "free"}, "children": ["Free"]},
///             {"props": {"value": "pro"}, "children": ["Pro"]}
///         ]}
///     ]
/// }))
/// .unwrap();
///
/// let fields = extract_fields(&tree);
/// assert_eq!(fields.len(), 2);
/// assert!(fields[0].is_required());
/// assert_eq!(fields[1].one_of.as_ref().unwrap()[1].label, "Pro");
/// ```
pub fn extract_fields(node: &Node) -> Vec<FieldDefinition> {
    let mut fields = Vec::new();
    collect_fields(node, &mut fields);
    debug!(count = fields.len(), "Extracted fields from tree");
    fields
}

/// Collects value/label pairs from every descendant of `node`.
///
/// A descendant contributes when its `value` property is a primitive. The
/// label is its text when its only child is a text node, otherwise the
/// display form of the value. Value-bearing descendants are still searched,
/// so nested options are reported too, in encounter order.
///
/// # Examples
///
/// ```
/// use tool_schema_extract::{Element, Node, extract_options};
///
/// let select = Node::from(
///     Element::new()
///         .with_child(Element::new().with_prop("value", "en").with_child("English"))
///         .with_child(Element::new().with_prop("value", 2)),
/// );
///
/// let options = extract_options(&select);
/// assert_eq!(options[0].label, "English");
/// assert_eq!(options[1].label, "2");
/// ```
pub fn extract_options(node: &Node) -> Vec<OptionPair> {
    let mut options = Vec::new();
    if let Node::Element(element) = node {
        for child in &element.children {
            collect_options(child, &mut options);
        }
    }
    options
}

fn collect_fields(node: &Node, fields: &mut Vec<FieldDefinition>) {
    let Node::Element(element) = node else {
        return;
    };

    if let Some(name) = candidate_name(&element.props) {
        fields.push(build_field(name, element, node));
        return;
    }

    for child in &element.children {
        collect_fields(child, fields);
    }
}

fn collect_options(node: &Node, options: &mut Vec<OptionPair>) {
    let Node::Element(element) = node else {
        return;
    };

    if let Some(value) = element.prop("value").and_then(Primitive::from_json) {
        let label = match element.text_content() {
            Some(text) => text.to_string(),
            None => value.to_string(),
        };
        options.push(OptionPair { value, label });
    }

    for child in &element.children {
        collect_options(child, options);
    }
}

fn candidate_name(props: &Map<String, Value>) -> Option<&str> {
    NAME_PATHS.iter().find_map(|path| {
        lookup(props, path)
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
    })
}

fn lookup<'a>(props: &'a Map<String, Value>, path: &[&str]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    let mut current = props.get(*first)?;
    for key in rest {
        current = current.as_object()?.get(*key)?;
    }
    Some(current)
}

fn build_field(name: &str, element: &Element, node: &Node) -> FieldDefinition {
    let mut field = FieldDefinition::new(name);

    field.field_type = element
        .prop("type")
        .and_then(Value::as_str)
        .map(String::from);
    field.required = element.prop("required").map(is_truthy);
    field.min = numeric_prop(element, "min");
    field.max = numeric_prop(element, "max");
    field.min_length = length_prop(element, "minLength");
    field.max_length = length_prop(element, "maxLength");
    field.pattern = element
        .prop("pattern")
        .and_then(Value::as_str)
        .map(String::from);

    let options = extract_options(node);
    if !options.is_empty() {
        field = field.with_options(options);
    }

    field
}

fn numeric_prop(element: &Element, key: &str) -> Option<Number> {
    let value = element.prop(key)?;
    let number = match value {
        Value::Number(n) => Some(normalize_number(n.clone())),
        Value::String(s) => parse_number(s.trim()),
        _ => None,
    };
    if number.is_none() {
        trace!(key, ?value, "Skipping non-numeric property");
    }
    number
}

fn length_prop(element: &Element, key: &str) -> Option<u64> {
    let value = element.prop(key)?;
    let length = match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(float_to_length)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(float_to_length))
        }
        _ => None,
    };
    if length.is_none() {
        trace!(key, ?value, "Skipping invalid length property");
    }
    length
}

fn parse_number(raw: &str) -> Option<Number> {
    if let Ok(int) = raw.parse::<i64>() {
        return Some(int.into());
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(normalize_number)
}

fn float_to_length(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0).then(|| value.trunc() as u64)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
