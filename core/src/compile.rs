//! Deterministic compilation of fields into a JSON-Schema document.
//!
//! [`compile`] turns a list of fields into an object schema whose
//! `properties` and `required` entries are ordered by [`compare_names`], so
//! field lists that differ only in order compile to byte-identical JSON.
//! The compiler never fails: it renders whatever it is given, whether or not
//! validation ran.
//!
//! # Example
//!
//! ```
//! use tool_schema_core::*;
//!
//! let schema = compile(&[
//!     FieldDefinition::new("zebra"),
//!     FieldDefinition::new("apple").required(true),
//!     FieldDefinition::new("mango").with_type("number"),
//! ]);
//! assert_eq!(schema.property_names(), vec!["apple", "mango", "zebra"]);
//! assert_eq!(
//!     schema.to_json_string(),
//!     r#"{"type":"object","properties":{"apple":{"type":"string"},"mango":{"type":"number"},"zebra":{"type":"string"}},"required":["apple"]}"#,
//! );
//! ```

use std::cmp::Ordering;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{Number, Value};

use crate::{FieldDefinition, MergedFields, OptionPair, Primitive, SchemaType};

/// One `oneOf` branch of a compiled property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstOption {
    #[serde(rename = "const")]
    pub value: Primitive,
    pub title: String,
}

impl From<&OptionPair> for ConstOption {
    fn from(option: &OptionPair) -> Self {
        Self {
            value: option.value.clone(),
            title: option.label.clone(),
        }
    }
}

/// Schema of a single compiled property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Primitive>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<ConstOption>>,
}

impl From<&FieldDefinition> for PropertySchema {
    fn from(field: &FieldDefinition) -> Self {
        Self {
            schema_type: field.schema_type(),
            title: field.title.clone(),
            description: field.description.clone(),
            minimum: field.min.clone(),
            maximum: field.max.clone(),
            min_length: field.min_length,
            max_length: field.max_length,
            pattern: field.pattern.clone(),
            enum_values: field.enum_values.clone(),
            one_of: field
                .one_of
                .as_ref()
                .map(|options| options.iter().map(ConstOption::from).collect()),
        }
    }
}

/// Ordered property table; serializes as a JSON object in stored order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties(Vec<(String, PropertySchema)>);

impl Properties {
    pub fn get(&self, name: &str) -> Option<&PropertySchema> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, schema)| schema)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertySchema)> {
        self.0.iter().map(|(key, schema)| (key.as_str(), schema))
    }
}

impl Serialize for Properties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, schema) in &self.0 {
            map.serialize_entry(name, schema)?;
        }
        map.end()
    }
}

/// Compiled input schema of a tool.
///
/// Always an object schema. `required` is omitted from the JSON when empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledSchema {
    #[serde(rename = "type")]
    schema_type: &'static str,
    pub properties: Properties,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl Default for CompiledSchema {
    fn default() -> Self {
        Self {
            schema_type: "object",
            properties: Properties::default(),
            required: Vec::new(),
        }
    }
}

impl CompiledSchema {
    /// Property names in output order.
    pub fn property_names(&self) -> Vec<&str> {
        self.properties.iter().map(|(name, _)| name).collect()
    }

    /// Serializes to compact JSON.
    pub fn to_json_string(&self) -> String {
        // Every component is a string, number, bool, or derived struct.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json_string_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Converts to a [`serde_json::Value`].
    ///
    /// Note that `Value` objects re-sort their keys unless serde_json's
    /// `preserve_order` feature is enabled; use
    /// [`to_json_string`](Self::to_json_string) for byte-stable output.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Orders field names: case-insensitive first, byte order as the tie-break.
///
/// The case-insensitive pass keeps `"apple"` and `"Banana"` in dictionary
/// order; the tie-break makes the order total so `"a"` and `"A"` are never
/// considered equal.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}

/// Compiles fields into an object schema.
///
/// When a name appears more than once, the last occurrence wins.
pub fn compile(fields: &[FieldDefinition]) -> CompiledSchema {
    let mut sorted: Vec<&FieldDefinition> = Vec::with_capacity(fields.len());
    for field in fields {
        match sorted.iter().position(|f| f.name == field.name) {
            Some(index) => sorted[index] = field,
            None => sorted.push(field),
        }
    }
    sorted.sort_by(|a, b| compare_names(&a.name, &b.name));

    let mut properties = Vec::with_capacity(sorted.len());
    let mut required = Vec::new();
    for field in sorted {
        properties.push((field.name.clone(), PropertySchema::from(field)));
        if field.is_required() {
            required.push(field.name.clone());
        }
    }
    required.sort_by(|a, b| compare_names(a, b));

    CompiledSchema {
        properties: Properties(properties),
        required,
        ..Default::default()
    }
}

/// Compiles the output of [`merge_fields`](crate::merge_fields).
pub fn compile_merged(merged: &MergedFields) -> CompiledSchema {
    compile(&merged.to_fields())
}
