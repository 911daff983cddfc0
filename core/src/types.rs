//! Field type definitions for tool input modeling.
//!
//! This module defines the data model shared by every stage of the engine:
//! the field definitions produced by extraction and registration, the partial
//! overrides layered on top of them, and the primitive values used in
//! enumerations. The types serialize with [`serde`] using camelCase keys, and
//! unset attributes are omitted from the output.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Partial overrides keyed by field name.
///
/// A sorted map so that iteration (and therefore fingerprinting) never
/// depends on insertion order.
pub type OverrideMap = BTreeMap<String, FieldOverride>;

/// A primitive value usable in enumerations and option pairs.
///
/// Numbers keep their JSON representation, so `1` stays `1` rather than
/// becoming `1.0` when serialized. Values read through
/// [`from_json`](Self::from_json) are passed through [`normalize_number`],
/// so `1.0` and `1` compare and fingerprint as the same value.
///
/// # Examples
///
/// ```
/// use tool_schema_core::Primitive;
///
/// assert_eq!(Primitive::from("red").type_name(), "string");
/// assert_eq!(Primitive::from(3).type_name(), "number");
/// assert_eq!(Primitive::from(true).to_string(), "true");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Primitive {
    /// Boolean literal.
    Bool(bool),
    /// Numeric literal.
    Number(Number),
    /// String literal.
    String(String),
}

impl Primitive {
    /// Converts a JSON value into a primitive.
    ///
    /// Returns `None` for `null`, arrays, and objects.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => Some(Self::Number(normalize_number(n.clone()))),
            Value::String(s) => Some(Self::String(s.clone())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Returns the JSON type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
        }
    }

    /// Returns the schema type this value belongs to.
    pub fn schema_type(&self) -> SchemaType {
        match self {
            Self::Bool(_) => SchemaType::Boolean,
            Self::Number(_) => SchemaType::Number,
            Self::String(_) => SchemaType::String,
        }
    }
}

/// Rewrites a float with no fractional part as an integer.
///
/// JSON hosts do not distinguish `1` from `1.0`; serde_json does. Floats
/// outside the `i64` range and non-integral floats are returned unchanged.
///
/// # Examples
///
/// ```
/// use serde_json::Number;
/// use tool_schema_core::normalize_number;
///
/// let one = Number::from_f64(1.0).unwrap();
/// assert_eq!(normalize_number(one), Number::from(1));
///
/// let half = Number::from_f64(0.5).unwrap();
/// assert_eq!(normalize_number(half.clone()), half);
/// ```
pub fn normalize_number(number: Number) -> Number {
    if number.is_f64() {
        if let Some(float) = number.as_f64() {
            if float.fract() == 0.0 && float >= i64::MIN as f64 && float < i64::MAX as f64 {
                return Number::from(float as i64);
            }
        }
    }
    number
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Primitive {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Primitive {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Primitive {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Primitive {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<i32> for Primitive {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for Primitive {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

/// Primitive type of a compiled schema property.
///
/// Field type hints are free-form (`"email"`, `"range"`, ...) and collapse
/// onto this closed set through [`SchemaType::from_hint`].
///
/// # Examples
///
/// ```
/// use tool_schema_core::SchemaType;
///
/// assert_eq!(SchemaType::from_hint(Some("range")), SchemaType::Number);
/// assert_eq!(SchemaType::from_hint(Some("checkbox")), SchemaType::Boolean);
/// assert_eq!(SchemaType::from_hint(Some("email")), SchemaType::String);
/// assert_eq!(SchemaType::from_hint(None), SchemaType::String);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// Text value (the default).
    #[default]
    String,
    /// Numeric value.
    Number,
    /// Boolean value.
    Boolean,
}

impl SchemaType {
    /// Maps a field type hint onto a schema type.
    pub fn from_hint(hint: Option<&str>) -> Self {
        match hint {
            Some("number") | Some("range") => Self::Number,
            Some("checkbox") => Self::Boolean,
            _ => Self::String,
        }
    }

    /// Returns the JSON-Schema spelling of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value/label pair offered by an enumerable control.
///
/// # Examples
///
/// ```
/// use tool_schema_core::OptionPair;
///
/// let option = OptionPair::new("fr", "French");
/// assert_eq!(option.label, "French");
///
/// // Without a label, the value's display form is used.
/// let bare = OptionPair::unlabeled(42);
/// assert_eq!(bare.label, "42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionPair {
    /// Submitted value
    pub value: Primitive,
    /// Human-readable label
    pub label: String,
}

impl OptionPair {
    /// Creates an option with an explicit label.
    pub fn new(value: impl Into<Primitive>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Creates an option labeled with the display form of its value.
    pub fn unlabeled(value: impl Into<Primitive>) -> Self {
        let value = value.into();
        let label = value.to_string();
        Self { value, label }
    }
}

/// One declared tool parameter.
///
/// Every attribute except `name` is optional so that an unset attribute can
/// be told apart from one explicitly set to a falsy value. This matters for
/// merging: only set attributes of a higher-priority source override a
/// lower-priority one.
///
/// Use [`new`](FieldDefinition::new) and chain builder methods like
/// [`with_type`](FieldDefinition::with_type).
///
/// # Examples
///
/// ```
/// use tool_schema_core::{FieldDefinition, OptionPair, SchemaType};
///
/// let age = FieldDefinition::new("age")
///     .with_type("number")
///     .with_min(0)
///     .with_max(130)
///     .required(true);
/// assert_eq!(age.schema_type(), SchemaType::Number);
/// assert!(age.is_required());
///
/// let color = FieldDefinition::new("color").with_options(vec![
///     OptionPair::new("r", "Red"),
///     OptionPair::new("g", "Green"),
/// ]);
/// assert_eq!(color.enum_values.as_ref().unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Field name, the identity key within a merge scope
    pub name: String,
    /// Semantic type hint (e.g. "email", "number", "checkbox")
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    /// Whether the field must be supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Lower numeric bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Number>,
    /// Upper numeric bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    /// Regular expression the value must match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Allowed values, in declaration order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Primitive>>,
    /// Allowed values with labels; mirrors `enum_values` when both are set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<OptionPair>>,
}

impl FieldDefinition {
    /// Creates a field with only a name set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Synthesizes a field from a name and a partial definition.
    pub fn from_override(name: impl Into<String>, attributes: &FieldOverride) -> Self {
        let mut field = Self::new(name);
        field.apply(attributes);
        field
    }

    /// Sets the type hint.
    pub fn with_type(mut self, hint: impl Into<String>) -> Self {
        self.field_type = Some(hint.into());
        self
    }

    /// Sets whether the field is required.
    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Adds a title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_min(mut self, min: impl Into<Number>) -> Self {
        self.min = Some(min.into());
        self
    }

    pub fn with_max(mut self, max: impl Into<Number>) -> Self {
        self.max = Some(max.into());
        self
    }

    pub fn with_min_length(mut self, len: u64) -> Self {
        self.min_length = Some(len);
        self
    }

    pub fn with_max_length(mut self, len: u64) -> Self {
        self.max_length = Some(len);
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Sets the allowed values without labels.
    pub fn with_enum<I, P>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Primitive>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Sets labeled options, keeping `enum_values` in step with them.
    pub fn with_options(mut self, options: Vec<OptionPair>) -> Self {
        self.enum_values = Some(options.iter().map(|o| o.value.clone()).collect());
        self.one_of = Some(options);
        self
    }

    /// Returns `true` only when `required` is explicitly set to `true`.
    pub fn is_required(&self) -> bool {
        self.required == Some(true)
    }

    /// Returns the compiled schema type for this field's type hint.
    pub fn schema_type(&self) -> SchemaType {
        SchemaType::from_hint(self.field_type.as_deref())
    }

    /// Copies every set attribute of `attributes` onto this field.
    ///
    /// Unset attributes leave the current value untouched. List attributes
    /// are replaced as a whole, never concatenated.
    ///
    /// # Examples
    ///
    /// ```
    /// use tool_schema_core::{FieldDefinition, FieldOverride};
    ///
    /// let mut field = FieldDefinition::new("email").with_type("email").required(true);
    /// field.apply(&FieldOverride::default().with_description("Recipient"));
    ///
    /// assert_eq!(field.field_type.as_deref(), Some("email"));
    /// assert_eq!(field.description.as_deref(), Some("Recipient"));
    /// assert!(field.is_required());
    /// ```
    pub fn apply(&mut self, attributes: &FieldOverride) {
        if let Some(hint) = &attributes.field_type {
            self.field_type = Some(hint.clone());
        }
        if let Some(required) = attributes.required {
            self.required = Some(required);
        }
        if let Some(title) = &attributes.title {
            self.title = Some(title.clone());
        }
        if let Some(desc) = &attributes.description {
            self.description = Some(desc.clone());
        }
        if let Some(min) = &attributes.min {
            self.min = Some(min.clone());
        }
        if let Some(max) = &attributes.max {
            self.max = Some(max.clone());
        }
        if let Some(len) = attributes.min_length {
            self.min_length = Some(len);
        }
        if let Some(len) = attributes.max_length {
            self.max_length = Some(len);
        }
        if let Some(pattern) = &attributes.pattern {
            self.pattern = Some(pattern.clone());
        }
        if let Some(values) = &attributes.enum_values {
            self.enum_values = Some(values.clone());
        }
        if let Some(options) = &attributes.one_of {
            self.one_of = Some(options.clone());
        }
    }
}

/// A partial field definition layered over an existing field.
///
/// Carries the same attributes as [`FieldDefinition`] minus the name, which
/// comes from the key of the [`OverrideMap`] entry.
///
/// # Examples
///
/// ```
/// use tool_schema_core::FieldOverride;
///
/// let attrs = FieldOverride::default()
///     .with_title("Email address")
///     .required(false);
/// assert_eq!(attrs.required, Some(false));
/// assert!(attrs.description.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOverride {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Primitive>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<OptionPair>>,
}

impl FieldOverride {
    pub fn with_type(mut self, hint: impl Into<String>) -> Self {
        self.field_type = Some(hint.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_enum<I, P>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Primitive>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Sets labeled options only; `enum_values` is left as it is.
    pub fn with_one_of(mut self, options: Vec<OptionPair>) -> Self {
        self.one_of = Some(options);
        self
    }
}

impl From<&FieldDefinition> for FieldOverride {
    fn from(field: &FieldDefinition) -> Self {
        Self {
            field_type: field.field_type.clone(),
            required: field.required,
            title: field.title.clone(),
            description: field.description.clone(),
            min: field.min.clone(),
            max: field.max.clone(),
            min_length: field.min_length,
            max_length: field.max_length,
            pattern: field.pattern.clone(),
            enum_values: field.enum_values.clone(),
            one_of: field.one_of.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_from_json_treats_integral_floats_as_integers() {
        let whole = Primitive::from_json(&json!(2.0)).unwrap();
        assert_eq!(whole, Primitive::from(2));
        assert_eq!(whole.to_string(), "2");

        let fractional = Primitive::from_json(&json!(2.5)).unwrap();
        assert_eq!(fractional.to_string(), "2.5");

        let huge = Number::from_f64(1e300).unwrap();
        assert_eq!(normalize_number(huge.clone()), huge);
    }

    #[test]
    fn test_field_serializes_camel_case_and_skips_unset() {
        let field = FieldDefinition::new("bio")
            .with_type("textarea")
            .with_max_length(280);

        let value = serde_json::to_value(&field).unwrap();
        assert_eq!(
            value,
            json!({"name": "bio", "type": "textarea", "maxLength": 280})
        );
    }

    #[test]
    fn test_field_deserializes_from_camel_case() {
        let field: FieldDefinition = serde_json::from_value(json!({
            "name": "size",
            "enumValues": ["s", "m", 3],
            "oneOf": [{"value": true, "label": "Yes"}]
        }))
        .unwrap();

        assert_eq!(
            field.enum_values,
            Some(vec![
                Primitive::from("s"),
                Primitive::from("m"),
                Primitive::from(3)
            ])
        );
        assert_eq!(field.one_of.unwrap()[0].value, Primitive::Bool(true));
    }

    #[test]
    fn test_apply_leaves_unset_attributes() {
        let mut field = FieldDefinition::new("qty")
            .with_type("number")
            .with_min(1)
            .with_enum([1, 2, 3]);
        field.apply(&FieldOverride::default().with_enum([5]));

        assert_eq!(field.min, Some(Number::from(1)));
        assert_eq!(field.enum_values, Some(vec![Primitive::from(5)]));
    }

    #[test]
    fn test_apply_false_overrides_true() {
        let mut field = FieldDefinition::new("agree").required(true);
        field.apply(&FieldOverride::default().required(false));
        assert_eq!(field.required, Some(false));
        assert!(!field.is_required());
    }

    #[test]
    fn test_primitive_from_json_rejects_structures() {
        assert!(Primitive::from_json(&json!(null)).is_none());
        assert!(Primitive::from_json(&json!([1])).is_none());
        assert_eq!(Primitive::from_json(&json!(2.5)).unwrap().to_string(), "2.5");
    }
}
