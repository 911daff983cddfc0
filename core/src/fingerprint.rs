//! Change-detection fingerprints for fields and field collections.
//!
//! A fingerprint is a canonical string built from every semantically relevant
//! attribute of a field. Two fields fingerprint equal exactly when those
//! attributes are deeply equal, so callers can compare fingerprints instead
//! of re-running merge and compilation.
//!
//! Each attribute is encoded with `serde_json` (unset attributes become
//! `null`) and the encodings are joined with [`ATTRIBUTE_SEPARATOR`]. Lists
//! of fields join per-field fingerprints with [`RECORD_SEPARATOR`]. Both are
//! ASCII control characters, which JSON encoding always escapes, so neither
//! can occur unescaped inside an attribute.
//!
//! # Examples
//!
//! ```
//! use tool_schema_core::*;
//!
//! let a = FieldDefinition::new("size").with_enum(["s", "m"]);
//! let b = FieldDefinition::new("size").with_enum(vec!["s".to_string(), "m".to_string()]);
//! assert_eq!(fingerprint_field(&a), fingerprint_field(&b));
//!
//! let c = a.clone().with_description("T-shirt size");
//! assert_ne!(fingerprint_field(&a), fingerprint_field(&c));
//! ```

use serde::Serialize;

use crate::{FieldDefinition, FieldOverride, OverrideMap};

/// Separates attribute encodings within one fingerprint.
pub const ATTRIBUTE_SEPARATOR: char = '\u{1f}';

/// Separates records within a collection fingerprint.
pub const RECORD_SEPARATOR: char = '\u{1e}';

/// Fingerprints a single field.
///
/// Attributes are encoded in a fixed order: name, type, required, title,
/// description, enumValues, oneOf, min, max, minLength, maxLength, pattern.
pub fn fingerprint_field(field: &FieldDefinition) -> String {
    let mut parts = vec![encode(&field.name)];
    parts.extend(attribute_parts(&FieldOverride::from(field)));
    parts.join(&ATTRIBUTE_SEPARATOR.to_string())
}

/// Fingerprints a list of fields in list order.
pub fn fingerprint_fields(fields: &[FieldDefinition]) -> String {
    fields
        .iter()
        .map(fingerprint_field)
        .collect::<Vec<_>>()
        .join(&RECORD_SEPARATOR.to_string())
}

/// Fingerprints a partial definition, without a name.
pub fn fingerprint_override(attributes: &FieldOverride) -> String {
    attribute_parts(attributes).join(&ATTRIBUTE_SEPARATOR.to_string())
}

/// Fingerprints an override map in key order.
///
/// Each record is the encoded key followed by the override's fingerprint.
pub fn fingerprint_override_map(overrides: &OverrideMap) -> String {
    overrides
        .iter()
        .map(|(name, attributes)| {
            format!(
                "{}{ATTRIBUTE_SEPARATOR}{}",
                encode(name),
                fingerprint_override(attributes)
            )
        })
        .collect::<Vec<_>>()
        .join(&RECORD_SEPARATOR.to_string())
}

fn attribute_parts(attributes: &FieldOverride) -> Vec<String> {
    vec![
        encode(&attributes.field_type),
        encode(&attributes.required),
        encode(&attributes.title),
        encode(&attributes.description),
        encode(&attributes.enum_values),
        encode(&attributes.one_of),
        encode(&attributes.min),
        encode(&attributes.max),
        encode(&attributes.min_length),
        encode(&attributes.max_length),
        encode(&attributes.pattern),
    ]
}

fn encode<T: Serialize + ?Sized>(value: &T) -> String {
    // Strings, numbers, options and derived structs cannot fail to encode.
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

#[cfg(test)]
mod tests {
    use crate::OptionPair;

    use super::*;

    #[test]
    fn test_fingerprint_ignores_allocation_identity() {
        let options = vec![OptionPair::new("a", "A"), OptionPair::new("b", "B")];
        let first = FieldDefinition::new("pick").with_options(options.clone());
        let second = FieldDefinition::new("pick").with_options(
            options
                .iter()
                .map(|o| OptionPair::new(o.value.clone(), o.label.clone()))
                .collect(),
        );

        assert_eq!(fingerprint_field(&first), fingerprint_field(&second));
    }

    #[test]
    fn test_fingerprint_distinguishes_unset_from_false() {
        let unset = FieldDefinition::new("agree");
        let off = FieldDefinition::new("agree").required(false);
        assert_ne!(fingerprint_field(&unset), fingerprint_field(&off));
    }

    #[test]
    fn test_fingerprint_resists_separator_injection() {
        let sneaky = FieldDefinition::new(format!("a{ATTRIBUTE_SEPARATOR}null"));
        let plain = FieldDefinition::new("a");
        assert_ne!(fingerprint_field(&sneaky), fingerprint_field(&plain));
        assert!(!fingerprint_field(&sneaky).contains(&format!("a{ATTRIBUTE_SEPARATOR}")));
    }

    #[test]
    fn test_fingerprint_fields_is_order_sensitive() {
        let a = FieldDefinition::new("a");
        let b = FieldDefinition::new("b");
        assert_ne!(
            fingerprint_fields(&[a.clone(), b.clone()]),
            fingerprint_fields(&[b, a])
        );
    }

    #[test]
    fn test_override_map_fingerprint_ignores_insertion_order() {
        let mut first = OverrideMap::new();
        first.insert("b".into(), FieldOverride::default().with_title("B"));
        first.insert("a".into(), FieldOverride::default().with_title("A"));

        let mut second = OverrideMap::new();
        second.insert("a".into(), FieldOverride::default().with_title("A"));
        second.insert("b".into(), FieldOverride::default().with_title("B"));

        assert_eq!(
            fingerprint_override_map(&first),
            fingerprint_override_map(&second)
        );
    }
}
