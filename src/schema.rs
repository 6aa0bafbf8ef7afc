use serde::Serialize;
use std::collections::BTreeMap;

/// Prefix of every `$ref` pointing into the document's definitions section.
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Swagger 2.0 Schema object
///
/// A schema is one of: a scalar (`type` + `format`), an array (`items`), a
/// map (`type: object` + `additionalProperties`), an object with named
/// `properties`, a `$ref` into the definitions, or the empty schema `{}` for
/// values whose shape is unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schema {
    /// Reference to a named definition
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// The type of the schema (string, integer, object, array, file, etc.)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    /// Format for primitive types (e.g., "int32", "date-time", "uuid")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Human readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Items schema for array types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    /// Value schema for string-keyed maps
    #[serde(rename = "additionalProperties", skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<Schema>>,
    /// Properties for object types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, Schema>>,
    /// Required property names for object types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    /// Allowed literal values
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
}

impl Schema {
    /// The empty schema, emitted for shapes that cannot be resolved.
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn primitive(schema_type: &str, format: Option<&str>) -> Self {
        Self {
            schema_type: Some(schema_type.to_string()),
            format: format.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn reference(name: &str) -> Self {
        Self {
            reference: Some(format!("{}{}", DEFINITIONS_PREFIX, name)),
            ..Self::default()
        }
    }

    pub fn array(items: Schema) -> Self {
        Self {
            schema_type: Some("array".to_string()),
            items: Some(Box::new(items)),
            ..Self::default()
        }
    }

    pub fn map(values: Schema) -> Self {
        Self {
            schema_type: Some("object".to_string()),
            additional_properties: Some(Box::new(values)),
            ..Self::default()
        }
    }

    /// The literal schema used by file parameters and file responses.
    pub fn file() -> Self {
        Self::primitive("file", None)
    }

    /// Name of the definition this schema points at, if it is a reference.
    pub fn referenced_name(&self) -> Option<&str> {
        self.reference
            .as_deref()
            .and_then(|r| r.strip_prefix(DEFINITIONS_PREFIX))
    }

    pub fn is_unknown(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_schema_serializes_empty() {
        let json = serde_json::to_string(&Schema::unknown()).unwrap();
        assert_eq!(json, "{}");
        assert!(Schema::unknown().is_unknown());
    }

    #[test]
    fn test_reference_round_trips_name() {
        let schema = Schema::reference("TestStruct");
        assert_eq!(schema.reference.as_deref(), Some("#/definitions/TestStruct"));
        assert_eq!(schema.referenced_name(), Some("TestStruct"));
        assert!(Schema::primitive("string", None).referenced_name().is_none());
    }

    #[test]
    fn test_map_schema_uses_additional_properties() {
        let schema = Schema::map(Schema::primitive("string", None));
        let value = serde_json::to_value(&schema).unwrap();

        assert_eq!(value["type"], "object");
        assert_eq!(value["additionalProperties"]["type"], "string");
        assert!(value.get("properties").is_none());
    }

    #[test]
    fn test_file_schema() {
        let value = serde_json::to_value(Schema::file()).unwrap();
        assert_eq!(value, serde_json::json!({ "type": "file" }));
    }
}
