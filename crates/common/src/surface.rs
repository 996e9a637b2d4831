//! Language-agnostic surface model
//!
//! The surface model is the last language-independent stage of the
//! pipeline: a flat list of types, the methods that use them, and the
//! constants a client library should export. Language models (such as the
//! Go model in the generator crate) fill in the `native_type`,
//! `field_name`, `parameter_name` and method naming slots before rendering.

use serde::{Deserialize, Serialize};

/// How a field's value is shaped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldKind {
    #[default]
    Scalar,
    Map,
    Array,
    Reference,
    Any,
}

/// Whether a type is a plain struct or an open object
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    #[default]
    Struct,
    Object,
}

/// Where a parameter travels in an HTTP request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Position {
    #[default]
    Body,
    Header,
    FormData,
    Query,
    Path,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// A field of a surface type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,

    /// Referenced type or scalar type name (`string`, `integer`, ...)
    #[serde(rename = "type")]
    pub type_name: String,

    pub kind: FieldKind,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub format: String,

    pub position: Position,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub native_type: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub field_name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parameter_name: String,

    #[serde(default, skip_serializing_if = "is_false")]
    pub serialize: bool,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
}

/// A named type in the surface model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Type {
    pub name: String,

    pub kind: TypeKind,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content_type: String,

    #[serde(default)]
    pub fields: Vec<Field>,

    /// Language-specific name, set by a language model
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub type_name: String,
}

impl Type {
    /// Fields that travel in the given position
    pub fn fields_at(&self, position: Position) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(move |f| f.position == position)
    }
}

/// An API operation in the surface model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Method {
    /// Operation id as it appeared in the source document
    pub operation: String,

    pub path: String,

    /// HTTP verb, upper case
    pub method: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub handler_name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub processor_name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub client_name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parameters_type_name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub responses_type_name: String,
}

/// A constant exported by the generated library
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constant {
    pub name: String,
    pub value: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// Root of the surface model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub name: String,

    #[serde(default)]
    pub types: Vec<Type>,

    #[serde(default)]
    pub methods: Vec<Method>,

    #[serde(default)]
    pub constants: Vec<Constant>,
}

impl Model {
    /// Look up a type by its surface name
    pub fn type_named(&self, name: &str) -> Option<&Type> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Serialize the model as indented JSON
    pub fn to_json_pretty(&self) -> crate::Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_named() {
        let model = Model {
            name: "demo".to_string(),
            types: vec![Type {
                name: "Bucket".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };

        assert!(model.type_named("Bucket").is_some());
        assert!(model.type_named("Object").is_none());
    }

    #[test]
    fn test_model_json_skips_empty_slots() {
        let model = Model {
            name: "demo".to_string(),
            types: vec![Type {
                name: "Bucket".to_string(),
                fields: vec![Field {
                    name: "name".to_string(),
                    type_name: "string".to_string(),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        };

        let json = String::from_utf8(model.to_json_pretty().unwrap()).unwrap();
        assert!(json.contains("\"type\": \"string\""));
        assert!(json.contains("\"kind\": \"SCALAR\""));
        assert!(!json.contains("native_type"));
    }
}
