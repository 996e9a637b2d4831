//! OpenAPI 3.0 type definitions
//!
//! The subset of OpenAPI v3 that a Discovery document can express. Maps
//! are ordered so that serialized documents are stable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// OpenAPI document root
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenApiDocument {
    /// OpenAPI version (e.g., "3.0.0")
    pub openapi: String,

    pub info: Info,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,

    /// API paths (endpoints)
    #[serde(default)]
    pub paths: BTreeMap<String, PathItem>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
}

/// API information
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Info {
    pub title: String,

    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Server information
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Server {
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Path item (operations for a path)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
}

impl PathItem {
    /// Operations on this path as `(VERB, operation)` pairs, in a fixed
    /// verb order
    pub fn operations(&self) -> Vec<(&'static str, &Operation)> {
        [
            ("GET", &self.get),
            ("PUT", &self.put),
            ("POST", &self.post),
            ("DELETE", &self.delete),
            ("OPTIONS", &self.options),
            ("HEAD", &self.head),
            ("PATCH", &self.patch),
        ]
        .into_iter()
        .filter_map(|(verb, op)| op.as_ref().map(|op| (verb, op)))
        .collect()
    }

    /// Operation for an HTTP verb (case-insensitive)
    pub fn operation(&self, verb: &str) -> Option<&Operation> {
        self.operations()
            .into_iter()
            .find(|(v, _)| v.eq_ignore_ascii_case(verb))
            .map(|(_, op)| op)
    }

    /// Slot for an HTTP verb (case-insensitive), if OpenAPI has one
    pub fn slot_mut(&mut self, verb: &str) -> Option<&mut Option<Operation>> {
        match verb.to_ascii_uppercase().as_str() {
            "GET" => Some(&mut self.get),
            "PUT" => Some(&mut self.put),
            "POST" => Some(&mut self.post),
            "DELETE" => Some(&mut self.delete),
            "OPTIONS" => Some(&mut self.options),
            "HEAD" => Some(&mut self.head),
            "PATCH" => Some(&mut self.patch),
            _ => None,
        }
    }
}

/// HTTP operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Operation {
    #[serde(rename = "operationId")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,

    #[serde(rename = "requestBody")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,

    /// Responses keyed by status code or `default`
    #[serde(default)]
    pub responses: BTreeMap<String, Response>,
}

/// Parameter definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    /// Location: query, header, path, cookie
    #[serde(rename = "in")]
    pub location: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaOrReference>,
}

/// Request body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub content: BTreeMap<String, MediaType>,

    #[serde(default)]
    pub required: bool,
}

/// Response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Response {
    pub description: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub content: BTreeMap<String, MediaType>,
}

/// Media type
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaOrReference>,
}

/// Reusable components
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub schemas: BTreeMap<String, SchemaOrReference>,
}

/// Schema or reference
///
/// `Reference` is listed first so that untagged deserialization tries the
/// `$ref` form before falling back to an inline schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrReference {
    /// Reference to a schema, e.g. `#/components/schemas/Bucket`
    Reference {
        #[serde(rename = "$ref")]
        ref_path: String,
    },

    /// Inline schema
    Schema(Box<Schema>),
}

impl SchemaOrReference {
    /// Build a reference to a named component schema
    pub fn component(name: &str) -> Self {
        SchemaOrReference::Reference {
            ref_path: format!("{}{}", COMPONENT_SCHEMA_PREFIX, name),
        }
    }

    /// Name of the referenced component, if this is a reference
    pub fn referenced_name(&self) -> Option<&str> {
        match self {
            SchemaOrReference::Reference { ref_path } => Some(
                ref_path
                    .strip_prefix(COMPONENT_SCHEMA_PREFIX)
                    .unwrap_or(ref_path.rsplit('/').next().unwrap_or(ref_path)),
            ),
            SchemaOrReference::Schema(_) => None,
        }
    }
}

/// Prefix of references to component schemas
pub const COMPONENT_SCHEMA_PREFIX: &str = "#/components/schemas/";

/// Schema definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    /// Type: string, number, integer, boolean, array, object
    #[serde(rename = "type")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,

    /// Format (e.g., int32, int64, date-time)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, SchemaOrReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaOrReference>>,

    #[serde(rename = "additionalProperties")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<SchemaOrReference>>,

    #[serde(rename = "enum")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(rename = "readOnly")]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub read_only: bool,
}
