//! Google Discovery Document type definitions
//!
//! Based on JSON Schema Draft 3 with Google-specific extensions. Maps are
//! ordered so that every downstream stage sees schemas, resources and
//! methods in a stable order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Discovery Document root (`discovery#restDescription`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryDoc {
    #[serde(default)]
    pub kind: Option<String>,

    /// Discovery version (e.g., "v1")
    #[serde(default)]
    pub discovery_version: Option<String>,

    /// API id (e.g., "cloudfunctions:v1")
    #[serde(default)]
    pub id: Option<String>,

    /// API name (e.g., "storage", "cloudfunctions")
    pub name: String,

    /// API version (e.g., "v1")
    pub version: String,

    #[serde(default)]
    pub revision: Option<String>,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Root URL (e.g., "<https://storage.googleapis.com/>")
    #[serde(default)]
    pub root_url: String,

    /// Service path (e.g., "storage/v1/")
    #[serde(default)]
    pub service_path: String,

    #[serde(default)]
    pub base_path: Option<String>,

    #[serde(default)]
    pub batch_path: Option<String>,

    #[serde(default)]
    pub documentation_link: Option<String>,

    /// Parameters accepted by every method
    #[serde(default)]
    pub parameters: BTreeMap<String, Parameter>,

    #[serde(default)]
    pub auth: Option<Auth>,

    /// Schemas (data types)
    #[serde(default)]
    pub schemas: BTreeMap<String, Schema>,

    /// Resources (collections of methods)
    #[serde(default)]
    pub resources: BTreeMap<String, Resource>,

    /// Methods at root level (rare)
    #[serde(default)]
    pub methods: BTreeMap<String, Method>,
}

/// Authentication information
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Auth {
    #[serde(default)]
    pub oauth2: Option<OAuth2>,
}

/// OAuth 2.0 configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OAuth2 {
    #[serde(default)]
    pub scopes: BTreeMap<String, Scope>,
}

/// OAuth scope
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scope {
    #[serde(default)]
    pub description: String,
}

/// Parameter definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// Parameter type (string, integer, boolean, number)
    #[serde(rename = "type")]
    #[serde(default)]
    pub param_type: Option<String>,

    #[serde(default)]
    pub format: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub default: Option<String>,

    #[serde(default)]
    pub required: bool,

    /// The parameter may be given more than once
    #[serde(default)]
    pub repeated: bool,

    /// Location (query, path)
    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub pattern: Option<String>,

    #[serde(rename = "enum")]
    #[serde(default)]
    pub enum_values: Vec<String>,

    #[serde(default)]
    pub enum_descriptions: Vec<String>,
}

/// Schema (data type) definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(default)]
    pub id: Option<String>,

    /// Type (string, object, array, etc.)
    #[serde(rename = "type")]
    #[serde(default)]
    pub schema_type: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Properties (for object type)
    #[serde(default)]
    pub properties: BTreeMap<String, Schema>,

    #[serde(default)]
    pub additional_properties: Option<Box<Schema>>,

    /// Items (for array type)
    #[serde(default)]
    pub items: Option<Box<Schema>>,

    /// Reference to another schema by name
    #[serde(rename = "$ref")]
    #[serde(default)]
    pub ref_schema: Option<String>,

    /// Format (e.g., "int32", "int64", "google-datetime")
    #[serde(default)]
    pub format: Option<String>,

    #[serde(default)]
    pub default: Option<String>,

    #[serde(default)]
    pub pattern: Option<String>,

    #[serde(default)]
    pub read_only: bool,

    #[serde(rename = "enum")]
    #[serde(default)]
    pub enum_values: Vec<String>,

    #[serde(default)]
    pub enum_descriptions: Vec<String>,
}

/// Resource (collection of methods)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default)]
    pub methods: BTreeMap<String, Method>,

    #[serde(default)]
    pub resources: BTreeMap<String, Resource>,
}

/// Method (API operation)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    /// Method ID (e.g., "storage.buckets.insert")
    pub id: String,

    /// URI template relative to the service path (may use `{+name}`)
    pub path: String,

    /// Same as `path` with reserved expansions flattened out
    #[serde(default)]
    pub flat_path: Option<String>,

    /// HTTP method (GET, POST, PUT, DELETE, PATCH)
    pub http_method: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub parameters: BTreeMap<String, Parameter>,

    #[serde(default)]
    pub parameter_order: Vec<String>,

    #[serde(default)]
    pub request: Option<MethodRequest>,

    #[serde(default)]
    pub response: Option<MethodResponse>,

    #[serde(default)]
    pub scopes: Vec<String>,
}

/// Method request body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodRequest {
    #[serde(rename = "$ref")]
    pub ref_schema: String,

    #[serde(default)]
    pub parameter_name: Option<String>,
}

/// Method response body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MethodResponse {
    #[serde(rename = "$ref")]
    pub ref_schema: String,
}

impl DiscoveryDoc {
    /// Get a schema by reference
    /// e.g., "Bucket" -> returns Bucket schema
    pub fn resolve_schema_ref(&self, ref_name: &str) -> Option<&Schema> {
        self.schemas.get(ref_name)
    }

    /// Every method in the document: root methods first, then each
    /// resource's methods followed by its nested resources, all in key order
    pub fn all_methods(&self) -> Vec<&Method> {
        let mut methods: Vec<&Method> = self.methods.values().collect();
        collect_resource_methods(&self.resources, &mut methods);
        methods
    }

    /// Base URL for requests: root URL joined with the service path
    pub fn service_url(&self) -> String {
        format!("{}{}", self.root_url, self.service_path)
    }
}

fn collect_resource_methods<'a>(
    resources: &'a BTreeMap<String, Resource>,
    methods: &mut Vec<&'a Method>,
) {
    for resource in resources.values() {
        methods.extend(resource.methods.values());
        collect_resource_methods(&resource.resources, methods);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(id: &str) -> Method {
        Method {
            id: id.to_string(),
            path: "x".to_string(),
            http_method: "GET".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_all_methods_walks_nested_resources() {
        let mut locations = Resource::default();
        locations
            .methods
            .insert("list".to_string(), method("cf.projects.locations.list"));

        let mut projects = Resource::default();
        projects
            .resources
            .insert("locations".to_string(), locations);

        let mut operations = Resource::default();
        operations
            .methods
            .insert("get".to_string(), method("cf.operations.get"));
        operations
            .methods
            .insert("list".to_string(), method("cf.operations.list"));

        let mut doc = DiscoveryDoc::default();
        doc.resources.insert("projects".to_string(), projects);
        doc.resources.insert("operations".to_string(), operations);

        let ids: Vec<&str> = doc.all_methods().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "cf.operations.get",
                "cf.operations.list",
                "cf.projects.locations.list"
            ]
        );
    }

    #[test]
    fn test_service_url() {
        let doc = DiscoveryDoc {
            root_url: "https://cloudfunctions.googleapis.com/".to_string(),
            service_path: "".to_string(),
            ..Default::default()
        };
        assert_eq!(doc.service_url(), "https://cloudfunctions.googleapis.com/");
    }
}
