//! Converts a Discovery document to an OpenAPI v3 document

use super::types::{
    Components, Info, MediaType, OpenApiDocument, Operation, Parameter, PathItem, RequestBody,
    Response, Schema, SchemaOrReference, Server,
};
use crate::discovery::{self, DiscoveryDoc, Method};
use sacagawea_common::{GeneratorError, Result};
use std::collections::BTreeMap;
use tracing::{debug, warn};

const OPENAPI_VERSION: &str = "3.0.0";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Convert a Discovery document to its OpenAPI v3 equivalent
///
/// - every Discovery schema becomes a component schema
/// - every method becomes an operation keyed by its HTTP verb under
///   `/<servicePath><path>`, with the method id as `operationId`
/// - request bodies and responses are JSON references to components
pub fn discovery_to_openapi(doc: &DiscoveryDoc) -> Result<OpenApiDocument> {
    let mut schemas = BTreeMap::new();
    for (name, schema) in &doc.schemas {
        schemas.insert(name.clone(), convert_schema(doc, schema)?);
    }

    let mut paths: BTreeMap<String, PathItem> = BTreeMap::new();
    for method in doc.all_methods() {
        let mut path = operation_path(&doc.service_path, &method.path);
        let mut operation = convert_method(doc, method)?;

        let taken = paths
            .get(&path)
            .is_some_and(|item| item.operation(&method.http_method).is_some());
        if let (true, Some(flat_path)) = (taken, &method.flat_path) {
            path = operation_path(&doc.service_path, flat_path);
            rebind_path_parameters(&mut operation, &path);
            warn!(method = %method.id, path = %path, "path already taken, using flat path");
        }

        let item = paths.entry(path.clone()).or_default();
        let slot = item.slot_mut(&method.http_method).ok_or_else(|| {
            GeneratorError::Conversion(format!(
                "Method {} uses unsupported HTTP method {}",
                method.id, method.http_method
            ))
        })?;
        if slot.is_some() {
            return Err(GeneratorError::Conversion(format!(
                "Method {} duplicates {} {}",
                method.id, method.http_method, path
            )));
        }
        *slot = Some(operation);
    }
    debug!(
        schemas = schemas.len(),
        paths = paths.len(),
        "converted Discovery document to OpenAPI"
    );

    let servers = if doc.root_url.is_empty() {
        Vec::new()
    } else {
        vec![Server {
            url: doc.root_url.trim_end_matches('/').to_string(),
            description: None,
        }]
    };

    Ok(OpenApiDocument {
        openapi: OPENAPI_VERSION.to_string(),
        info: Info {
            title: doc.title.clone(),
            version: doc.version.clone(),
            description: doc.description.clone(),
        },
        servers,
        paths,
        components: if schemas.is_empty() {
            None
        } else {
            Some(Components { schemas })
        },
    })
}

/// `/` + service path + method path, with duplicate slashes collapsed
fn operation_path(service_path: &str, method_path: &str) -> String {
    let joined = format!("/{}/{}", service_path.trim_matches('/'), method_path);
    let mut path = String::with_capacity(joined.len());
    for c in joined.chars() {
        if c == '/' && path.ends_with('/') {
            continue;
        }
        path.push(c);
    }
    path
}

/// Variable names of a URI template: `v1/{+name}:call` → `["name"]`
fn template_variables(path: &str) -> Vec<String> {
    let mut variables = Vec::new();
    let mut rest = path;
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let name = &rest[start + 1..start + len];
        variables.push(name.trim_start_matches('+').to_string());
        rest = &rest[start + len + 1..];
    }
    variables
}

/// Replace path parameters with the variables of a (flat) path template
fn rebind_path_parameters(operation: &mut Operation, path: &str) {
    let variables = template_variables(path);
    operation
        .parameters
        .retain(|p| p.location != "path" || variables.contains(&p.name));

    for variable in variables {
        if operation.parameters.iter().any(|p| p.name == variable) {
            continue;
        }
        operation.parameters.push(Parameter {
            name: variable,
            location: "path".to_string(),
            description: None,
            required: true,
            schema: Some(SchemaOrReference::Schema(Box::new(Schema {
                schema_type: Some("string".to_string()),
                ..Default::default()
            }))),
        });
    }
    operation.parameters.sort_by(|a, b| a.name.cmp(&b.name));
}

fn convert_method(doc: &DiscoveryDoc, method: &Method) -> Result<Operation> {
    let mut parameters = Vec::new();
    for (name, param) in &method.parameters {
        parameters.push(convert_parameter(name, param));
    }

    let request_body = match &method.request {
        Some(request) => Some(RequestBody {
            description: None,
            content: json_content(reference(doc, &request.ref_schema)?),
            required: true,
        }),
        None => None,
    };

    let default_response = match &method.response {
        Some(response) => Response {
            description: "Successful operation".to_string(),
            content: json_content(reference(doc, &response.ref_schema)?),
        },
        None => Response {
            description: "Successful operation".to_string(),
            content: BTreeMap::new(),
        },
    };

    let mut responses = BTreeMap::new();
    responses.insert("default".to_string(), default_response);

    Ok(Operation {
        operation_id: Some(method.id.clone()),
        description: method.description.clone(),
        parameters,
        request_body,
        responses,
    })
}

fn json_content(schema: SchemaOrReference) -> BTreeMap<String, MediaType> {
    let mut content = BTreeMap::new();
    content.insert(
        JSON_CONTENT_TYPE.to_string(),
        MediaType {
            schema: Some(schema),
        },
    );
    content
}

fn convert_parameter(name: &str, param: &discovery::Parameter) -> Parameter {
    let scalar = Schema {
        schema_type: param.param_type.clone(),
        format: param.format.clone(),
        enum_values: param.enum_values.clone(),
        default: param.default.clone(),
        pattern: param.pattern.clone(),
        ..Default::default()
    };
    let schema = if param.repeated {
        Schema {
            schema_type: Some("array".to_string()),
            items: Some(Box::new(SchemaOrReference::Schema(Box::new(scalar)))),
            ..Default::default()
        }
    } else {
        scalar
    };

    Parameter {
        name: name.to_string(),
        location: param
            .location
            .clone()
            .unwrap_or_else(|| "query".to_string()),
        description: param.description.clone(),
        required: param.required,
        schema: Some(SchemaOrReference::Schema(Box::new(schema))),
    }
}

/// Reference to a named Discovery schema, which must exist
fn reference(doc: &DiscoveryDoc, name: &str) -> Result<SchemaOrReference> {
    if doc.resolve_schema_ref(name).is_none() {
        return Err(GeneratorError::Conversion(format!(
            "Reference to unknown schema {}",
            name
        )));
    }
    Ok(SchemaOrReference::component(name))
}

fn convert_schema(doc: &DiscoveryDoc, schema: &discovery::Schema) -> Result<SchemaOrReference> {
    if let Some(ref_name) = &schema.ref_schema {
        return reference(doc, ref_name);
    }

    let mut properties = BTreeMap::new();
    for (name, property) in &schema.properties {
        properties.insert(name.clone(), convert_schema(doc, property)?);
    }

    let items = match &schema.items {
        Some(items) => Some(Box::new(convert_schema(doc, items)?)),
        None => None,
    };
    let additional_properties = match &schema.additional_properties {
        Some(value) => Some(Box::new(convert_schema(doc, value)?)),
        None => None,
    };

    // Discovery's "any" has no OpenAPI type keyword
    let schema_type = schema
        .schema_type
        .clone()
        .filter(|t| t.as_str() != "any");

    Ok(SchemaOrReference::Schema(Box::new(Schema {
        schema_type,
        format: schema.format.clone(),
        description: schema.description.clone(),
        properties,
        items,
        additional_properties,
        enum_values: schema.enum_values.clone(),
        default: schema.default.clone(),
        pattern: schema.pattern.clone(),
        read_only: schema.read_only,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::DiscoveryParser;

    const FUNCTIONS: &str = r##"{
        "name": "cloudfunctions",
        "version": "v1",
        "title": "Cloud Functions API",
        "rootUrl": "https://cloudfunctions.googleapis.com/",
        "servicePath": "",
        "schemas": {
            "Location": {
                "id": "Location",
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "labels": {"type": "object", "additionalProperties": {"type": "string"}}
                }
            },
            "ListLocationsResponse": {
                "id": "ListLocationsResponse",
                "type": "object",
                "properties": {
                    "locations": {"type": "array", "items": {"$ref": "Location"}},
                    "nextPageToken": {"type": "string"}
                }
            }
        },
        "resources": {
            "projects": {
                "resources": {
                    "locations": {
                        "methods": {
                            "list": {
                                "id": "cloudfunctions.projects.locations.list",
                                "path": "v1/{+name}/locations",
                                "flatPath": "v1/projects/{projectsId}/locations",
                                "httpMethod": "GET",
                                "parameters": {
                                    "name": {"type": "string", "required": true, "location": "path"},
                                    "pageSize": {"type": "integer", "format": "int32", "location": "query"},
                                    "filter": {"type": "string", "location": "query"}
                                },
                                "response": {"$ref": "ListLocationsResponse"}
                            }
                        }
                    }
                }
            }
        }
    }"##;

    fn convert(json: &str) -> Result<OpenApiDocument> {
        let parser = DiscoveryParser::from_bytes(json.as_bytes()).unwrap();
        discovery_to_openapi(parser.doc())
    }

    #[test]
    fn test_document_header() {
        let openapi = convert(FUNCTIONS).unwrap();
        assert_eq!(openapi.openapi, "3.0.0");
        assert_eq!(openapi.info.title, "Cloud Functions API");
        assert_eq!(openapi.info.version, "v1");
        assert_eq!(openapi.servers[0].url, "https://cloudfunctions.googleapis.com");
    }

    #[test]
    fn test_methods_become_operations() {
        let openapi = convert(FUNCTIONS).unwrap();
        let item = openapi.paths.get("/v1/{+name}/locations").unwrap();
        let operation = item.get.as_ref().unwrap();

        assert_eq!(
            operation.operation_id.as_deref(),
            Some("cloudfunctions.projects.locations.list")
        );
        let names: Vec<&str> = operation.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["filter", "name", "pageSize"]);
        assert_eq!(operation.parameters[1].location, "path");
        assert!(operation.parameters[1].required);

        let response = operation.responses.get("default").unwrap();
        let schema = response.content[JSON_CONTENT_TYPE].schema.as_ref().unwrap();
        assert_eq!(schema.referenced_name(), Some("ListLocationsResponse"));
    }

    #[test]
    fn test_schemas_become_components() {
        let openapi = convert(FUNCTIONS).unwrap();
        let schemas = &openapi.components.unwrap().schemas;
        let SchemaOrReference::Schema(list) = &schemas["ListLocationsResponse"] else {
            panic!("expected inline schema");
        };
        let SchemaOrReference::Schema(locations) = &list.properties["locations"] else {
            panic!("expected inline array schema");
        };
        assert_eq!(locations.schema_type.as_deref(), Some("array"));
        assert_eq!(
            locations.items.as_ref().unwrap().referenced_name(),
            Some("Location")
        );
    }

    #[test]
    fn test_unknown_reference_is_an_error() {
        let json = FUNCTIONS.replace(r#""$ref": "ListLocationsResponse""#, r#""$ref": "Missing""#);
        let err = convert(&json).unwrap_err();
        assert!(matches!(err, GeneratorError::Conversion(_)));
        assert!(err.to_string().contains("Missing"));
    }

    #[test]
    fn test_unsupported_verb_is_an_error() {
        let json = FUNCTIONS.replace(r#""httpMethod": "GET""#, r#""httpMethod": "TRACE""#);
        assert!(matches!(
            convert(&json).unwrap_err(),
            GeneratorError::Conversion(_)
        ));
    }

    #[test]
    fn test_colliding_path_falls_back_to_flat_path() {
        let json = FUNCTIONS.replace(
            r#""resources": {
            "projects""#,
            r#""resources": {
            "operations": {
                "methods": {
                    "get": {
                        "id": "cloudfunctions.operations.get",
                        "path": "v1/{+name}/locations",
                        "httpMethod": "GET",
                        "parameters": {"name": {"type": "string", "required": true, "location": "path"}}
                    }
                }
            },
            "projects""#,
        );
        let openapi = convert(&json).unwrap();

        let first = openapi.paths["/v1/{+name}/locations"].get.as_ref().unwrap();
        assert_eq!(
            first.operation_id.as_deref(),
            Some("cloudfunctions.operations.get")
        );

        let flat = openapi.paths["/v1/projects/{projectsId}/locations"]
            .get
            .as_ref()
            .unwrap();
        let names: Vec<&str> = flat.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["filter", "pageSize", "projectsId"]);
    }

    #[test]
    fn test_template_variables() {
        assert_eq!(template_variables("v1/{+name}:call"), vec!["name"]);
        assert_eq!(
            template_variables("v1/projects/{projectsId}/locations/{locationsId}"),
            vec!["projectsId", "locationsId"]
        );
        assert!(template_variables("v1/operations").is_empty());
    }

    #[test]
    fn test_operation_path_joins_service_path() {
        assert_eq!(operation_path("storage/v1/", "b/{bucket}"), "/storage/v1/b/{bucket}");
        assert_eq!(operation_path("", "v1/{+name}"), "/v1/{+name}");
    }
}
