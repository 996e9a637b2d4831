//! Builds a surface [`Model`] from an OpenAPI v3 document

use crate::openapi::{OpenApiDocument, Operation, Schema, SchemaOrReference};
use sacagawea_common::naming::{capitalize, method_name, upper_camel};
use sacagawea_common::{
    Constant, Field, FieldKind, GeneratorError, Method, Model, Position, Result, Type, TypeKind,
};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Field name used for a request body in a parameters type
const REQUEST_BODY_FIELD: &str = "request_body";

/// Derive the surface model of an OpenAPI v3 document
///
/// Produces one struct type per component schema (plus one per inline
/// object schema), and for every operation a method with a
/// `<Name>Parameters` and a `<Name>Responses` type. Constants carry the
/// service URL and the enum values of schema properties.
pub fn surface_from_openapi(document: &OpenApiDocument) -> Result<Model> {
    let mut builder = ModelBuilder {
        model: Model {
            name: document.info.title.clone(),
            ..Default::default()
        },
        reserved: BTreeSet::new(),
    };

    if let Some(server) = document.servers.first() {
        builder.model.constants.push(Constant {
            name: "ServiceURL".to_string(),
            value: server.url.clone(),
            description: "default base URL of the service".to_string(),
        });
    }

    // Component names win over names generated for inline objects
    if let Some(components) = &document.components {
        builder.reserved.extend(components.schemas.keys().cloned());
        for (name, schema) in &components.schemas {
            match schema {
                SchemaOrReference::Schema(schema) => builder.add_schema_type(name, schema),
                SchemaOrReference::Reference { ref_path } => {
                    debug!(name = %name, target = %ref_path, "skipping aliased component schema");
                }
            }
        }
    }

    for (path, item) in &document.paths {
        for (verb, operation) in item.operations() {
            builder.add_operation(path, verb, operation)?;
        }
    }

    builder.add_enum_constants();
    debug!(
        types = builder.model.types.len(),
        methods = builder.model.methods.len(),
        constants = builder.model.constants.len(),
        "derived surface model"
    );

    Ok(builder.model)
}

struct ModelBuilder {
    model: Model,
    /// Type names claimed before their types are built
    reserved: BTreeSet<String>,
}

impl ModelBuilder {
    fn is_taken(&self, name: &str) -> bool {
        self.reserved.contains(name) || self.model.type_named(name).is_some()
    }

    /// `base`, or `base` with the first numeric suffix no type uses yet
    fn unique_type_name(&self, base: &str) -> String {
        if !self.is_taken(base) {
            return base.to_string();
        }
        let mut n = 2;
        while self.is_taken(&format!("{}{}", base, n)) {
            n += 1;
        }
        format!("{}{}", base, n)
    }

    fn add_schema_type(&mut self, name: &str, schema: &Schema) {
        let mut fields = Vec::new();
        for (property_name, property) in &schema.properties {
            let field = self.field_for(name, property_name, property, Position::Body);
            fields.push(field);
        }

        let kind = if schema.properties.is_empty() && schema.additional_properties.is_some() {
            TypeKind::Object
        } else {
            TypeKind::Struct
        };

        self.model.types.push(Type {
            name: name.to_string(),
            kind,
            description: schema.description.clone().unwrap_or_default(),
            content_type: String::new(),
            fields,
            type_name: String::new(),
        });
    }

    /// Field for a property, registering nested types for inline objects
    fn field_for(
        &mut self,
        owner: &str,
        name: &str,
        schema: &SchemaOrReference,
        position: Position,
    ) -> Field {
        let (kind, type_name, format) = self.shape_of(owner, name, schema);
        let (description, enum_values) = match schema {
            SchemaOrReference::Schema(s) => (
                s.description.clone().unwrap_or_default(),
                s.enum_values.clone(),
            ),
            SchemaOrReference::Reference { .. } => (String::new(), Vec::new()),
        };

        Field {
            name: name.to_string(),
            type_name,
            kind,
            format,
            position,
            description,
            enum_values,
            ..Default::default()
        }
    }

    /// `(kind, type, format)` of a schema used as a field
    fn shape_of(
        &mut self,
        owner: &str,
        name: &str,
        schema: &SchemaOrReference,
    ) -> (FieldKind, String, String) {
        let schema = match schema {
            SchemaOrReference::Reference { .. } => {
                let target = schema.referenced_name().unwrap_or_default().to_string();
                return (FieldKind::Reference, target, String::new());
            }
            SchemaOrReference::Schema(schema) => schema,
        };
        let format = schema.format.clone().unwrap_or_default();

        match schema.schema_type.as_deref() {
            Some("array") => {
                let element = match &schema.items {
                    Some(items) => self.element_type(owner, name, items),
                    None => "object".to_string(),
                };
                (FieldKind::Array, element, format)
            }
            Some("object") | None if !schema.properties.is_empty() => {
                let base = format!("{}{}", owner, capitalize(&upper_camel(name)));
                let nested = self.unique_type_name(&base);
                if nested != base {
                    debug!(base = %base, name = %nested, "renamed inline object type");
                }
                // Claim the name before nested properties generate their own
                self.reserved.insert(nested.clone());
                self.add_schema_type(&nested, schema);
                (FieldKind::Reference, nested, String::new())
            }
            Some("object") => match &schema.additional_properties {
                Some(value) => {
                    let element = self.element_type(owner, name, value);
                    (FieldKind::Map, element, format)
                }
                None => (FieldKind::Any, "object".to_string(), format),
            },
            Some(scalar) => (FieldKind::Scalar, scalar.to_string(), format),
            None => (FieldKind::Any, "object".to_string(), format),
        }
    }

    /// Element type name of an array or map
    fn element_type(&mut self, owner: &str, name: &str, schema: &SchemaOrReference) -> String {
        let (kind, type_name, format) = self.shape_of(owner, name, schema);
        match kind {
            FieldKind::Scalar if !format.is_empty() => format!("{}:{}", type_name, format),
            FieldKind::Array => format!("[]{}", type_name),
            _ => type_name,
        }
    }

    fn add_operation(&mut self, path: &str, verb: &str, operation: &Operation) -> Result<()> {
        let operation_id = operation
            .operation_id
            .clone()
            .unwrap_or_else(|| format!("{}{}", verb.to_ascii_lowercase(), path));
        let name = method_name(&upper_camel_path(&operation_id));
        if self.model.methods.iter().any(|m| m.name == name) {
            return Err(GeneratorError::Conversion(format!(
                "Operation {} produces duplicate method name {}",
                operation_id, name
            )));
        }

        let parameters_type_name = self.add_parameters_type(&name, operation)?;
        let responses_type_name = self.add_responses_type(&name, operation)?;

        self.model.methods.push(Method {
            operation: operation_id,
            path: path.to_string(),
            method: verb.to_string(),
            description: operation.description.clone().unwrap_or_default(),
            name,
            parameters_type_name,
            responses_type_name,
            ..Default::default()
        });
        Ok(())
    }

    fn add_parameters_type(&mut self, method: &str, operation: &Operation) -> Result<String> {
        let type_name = format!("{}Parameters", method);
        self.check_envelope_name(&type_name)?;
        let mut fields = Vec::new();

        let mut parameters: Vec<_> = operation.parameters.iter().collect();
        parameters.sort_by(|a, b| a.name.cmp(&b.name));
        for parameter in parameters {
            let position = match parameter.location.as_str() {
                "path" => Position::Path,
                "header" => Position::Header,
                "formData" => Position::FormData,
                _ => Position::Query,
            };
            let mut field = match &parameter.schema {
                Some(schema) => self.field_for(&type_name, &parameter.name, schema, position),
                None => Field {
                    name: parameter.name.clone(),
                    type_name: "string".to_string(),
                    position,
                    ..Default::default()
                },
            };
            if field.description.is_empty() {
                field.description = parameter.description.clone().unwrap_or_default();
            }
            fields.push(field);
        }

        if let Some(body) = &operation.request_body {
            if let Some((content_type, media)) = body.content.iter().next() {
                if let Some(schema) = &media.schema {
                    let field =
                        self.field_for(&type_name, REQUEST_BODY_FIELD, schema, Position::Body);
                    fields.push(field);
                    debug!(method, content_type = %content_type, "request body");
                }
            }
        }

        if fields.is_empty() {
            return Ok(String::new());
        }
        self.model.types.push(Type {
            name: type_name.clone(),
            kind: TypeKind::Struct,
            description: format!("{} holds parameters to {}", type_name, method),
            fields,
            ..Default::default()
        });
        Ok(type_name)
    }

    fn add_responses_type(&mut self, method: &str, operation: &Operation) -> Result<String> {
        let type_name = format!("{}Responses", method);
        self.check_envelope_name(&type_name)?;
        let mut fields = Vec::new();
        let mut content_type = String::new();

        for (code, response) in &operation.responses {
            if let Some((media_type, media)) = response.content.iter().next() {
                if let Some(schema) = &media.schema {
                    fields.push(self.field_for(&type_name, code, schema, Position::Body));
                    content_type = media_type.clone();
                }
            }
        }

        if fields.is_empty() {
            return Ok(String::new());
        }
        self.model.types.push(Type {
            name: type_name.clone(),
            kind: TypeKind::Struct,
            description: format!("{} holds responses of {}", type_name, method),
            content_type,
            fields,
            ..Default::default()
        });
        Ok(type_name)
    }

    /// Parameters and responses types are referenced by name from their
    /// method, so they can't be renamed around a clash
    fn check_envelope_name(&self, type_name: &str) -> Result<()> {
        if self.is_taken(type_name) {
            return Err(GeneratorError::Conversion(format!(
                "Type {} is defined more than once",
                type_name
            )));
        }
        Ok(())
    }

    /// One constant per enum value of a component type's properties
    fn add_enum_constants(&mut self) {
        let mut constants = Vec::new();
        for t in &self.model.types {
            for field in t.fields.iter().filter(|f| !f.enum_values.is_empty()) {
                for value in &field.enum_values {
                    constants.push(Constant {
                        name: format!(
                            "{}{}{}",
                            upper_camel(&t.name),
                            upper_camel(&field.name),
                            upper_camel(value)
                        ),
                        value: value.clone(),
                        description: format!("{}.{} value {}", t.name, field.name, value),
                    });
                }
            }
        }

        constants.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.value.cmp(&b.value)));
        constants.dedup_by(|a, b| a.name == b.name && a.value == b.value);

        // Distinct values that camel-case to the same name get a numeric suffix
        let mut names: BTreeSet<String> = constants.iter().map(|c| c.name.clone()).collect();
        let mut seen = BTreeSet::new();
        for constant in &mut constants {
            if seen.insert(constant.name.clone()) {
                continue;
            }
            let mut n = 2;
            while names.contains(&format!("{}{}", constant.name, n)) {
                n += 1;
            }
            let renamed = format!("{}{}", constant.name, n);
            warn!(
                name = %constant.name,
                value = %constant.value,
                renamed = %renamed,
                "enum constant name already used"
            );
            names.insert(renamed.clone());
            seen.insert(renamed.clone());
            constant.name = renamed;
        }
        self.model.constants.extend(constants);
    }
}

/// Operation ids synthesized from paths contain `/` and braces; keep only
/// the dotted structure a method name is built from
fn upper_camel_path(operation_id: &str) -> String {
    operation_id
        .split('.')
        .map(|part| {
            if part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                part.to_string()
            } else {
                upper_camel(part)
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}
