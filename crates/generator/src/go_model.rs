//! Go language model
//!
//! Fills the language-specific slots of a surface model: exported field
//! names, native Go types, parameter names and method naming.

use sacagawea_common::naming::{split_words, upper_camel};
use sacagawea_common::{Field, FieldKind, Model, Position};
use std::collections::HashSet;

/// Words Go spells in all caps
const INITIALISMS: &[&str] = &[
    "api", "dns", "html", "http", "https", "id", "ip", "json", "sql", "ssl", "tls", "uri",
    "url", "uuid", "xml",
];

const KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var",
];

/// Locals and imported package names used by the generated client
const RESERVED_LOCALS: &[&str] = &[
    "bytes", "client", "err", "fmt", "http", "ioutil", "item", "json", "path", "payload",
    "req", "resp", "response", "result", "strconv", "strings", "url", "v",
];

/// Prepares surface models for the Go renderer
#[derive(Debug, Default)]
pub struct GoLanguageModel;

impl GoLanguageModel {
    pub fn new() -> Self {
        Self
    }

    /// Fill in Go names and native types throughout the model
    pub fn prepare(&self, model: &mut Model) {
        // Parameters and responses types are never sent as JSON themselves
        let envelopes: HashSet<String> = model
            .methods
            .iter()
            .flat_map(|m| [m.parameters_type_name.clone(), m.responses_type_name.clone()])
            .filter(|name| !name.is_empty())
            .collect();

        for t in &mut model.types {
            t.type_name = type_name(&t.name);
            let envelope = envelopes.contains(&t.name);
            for field in &mut t.fields {
                field.field_name = field_name(&field.name);
                field.parameter_name = parameter_name(&field.name);
                field.native_type = native_type(field);
                field.serialize = !envelope && field.position == Position::Body;
            }
        }

        for method in &mut model.methods {
            method.handler_name = format!("Handle{}", method.name);
            method.processor_name = method.name.clone();
            method.client_name = method.name.clone();
            if !method.parameters_type_name.is_empty() {
                method.parameters_type_name = type_name(&method.parameters_type_name);
            }
            if !method.responses_type_name.is_empty() {
                method.responses_type_name = type_name(&method.responses_type_name);
            }
        }

        for constant in &mut model.constants {
            constant.name = type_name(&constant.name);
        }
    }
}

/// Exported Go type name; names that are already exported identifiers are
/// kept as they are
pub fn type_name(name: &str) -> String {
    let is_identifier = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_uppercase())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if is_identifier {
        name.to_string()
    } else {
        exported(&upper_camel(name))
    }
}

/// Exported struct field name with Go initialisms: `locationId` → `LocationID`
pub fn field_name(name: &str) -> String {
    let words = split_words(name);
    let joined: String = words
        .iter()
        .map(|word| {
            let lower = word.to_ascii_lowercase();
            if INITIALISMS.contains(&lower.as_str()) {
                lower.to_ascii_uppercase()
            } else {
                upper_camel(word)
            }
        })
        .collect();
    exported(&joined)
}

/// Unexported parameter name that can't collide with keywords or locals
pub fn parameter_name(name: &str) -> String {
    let words = split_words(name);
    let mut parameter = String::new();
    for (i, word) in words.iter().enumerate() {
        if i == 0 {
            parameter.push_str(&word.to_ascii_lowercase());
        } else {
            parameter.push_str(&upper_camel(word));
        }
    }
    if parameter.is_empty() || parameter.starts_with(|c: char| c.is_ascii_digit()) {
        parameter.insert_str(0, "p");
    }
    if KEYWORDS.contains(&parameter.as_str()) || RESERVED_LOCALS.contains(&parameter.as_str()) {
        parameter.push('_');
    }
    parameter
}

/// Go identifiers can't start with a digit; response codes become `Code200`
fn exported(name: &str) -> String {
    match name.chars().next() {
        None => "Field".to_string(),
        Some(c) if c.is_ascii_digit() => format!("Code{}", name),
        Some(_) => name.to_string(),
    }
}

/// Native Go type of a field
pub fn native_type(field: &Field) -> String {
    match field.kind {
        FieldKind::Scalar => scalar_type(&field.type_name, &field.format).to_string(),
        FieldKind::Reference => format!("*{}", type_name(&field.type_name)),
        FieldKind::Array => format!("[]{}", element_type(&field.type_name)),
        FieldKind::Map => format!("map[string]{}", element_type(&field.type_name)),
        FieldKind::Any => "interface{}".to_string(),
    }
}

/// Element of an array or map, encoded by the surface builder as a scalar
/// type (optionally `type:format`), `object`, `[]element` or a type name
fn element_type(element: &str) -> String {
    if let Some(inner) = element.strip_prefix("[]") {
        return format!("[]{}", element_type(inner));
    }
    let (name, format) = element.split_once(':').unwrap_or((element, ""));
    match name {
        "string" | "integer" | "number" | "boolean" => scalar_type(name, format).to_string(),
        "object" => "interface{}".to_string(),
        other => type_name(other),
    }
}

fn scalar_type(type_name: &str, format: &str) -> &'static str {
    match (type_name, format) {
        ("integer", "int32") => "int32",
        ("integer", "uint32") => "uint32",
        ("integer", "uint64") => "uint64",
        ("integer", _) => "int64",
        ("number", "float") => "float32",
        ("number", _) => "float64",
        ("boolean", _) => "bool",
        ("string", _) => "string",
        _ => "interface{}",
    }
}
