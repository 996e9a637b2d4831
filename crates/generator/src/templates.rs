//! Template loading and management

use sacagawea_common::{GeneratorError, Result};
use std::collections::HashMap;
use tera::{Tera, Value};

/// Templates and the artifact names they are registered under
const TEMPLATES: &[(&str, &str)] = &[
    ("client.go", include_str!("../templates/client.go.tera")),
    ("types.go", include_str!("../templates/types.go.tera")),
    ("constants.go", include_str!("../templates/constants.go.tera")),
    ("provider.go", include_str!("../templates/provider.go.tera")),
    ("server.go", include_str!("../templates/server.go.tera")),
];

/// Load all Go templates
pub fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();

    tera.register_filter("go_comment", go_comment_filter);
    tera.register_filter("go_string", go_string_filter);

    for (name, source) in TEMPLATES {
        tera.add_raw_template(name, source).map_err(|e| {
            GeneratorError::Render(format!("Failed to load {} template: {}", name, e))
        })?;
    }

    Ok(tera)
}

/// Filter turning text into `//` comment lines, optionally indented by
/// `indent` tabs
fn go_comment_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("go_comment filter expects a string"))?;
    let indent = args.get("indent").and_then(Value::as_u64).unwrap_or(0) as usize;

    Ok(Value::String(go_comment(text, indent)))
}

pub(crate) fn go_comment(text: &str, indent: usize) -> String {
    let prefix = "\t".repeat(indent);
    text.trim()
        .lines()
        .map(|line| {
            let line = line.trim_end();
            if line.is_empty() {
                format!("{}//", prefix)
            } else {
                format!("{}// {}", prefix, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Filter quoting a value as a Go string literal
fn go_string_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("go_string filter expects a string"))?;

    // JSON string escapes are a subset of Go's interpreted string literal escapes
    let quoted = serde_json::to_string(s).map_err(|e| tera::Error::msg(e.to_string()))?;
    Ok(Value::String(quoted))
}
