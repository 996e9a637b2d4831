//! Go source rendering
//!
//! [`GoRenderer`] renders a prepared surface model (see
//! [`GoLanguageModel`](crate::GoLanguageModel)) into the Go files of a
//! client library. Per-method Go snippets that depend on parameter types
//! are computed here so the templates stay declarative.

use crate::templates;
use sacagawea_common::{Field, GeneratorError, Method, Model, Position, Result, Type};
use serde::Serialize;
use std::cmp::Reverse;
use std::error::Error as _;
use tera::{Context, Tera};

/// Renders the Go files of a client library from a surface model
pub struct GoRenderer {
    package: String,
    model: Model,
    tera: Tera,
}

impl GoRenderer {
    /// Create a renderer for a model already prepared for Go
    pub fn new(model: Model, package: &str) -> Result<Self> {
        let tera = templates::load_templates()?;
        Ok(Self {
            package: package.to_string(),
            model,
            tera,
        })
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn render_client(&self) -> Result<Vec<u8>> {
        self.render("client.go")
    }

    pub fn render_types(&self) -> Result<Vec<u8>> {
        self.render("types.go")
    }

    pub fn render_constants(&self) -> Result<Vec<u8>> {
        self.render("constants.go")
    }

    pub fn render_provider(&self) -> Result<Vec<u8>> {
        self.render("provider.go")
    }

    pub fn render_server(&self) -> Result<Vec<u8>> {
        self.render("server.go")
    }

    fn render(&self, template: &str) -> Result<Vec<u8>> {
        let context = self.create_context();
        let rendered = self
            .tera
            .render(template, &context)
            .map_err(|e| template_error(template, &e))?;
        Ok(rendered.into_bytes())
    }

    /// Create template context from the model
    fn create_context(&self) -> Context {
        let methods: Vec<MethodView> = self
            .model
            .methods
            .iter()
            .map(|m| MethodView::new(&self.model, m))
            .collect();

        // Reserved expansions match greedily: literal routes go first, then
        // the most specific reserved patterns
        let mut routes: Vec<&MethodView> = methods.iter().collect();
        routes.sort_by_key(|m| {
            let (segments, literals) = route_specificity(&m.path);
            (m.reserved_route, Reverse(segments), Reverse(literals))
        });

        let mut context = Context::new();
        context.insert("package", &self.package);
        context.insert("model_name", &self.model.name);
        context.insert("types", &self.model.types);
        context.insert("constants", &self.model.constants);
        context.insert("routes", &routes);
        context.insert("methods", &methods);
        context
    }
}

/// Number of path segments and of characters outside `{...}` templates
fn route_specificity(path: &str) -> (usize, usize) {
    let segments = path.trim_matches('/').split('/').count();
    let mut depth = 0usize;
    let mut literals = 0;
    for c in path.chars() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ if depth == 0 => literals += 1,
            _ => {}
        }
    }
    (segments, literals)
}

/// Tera reports the useful part of a failure in the error's source chain
fn template_error(template: &str, error: &tera::Error) -> GeneratorError {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    GeneratorError::Render(format!("Template error in {}: {}", template, message))
}

#[derive(Debug, Serialize)]
struct ParamView {
    name: String,
    parameter_name: String,
    field_name: String,
    native_type: String,
    placeholder: String,
    value_expr: String,
}

#[derive(Debug, Serialize)]
struct ResponseView {
    field_name: String,
    native_type: String,
    client_decode: String,
    server_encode: String,
}

#[derive(Debug, Default, Serialize)]
struct MethodView {
    operation: String,
    description: String,
    http_method: String,
    path: String,
    client_name: String,
    handler_name: String,
    processor_name: String,
    signature: String,
    path_params: Vec<ParamView>,
    query_setters: Vec<String>,
    header_setters: Vec<String>,
    has_body: bool,
    body: Option<ParamView>,
    has_parameters: bool,
    parameters_type: String,
    uses_query: bool,
    server_decoders: Vec<String>,
    returns_response: bool,
    responses_type: String,
    primary_response: Option<ResponseView>,
    provider_params: String,
    provider_args: String,
    reserved_route: bool,
}

impl MethodView {
    fn new(model: &Model, method: &Method) -> Self {
        let mut view = MethodView {
            operation: method.operation.clone(),
            description: method.description.clone(),
            http_method: method.method.clone(),
            path: method.path.clone(),
            client_name: method.client_name.clone(),
            handler_name: method.handler_name.clone(),
            processor_name: method.processor_name.clone(),
            reserved_route: method.path.contains("{+"),
            ..Default::default()
        };

        let mut arguments = Vec::new();
        let mut body_argument = None;

        if let Some(parameters) = find_type(model, &method.parameters_type_name) {
            view.has_parameters = true;
            view.parameters_type = parameters.type_name.clone();

            for field in &parameters.fields {
                let argument = format!("{} {}", field.parameter_name, field.native_type);
                match field.position {
                    Position::Path => {
                        arguments.push(argument);
                        view.path_params.push(path_param(field, &method.path));
                        view.server_decoders
                            .push(decode_parameter(field, &format!("vars[\"{}\"]", field.name)));
                    }
                    Position::Query | Position::FormData => {
                        arguments.push(argument);
                        view.query_setters.push(set_value(field, "v.Set", "v.Add"));
                        if decodable(&field.native_type) || field.native_type == "[]string" {
                            view.uses_query = true;
                        }
                        view.server_decoders.push(decode_query(field));
                    }
                    Position::Header => {
                        arguments.push(argument);
                        view.header_setters
                            .push(set_value(field, "req.Header.Set", "req.Header.Add"));
                        view.server_decoders.push(decode_parameter(
                            field,
                            &format!("r.Header.Get(\"{}\")", field.name),
                        ));
                    }
                    Position::Body => {
                        body_argument = Some(argument);
                        view.server_decoders.push(decode_body(field));
                        view.body = Some(param_view(field, String::new(), String::new()));
                        view.has_body = true;
                    }
                }
            }
        }
        arguments.extend(body_argument);
        view.signature = arguments.join(", ");

        let mut params = Vec::new();
        let mut args = Vec::new();
        if view.has_parameters {
            params.push(format!("parameters *{}", view.parameters_type));
            args.push("parameters");
        }

        if let Some(responses) = find_type(model, &method.responses_type_name) {
            view.returns_response = true;
            view.responses_type = responses.type_name.clone();
            params.push(format!("responses *{}", view.responses_type));
            args.push("responses");

            let primary = responses
                .fields
                .iter()
                .find(|f| f.name == "default")
                .or_else(|| responses.fields.iter().find(|f| f.name.starts_with('2')));
            view.primary_response = primary.map(response_view);
        }

        view.provider_params = params.join(", ");
        view.provider_args = args.join(", ");
        view
    }
}

/// Look up a type by Go name or surface name
fn find_type<'a>(model: &'a Model, name: &str) -> Option<&'a Type> {
    if name.is_empty() {
        return None;
    }
    model
        .types
        .iter()
        .find(|t| t.type_name == name || t.name == name)
}

fn param_view(field: &Field, placeholder: String, value_expr: String) -> ParamView {
    ParamView {
        name: field.name.clone(),
        parameter_name: field.parameter_name.clone(),
        field_name: field.field_name.clone(),
        native_type: field.native_type.clone(),
        placeholder,
        value_expr,
    }
}

/// Path parameter: `{+name}` expansions keep slashes, `{name}` is escaped
fn path_param(field: &Field, path: &str) -> ParamView {
    let reserved = format!("{{+{}}}", field.name);
    let value = string_expr(&field.native_type, &field.parameter_name);
    if path.contains(&reserved) {
        param_view(field, reserved, value)
    } else {
        let placeholder = format!("{{{}}}", field.name);
        param_view(field, placeholder, format!("url.PathEscape({})", value))
    }
}

/// Go expression formatting `var` of type `native` as a string
fn string_expr(native: &str, var: &str) -> String {
    match native {
        "string" => var.to_string(),
        "int64" => format!("strconv.FormatInt({}, 10)", var),
        "int32" => format!("strconv.FormatInt(int64({}), 10)", var),
        "uint64" => format!("strconv.FormatUint({}, 10)", var),
        "uint32" => format!("strconv.FormatUint(uint64({}), 10)", var),
        "float64" => format!("strconv.FormatFloat({}, 'f', -1, 64)", var),
        "float32" => format!("strconv.FormatFloat(float64({}), 'f', -1, 32)", var),
        "bool" => format!("strconv.FormatBool({})", var),
        _ => format!("fmt.Sprint({})", var),
    }
}

/// Go condition that holds when `var` differs from its zero value
fn non_zero(native: &str, var: &str) -> String {
    match native {
        "string" => format!("{} != \"\"", var),
        "int64" | "int32" | "uint64" | "uint32" | "float64" | "float32" => {
            format!("{} != 0", var)
        }
        "bool" => var.to_string(),
        n if n.starts_with("[]") || n.starts_with("map[") => format!("len({}) > 0", var),
        _ => format!("{} != nil", var),
    }
}

/// Statement adding a query value or header, skipped for zero values
fn set_value(field: &Field, set: &str, add: &str) -> String {
    let var = &field.parameter_name;
    match field.native_type.strip_prefix("[]") {
        Some(element) => format!(
            "for _, item := range {} {{\n\t\t{}(\"{}\", {})\n\t}}",
            var,
            add,
            field.name,
            string_expr(element, "item")
        ),
        None => format!(
            "if {} {{\n\t\t{}(\"{}\", {})\n\t}}",
            non_zero(&field.native_type, var),
            set,
            field.name,
            string_expr(&field.native_type, var)
        ),
    }
}

/// Scalars the server can parse from a string
fn decodable(native: &str) -> bool {
    matches!(
        native,
        "string" | "int64" | "int32" | "uint64" | "uint32" | "float64" | "float32" | "bool"
    )
}

fn decode_query(field: &Field) -> String {
    if field.native_type == "[]string" {
        return format!("parameters.{} = query[\"{}\"]", field.field_name, field.name);
    }
    decode_parameter(field, &format!("query.Get(\"{}\")", field.name))
}

/// Statement parsing `source` into the parameters field
fn decode_parameter(field: &Field, source: &str) -> String {
    let target = format!("parameters.{}", field.field_name);
    let (parse, value) = match field.native_type.as_str() {
        "string" => return format!("{} = {}", target, source),
        "int64" => ("strconv.ParseInt(s, 10, 64)", "n"),
        "int32" => ("strconv.ParseInt(s, 10, 32)", "int32(n)"),
        "uint64" => ("strconv.ParseUint(s, 10, 64)", "n"),
        "uint32" => ("strconv.ParseUint(s, 10, 32)", "uint32(n)"),
        "float64" => ("strconv.ParseFloat(s, 64)", "n"),
        "float32" => ("strconv.ParseFloat(s, 32)", "float32(n)"),
        "bool" => ("strconv.ParseBool(s)", "n"),
        other => {
            return format!(
                "// {}: {} parameters are not decoded",
                field.name, other
            )
        }
    };

    format!(
        "if s := {}; s != \"\" {{\n\
         \t\tn, perr := {}\n\
         \t\tif perr != nil {{\n\
         \t\t\thttp.Error(w, perr.Error(), http.StatusBadRequest)\n\
         \t\t\treturn\n\
         \t\t}}\n\
         \t\t{} = {}\n\
         \t}}",
        source, parse, target, value
    )
}

fn decode_body(field: &Field) -> String {
    let target = format!("parameters.{}", field.field_name);
    let bad_request = "if err = json.NewDecoder(r.Body).Decode";
    match field.native_type.strip_prefix('*') {
        Some(element) => format!(
            "{target} = &{element}{{}}\n\
             \t{bad_request}({target}); err != nil {{\n\
             \t\thttp.Error(w, err.Error(), http.StatusBadRequest)\n\
             \t\treturn\n\
             \t}}"
        ),
        None => format!(
            "{bad_request}(&{target}); err != nil {{\n\
             \t\thttp.Error(w, err.Error(), http.StatusBadRequest)\n\
             \t\treturn\n\
             \t}}"
        ),
    }
}

fn response_view(field: &Field) -> ResponseView {
    let name = &field.field_name;
    let native = &field.native_type;

    let client_decode = match native.strip_prefix('*') {
        Some(element) => format!(
            "result := &{element}{{}}\n\
             \tif err = json.NewDecoder(resp.Body).Decode(result); err != nil {{\n\
             \t\treturn nil, err\n\
             \t}}\n\
             \tresponse.{name} = result"
        ),
        None => format!(
            "if err = json.NewDecoder(resp.Body).Decode(&response.{name}); err != nil {{\n\
             \t\treturn nil, err\n\
             \t}}"
        ),
    };

    let encode = format!(
        "w.Header().Set(\"Content-Type\", \"application/json\")\n\
         \tif err = json.NewEncoder(w).Encode(responses.{name}); err != nil {{\n\
         \t\thttp.Error(w, err.Error(), http.StatusInternalServerError)\n\
         \t}}"
    );
    let nillable = native.starts_with('*')
        || native.starts_with("[]")
        || native.starts_with("map[")
        || native == "interface{}";
    let server_encode = if nillable {
        // indent the unconditional form one level deeper inside the nil check
        format!(
            "if responses.{name} != nil {{\n\t\t{}\n\t}}",
            encode.replace("\n\t", "\n\t\t")
        )
    } else {
        encode
    };

    ResponseView {
        field_name: name.clone(),
        native_type: native.clone(),
        client_decode,
        server_encode,
    }
}
