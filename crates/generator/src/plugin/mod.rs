//! Plugin protocol
//!
//! Instead of rendering Go code in-process, a Discovery document can be
//! handed to an external generator plugin: the OpenAPI document header
//! and the surface model are packed into a [`proto::Request`], the plugin
//! runs, and the files in its [`proto::Response`] are written out.

pub mod proto;
mod runner;

pub use runner::{PluginRunner, DEFAULT_PLUGIN};

use proto::{Level, Request, Response};
use prost::Message as _;
use prost_types::Any;
use sacagawea_common::{GeneratorError, Model, Result};
use sacagawea_parser::{openapi_from_bytes, surface_from_openapi, Fetch, OpenApiDocument};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, error, info, warn};

pub const OPENAPI_TYPE_URL: &str = "openapi.v3.Document";
pub const SURFACE_TYPE_URL: &str = "surface.v1.Model";

/// Output path that sends plugin files to stdout
pub const STDOUT_PATH: &str = "-";

/// Build a plugin request carrying the OpenAPI document and, when one
/// could be derived, the surface model
pub fn build_request(
    source_name: &str,
    output_path: &str,
    openapi: &OpenApiDocument,
    model: Option<&Model>,
) -> Request {
    let mut models = vec![Any {
        type_url: OPENAPI_TYPE_URL.to_string(),
        value: proto::openapi::Document::from(openapi).encode_to_vec(),
    }];
    if let Some(model) = model {
        models.push(Any {
            type_url: SURFACE_TYPE_URL.to_string(),
            value: proto::surface::Model::from(model).encode_to_vec(),
        });
    }

    Request {
        source_name: source_name.to_string(),
        output_path: output_path.to_string(),
        parameters: Vec::new(),
        compiler_version: Some(compiler_version()),
        models,
    }
}

fn compiler_version() -> proto::Version {
    proto::Version {
        major: env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap_or_default(),
        minor: env!("CARGO_PKG_VERSION_MINOR").parse().unwrap_or_default(),
        patch: env!("CARGO_PKG_VERSION_PATCH").parse().unwrap_or_default(),
        suffix: env!("CARGO_PKG_VERSION_PRE").to_string(),
    }
}

/// Log plugin messages, fail on plugin errors, and write the returned
/// files under `path` (or to stdout when `path` is `-`)
///
/// Returns the names of the files written.
pub fn handle_response(response: &Response, path: &str) -> Result<Vec<String>> {
    for message in &response.messages {
        let keys = message.keys.join(", ");
        match message.level() {
            Level::Unknown | Level::Info => info!(code = %message.code, keys = %keys, "{}", message.text),
            Level::Warning => warn!(code = %message.code, keys = %keys, "{}", message.text),
            Level::Error | Level::Fatal => {
                error!(code = %message.code, keys = %keys, "{}", message.text)
            }
        }
    }

    if !response.errors.is_empty() {
        return Err(GeneratorError::Plugin(response.errors.join("\n")));
    }

    let mut written = Vec::with_capacity(response.files.len());
    for file in &response.files {
        if path == STDOUT_PATH {
            std::io::stdout().write_all(&file.data)?;
        } else {
            let target = Path::new(path).join(&file.name);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, &file.data)?;
            debug!("Wrote {}", target.display());
        }
        written.push(file.name.clone());
    }

    Ok(written)
}

/// Run a plugin over raw Discovery bytes
pub fn export_bytes(bytes: &[u8], path: &str, runner: &PluginRunner) -> Result<Vec<String>> {
    let openapi = openapi_from_bytes(bytes)?;
    let model = match surface_from_openapi(&openapi) {
        Ok(model) => Some(model),
        Err(e) => {
            debug!("Sending request without a surface model: {}", e);
            None
        }
    };

    let request = build_request(&openapi.info.title, path, &openapi, model.as_ref());
    let response = runner.run(&request)?;
    handle_response(&response, path)
}

/// Fetch a Discovery document and run a plugin over it
pub fn gen_service_client(
    fetcher: &dyn Fetch,
    url: &str,
    path: &str,
    runner: &PluginRunner,
) -> Result<Vec<String>> {
    let bytes = fetcher.fetch(url)?;
    export_bytes(&bytes, path, runner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proto::{File, Message};
    use prost::Message as _;
    use sacagawea_parser::openapi::{Info, Server};
    use tempfile::TempDir;

    fn document() -> OpenApiDocument {
        OpenApiDocument {
            openapi: "3.0.0".to_string(),
            info: Info {
                title: "Demo API".to_string(),
                version: "v1".to_string(),
                description: None,
            },
            servers: vec![Server {
                url: "https://demo.googleapis.com".to_string(),
                description: None,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_build_request_models() {
        let model = Model {
            name: "Demo API".to_string(),
            ..Default::default()
        };

        let request = build_request("demo", "out", &document(), Some(&model));
        assert_eq!(request.models.len(), 2);
        assert_eq!(request.models[0].type_url, OPENAPI_TYPE_URL);
        assert_eq!(request.models[1].type_url, SURFACE_TYPE_URL);

        let header = proto::openapi::Document::decode(request.models[0].value.as_slice()).unwrap();
        assert_eq!(header.servers[0].url, "https://demo.googleapis.com");

        let request = build_request("demo", "out", &document(), None);
        assert_eq!(request.models.len(), 1);
    }

    #[test]
    fn test_handle_response_writes_files() {
        let dir = TempDir::new().unwrap();
        let response = Response {
            files: vec![File {
                name: "nested/client.go".to_string(),
                data: b"package demo\n".to_vec(),
            }],
            messages: vec![Message {
                level: Level::Info as i32,
                text: "generated".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };

        let out = dir.path().to_str().unwrap();
        let written = handle_response(&response, out).unwrap();

        assert_eq!(written, vec!["nested/client.go".to_string()]);
        let data = fs::read_to_string(dir.path().join("nested/client.go")).unwrap();
        assert_eq!(data, "package demo\n");
    }

    #[test]
    fn test_handle_response_errors() {
        let response = Response {
            errors: vec!["unsupported model".to_string()],
            ..Default::default()
        };
        let err = handle_response(&response, "unused").unwrap_err();
        assert!(matches!(err, GeneratorError::Plugin(ref msg) if msg == "unsupported model"));
    }
}
