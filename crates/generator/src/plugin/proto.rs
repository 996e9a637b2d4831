//! Plugin protocol messages
//!
//! Hand-written prost messages for the plugin request/response exchange,
//! plus mirrors of the surface model and the OpenAPI document header that
//! travel inside a request as `Any` models.

use sacagawea_common as common;
use sacagawea_parser::OpenApiDocument;

/// Compiler version sent with each request
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Version {
    #[prost(int32, tag = "1")]
    pub major: i32,
    #[prost(int32, tag = "2")]
    pub minor: i32,
    #[prost(int32, tag = "3")]
    pub patch: i32,
    #[prost(string, tag = "4")]
    pub suffix: ::prost::alloc::string::String,
}

/// A `name=value` plugin parameter
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Parameter {
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub value: ::prost::alloc::string::String,
}

/// Request written to a plugin's stdin
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Request {
    #[prost(string, tag = "1")]
    pub source_name: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub output_path: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "3")]
    pub parameters: ::prost::alloc::vec::Vec<Parameter>,
    #[prost(message, optional, tag = "4")]
    pub compiler_version: ::core::option::Option<Version>,
    #[prost(message, repeated, tag = "5")]
    pub models: ::prost::alloc::vec::Vec<::prost_types::Any>,
}

/// Response read from a plugin's stdout
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Response {
    #[prost(string, repeated, tag = "1")]
    pub errors: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    #[prost(message, repeated, tag = "2")]
    pub files: ::prost::alloc::vec::Vec<File>,
    #[prost(message, repeated, tag = "3")]
    pub messages: ::prost::alloc::vec::Vec<Message>,
}

/// A generated file
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct File {
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
    #[prost(bytes = "vec", tag = "2")]
    pub data: ::prost::alloc::vec::Vec<u8>,
}

/// A diagnostic reported by a plugin
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Message {
    #[prost(enumeration = "Level", tag = "1")]
    pub level: i32,
    #[prost(string, tag = "2")]
    pub code: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub text: ::prost::alloc::string::String,
    #[prost(string, repeated, tag = "4")]
    pub keys: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum Level {
    Unknown = 0,
    Info = 1,
    Warning = 2,
    Error = 3,
    Fatal = 4,
}

/// OpenAPI v3 document header: version, info and servers
pub mod openapi {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Document {
        #[prost(string, tag = "1")]
        pub openapi: ::prost::alloc::string::String,
        #[prost(message, optional, tag = "2")]
        pub info: ::core::option::Option<Info>,
        #[prost(message, repeated, tag = "3")]
        pub servers: ::prost::alloc::vec::Vec<Server>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Info {
        #[prost(string, tag = "1")]
        pub title: ::prost::alloc::string::String,
        #[prost(string, tag = "2")]
        pub description: ::prost::alloc::string::String,
        #[prost(string, tag = "6")]
        pub version: ::prost::alloc::string::String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Server {
        #[prost(string, tag = "1")]
        pub url: ::prost::alloc::string::String,
        #[prost(string, tag = "2")]
        pub description: ::prost::alloc::string::String,
    }
}

/// Surface model
pub mod surface {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Field {
        #[prost(string, tag = "1")]
        pub name: ::prost::alloc::string::String,
        #[prost(string, tag = "2")]
        pub r#type: ::prost::alloc::string::String,
        #[prost(enumeration = "FieldKind", tag = "3")]
        pub kind: i32,
        #[prost(string, tag = "4")]
        pub format: ::prost::alloc::string::String,
        #[prost(enumeration = "Position", tag = "5")]
        pub position: i32,
        #[prost(string, tag = "6")]
        pub native_type: ::prost::alloc::string::String,
        #[prost(string, tag = "7")]
        pub field_name: ::prost::alloc::string::String,
        #[prost(string, tag = "8")]
        pub parameter_name: ::prost::alloc::string::String,
        #[prost(bool, tag = "9")]
        pub serialize: bool,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Type {
        #[prost(string, tag = "1")]
        pub name: ::prost::alloc::string::String,
        #[prost(enumeration = "TypeKind", tag = "2")]
        pub kind: i32,
        #[prost(string, tag = "3")]
        pub description: ::prost::alloc::string::String,
        #[prost(string, tag = "4")]
        pub content_type: ::prost::alloc::string::String,
        #[prost(message, repeated, tag = "5")]
        pub fields: ::prost::alloc::vec::Vec<Field>,
        #[prost(string, tag = "6")]
        pub type_name: ::prost::alloc::string::String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Method {
        #[prost(string, tag = "1")]
        pub operation: ::prost::alloc::string::String,
        #[prost(string, tag = "2")]
        pub path: ::prost::alloc::string::String,
        #[prost(string, tag = "3")]
        pub method: ::prost::alloc::string::String,
        #[prost(string, tag = "4")]
        pub description: ::prost::alloc::string::String,
        #[prost(string, tag = "5")]
        pub name: ::prost::alloc::string::String,
        #[prost(string, tag = "6")]
        pub handler_name: ::prost::alloc::string::String,
        #[prost(string, tag = "7")]
        pub processor_name: ::prost::alloc::string::String,
        #[prost(string, tag = "8")]
        pub client_name: ::prost::alloc::string::String,
        #[prost(string, tag = "9")]
        pub parameters_type_name: ::prost::alloc::string::String,
        #[prost(string, tag = "10")]
        pub responses_type_name: ::prost::alloc::string::String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Model {
        #[prost(string, tag = "1")]
        pub name: ::prost::alloc::string::String,
        #[prost(message, repeated, tag = "2")]
        pub types: ::prost::alloc::vec::Vec<Type>,
        #[prost(message, repeated, tag = "3")]
        pub methods: ::prost::alloc::vec::Vec<Method>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum FieldKind {
        Scalar = 0,
        Map = 1,
        Array = 2,
        Reference = 3,
        Any = 4,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum TypeKind {
        Struct = 0,
        Object = 1,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Position {
        Body = 0,
        Header = 1,
        FormData = 2,
        Query = 3,
        Path = 4,
    }
}

impl From<&OpenApiDocument> for openapi::Document {
    fn from(doc: &OpenApiDocument) -> Self {
        Self {
            openapi: doc.openapi.clone(),
            info: Some(openapi::Info {
                title: doc.info.title.clone(),
                description: doc.info.description.clone().unwrap_or_default(),
                version: doc.info.version.clone(),
            }),
            servers: doc
                .servers
                .iter()
                .map(|s| openapi::Server {
                    url: s.url.clone(),
                    description: s.description.clone().unwrap_or_default(),
                })
                .collect(),
        }
    }
}

impl From<&common::Field> for surface::Field {
    fn from(f: &common::Field) -> Self {
        let kind = match f.kind {
            common::FieldKind::Scalar => surface::FieldKind::Scalar,
            common::FieldKind::Map => surface::FieldKind::Map,
            common::FieldKind::Array => surface::FieldKind::Array,
            common::FieldKind::Reference => surface::FieldKind::Reference,
            common::FieldKind::Any => surface::FieldKind::Any,
        };
        let position = match f.position {
            common::Position::Body => surface::Position::Body,
            common::Position::Header => surface::Position::Header,
            common::Position::FormData => surface::Position::FormData,
            common::Position::Query => surface::Position::Query,
            common::Position::Path => surface::Position::Path,
        };
        Self {
            name: f.name.clone(),
            r#type: f.type_name.clone(),
            kind: kind as i32,
            format: f.format.clone(),
            position: position as i32,
            native_type: f.native_type.clone(),
            field_name: f.field_name.clone(),
            parameter_name: f.parameter_name.clone(),
            serialize: f.serialize,
        }
    }
}

impl From<&common::Type> for surface::Type {
    fn from(t: &common::Type) -> Self {
        let kind = match t.kind {
            common::TypeKind::Struct => surface::TypeKind::Struct,
            common::TypeKind::Object => surface::TypeKind::Object,
        };
        Self {
            name: t.name.clone(),
            kind: kind as i32,
            description: t.description.clone(),
            content_type: t.content_type.clone(),
            fields: t.fields.iter().map(Into::into).collect(),
            type_name: t.type_name.clone(),
        }
    }
}

impl From<&common::Method> for surface::Method {
    fn from(m: &common::Method) -> Self {
        Self {
            operation: m.operation.clone(),
            path: m.path.clone(),
            method: m.method.clone(),
            description: m.description.clone(),
            name: m.name.clone(),
            handler_name: m.handler_name.clone(),
            processor_name: m.processor_name.clone(),
            client_name: m.client_name.clone(),
            parameters_type_name: m.parameters_type_name.clone(),
            responses_type_name: m.responses_type_name.clone(),
        }
    }
}

impl From<&common::Model> for surface::Model {
    fn from(model: &common::Model) -> Self {
        Self {
            name: model.name.clone(),
            types: model.types.iter().map(Into::into).collect(),
            methods: model.methods.iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message as _;

    #[test]
    fn test_response_wire_format() {
        // files { name: "a.go" data: "x" }
        let bytes = [0x12, 0x09, 0x0a, 0x04, b'a', b'.', b'g', b'o', 0x12, 0x01, b'x'];
        let response = Response::decode(&bytes[..]).unwrap();

        assert!(response.errors.is_empty());
        assert_eq!(response.files.len(), 1);
        assert_eq!(response.files[0].name, "a.go");
        assert_eq!(response.files[0].data, b"x");
    }

    #[test]
    fn test_message_level() {
        let message = Message {
            level: Level::Warning as i32,
            text: "deprecated".to_string(),
            ..Default::default()
        };
        assert_eq!(message.level(), Level::Warning);
    }

    #[test]
    fn test_surface_conversion() {
        let model = common::Model {
            name: "Demo".to_string(),
            types: vec![common::Type {
                name: "Bucket".to_string(),
                kind: common::TypeKind::Object,
                fields: vec![common::Field {
                    name: "id".to_string(),
                    type_name: "string".to_string(),
                    position: common::Position::Path,
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        };

        let proto = surface::Model::from(&model);
        assert_eq!(proto.types[0].kind(), surface::TypeKind::Object);
        assert_eq!(proto.types[0].fields[0].position(), surface::Position::Path);
        assert_eq!(proto.types[0].fields[0].r#type, "string");
    }
}
