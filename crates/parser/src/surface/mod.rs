//! Surface model derivation
//!
//! Turns an OpenAPI v3 document into the language-agnostic surface model
//! used by the renderers.

mod builder;

pub use builder::surface_from_openapi;
