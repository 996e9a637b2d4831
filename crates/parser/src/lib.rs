//! Discovery document parsing and model derivation
//!
//! This crate covers the language-independent half of the pipeline:
//!
//! 1. fetch a Discovery document ([`fetch`])
//! 2. parse it ([`discovery::DiscoveryParser`])
//! 3. convert it to OpenAPI v3 ([`openapi::discovery_to_openapi`])
//! 4. derive the surface model ([`surface::surface_from_openapi`])
//!
//! Every stage returns the first error it meets; nothing is retried.

pub mod discovery;
pub mod fetch;
pub mod openapi;
pub mod surface;

pub use discovery::{list_services, parse_directory_list, DiscoveryDoc, DiscoveryParser};
pub use fetch::{fetch_file, Fetch, HttpFetcher, APIS_LIST_SERVICE_URL};
pub use openapi::{discovery_to_openapi, OpenApiDocument};
pub use surface::surface_from_openapi;

use sacagawea_common::{Model, Result};

/// Parse raw Discovery bytes and convert them to OpenAPI v3
pub fn openapi_from_bytes(bytes: &[u8]) -> Result<OpenApiDocument> {
    let parser = DiscoveryParser::from_bytes(bytes)?;
    discovery_to_openapi(parser.doc())
}

/// Parse raw Discovery bytes all the way to a surface model
///
/// Returns the intermediate OpenAPI document alongside the model.
pub fn surface_from_bytes(bytes: &[u8]) -> Result<(OpenApiDocument, Model)> {
    let openapi = openapi_from_bytes(bytes)?;
    let model = surface_from_openapi(&openapi)?;
    Ok((openapi, model))
}
