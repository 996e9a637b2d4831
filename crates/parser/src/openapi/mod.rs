//! OpenAPI v3 intermediate representation
//!
//! Discovery documents are first translated into OpenAPI v3, which is the
//! input the surface model is derived from.
//!
//! ## Usage
//! ```rust,ignore
//! use sacagawea_parser::openapi::discovery_to_openapi;
//!
//! let openapi = discovery_to_openapi(parser.doc())?;
//! println!("{}", serde_json::to_string_pretty(&openapi)?);
//! ```

mod converter;
mod types;

pub use converter::discovery_to_openapi;
pub use types::*;
