//! Google Discovery Document parser
//!
//! ## Discovery Document Format
//!
//! Google APIs publish "Discovery Documents" that describe REST APIs.
//! Format is based on JSON Schema Draft 3 with Google-specific extensions.
//!
//! ## Discovery Sources
//!
//! - **List all APIs**: `GET https://www.googleapis.com/discovery/v1/apis`
//! - **Get specific API**: `GET https://{service}.googleapis.com/$discovery/rest?version={version}`
//!
//! ## Usage
//! ```rust,ignore
//! use sacagawea_parser::{discovery::DiscoveryParser, HttpFetcher};
//!
//! let parser = DiscoveryParser::from_url(&HttpFetcher::new(), url)?;
//! let doc = parser.into_doc();
//! ```

mod directory;
mod parser;
mod types;

pub use directory::{list_services, parse_directory_list};
pub use parser::DiscoveryParser;
pub use types::*;
