//! Common types and utilities for Sacagawea
//!
//! This crate contains the error type, the language-agnostic surface model,
//! the Google API directory types, and the artifact kinds shared by the
//! parser, generator, and CLI components.

mod artifact;
pub mod naming;
pub mod directory;
pub mod surface;

pub use artifact::Artifact;
pub use directory::{DirectoryItem, DirectoryList, Icons, ItemKind, Label};
pub use surface::{Constant, Field, FieldKind, Method, Model, Position, Type, TypeKind};

use thiserror::Error;

/// Errors that can occur while generating a client library
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Error while fetching URL: {0}")]
    Fetch(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid input")]
    InvalidInput,

    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("{filename}: {message}")]
    Format { filename: String, message: String },

    #[error("Plugin error: {0}")]
    Plugin(String),

    #[error("Invalid plugin response (plugins must write log messages to stderr, not stdout).")]
    InvalidPluginResponse,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_message() {
        let err = GeneratorError::Fetch("connection refused".to_string());
        assert_eq!(
            err.to_string(),
            "Error while fetching URL: connection refused"
        );
    }

    #[test]
    fn test_plugin_response_error_message() {
        assert!(GeneratorError::InvalidPluginResponse
            .to_string()
            .contains("plugins must write log messages to stderr"));
    }
}
