//! Discovery document parser

use super::types::DiscoveryDoc;
use crate::fetch::Fetch;
use sacagawea_common::{GeneratorError, Result};
use tracing::debug;

/// Google Discovery Document parser
///
/// Accepts the JSON form Google serves, and YAML for hand-written
/// documents.
pub struct DiscoveryParser {
    doc: DiscoveryDoc,
}

impl DiscoveryParser {
    /// Fetch a Discovery document and parse it
    ///
    /// # Example
    /// ```rust,ignore
    /// let parser = DiscoveryParser::from_url(
    ///     &HttpFetcher::new(),
    ///     "https://cloudfunctions.googleapis.com/$discovery/rest?version=v1",
    /// )?;
    /// ```
    pub fn from_url(fetcher: &dyn Fetch, url: &str) -> Result<Self> {
        let bytes = fetcher.fetch(url)?;
        Self::from_bytes(&bytes)
    }

    /// Parse a Discovery document from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let value = read_document(bytes)?;
        if !value.is_object() {
            debug!(document = %String::from_utf8_lossy(bytes), "document is not a mapping");
            return Err(GeneratorError::InvalidInput);
        }

        let doc: DiscoveryDoc = serde_json::from_value(value).map_err(|e| {
            GeneratorError::Parse(format!("Failed to parse Discovery document: {}", e))
        })?;
        debug!(name = %doc.name, version = %doc.version, "parsed Discovery document");

        Ok(Self { doc })
    }

    /// Get reference to the underlying Discovery document
    pub fn doc(&self) -> &DiscoveryDoc {
        &self.doc
    }

    /// Take ownership of the underlying Discovery document
    pub fn into_doc(self) -> DiscoveryDoc {
        self.doc
    }
}

/// Read bytes as JSON, falling back to YAML
fn read_document(bytes: &[u8]) -> Result<serde_json::Value> {
    match serde_json::from_slice(bytes) {
        Ok(value) => Ok(value),
        Err(json_err) => serde_yaml::from_slice(bytes).map_err(|yaml_err| {
            GeneratorError::Parse(format!(
                "Document is neither JSON ({}) nor YAML ({})",
                json_err, yaml_err
            ))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MockFetch;

    const MINIMAL: &str = r##"{
        "discoveryVersion": "v1",
        "name": "storage",
        "version": "v1",
        "title": "Cloud Storage JSON API",
        "rootUrl": "https://storage.googleapis.com/",
        "servicePath": "storage/v1/"
    }"##;

    #[test]
    fn test_parse_minimal_discovery() {
        let parser = DiscoveryParser::from_bytes(MINIMAL.as_bytes()).unwrap();
        assert_eq!(parser.doc().name, "storage");
        assert_eq!(parser.doc().version, "v1");
        assert_eq!(
            parser.doc().service_url(),
            "https://storage.googleapis.com/storage/v1/"
        );
    }

    #[test]
    fn test_parse_yaml_document() {
        let yaml = "name: demo\nversion: v2\ntitle: Demo API\nrootUrl: https://demo.example.com/\n";
        let parser = DiscoveryParser::from_bytes(yaml.as_bytes()).unwrap();
        assert_eq!(parser.doc().name, "demo");
        assert_eq!(parser.doc().version, "v2");
    }

    #[test]
    fn test_non_mapping_is_invalid_input() {
        let err = DiscoveryParser::from_bytes(b"[1, 2, 3]").err().unwrap();
        assert!(matches!(err, GeneratorError::InvalidInput));
        assert_eq!(err.to_string(), "Invalid input");
    }

    #[test]
    fn test_missing_required_keys() {
        let err = DiscoveryParser::from_bytes(b"{\"title\": \"no name\"}")
            .err()
            .unwrap();
        assert!(matches!(err, GeneratorError::Parse(_)));
    }

    #[test]
    fn test_from_url_uses_fetcher() {
        let mut fetcher = MockFetch::new();
        fetcher
            .expect_fetch()
            .withf(|url| url == "https://storage.googleapis.com/$discovery/rest?version=v1")
            .times(1)
            .returning(|_| Ok(MINIMAL.as_bytes().to_vec()));

        let parser = DiscoveryParser::from_url(
            &fetcher,
            "https://storage.googleapis.com/$discovery/rest?version=v1",
        )
        .unwrap();
        assert_eq!(parser.doc().title, "Cloud Storage JSON API");
    }

    #[test]
    fn test_from_url_propagates_fetch_error() {
        let mut fetcher = MockFetch::new();
        fetcher
            .expect_fetch()
            .returning(|_| Err(GeneratorError::Fetch("timed out".to_string())));

        let err = DiscoveryParser::from_url(&fetcher, "https://example.com")
            .err()
            .unwrap();
        assert!(matches!(err, GeneratorError::Fetch(_)));
    }
}
