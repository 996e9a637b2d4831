//! Google API directory listing

use crate::fetch::{Fetch, APIS_LIST_SERVICE_URL};
use sacagawea_common::{DirectoryList, GeneratorError, Result};
use tracing::debug;

/// Unpack an `apis/list` response
pub fn parse_directory_list(bytes: &[u8]) -> Result<DirectoryList> {
    serde_json::from_slice(bytes)
        .map_err(|e| GeneratorError::Parse(format!("Failed to parse API directory: {}", e)))
}

/// Fetch and unpack the list of APIs known to the Discovery service
pub fn list_services(fetcher: &dyn Fetch) -> Result<DirectoryList> {
    let bytes = fetcher.fetch(APIS_LIST_SERVICE_URL)?;
    let list = parse_directory_list(&bytes)?;
    debug!(count = list.items.len(), "listed services");
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MockFetch;

    #[test]
    fn test_list_services_fetches_directory() {
        let mut fetcher = MockFetch::new();
        fetcher
            .expect_fetch()
            .withf(|url| url == APIS_LIST_SERVICE_URL)
            .returning(|_| {
                Ok(br#"{"kind": "discovery#directoryList", "discoveryVersion": "v1", "items": [
                    {"id": "discovery:v1", "name": "discovery", "version": "v1",
                     "discoveryRestUrl": "https://discovery.googleapis.com/$discovery/rest?version=v1",
                     "preferred": true}
                ]}"#
                .to_vec())
            });

        let list = list_services(&fetcher).unwrap();
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].name, "discovery");
    }

    #[test]
    fn test_parse_directory_list_rejects_garbage() {
        let err = parse_directory_list(b"<html>").unwrap_err();
        assert!(matches!(err, GeneratorError::Parse(_)));
    }
}
