//! Fetching documents over HTTP or from disk
//!
//! Fetches are blocking and one-shot: no timeout beyond the client's
//! defaults and no retry.

use sacagawea_common::{GeneratorError, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// URL of the Discovery service's API directory
pub const APIS_LIST_SERVICE_URL: &str = "https://www.googleapis.com/discovery/v1/apis";

/// Source of raw document bytes
#[cfg_attr(test, mockall::automock)]
pub trait Fetch {
    /// Fetch the bytes behind `location`
    fn fetch(&self, location: &str) -> Result<Vec<u8>>;
}

/// Fetches `http(s)://` URLs with a blocking client and reads everything
/// else (`file://` URLs and plain paths) from the local filesystem.
#[derive(Debug, Default)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn fetch_url(&self, url: &str) -> Result<Vec<u8>> {
        debug!(url, "fetching document");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| GeneratorError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeneratorError::Fetch(format!("{} returned {}", url, status)));
        }

        let bytes = response
            .bytes()
            .map_err(|e| GeneratorError::Fetch(e.to_string()))?;
        debug!(url, len = bytes.len(), "fetched document");
        Ok(bytes.to_vec())
    }

    fn fetch_path(&self, path: &Path) -> Result<Vec<u8>> {
        debug!(path = %path.display(), "reading document");
        fs::read(path)
            .map_err(|e| GeneratorError::Fetch(format!("{}: {}", path.display(), e)))
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        if location.starts_with("http://") || location.starts_with("https://") {
            self.fetch_url(location)
        } else if let Some(path) = location.strip_prefix("file://") {
            self.fetch_path(Path::new(path))
        } else {
            self.fetch_path(Path::new(location))
        }
    }
}

/// Fetch `location` with a default [`HttpFetcher`]
pub fn fetch_file(location: &str) -> Result<Vec<u8>> {
    HttpFetcher::new().fetch(location)
}
