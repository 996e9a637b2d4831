//! Generation against live Google services
//!
//! These need network access and are ignored by default:
//! `cargo test -p sacagawea-generator -- --ignored`

use sacagawea_generator::ServiceRenderer;
use std::fs;
use tempfile::TempDir;

fn generate(url: &str, package: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    let service = ServiceRenderer::new(url, package, dir.path()).unwrap();
    service.render_all().unwrap();
    dir
}

#[test]
#[ignore]
fn test_generate_cloudfunctions_client() {
    let dir = generate(
        "https://cloudfunctions.googleapis.com/$discovery/rest?version=v1",
        "cloudfunctions",
    );

    let client = fs::read_to_string(dir.path().join("client.go")).unwrap();
    assert!(client.contains("func (client *Client) Cloudfunctions_Projects_Locations_List("));

    let constants = fs::read_to_string(dir.path().join("constants.go")).unwrap();
    assert!(constants.contains("ServiceURL = \"https://cloudfunctions.googleapis.com\""));
}

#[test]
#[ignore]
fn test_generate_discovery_client() {
    let dir = generate(
        "https://www.googleapis.com/discovery/v1/apis/discovery/v1/rest",
        "discovery",
    );

    let types = fs::read_to_string(dir.path().join("types.go")).unwrap();
    assert!(types.contains("type DirectoryList struct {"));
    assert!(dir.path().join("model.json").exists());
}
