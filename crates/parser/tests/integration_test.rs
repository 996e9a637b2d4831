//! Tests against the live Discovery service
//!
//! These need network access and are ignored by default:
//! `cargo test -p sacagawea-parser -- --ignored`

use sacagawea_common::DirectoryList;
use sacagawea_parser::{list_services, surface_from_bytes, Fetch, HttpFetcher};

const DISCOVERY_URL: &str = "https://www.googleapis.com/discovery/v1/apis/discovery/v1/rest";

#[test]
#[ignore]
fn test_list_services() {
    let list = list_services(&HttpFetcher::new()).unwrap();
    assert_eq!(list.kind, "discovery#directoryList");
    assert!(!list.items.is_empty());

    // Re-serialized list must unpack into the same shape
    let json = serde_json::to_vec_pretty(&list).unwrap();
    let reparsed: DirectoryList = serde_json::from_slice(&json).unwrap();
    assert_eq!(reparsed.items.len(), list.items.len());
    assert!(reparsed.find("discovery:v1").is_some());
}

#[test]
#[ignore]
fn test_discovery_service_model() {
    let bytes = HttpFetcher::new().fetch(DISCOVERY_URL).unwrap();
    let (openapi, model) = surface_from_bytes(&bytes).unwrap();

    assert_eq!(openapi.info.version, "v1");
    assert!(model.type_named("DirectoryList").is_some());
    assert!(model.methods.iter().any(|m| m.name == "Discovery_Apis_List"));
}
