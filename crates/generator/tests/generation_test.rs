//! Integration tests rendering the Cloud Functions fixture end to end

use sacagawea_common::{Artifact, GeneratorError, Model, Result};
use sacagawea_generator::{get_files, ServiceRenderer};
use sacagawea_parser::Fetch;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const URL: &str = "https://cloudfunctions.googleapis.com/$discovery/rest?version=v1";

mockall::mock! {
    pub Fetcher {}

    impl Fetch for Fetcher {
        fn fetch(&self, location: &str) -> Result<Vec<u8>>;
    }
}

fn fixture() -> Vec<u8> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../parser/tests/fixtures/cloudfunctions-v1.json");
    fs::read(&path).unwrap_or_else(|e| panic!("{}: {}", path.display(), e))
}

fn fixture_fetcher() -> MockFetcher {
    let mut fetcher = MockFetcher::new();
    fetcher
        .expect_fetch()
        .withf(|location| location == URL)
        .times(1)
        .returning(|_| Ok(fixture()));
    fetcher
}

fn render_all() -> (TempDir, ServiceRenderer) {
    let dir = TempDir::new().unwrap();
    let service =
        ServiceRenderer::with_fetcher(&fixture_fetcher(), URL, "cloudfunctions", dir.path())
            .unwrap();
    service.render_all().unwrap();
    (dir, service)
}

fn read(dir: &TempDir, name: &str) -> String {
    fs::read_to_string(dir.path().join(name)).unwrap()
}

#[test]
fn test_render_all_writes_every_artifact() {
    let (dir, service) = render_all();

    for artifact in Artifact::ALL {
        let path = dir.path().join(artifact.default_filename());
        assert!(path.exists(), "{} should be written", path.display());
    }
    assert_eq!(service.url(), URL);
    assert_eq!(service.output(), dir.path());
    assert_eq!(service.openapi().info.title, "Cloud Functions API");
}

#[test]
fn test_client_file() {
    let (dir, _service) = render_all();
    let client = read(&dir, "client.go");

    assert!(client.starts_with("// Code generated by sacagawea. DO NOT EDIT.\n\npackage cloudfunctions\n"));
    assert!(client.contains(
        "import (\n\t\"bytes\"\n\t\"encoding/json\"\n\t\"fmt\"\n\t\"io/ioutil\"\n\t\"net/http\"\n\t\"net/url\"\n\t\"strconv\"\n\t\"strings\"\n)"
    ));

    // Parameters are ordered by name
    assert!(client.contains(
        "func (client *Client) Cloudfunctions_Projects_Locations_List(filter string, name string, pageSize int32, pageToken string) (response *Cloudfunctions_Projects_Locations_ListResponses, err error) {"
    ));
    assert!(client.contains("path := client.service + \"/v1/{+name}/locations\""));
    assert!(client.contains("path = strings.Replace(path, \"{+name}\", name, 1)"));
    assert!(client.contains("v.Set(\"pageSize\", strconv.FormatInt(int64(pageSize), 10))"));

    // Request bodies come last
    assert!(client.contains(
        "Cloudfunctions_Projects_Locations_Functions_Create(location string, requestBody *CloudFunction)"
    ));
    assert!(client.contains("http.NewRequest(\"POST\", path, payload)"));
    assert!(client.contains("response.Default = result"));

    // Simple variables in the flat path are escaped
    assert!(client.contains("url.PathEscape(functionsId)"));

    assert!(!client.contains("\n\n\n"));
    assert!(!client.contains(" \n"));
}

#[test]
fn test_types_file() {
    let (dir, _service) = render_all();
    let types = read(&dir, "types.go");

    assert!(!types.contains("import"));
    assert!(types.contains("type CloudFunction struct {"));
    assert!(types.contains("\tHTTPSTrigger *HttpsTrigger `json:\"httpsTrigger,omitempty\"`"));
    assert!(types.contains("\tStatus string `json:\"status,omitempty\"`"));
    assert!(types.contains("type Cloudfunctions_Projects_Locations_ListParameters struct {"));
    assert!(types.contains("\tPageSize int32\n"));
    assert!(types.contains("\tDefault *ListLocationsResponse\n"));
}

#[test]
fn test_constants_file() {
    let (dir, _service) = render_all();
    let constants = read(&dir, "constants.go");

    assert!(constants.contains("\tServiceURL = \"https://cloudfunctions.googleapis.com\""));
    assert!(constants.contains("\tCloudFunctionStatusActive = \"ACTIVE\""));
}

#[test]
fn test_provider_and_server_files() {
    let (dir, _service) = render_all();

    let provider = read(&dir, "provider.go");
    assert!(provider.contains("type Provider interface {"));
    assert!(provider.contains(
        "\tCloudfunctions_Operations_Get(parameters *Cloudfunctions_Operations_GetParameters, responses *Cloudfunctions_Operations_GetResponses) (err error)"
    ));

    // The server template carries no imports of its own
    let server = read(&dir, "server.go");
    assert!(server.contains(
        "import (\n\t\"encoding/json\"\n\t\"net/http\"\n\t\"strconv\"\n\t\"strings\"\n)"
    ));
    assert!(server.contains("func (s *Server) HandleCloudfunctions_Operations_Get("));
    assert!(server.contains("parameters.Name = vars[\"name\"]"));

    // Reserved expansions are registered after literal routes
    let literal = server
        .find("splitPath(\"/v1/projects/{projectsId}/locations/{locationsId}/functions/{functionsId}\")")
        .unwrap();
    let reserved = server.find("splitPath(\"/v1/{+name}\")").unwrap();
    assert!(literal < reserved);

    // A reserved variable spans segments, so longer patterns must be tried first
    let locations = server.find("splitPath(\"/v1/{+name}/locations\")").unwrap();
    let functions = server.find("splitPath(\"/v1/{+parent}/functions\")").unwrap();
    assert!(locations < reserved);
    assert!(functions < reserved);
}

#[test]
fn test_model_file() {
    let (dir, service) = render_all();
    let model: Model = serde_json::from_str(&read(&dir, "model.json")).unwrap();

    assert_eq!(&model, service.model());
    assert_eq!(model.methods.len(), 8);
    assert!(model.type_named("CloudFunction").is_some());
}

#[test]
fn test_render_with_custom_filename() {
    let dir = TempDir::new().unwrap();
    let service =
        ServiceRenderer::with_fetcher(&fixture_fetcher(), URL, "gcf", dir.path()).unwrap();

    let path = service.render_types(Some("api/types_gen.go")).unwrap();
    assert_eq!(path, dir.path().join("api/types_gen.go"));
    assert!(read(&dir, "api/types_gen.go").contains("package gcf"));

    let path = service.render_constants(Some("")).unwrap();
    assert_eq!(path, dir.path().join("constants.go"));
}

#[test]
fn test_save_file_checks_go_sources() {
    let dir = TempDir::new().unwrap();
    let service =
        ServiceRenderer::with_fetcher(&fixture_fetcher(), URL, "gcf", dir.path()).unwrap();

    let err = service.save_file("broken.go", b"func A() {}\n").unwrap_err();
    assert!(matches!(err, GeneratorError::Format { .. }));
    assert!(!dir.path().join("broken.go").exists());

    // Other files are written as they are
    service.save_file("notes.txt", b"func A() {}   \n").unwrap();
    assert_eq!(read(&dir, "notes.txt"), "func A() {}   \n");
}

#[test]
fn test_fetch_failure_aborts_construction() {
    let mut fetcher = MockFetcher::new();
    fetcher
        .expect_fetch()
        .returning(|_| Err(GeneratorError::Fetch("404 Not Found".to_string())));

    let dir = TempDir::new().unwrap();
    let err = ServiceRenderer::with_fetcher(&fetcher, URL, "gcf", dir.path())
        .err()
        .unwrap();
    assert_eq!(err.to_string(), "Error while fetching URL: 404 Not Found");
}

#[test]
fn test_get_files_renders_types() {
    let types = String::from_utf8(get_files(&fixture()).unwrap()).unwrap();
    assert!(types.contains("package cloudfunctionsapi"));
    assert!(types.contains("type ListFunctionsResponse struct {"));
}
