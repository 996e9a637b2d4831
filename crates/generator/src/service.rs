//! End-to-end rendering of a single API service

use crate::{imports, GoLanguageModel, GoRenderer};
use sacagawea_common::{Artifact, Model, Result};
use sacagawea_parser::{surface_from_bytes, Fetch, HttpFetcher, OpenApiDocument};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Renders the client library of one Discovery document into a directory
///
/// Construction runs the whole pipeline up to a prepared surface model;
/// each `render_*` call then produces and saves one file.
pub struct ServiceRenderer {
    url: String,
    output: PathBuf,
    openapi: OpenApiDocument,
    renderer: GoRenderer,
}

impl ServiceRenderer {
    /// Fetch the Discovery document at `url` and prepare a renderer writing
    /// package `package` into `output`
    pub fn new(url: &str, package: &str, output: impl Into<PathBuf>) -> Result<Self> {
        Self::with_fetcher(&HttpFetcher::new(), url, package, output)
    }

    pub fn with_fetcher(
        fetcher: &dyn Fetch,
        url: &str,
        package: &str,
        output: impl Into<PathBuf>,
    ) -> Result<Self> {
        let bytes = fetcher.fetch(url)?;
        let mut service = Self::from_bytes(&bytes, package, output)?;
        service.url = url.to_string();
        Ok(service)
    }

    /// Prepare a renderer from raw Discovery bytes
    pub fn from_bytes(bytes: &[u8], package: &str, output: impl Into<PathBuf>) -> Result<Self> {
        let (openapi, model) = load_model(bytes)?;
        info!(
            model = %model.name,
            types = model.types.len(),
            methods = model.methods.len(),
            "prepared surface model"
        );

        Ok(Self {
            url: String::new(),
            output: output.into(),
            openapi,
            renderer: GoRenderer::new(model, package)?,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn model(&self) -> &Model {
        self.renderer.model()
    }

    pub fn openapi(&self) -> &OpenApiDocument {
        &self.openapi
    }

    /// Render every artifact in order, stopping at the first failure
    pub fn render_all(&self) -> Result<Vec<PathBuf>> {
        Artifact::ALL
            .iter()
            .map(|artifact| self.render_artifact(*artifact, None))
            .collect()
    }

    /// Render one artifact to `filename`, or to its default filename when
    /// `filename` is `None` or empty
    pub fn render_artifact(&self, artifact: Artifact, filename: Option<&str>) -> Result<PathBuf> {
        let filename = match filename {
            Some(name) if !name.is_empty() => name,
            _ => artifact.default_filename(),
        };
        let data = self.render_bytes(artifact)?;
        self.save_file(filename, &data)
    }

    /// Render one artifact without saving it
    pub fn render_bytes(&self, artifact: Artifact) -> Result<Vec<u8>> {
        match artifact {
            Artifact::Client => self.renderer.render_client(),
            Artifact::Types => self.renderer.render_types(),
            Artifact::Constants => self.renderer.render_constants(),
            Artifact::Model => self.model().to_json_pretty(),
            Artifact::Provider => self.renderer.render_provider(),
            Artifact::Server => self.renderer.render_server(),
        }
    }

    pub fn render_client(&self, filename: Option<&str>) -> Result<PathBuf> {
        self.render_artifact(Artifact::Client, filename)
    }

    pub fn render_types(&self, filename: Option<&str>) -> Result<PathBuf> {
        self.render_artifact(Artifact::Types, filename)
    }

    pub fn render_constants(&self, filename: Option<&str>) -> Result<PathBuf> {
        self.render_artifact(Artifact::Constants, filename)
    }

    pub fn render_model(&self, filename: Option<&str>) -> Result<PathBuf> {
        self.render_artifact(Artifact::Model, filename)
    }

    pub fn render_provider(&self, filename: Option<&str>) -> Result<PathBuf> {
        self.render_artifact(Artifact::Provider, filename)
    }

    pub fn render_server(&self, filename: Option<&str>) -> Result<PathBuf> {
        self.render_artifact(Artifact::Server, filename)
    }

    /// Write `data` to `<output>/<filename>`, fixing up imports of Go files
    pub fn save_file(&self, filename: &str, data: &[u8]) -> Result<PathBuf> {
        let data = if Path::new(filename).extension().is_some_and(|ext| ext == "go") {
            imports::process(filename, data)?
        } else {
            data.to_vec()
        };

        let path = self.output.join(filename);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, data)?;
        debug!(path = %path.display(), "saved file");
        Ok(path)
    }
}

/// Derive the Go-prepared surface model from raw Discovery bytes
pub fn load_model(bytes: &[u8]) -> Result<(OpenApiDocument, Model)> {
    let (openapi, mut model) = surface_from_bytes(bytes)?;
    GoLanguageModel::new().prepare(&mut model);
    Ok((openapi, model))
}

/// Render the types file of a Discovery document
pub fn get_files(bytes: &[u8]) -> Result<Vec<u8>> {
    let (_, model) = load_model(bytes)?;
    let package = package_name(&model.name);
    let types = GoRenderer::new(model, &package)?.render_types()?;
    imports::process(Artifact::Types.default_filename(), &types)
}

/// Go package name derived from a model name: `Cloud Functions API` →
/// `cloudfunctionsapi`
pub fn package_name(name: &str) -> String {
    let package: String = name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    match package.chars().next() {
        None => "api".to_string(),
        Some(c) if c.is_ascii_digit() => format!("api{}", package),
        Some(_) => package,
    }
}
