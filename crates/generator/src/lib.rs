//! Go client generation for Sacagawea
//!
//! This crate turns a surface model into a Go client library:
//!
//! - [`GoLanguageModel`] fills in Go names and native types
//! - [`GoRenderer`] renders `client.go`, `types.go`, `constants.go`,
//!   `provider.go` and `server.go` from embedded templates
//! - [`imports::process`] fixes up the imports of rendered Go files
//! - [`ServiceRenderer`] drives the whole pipeline for one Discovery URL
//! - [`plugin`] hands the models to an external generator plugin instead

mod go_model;
pub mod imports;
pub mod plugin;
mod renderer;
mod service;
mod templates;

pub use go_model::{field_name, native_type, parameter_name, type_name, GoLanguageModel};
pub use plugin::PluginRunner;
pub use renderer::GoRenderer;
pub use service::{get_files, load_model, package_name, ServiceRenderer};
