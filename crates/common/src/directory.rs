//! Google API directory list
//!
//! The response of `GET https://www.googleapis.com/discovery/v1/apis`,
//! which enumerates every API the Discovery service knows about.

use serde::{Deserialize, Serialize};

/// The `discovery#directoryList` resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryList {
    #[serde(default)]
    pub kind: String,

    #[serde(default)]
    pub discovery_version: String,

    #[serde(default)]
    pub items: Vec<DirectoryItem>,
}

impl DirectoryList {
    /// Items flagged as the preferred version of their API
    pub fn preferred(&self) -> impl Iterator<Item = &DirectoryItem> {
        self.items.iter().filter(|item| item.preferred)
    }

    /// Find an item by id, e.g. `cloudfunctions:v1`
    pub fn find(&self, id: &str) -> Option<&DirectoryItem> {
        self.items.iter().find(|item| item.id == id)
    }
}

/// Kind tag of a directory entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    #[default]
    #[serde(rename = "discovery#directoryItem")]
    DirectoryItem,
}

/// Status labels attached to an API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Deprecated,
    Labs,
    LimitedAvailability,
    #[serde(other)]
    Unknown,
}

/// Icon links for an API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Icons {
    #[serde(default)]
    pub x16: String,

    #[serde(default)]
    pub x32: String,
}

/// One API in the directory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryItem {
    #[serde(default)]
    pub kind: ItemKind,

    pub id: String,

    pub name: String,

    pub version: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(rename = "discoveryRestUrl")]
    pub discovery_rest_url: String,

    #[serde(default)]
    pub discovery_link: String,

    #[serde(default)]
    pub icons: Icons,

    #[serde(default)]
    pub documentation_link: String,

    #[serde(default)]
    pub labels: Vec<Label>,

    #[serde(default)]
    pub preferred: bool,
}
