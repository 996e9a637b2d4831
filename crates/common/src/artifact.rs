//! Generated artifact kinds and their default filenames

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A file produced by a render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Artifact {
    Client,
    Types,
    Constants,
    Model,
    Provider,
    Server,
}

impl Artifact {
    /// Every artifact, in the order a full render writes them
    pub const ALL: [Artifact; 6] = [
        Artifact::Client,
        Artifact::Types,
        Artifact::Constants,
        Artifact::Model,
        Artifact::Provider,
        Artifact::Server,
    ];

    /// Filename used when the caller doesn't supply one
    pub fn default_filename(self) -> &'static str {
        match self {
            Artifact::Client => "client.go",
            Artifact::Types => "types.go",
            Artifact::Constants => "constants.go",
            Artifact::Model => "model.json",
            Artifact::Provider => "provider.go",
            Artifact::Server => "server.go",
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Artifact::Client => "client",
            Artifact::Types => "types",
            Artifact::Constants => "constants",
            Artifact::Model => "model",
            Artifact::Provider => "provider",
            Artifact::Server => "server",
        };
        f.write_str(name)
    }
}

impl FromStr for Artifact {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Artifact::ALL
            .into_iter()
            .find(|a| a.to_string().eq_ignore_ascii_case(s) || a.default_filename() == s)
            .ok_or_else(|| {
                let names: Vec<String> = Artifact::ALL.iter().map(|a| a.to_string()).collect();
                format!("unknown artifact '{}' (expected one of: {})", s, names.join(", "))
            })
    }
}
