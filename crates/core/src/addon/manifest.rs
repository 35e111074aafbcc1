//! Addon manifest.

use serde::Serialize;

use crate::config::AddonConfig;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ManifestHints {
    /// The client shows a configure button for this addon.
    pub configurable: bool,
}

/// Self-description served at `manifest.json`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub id: String,
    pub version: String,
    pub name: String,
    pub description: String,
    pub resources: Vec<String>,
    pub types: Vec<String>,
    pub catalogs: Vec<serde_json::Value>,
    pub id_prefixes: Vec<String>,
    pub behavior_hints: ManifestHints,
}

impl From<&AddonConfig> for Manifest {
    fn from(config: &AddonConfig) -> Self {
        Self {
            id: config.id.clone(),
            version: config.version.clone(),
            name: config.name.clone(),
            description: config.description.clone(),
            resources: vec!["stream".to_string()],
            types: vec!["movie".to_string(), "series".to_string()],
            catalogs: Vec::new(),
            id_prefixes: vec!["tt".to_string()],
            behavior_hints: ManifestHints { configurable: true },
        }
    }
}
