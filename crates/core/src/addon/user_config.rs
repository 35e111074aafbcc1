//! Per-user configuration carried in the first URL path segment.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Options a user picked when installing the addon.
///
/// Encoded as (percent-encoded) JSON, e.g.
/// `{"no_4k":true,"tmdb_key":"...","rd_key":"..."}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserConfig {
    #[serde(default)]
    pub no_4k: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rd_key: Option<String>,
}

impl UserConfig {
    /// Decode a config blob. Anything undecodable yields the defaults.
    pub fn decode(blob: &str) -> Self {
        let blob = blob.trim();
        if blob.is_empty() {
            return Self::default();
        }

        if let Ok(config) = serde_json::from_str::<UserConfig>(blob) {
            return config.normalized();
        }

        // Path extraction may leave one level of encoding in place
        let decoded = urlencoding::decode(blob).map(|d| d.into_owned());
        match decoded.map(|d| serde_json::from_str::<UserConfig>(&d)) {
            Ok(Ok(config)) => config.normalized(),
            _ => {
                warn!(blob_len = blob.len(), "Undecodable addon config, using defaults");
                Self::default()
            }
        }
    }

    /// Treat blank keys as absent.
    fn normalized(mut self) -> Self {
        self.tmdb_key = self.tmdb_key.filter(|k| !k.trim().is_empty());
        self.rd_key = self.rd_key.filter(|k| !k.trim().is_empty());
        self
    }
}
