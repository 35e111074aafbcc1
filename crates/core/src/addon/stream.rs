//! Stream objects as consumed by the media client.

use serde::{Deserialize, Serialize};

use crate::searcher::normalize::{classify_quality, is_localized};
use crate::searcher::ResolvedItem;

const FLAG_LOCALIZED: &str = "🇮🇹";
const FLAG_OTHER: &str = "🇬🇧";

/// Client hints attached to a stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorHints {
    /// Streams sharing this key are auto-played in sequence.
    pub binge_group: String,
}

/// One playable result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Stream {
    /// `<flag> <quality> [<provider>]`
    pub name: String,
    /// `<title>\n<size> | <seeders> seeds`
    pub title: String,
    /// Uppercase content hash.
    pub info_hash: String,
    pub behavior_hints: BehaviorHints,
    /// Magnet as the provider published it, trackers included.
    #[serde(skip)]
    pub magnet: String,
    /// Direct URL, present only after debrid resolution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Stream {
    /// Project a ranked item into its client shape.
    pub fn from_item(item: &ResolvedItem, trusted_provider: &str, binge_namespace: &str) -> Self {
        let quality = classify_quality(&item.title);
        let localized = is_localized(&item.title) || item.provider == trusted_provider;
        let flag = if localized { FLAG_LOCALIZED } else { FLAG_OTHER };

        Self {
            name: format!("{} {} [{}]", flag, quality, item.provider),
            title: format!("{}\n{} | {} seeds", item.title, item.size, item.seeders),
            info_hash: item.info_hash.clone(),
            behavior_hints: BehaviorHints {
                binge_group: format!("{}-{}", binge_namespace, quality),
            },
            magnet: item.magnet.clone(),
            url: None,
        }
    }
}
