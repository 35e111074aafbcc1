//! Mock metadata resolver for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::external_catalog::{MediaId, MediaInfo, MetadataResolver};
use crate::searcher::MediaType;

/// A recorded resolve call for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedResolve {
    pub media_type: MediaType,
    pub raw_id: String,
    pub api_key: Option<String>,
}

/// Mock implementation of the MetadataResolver trait.
///
/// Known ids resolve to configured titles; everything else falls back
/// to the raw id, like a resolver without a key.
#[derive(Debug, Default)]
pub struct MockResolver {
    /// Titles and years by base id.
    titles: HashMap<String, (String, Option<u16>)>,
    calls: Arc<RwLock<Vec<RecordedResolve>>>,
}

impl MockResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `id` (without episode coordinates) to this title.
    pub fn with_title(mut self, id: &str, title: &str, year: Option<u16>) -> Self {
        self.titles
            .insert(id.to_string(), (title.to_string(), year));
        self
    }

    /// Get all resolve calls made so far.
    pub async fn recorded_calls(&self) -> Vec<RecordedResolve> {
        self.calls.read().await.clone()
    }
}

#[async_trait]
impl MetadataResolver for MockResolver {
    async fn resolve(
        &self,
        media_type: MediaType,
        raw_id: &str,
        api_key: Option<&str>,
    ) -> MediaInfo {
        self.calls.write().await.push(RecordedResolve {
            media_type,
            raw_id: raw_id.to_string(),
            api_key: api_key.map(String::from),
        });

        let id = MediaId::parse(raw_id);
        match self.titles.get(&id.base) {
            Some((title, year)) => MediaInfo {
                title: title.clone(),
                year: *year,
                season: id.season,
                episode: id.episode,
            },
            None => MediaInfo::fallback(raw_id),
        }
    }
}
