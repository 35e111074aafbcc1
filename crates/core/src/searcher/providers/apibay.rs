//! ApiBay: JSON search API over a public index dump.
//!
//! Rows carry a bare info hash, so magnets are synthesised locally with
//! the configured tracker list. No detail requests are needed.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::searcher::fetcher::{FetchError, Fetcher};
use crate::searcher::normalize::{build_magnet, clean_title, format_size, is_localized};
use crate::searcher::{Candidate, Provider, ProviderError, ProviderQuery};

pub const APIBAY_NAME: &str = "ApiBay";

/// Video category for the whole listing.
const VIDEO_CATEGORY: u32 = 200;

/// Title of the single placeholder row returned for an empty result.
const NO_RESULTS: &str = "No results returned";


/// Numeric fields arrive as strings, as numbers, or not at all.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Lenient {
    Number(u64),
    Text(String),
}

impl Lenient {
    fn as_u64(&self) -> u64 {
        match self {
            Lenient::Number(n) => *n,
            Lenient::Text(s) => s.trim().parse().unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ApibayRow {
    #[serde(default)]
    name: String,
    #[serde(default)]
    info_hash: String,
    seeders: Option<Lenient>,
    size: Option<Lenient>,
}

impl ApibayRow {
    fn is_placeholder(&self) -> bool {
        self.name == NO_RESULTS || self.info_hash.chars().all(|c| c == '0')
    }
}

pub struct ApibayProvider {
    fetcher: Arc<Fetcher>,
    config: ProviderConfig,
    trackers: Vec<String>,
}

impl ApibayProvider {
    pub fn new(fetcher: Arc<Fetcher>, config: ProviderConfig, trackers: Vec<String>) -> Self {
        Self {
            fetcher,
            config,
            trackers,
        }
    }

    fn build_search_url(&self, query: &ProviderQuery) -> String {
        format!(
            "{}?q={}&cat={}",
            self.config.base_url,
            urlencoding::encode(&query.query),
            VIDEO_CATEGORY
        )
    }

    fn to_candidates(&self, rows: Vec<ApibayRow>) -> Vec<Candidate> {
        if rows.first().map_or(true, ApibayRow::is_placeholder) {
            return Vec::new();
        }

        rows.into_iter()
            .filter(|row| !row.is_placeholder())
            .filter(|row| !self.config.language_filter || is_localized(&row.name))
            .take(self.config.max_results)
            .map(|row| {
                let bytes = row.size.as_ref().map_or(0, Lenient::as_u64);
                Candidate {
                    provider: APIBAY_NAME.to_string(),
                    title: clean_title(&row.name),
                    magnet: build_magnet(&row.info_hash, &row.name, &self.trackers),
                    size: format_size(bytes),
                    seeders: row
                        .seeders
                        .as_ref()
                        .map_or(0, Lenient::as_u64)
                        .min(u32::MAX as u64) as u32,
                }
            })
            .collect()
    }
}

#[async_trait]
impl Provider for ApibayProvider {
    fn name(&self) -> &str {
        APIBAY_NAME
    }

    async fn search(&self, query: &ProviderQuery) -> Result<Vec<Candidate>, ProviderError> {
        let url = self.build_search_url(query);
        let rows: Vec<ApibayRow> = self
            .fetcher
            .get_json(&url)
            .await
            .map_err(|e| match e {
                FetchError::Body(msg) => ProviderError::Malformed(msg),
                other => ProviderError::Unavailable(other),
            })?;

        let candidates = self.to_candidates(rows);
        debug!(
            provider = APIBAY_NAME,
            candidates = candidates.len(),
            "Results parsed"
        );
        Ok(candidates)
    }
}
