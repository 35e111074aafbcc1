//! Concurrent fan-out across providers, then dedupe, score and sort.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use futures::FutureExt;
use tracing::{debug, info, warn};

use crate::addon::Stream;
use crate::config::ScoringConfig;
use crate::metrics::{PROVIDER_CANDIDATES, PROVIDER_REQUESTS, SEARCH_DURATION, STREAMS_RETURNED};

use super::dedup::{deduplicate, rank};
use super::normalize::{classify_quality, clean_title, extract_year, Quality};
use super::{
    Candidate, Provider, ProviderOutcome, ProviderQuery, ProviderReport, RankedResultSet,
    SearchRequest,
};

/// Per-request output switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamOptions {
    /// Drop every 4K-classified item.
    pub no_4k: bool,
}

/// Runs one search across every configured provider.
///
/// Holds no per-request state: the dedupe set lives inside each call.
pub struct Aggregator {
    providers: Vec<Arc<dyn Provider>>,
    scoring: ScoringConfig,
    binge_namespace: String,
}

impl Aggregator {
    pub fn new(
        providers: Vec<Arc<dyn Provider>>,
        scoring: ScoringConfig,
        binge_namespace: impl Into<String>,
    ) -> Self {
        Self {
            providers,
            scoring,
            binge_namespace: binge_namespace.into(),
        }
    }

    /// Provider names in dispatch order.
    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    /// Search all providers concurrently and rank the merged results.
    ///
    /// Never fails: a provider that errors or panics contributes nothing,
    /// and when every provider does so the result is simply empty.
    pub async fn search(&self, request: &SearchRequest) -> RankedResultSet {
        let start = Instant::now();
        let cleaned = clean_title(&request.query);

        if cleaned.is_empty() {
            debug!(raw = %request.query, "Empty query after cleaning, skipping search");
            return RankedResultSet::default();
        }

        let query = ProviderQuery {
            year: extract_year(&cleaned),
            query: cleaned,
            media_type: request.media_type,
        };

        debug!(
            query = %query.query,
            media_type = %query.media_type,
            year = ?query.year,
            providers = self.providers.len(),
            "Starting parallel search"
        );

        let branches = self.providers.iter().map(|provider| {
            let query = &query;
            async move {
                let settled = AssertUnwindSafe(provider.search(query))
                    .catch_unwind()
                    .await;
                (provider.name(), settled)
            }
        });
        let settled = join_all(branches).await;

        // Flatten in dispatch order; this order decides dedupe survivors and ties.
        let mut flattened: Vec<Candidate> = Vec::new();
        let mut provider_reports = Vec::with_capacity(settled.len());

        for (name, result) in settled {
            let (outcome, mut candidates) = match result {
                Ok(Ok(candidates)) if candidates.is_empty() => (ProviderOutcome::Empty, candidates),
                Ok(Ok(candidates)) => (ProviderOutcome::Ok, candidates),
                Ok(Err(e)) => {
                    warn!(provider = %name, error = %e, "Provider search failed");
                    (ProviderOutcome::Unavailable, Vec::new())
                }
                Err(_) => {
                    warn!(provider = %name, "Provider search panicked");
                    (ProviderOutcome::Panicked, Vec::new())
                }
            };

            PROVIDER_REQUESTS
                .with_label_values(&[name, outcome.as_str()])
                .inc();
            PROVIDER_CANDIDATES
                .with_label_values(&[name])
                .observe(candidates.len() as f64);

            provider_reports.push(ProviderReport {
                provider: name.to_string(),
                outcome,
                candidates: candidates.len(),
            });
            flattened.append(&mut candidates);
        }

        let total_candidates = flattened.len();
        let items = rank(deduplicate(flattened), &self.scoring);

        let elapsed = start.elapsed();
        SEARCH_DURATION.observe(elapsed.as_secs_f64());

        info!(
            query = %query.query,
            candidates = total_candidates,
            results = items.len(),
            duration_ms = elapsed.as_millis() as u64,
            "Search completed"
        );

        RankedResultSet {
            items,
            duration_ms: elapsed.as_millis() as u64,
            provider_reports,
        }
    }

    /// Search, apply the output switches and project into streams.
    pub async fn get_streams(
        &self,
        request: &SearchRequest,
        options: &StreamOptions,
    ) -> Vec<Stream> {
        let results = self.search(request).await;
        let streams = self.project(&results, options);
        STREAMS_RETURNED.observe(streams.len() as f64);
        streams
    }

    /// Turn a ranked set into streams, preserving its order.
    pub fn project(&self, results: &RankedResultSet, options: &StreamOptions) -> Vec<Stream> {
        results
            .items
            .iter()
            .filter(|item| !(options.no_4k && classify_quality(&item.title) == Quality::Uhd))
            .map(|item| {
                Stream::from_item(item, &self.scoring.trusted_provider, &self.binge_namespace)
            })
            .collect()
    }
}
