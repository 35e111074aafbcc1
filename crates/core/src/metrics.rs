//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Provider fan-out (requests by outcome, candidates, detail failures)
//! - Search pipeline (duration, streams returned)
//! - Collaborators (metadata and debrid lookups)

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Provider Metrics
// =============================================================================

/// Provider searches total by outcome.
pub static PROVIDER_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "stremizio_provider_requests_total",
            "Total provider searches",
        ),
        &["provider", "outcome"], // "ok", "empty", "unavailable", "panicked"
    )
    .unwrap()
});

/// Candidates contributed per provider search.
pub static PROVIDER_CANDIDATES: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "stremizio_provider_candidates",
            "Number of candidates returned per provider search",
        )
        .buckets(vec![0.0, 1.0, 2.0, 5.0, 10.0, 20.0]),
        &["provider"],
    )
    .unwrap()
});

/// Detail page lookups that yielded no candidate.
pub static DETAIL_FETCH_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "stremizio_detail_fetch_failures_total",
            "Total detail page lookups dropped",
        ),
        &["provider", "reason"], // "unavailable", "no_magnet"
    )
    .unwrap()
});

// =============================================================================
// Search Metrics
// =============================================================================

/// End-to-end aggregated search duration in seconds.
pub static SEARCH_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "stremizio_search_duration_seconds",
            "Duration of an aggregated search",
        )
        .buckets(vec![0.25, 0.5, 1.0, 2.0, 4.0, 6.0, 8.0, 12.0]),
    )
    .unwrap()
});

/// Streams returned per request.
pub static STREAMS_RETURNED: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "stremizio_streams_returned",
            "Number of streams returned per request",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 20.0, 40.0]),
    )
    .unwrap()
});

// =============================================================================
// Collaborator Metrics
// =============================================================================

/// Metadata and debrid lookups by service and result.
pub static COLLABORATOR_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "stremizio_collaborator_requests_total",
            "Total metadata and debrid lookups",
        ),
        &["service", "result"], // service: "tmdb", "real_debrid"; result: "ok", "fallback"
    )
    .unwrap()
});

/// Get all core metrics for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Providers
        Box::new(PROVIDER_REQUESTS.clone()),
        Box::new(PROVIDER_CANDIDATES.clone()),
        Box::new(DETAIL_FETCH_FAILURES.clone()),
        // Search
        Box::new(SEARCH_DURATION.clone()),
        Box::new(STREAMS_RETURNED.clone()),
        // Collaborators
        Box::new(COLLABORATOR_REQUESTS.clone()),
    ]
}
