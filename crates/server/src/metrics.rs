//! Prometheus metrics for the HTTP surface.
//!
//! HTTP request metrics live here; the search pipeline metrics come from
//! `stremizio_core::metrics` and are registered into the same registry.

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use regex_lite::Regex;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "stremizio_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("stremizio_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "stremizio_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

/// Stream lookups by media type, config presence and status.
pub static STREAM_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "stremizio_stream_requests_total",
            "Stream lookups by media type and config segment",
        ),
        &["media_type", "config", "status"],
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();
    registry
        .register(Box::new(STREAM_REQUESTS_TOTAL.clone()))
        .unwrap();

    // Core metrics (providers, search, collaborators)
    for metric in stremizio_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

static STREAM_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(/[^/]+)?/stream/([^/]+)/[^/]+$").unwrap());

static CONFIGURED_MANIFEST_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/[^/]+/manifest\.json$").unwrap());

/// Normalize a path for metric labels.
///
/// Config blobs and content ids are replaced with placeholders so the
/// label set stays bounded.
pub fn normalize_path(path: &str) -> String {
    if path == "/manifest.json" {
        return path.to_string();
    }
    if CONFIGURED_MANIFEST_PATH.is_match(path) {
        return "/{config}/manifest.json".to_string();
    }
    if let Some(caps) = STREAM_PATH.captures(path) {
        let prefix = if caps.get(1).is_some() { "/{config}" } else { "" };
        let media_type = match caps.get(2).map(|m| m.as_str()) {
            Some(t @ ("movie" | "series")) => t,
            _ => "{type}",
        };
        return format!("{}/stream/{}/{{id}}", prefix, media_type);
    }
    path.to_string()
}
