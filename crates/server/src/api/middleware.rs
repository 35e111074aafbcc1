//! Request metrics for the addon routes.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::metrics::{
    normalize_path, HTTP_REQUESTS_IN_FLIGHT, HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION,
    STREAM_REQUESTS_TOTAL,
};

/// Records duration, count and in-flight requests per route.
///
/// Addon paths embed a user config blob and a content id; both collapse
/// to placeholders through [`normalize_path`]. Stream lookups are also
/// counted per media type, split by whether a config segment was sent.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = normalize_path(request.uri().path());

    HTTP_REQUESTS_IN_FLIGHT.inc();
    let response = next.run(request).await;
    HTTP_REQUESTS_IN_FLIGHT.dec();

    let status = response.status();
    let labels = [method.as_str(), path.as_str(), status.as_str()];
    HTTP_REQUEST_DURATION
        .with_label_values(&labels)
        .observe(start.elapsed().as_secs_f64());
    HTTP_REQUESTS_TOTAL.with_label_values(&labels).inc();

    if let Some((media_type, config)) = stream_labels(&path) {
        STREAM_REQUESTS_TOTAL
            .with_label_values(&[media_type, config, status.as_str()])
            .inc();
    }

    response
}

/// Media type and config presence of a normalized stream path.
fn stream_labels(path: &str) -> Option<(&str, &'static str)> {
    let (config, rest) = match path.strip_prefix("/{config}") {
        Some(rest) => ("user", rest),
        None => ("default", path),
    };
    let media_type = rest.strip_prefix("/stream/")?.strip_suffix("/{id}")?;
    Some((media_type, config))
}
