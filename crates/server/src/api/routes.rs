use axum::{http::Method, middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::{addon, handlers, middleware::metrics_middleware};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Stream clients fetch from arbitrary origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        // Operational
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::metrics))
        // Addon protocol, with and without a config segment.
        // The `.json` suffix on ids is stripped by the handler.
        .route("/manifest.json", get(addon::manifest))
        .route("/{config}/manifest.json", get(addon::configured_manifest))
        .route("/stream/{media_type}/{id}", get(addon::stream))
        .route(
            "/{config}/stream/{media_type}/{id}",
            get(addon::configured_stream),
        )
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
