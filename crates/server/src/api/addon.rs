//! Addon protocol handlers: manifest and streams.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use stremizio_core::{Manifest, MediaType, Stream, UserConfig};
use tracing::debug;

use crate::state::AppState;

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct StreamsResponse {
    pub streams: Vec<Stream>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /manifest.json
pub async fn manifest(State(state): State<Arc<AppState>>) -> Json<Manifest> {
    Json(state.manifest().clone())
}

/// GET /{config}/manifest.json
///
/// The manifest does not depend on the user config.
pub async fn configured_manifest(
    State(state): State<Arc<AppState>>,
    Path(_config): Path<String>,
) -> Json<Manifest> {
    Json(state.manifest().clone())
}

/// GET /stream/{type}/{id}.json
pub async fn stream(
    State(state): State<Arc<AppState>>,
    Path((media_type, id)): Path<(String, String)>,
) -> Response {
    respond(&state, UserConfig::default(), &media_type, &id).await
}

/// GET /{config}/stream/{type}/{id}.json
pub async fn configured_stream(
    State(state): State<Arc<AppState>>,
    Path((config, media_type, id)): Path<(String, String, String)>,
) -> Response {
    respond(&state, UserConfig::decode(&config), &media_type, &id).await
}

async fn respond(state: &AppState, config: UserConfig, media_type: &str, id: &str) -> Response {
    let media_type: MediaType = match media_type.parse() {
        Ok(t) => t,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    };

    let id = id.strip_suffix(".json").unwrap_or(id);
    debug!(%media_type, id = %id, no_4k = config.no_4k, "Stream request");

    let streams = state.service().streams(media_type, id, &config).await;
    Json(StreamsResponse { streams }).into_response()
}
