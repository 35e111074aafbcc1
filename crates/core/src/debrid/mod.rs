//! Debrid resolution abstraction.
//!
//! This module provides a `DebridResolver` trait for turning a magnet URI
//! into a direct playable URL through a debrid service. Resolution is
//! opt-in per request and best-effort: any failure leaves the magnet as is.

mod real_debrid;

pub use real_debrid::RealDebridClient;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to a debrid service.
#[derive(Debug, Error)]
pub enum DebridError {
    #[error("Request timed out")]
    Timeout,

    #[error("Authentication failed")]
    Unauthorized,

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Torrent has no downloadable links yet")]
    NoLinks,

    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for DebridError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            DebridError::Timeout
        } else if e.is_decode() {
            DebridError::ParseError(e.to_string())
        } else {
            DebridError::Network(e.to_string())
        }
    }
}

/// Resolves magnets into direct URLs.
#[async_trait]
pub trait DebridResolver: Send + Sync {
    /// Service name, for logs and metrics.
    fn name(&self) -> &str;

    /// Resolve a magnet with the caller's key. `None` means pass the
    /// magnet through unresolved.
    async fn resolve(&self, magnet: &str, api_key: &str) -> Option<String>;
}
