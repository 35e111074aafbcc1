//! Types for the multi-source search pipeline.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::fetcher::FetchError;

/// Kind of media being searched.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Movie,
    Series,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Series => "series",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = UnknownMediaType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(MediaType::Movie),
            "series" => Ok(MediaType::Series),
            other => Err(UnknownMediaType(other.to_string())),
        }
    }
}

/// Returned when a path segment is neither `movie` nor `series`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown media type: {0}")]
pub struct UnknownMediaType(pub String);

/// One incoming search, built once per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Raw query text (title, optionally with year or SxxEyy marker).
    pub query: String,
    pub media_type: MediaType,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, media_type: MediaType) -> Self {
        Self {
            query: query.into(),
            media_type,
        }
    }
}

/// What every provider receives: the cleaned query plus hints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderQuery {
    /// Query after title cleanup.
    pub query: String,
    pub media_type: MediaType,
    /// Release year found in the raw query, if any.
    pub year: Option<u16>,
}

/// A single provider's listing, before deduplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Which provider produced this listing.
    pub provider: String,
    pub title: String,
    /// Magnet URI recovered from the listing or its detail page.
    pub magnet: String,
    /// Size exactly as displayed by the source.
    pub size: String,
    pub seeders: u32,
}

/// A deduplicated, scored listing.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResolvedItem {
    pub provider: String,
    pub title: String,
    pub magnet: String,
    pub size: String,
    pub seeders: u32,
    /// Canonical content hash (uppercase), the deduplication key.
    pub info_hash: String,
    pub score: u32,
    /// Position in the flattened candidate sequence; breaks score ties.
    pub discovery_index: usize,
}

/// How a provider's branch of the fan-out settled.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProviderOutcome {
    /// Returned at least one candidate.
    Ok,
    /// Responded but had nothing usable.
    Empty,
    /// Listing could not be fetched or parsed.
    Unavailable,
    /// The adapter panicked; treated as unavailable.
    Panicked,
}

impl ProviderOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderOutcome::Ok => "ok",
            ProviderOutcome::Empty => "empty",
            ProviderOutcome::Unavailable => "unavailable",
            ProviderOutcome::Panicked => "panicked",
        }
    }
}

/// Per-provider summary of one search. Informational only.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProviderReport {
    pub provider: String,
    pub outcome: ProviderOutcome,
    pub candidates: usize,
}

/// Ranked, deduplicated output of one search.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RankedResultSet {
    /// Sorted by descending score, ties by discovery order.
    pub items: Vec<ResolvedItem>,
    /// How long the search took in milliseconds.
    pub duration_ms: u64,
    /// One entry per provider, in dispatch order.
    pub provider_reports: Vec<ProviderReport>,
}

impl RankedResultSet {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Errors a provider may report. The aggregator turns all of them into
/// an empty contribution.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Source unavailable: {0}")]
    Unavailable(#[from] FetchError),

    #[error("Unexpected listing format: {0}")]
    Malformed(String),
}

/// A torrent listing source.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider name shown in results and used for scoring.
    fn name(&self) -> &str;

    /// Search this source. Candidates whose detail lookup fails are
    /// dropped; only a failed listing is reported as an error.
    async fn search(&self, query: &ProviderQuery) -> Result<Vec<Candidate>, ProviderError>;
}
