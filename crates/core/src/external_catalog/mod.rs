//! Metadata resolution for addon ids.
//!
//! Turns an IMDB-style id (`tt1234567`, or `tt1234567:1:2` for an
//! episode) into a searchable title. Resolution never fails: without a
//! key, or when the catalog is unreachable, the raw id becomes the title.

mod tmdb;

pub use tmdb::TmdbResolver;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::searcher::MediaType;

/// Errors that can occur when interacting with the metadata catalog.
#[derive(Debug, Error)]
pub enum ExternalCatalogError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Resource not found (404, or no match for the id).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing or rejected API key).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// What a search needs to know about a title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaInfo {
    pub title: String,
    pub year: Option<u16>,
    pub season: Option<u32>,
    pub episode: Option<u32>,
}

impl MediaInfo {
    /// Reduced-functionality result: the id itself is the title.
    pub fn fallback(raw_id: &str) -> Self {
        let id = MediaId::parse(raw_id);
        Self {
            title: id.base,
            year: None,
            season: id.season,
            episode: id.episode,
        }
    }

    /// Query text handed to the aggregator.
    ///
    /// Movies append the year; episodes append an `SxxEyy` marker.
    pub fn search_query(&self, media_type: MediaType) -> String {
        match (media_type, self.season, self.episode, self.year) {
            (MediaType::Series, Some(s), Some(e), _) => {
                format!("{} S{:02}E{:02}", self.title, s, e)
            }
            (MediaType::Movie, _, _, Some(year)) => format!("{} {}", self.title, year),
            _ => self.title.clone(),
        }
    }
}

/// An addon id split into its base and optional episode coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaId {
    pub base: String,
    pub season: Option<u32>,
    pub episode: Option<u32>,
}

impl MediaId {
    /// Split `base[:season:episode]`. Anything that is not two trailing
    /// numbers stays part of the base.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let mut parts = raw.rsplitn(3, ':');
        let last = parts.next();
        let middle = parts.next();
        let head = parts.next();

        if let (Some(head), Some(s), Some(e)) = (head, middle, last) {
            if let (Ok(season), Ok(episode)) = (s.parse(), e.parse()) {
                return Self {
                    base: head.to_string(),
                    season: Some(season),
                    episode: Some(episode),
                };
            }
        }

        Self {
            base: raw.to_string(),
            season: None,
            episode: None,
        }
    }

    /// Whether the base is an IMDB id.
    pub fn is_imdb(&self) -> bool {
        self.base.len() > 2
            && self.base.starts_with("tt")
            && self.base[2..].chars().all(|c| c.is_ascii_digit())
    }
}

/// Resolves addon ids into searchable titles.
#[async_trait]
pub trait MetadataResolver: Send + Sync {
    /// Resolve an id. `api_key` from the request overrides any
    /// server-wide key. Falls back to [`MediaInfo::fallback`] on failure.
    async fn resolve(
        &self,
        media_type: MediaType,
        raw_id: &str,
        api_key: Option<&str>,
    ) -> MediaInfo;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_id_parse() {
        assert_eq!(
            MediaId::parse("tt0944947:1:2"),
            MediaId {
                base: "tt0944947".to_string(),
                season: Some(1),
                episode: Some(2),
            }
        );
        assert_eq!(MediaId::parse("tt0133093").base, "tt0133093");
        assert_eq!(MediaId::parse("tt0133093").season, None);
        // Not numeric coordinates: the whole id is the base
        assert_eq!(MediaId::parse("Star Wars: A New Hope").base, "Star Wars: A New Hope");
    }

    #[test]
    fn test_media_id_is_imdb() {
        assert!(MediaId::parse("tt0133093").is_imdb());
        assert!(MediaId::parse("tt0944947:1:2").is_imdb());
        assert!(!MediaId::parse("The Matrix").is_imdb());
        assert!(!MediaId::parse("tt").is_imdb());
        assert!(!MediaId::parse("ttabc").is_imdb());
    }

    #[test]
    fn test_fallback_keeps_episode() {
        let info = MediaInfo::fallback("tt0944947:3:10");
        assert_eq!(info.title, "tt0944947");
        assert_eq!(info.year, None);
        assert_eq!(info.season, Some(3));
        assert_eq!(info.episode, Some(10));
    }

    #[test]
    fn test_search_query() {
        let movie = MediaInfo {
            title: "Dune".to_string(),
            year: Some(2021),
            season: None,
            episode: None,
        };
        assert_eq!(movie.search_query(MediaType::Movie), "Dune 2021");

        let episode = MediaInfo {
            title: "Dark".to_string(),
            year: Some(2017),
            season: Some(1),
            episode: Some(2),
        };
        assert_eq!(episode.search_query(MediaType::Series), "Dark S01E02");

        let untitled = MediaInfo::fallback("The Matrix");
        assert_eq!(untitled.search_query(MediaType::Movie), "The Matrix");
    }
}
