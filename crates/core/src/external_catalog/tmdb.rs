//! TMDB (The Movie Database) resolver.
//!
//! Uses the `/find` endpoint to map IMDB ids to localized titles.
//! TMDB requires an API key; without one every lookup falls back.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::TmdbConfig;
use crate::metrics::COLLABORATOR_REQUESTS;
use crate::searcher::MediaType;

use super::{ExternalCatalogError, MediaId, MediaInfo, MetadataResolver};

/// TMDB-backed [`MetadataResolver`].
pub struct TmdbResolver {
    client: Client,
    base_url: String,
    language: String,
    api_key: Option<String>,
}

impl TmdbResolver {
    /// Create a resolver sharing the given client (and its deadline).
    pub fn new(config: &TmdbConfig, client: Client) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
        }
    }

    /// Look up an IMDB id.
    pub async fn find_by_imdb(
        &self,
        imdb_id: &str,
        media_type: MediaType,
        api_key: &str,
    ) -> Result<(String, Option<u16>), ExternalCatalogError> {
        let url = format!("{}/find/{}", self.base_url, imdb_id);

        debug!(imdb_id = %imdb_id, media_type = %media_type, "TMDB find");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", api_key),
                ("external_source", "imdb_id"),
                ("language", self.language.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == 401 {
            return Err(ExternalCatalogError::NotConfigured(
                "Invalid TMDB API key".to_string(),
            ));
        }
        if status == 404 {
            return Err(ExternalCatalogError::NotFound(imdb_id.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExternalCatalogError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let found: TmdbFindResponse = response.json().await.map_err(|e| {
            ExternalCatalogError::ParseError(format!("Failed to parse find response: {}", e))
        })?;

        let movie = found
            .movie_results
            .into_iter()
            .next()
            .map(|m| (m.title, year_of(m.release_date.as_deref())));
        let tv = found
            .tv_results
            .into_iter()
            .next()
            .map(|t| (t.name, year_of(t.first_air_date.as_deref())));

        // Prefer the result kind matching the request, take the other if absent
        let hit = match media_type {
            MediaType::Movie => movie.or(tv),
            MediaType::Series => tv.or(movie),
        };

        hit.filter(|(title, _)| !title.trim().is_empty())
            .ok_or_else(|| ExternalCatalogError::NotFound(imdb_id.to_string()))
    }
}

#[async_trait]
impl MetadataResolver for TmdbResolver {
    async fn resolve(
        &self,
        media_type: MediaType,
        raw_id: &str,
        api_key: Option<&str>,
    ) -> MediaInfo {
        let id = MediaId::parse(raw_id);
        let fallback = MediaInfo::fallback(raw_id);

        if !id.is_imdb() {
            return fallback;
        }

        let key = api_key
            .filter(|k| !k.is_empty())
            .or(self.api_key.as_deref());
        let Some(key) = key else {
            debug!(id = %raw_id, "No TMDB key, using raw id as title");
            return fallback;
        };

        match self.find_by_imdb(&id.base, media_type, key).await {
            Ok((title, year)) => {
                COLLABORATOR_REQUESTS
                    .with_label_values(&["tmdb", "ok"])
                    .inc();
                MediaInfo {
                    title,
                    year,
                    season: id.season,
                    episode: id.episode,
                }
            }
            Err(e) => {
                warn!(id = %raw_id, error = %e, "TMDB lookup failed, using raw id as title");
                COLLABORATOR_REQUESTS
                    .with_label_values(&["tmdb", "fallback"])
                    .inc();
                fallback
            }
        }
    }
}

fn year_of(date: Option<&str>) -> Option<u16> {
    date.and_then(|d| d.get(..4)).and_then(|y| y.parse().ok())
}

// TMDB API response types

#[derive(Debug, Deserialize)]
struct TmdbFindResponse {
    #[serde(default)]
    movie_results: Vec<TmdbMovieResult>,
    #[serde(default)]
    tv_results: Vec<TmdbTvResult>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieResult {
    title: String,
    release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbTvResult {
    name: String,
    first_air_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn resolver(base_url: &str, api_key: Option<&str>) -> TmdbResolver {
        TmdbResolver::new(
            &TmdbConfig {
                api_key: api_key.map(String::from),
                base_url: base_url.to_string(),
                language: "it-IT".to_string(),
            },
            Client::new(),
        )
    }

    #[test]
    fn test_year_of() {
        assert_eq!(year_of(Some("2021-09-15")), Some(2021));
        assert_eq!(year_of(Some("")), None);
        assert_eq!(year_of(None), None);
    }

    #[tokio::test]
    async fn test_resolve_movie() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/find/tt1160419"))
            .and(query_param("api_key", "server-key"))
            .and(query_param("external_source", "imdb_id"))
            .and(query_param("language", "it-IT"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"movie_results":[{"title":"Dune","release_date":"2021-09-15"}],"tv_results":[]}"#,
            ))
            .mount(&server)
            .await;

        let info = resolver(&server.uri(), Some("server-key"))
            .resolve(MediaType::Movie, "tt1160419", None)
            .await;
        assert_eq!(info.title, "Dune");
        assert_eq!(info.year, Some(2021));
        assert_eq!(info.search_query(MediaType::Movie), "Dune 2021");
    }

    #[tokio::test]
    async fn test_resolve_episode_with_request_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/find/tt5753856"))
            .and(query_param("api_key", "user-key"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"movie_results":[],"tv_results":[{"name":"Dark","first_air_date":"2017-12-01"}]}"#,
            ))
            .mount(&server)
            .await;

        let info = resolver(&server.uri(), Some("server-key"))
            .resolve(MediaType::Series, "tt5753856:1:2", Some("user-key"))
            .await;
        assert_eq!(info.title, "Dark");
        assert_eq!(info.season, Some(1));
        assert_eq!(info.episode, Some(2));
        assert_eq!(info.search_query(MediaType::Series), "Dark S01E02");
    }

    #[tokio::test]
    async fn test_resolve_without_key_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let info = resolver(&server.uri(), None)
            .resolve(MediaType::Series, "tt5753856:2:3", None)
            .await;
        assert_eq!(info, MediaInfo::fallback("tt5753856:2:3"));
    }

    #[tokio::test]
    async fn test_resolve_free_text_skips_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let info = resolver(&server.uri(), Some("key"))
            .resolve(MediaType::Movie, "The Matrix", None)
            .await;
        assert_eq!(info.title, "The Matrix");
    }

    #[tokio::test]
    async fn test_resolve_failures_fall_back() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/find/tt0000001"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/find/tt0000002"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"movie_results":[],"tv_results":[]}"#,
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/find/tt0000003"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let r = resolver(&server.uri(), Some("key"));
        for id in ["tt0000001", "tt0000002", "tt0000003"] {
            let info = r.resolve(MediaType::Movie, id, None).await;
            assert_eq!(info, MediaInfo::fallback(id));
        }
    }

    #[tokio::test]
    async fn test_find_by_imdb_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/find/tt0000001"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/find/tt0000002"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let r = resolver(&server.uri(), Some("key"));
        assert!(matches!(
            r.find_by_imdb("tt0000001", MediaType::Movie, "key").await,
            Err(ExternalCatalogError::NotConfigured(_))
        ));
        assert!(matches!(
            r.find_by_imdb("tt0000002", MediaType::Movie, "key").await,
            Err(ExternalCatalogError::ApiError { status: 500, .. })
        ));
    }
}
