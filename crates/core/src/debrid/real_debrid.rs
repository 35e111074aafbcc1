//! Real-Debrid REST client.
//!
//! A magnet is resolved in four calls: add it, select all files, read
//! the torrent info for its hoster links, then unrestrict the first link.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::DebridConfig;
use crate::metrics::COLLABORATOR_REQUESTS;

use super::{DebridError, DebridResolver};

pub struct RealDebridClient {
    client: Client,
    base_url: String,
}

impl RealDebridClient {
    /// Create a client sharing the given HTTP client (and its deadline).
    pub fn new(config: &DebridConfig, client: Client) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn check(response: Response) -> Result<Response, DebridError> {
        let status = response.status();
        if status == 401 || status == 403 {
            return Err(DebridError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DebridError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(response)
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, DebridError> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| DebridError::ParseError(e.to_string()))
    }

    async fn post_form(
        &self,
        endpoint: &str,
        api_key: &str,
        params: &[(&str, &str)],
    ) -> Result<Response, DebridError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .form(params)
            .send()
            .await?;
        Self::check(response).await
    }

    async fn get(&self, endpoint: &str, api_key: &str) -> Result<Response, DebridError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self.client.get(&url).bearer_auth(api_key).send().await?;
        Self::check(response).await
    }

    /// Run the full add / select / info / unrestrict sequence.
    pub async fn unrestrict_magnet(
        &self,
        magnet: &str,
        api_key: &str,
    ) -> Result<String, DebridError> {
        let added: AddMagnetResponse = Self::parse(
            self.post_form("/torrents/addMagnet", api_key, &[("magnet", magnet)])
                .await?,
        )
        .await?;
        debug!(torrent_id = %added.id, "Magnet added to Real-Debrid");

        self.post_form(
            &format!("/torrents/selectFiles/{}", added.id),
            api_key,
            &[("files", "all")],
        )
        .await?;

        let info: TorrentInfoResponse =
            Self::parse(self.get(&format!("/torrents/info/{}", added.id), api_key).await?).await?;
        let link = info.links.into_iter().next().ok_or(DebridError::NoLinks)?;

        let unrestricted: UnrestrictResponse = Self::parse(
            self.post_form("/unrestrict/link", api_key, &[("link", link.as_str())])
                .await?,
        )
        .await?;

        Ok(unrestricted.download)
    }
}

#[async_trait]
impl DebridResolver for RealDebridClient {
    fn name(&self) -> &str {
        "real_debrid"
    }

    async fn resolve(&self, magnet: &str, api_key: &str) -> Option<String> {
        match self.unrestrict_magnet(magnet, api_key).await {
            Ok(url) => {
                COLLABORATOR_REQUESTS
                    .with_label_values(&["real_debrid", "ok"])
                    .inc();
                Some(url)
            }
            Err(e) => {
                warn!(error = %e, "Real-Debrid resolution failed, passing magnet through");
                COLLABORATOR_REQUESTS
                    .with_label_values(&["real_debrid", "fallback"])
                    .inc();
                None
            }
        }
    }
}

// Real-Debrid API response types

#[derive(Debug, Deserialize)]
struct AddMagnetResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct TorrentInfoResponse {
    #[serde(default)]
    links: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct UnrestrictResponse {
    download: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MAGNET: &str = "magnet:?xt=urn:btih:AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

    fn client(base_url: &str) -> RealDebridClient {
        RealDebridClient::new(
            &DebridConfig {
                enabled: true,
                base_url: base_url.to_string(),
                max_resolved: 5,
            },
            Client::new(),
        )
    }

    async fn mount_happy_path(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/torrents/addMagnet"))
            .and(header("authorization", "Bearer rd-key"))
            .and(body_string_contains("magnet=magnet%3A%3Fxt%3Durn%3Abtih%3AAAAA"))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_string(r#"{"id":"T1","uri":"https://rd/torrents/T1"}"#),
            )
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/torrents/selectFiles/T1"))
            .and(body_string_contains("files=all"))
            .respond_with(ResponseTemplate::new(204))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/torrents/info/T1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"id":"T1","status":"downloaded","links":["https://rd/d/abc"]}"#,
            ))
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/unrestrict/link"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"id":"L1","download":"https://cdn.rd/file.mkv"}"#,
            ))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_resolve_happy_path() {
        let server = MockServer::start().await;
        mount_happy_path(&server).await;

        let url = client(&server.uri()).resolve(MAGNET, "rd-key").await;
        assert_eq!(url.as_deref(), Some("https://cdn.rd/file.mkv"));
    }

    #[tokio::test]
    async fn test_bad_key_is_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/torrents/addMagnet"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let c = client(&server.uri());
        assert!(matches!(
            c.unrestrict_magnet(MAGNET, "bad").await,
            Err(DebridError::Unauthorized)
        ));
        assert_eq!(c.resolve(MAGNET, "bad").await, None);
    }

    #[tokio::test]
    async fn test_no_links_passes_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/torrents/addMagnet"))
            .respond_with(ResponseTemplate::new(201).set_body_string(r#"{"id":"T2"}"#))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/torrents/selectFiles/T2"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/torrents/info/T2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"id":"T2","status":"queued","links":[]}"#),
            )
            .mount(&server)
            .await;

        let c = client(&server.uri());
        assert!(matches!(
            c.unrestrict_magnet(MAGNET, "rd-key").await,
            Err(DebridError::NoLinks)
        ));
    }
}
