//! Il Corsaro Nero: Italian-curated HTML index.
//!
//! The listing page has no magnet links, so each row costs one extra
//! detail-page request. Its catalogue is Italian by construction, so the
//! language filter is off by default.

use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;

use crate::config::ProviderConfig;
use crate::searcher::fetcher::Fetcher;
use crate::searcher::normalize::{clean_title, season_query};
use crate::searcher::{Candidate, MediaType, Provider, ProviderError, ProviderQuery};

use super::{fetch_detail_magnets, parse_seeders, retain_localized, text_of, ListingRow};

pub const CORSARO_NAME: &str = "CorsaroNero";

static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tbody tr").unwrap());
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a.tab").unwrap());
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());
static SEEDS: Lazy<Selector> = Lazy::new(|| Selector::parse(".text-green-500").unwrap());
static MAGNET: Lazy<Selector> = Lazy::new(|| Selector::parse(r#"a[href^="magnet:"]"#).unwrap());
static MAGNET_FALLBACK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.w-full:nth-child(2) a").unwrap());

pub struct CorsaroProvider {
    fetcher: Arc<Fetcher>,
    config: ProviderConfig,
}

impl CorsaroProvider {
    pub fn new(fetcher: Arc<Fetcher>, config: ProviderConfig) -> Self {
        Self { fetcher, config }
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    /// Build the search URL. Series queries use the site's season wording.
    fn build_search_url(&self, query: &ProviderQuery) -> String {
        let (q, category) = match query.media_type {
            MediaType::Movie => (query.query.clone(), "film"),
            MediaType::Series => (season_query(&query.query), "serie-tv"),
        };
        format!(
            "{}/search?q={}&cat={}",
            self.base_url(),
            urlencoding::encode(&q),
            category
        )
    }
}

/// Extract up to `limit` rows that link to a detail page.
fn parse_listing(html: &str, limit: usize) -> Vec<ListingRow> {
    let document = Html::parse_document(html);

    document
        .select(&ROW)
        .take(limit)
        .filter_map(|row| {
            let link = row.select(&LINK).next()?;
            let href = link.value().attr("href")?.to_string();
            let size = row.select(&CELL).nth(3).map(text_of).unwrap_or_default();
            let seeders = row.select(&SEEDS).next().map(text_of).unwrap_or_default();

            Some(ListingRow {
                title: clean_title(&text_of(link)),
                href,
                size,
                seeders: parse_seeders(&seeders),
            })
        })
        .collect()
}

/// Pull the magnet link out of a detail page.
fn parse_detail(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&MAGNET)
        .next()
        .or_else(|| document.select(&MAGNET_FALLBACK).next())
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
}

#[async_trait]
impl Provider for CorsaroProvider {
    fn name(&self) -> &str {
        CORSARO_NAME
    }

    async fn search(&self, query: &ProviderQuery) -> Result<Vec<Candidate>, ProviderError> {
        let url = self.build_search_url(query);
        let html = self.fetcher.get_text(&url).await?;

        let mut rows = parse_listing(&html, self.config.max_results);
        if self.config.language_filter {
            retain_localized(&mut rows, |r| r.title.as_str());
        }
        debug!(provider = CORSARO_NAME, rows = rows.len(), "Listing parsed");

        let candidates =
            fetch_detail_magnets(&self.fetcher, CORSARO_NAME, self.base_url(), rows, parse_detail)
                .await;
        Ok(candidates)
    }
}
