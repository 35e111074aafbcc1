//! 1337x provider.
//!
//! International index: results are filtered for Italian markers before
//! any detail page is requested.

use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;

use crate::config::ProviderConfig;
use crate::searcher::fetcher::Fetcher;
use crate::searcher::normalize::clean_title;
use crate::searcher::{Candidate, MediaType, Provider, ProviderError, ProviderQuery};

use super::{fetch_detail_magnets, parse_seeders, retain_localized, text_of, ListingRow};

pub const LEETX_NAME: &str = "1337x";

static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("table.table-list tbody tr").unwrap());
static NAME_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href^='/torrent/']").unwrap());
static SEEDS: Lazy<Selector> = Lazy::new(|| Selector::parse(".coll-2").unwrap());
static SIZE: Lazy<Selector> = Lazy::new(|| Selector::parse(".coll-4").unwrap());
static MAGNET: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href^='magnet:']").unwrap());

pub struct LeetxProvider {
    fetcher: Arc<Fetcher>,
    config: ProviderConfig,
}

impl LeetxProvider {
    pub fn new(fetcher: Arc<Fetcher>, config: ProviderConfig) -> Self {
        Self { fetcher, config }
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    /// Series search the TV category. A movie with a year hint searches
    /// the Movies category; without one the whole site is searched.
    fn build_search_url(&self, query: &ProviderQuery) -> String {
        let q = urlencoding::encode(&query.query);
        match (query.media_type, query.year) {
            (MediaType::Series, _) => {
                format!("{}/category-search/{}/TV/1/", self.base_url(), q)
            }
            (MediaType::Movie, Some(_)) => {
                format!("{}/category-search/{}/Movies/1/", self.base_url(), q)
            }
            (MediaType::Movie, None) => format!("{}/search/{}/1/", self.base_url(), q),
        }
    }
}

fn parse_listing(html: &str, limit: usize) -> Vec<ListingRow> {
    let document = Html::parse_document(html);

    document
        .select(&ROW)
        .take(limit)
        .filter_map(|row| {
            let link = row.select(&NAME_LINK).next()?;
            let href = link.value().attr("href")?.to_string();
            // The size cell also nests the seeder count; keep its first text node.
            let size = row
                .select(&SIZE)
                .next()
                .and_then(|cell| cell.text().next())
                .map(|t| t.trim().to_string())
                .unwrap_or_default();
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

fn parse_detail(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&MAGNET)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
}

#[async_trait]
impl Provider for LeetxProvider {
    fn name(&self) -> &str {
        LEETX_NAME
    }

    async fn search(&self, query: &ProviderQuery) -> Result<Vec<Candidate>, ProviderError> {
        let url = self.build_search_url(query);
        let html = self.fetcher.get_text(&url).await?;

        let mut rows = parse_listing(&html, self.config.max_results);
        if self.config.language_filter {
            retain_localized(&mut rows, |r| r.title.as_str());
        }
        debug!(provider = LEETX_NAME, rows = rows.len(), "Listing parsed");

        let candidates =
            fetch_detail_magnets(&self.fetcher, LEETX_NAME, self.base_url(), rows, parse_detail)
                .await;
        Ok(candidates)
    }
}
