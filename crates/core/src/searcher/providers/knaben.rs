//! Knaben: meta-index whose listing rows already carry magnet links.

use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;

use crate::config::ProviderConfig;
use crate::searcher::fetcher::Fetcher;
use crate::searcher::normalize::{clean_title, is_localized, normalize_size};
use crate::searcher::{Candidate, Provider, ProviderError, ProviderQuery};

use super::{parse_seeders, text_of};

pub const KNABEN_NAME: &str = "Knaben";

static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("table tbody tr").unwrap());
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("td:nth-child(2) a").unwrap());
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());
static MAGNET: Lazy<Selector> = Lazy::new(|| Selector::parse(r#"a[href^="magnet:"]"#).unwrap());

pub struct KnabenProvider {
    fetcher: Arc<Fetcher>,
    config: ProviderConfig,
}

impl KnabenProvider {
    pub fn new(fetcher: Arc<Fetcher>, config: ProviderConfig) -> Self {
        Self { fetcher, config }
    }

    /// Results sorted by seeders, first page.
    fn build_search_url(&self, query: &ProviderQuery) -> String {
        format!(
            "{}/search/{}/0/1/seeders",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(&query.query)
        )
    }

    fn parse_listing(&self, html: &str) -> Vec<Candidate> {
        let document = Html::parse_document(html);

        document
            .select(&ROW)
            .filter_map(|row| {
                let title = clean_title(&text_of(row.select(&TITLE).next()?));
                if title.is_empty() {
                    return None;
                }
                let magnet = row.select(&MAGNET).next()?.value().attr("href")?;
                let cells: Vec<_> = row.select(&CELL).collect();

                Some(Candidate {
                    provider: KNABEN_NAME.to_string(),
                    title,
                    magnet: magnet.to_string(),
                    size: cells
                        .get(2)
                        .map(|c| normalize_size(&text_of(*c)))
                        .unwrap_or_default(),
                    seeders: cells.get(4).map_or(0, |c| parse_seeders(&text_of(*c))),
                })
            })
            .filter(|c| !self.config.language_filter || is_localized(&c.title))
            .take(self.config.max_results)
            .collect()
    }
}

#[async_trait]
impl Provider for KnabenProvider {
    fn name(&self) -> &str {
        KNABEN_NAME
    }

    async fn search(&self, query: &ProviderQuery) -> Result<Vec<Candidate>, ProviderError> {
        let url = self.build_search_url(query);
        let html = self.fetcher.get_text(&url).await?;

        let candidates = self.parse_listing(&html);
        debug!(
            provider = KNABEN_NAME,
            candidates = candidates.len(),
            "Listing parsed"
        );
        Ok(candidates)
    }
}
