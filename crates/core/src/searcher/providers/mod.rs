//! Concrete listing sources.
//!
//! Each provider turns a [`ProviderQuery`] into candidates on its own;
//! the aggregator only sees the [`Provider`] trait.

mod apibay;
mod corsaro;
mod knaben;
mod leetx;

pub use apibay::ApibayProvider;
pub use corsaro::CorsaroProvider;
pub use knaben::KnabenProvider;
pub use leetx::LeetxProvider;

use std::sync::Arc;

use futures::future::join_all;
use scraper::ElementRef;
use tracing::{debug, info};

use crate::config::Config;
use crate::metrics::DETAIL_FETCH_FAILURES;

use super::fetcher::Fetcher;
use super::normalize::{is_localized, normalize_size};
use super::{Candidate, Provider};

/// Build the enabled providers in dispatch order.
///
/// Order matters: it decides which duplicate survives deduplication and
/// how equal scores are ordered.
pub fn build_providers(config: &Config, fetcher: Arc<Fetcher>) -> Vec<Arc<dyn Provider>> {
    let p = &config.providers;
    let mut providers: Vec<Arc<dyn Provider>> = Vec::new();

    if p.corsaro.enabled {
        providers.push(Arc::new(CorsaroProvider::new(
            Arc::clone(&fetcher),
            p.corsaro.clone(),
        )));
    }
    if p.leetx.enabled {
        providers.push(Arc::new(LeetxProvider::new(
            Arc::clone(&fetcher),
            p.leetx.clone(),
        )));
    }
    if p.apibay.enabled {
        providers.push(Arc::new(ApibayProvider::new(
            Arc::clone(&fetcher),
            p.apibay.clone(),
            config.magnet.trackers.clone(),
        )));
    }
    if p.knaben.enabled {
        providers.push(Arc::new(KnabenProvider::new(
            Arc::clone(&fetcher),
            p.knaben.clone(),
        )));
    }

    info!(
        providers = ?providers.iter().map(|p| p.name().to_string()).collect::<Vec<_>>(),
        "Providers configured"
    );
    providers
}

/// A listing row whose magnet lives on a separate detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ListingRow {
    pub title: String,
    pub href: String,
    pub size: String,
    pub seeders: u32,
}

/// Concatenated, trimmed text content of an element.
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Leading integer of a cell ("1,234" reads as 1, blank as 0).
pub(crate) fn parse_seeders(text: &str) -> u32 {
    let digits: String = text
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

/// Resolve an href from a listing page against the site root.
pub(crate) fn absolute_url(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{}{}", base_url, href)
    } else {
        format!("{}/{}", base_url, href)
    }
}

/// Keep only titles carrying a localization marker.
pub(crate) fn retain_localized<T>(items: &mut Vec<T>, title: impl Fn(&T) -> &str) {
    items.retain(|item| is_localized(title(item)));
}

/// Fetch every row's detail page concurrently and pull its magnet link.
///
/// Results keep the listing order regardless of completion order. Rows
/// whose page is unavailable or has no magnet are dropped.
pub(crate) async fn fetch_detail_magnets(
    fetcher: &Fetcher,
    provider: &str,
    base_url: &str,
    rows: Vec<ListingRow>,
    extract_magnet: fn(&str) -> Option<String>,
) -> Vec<Candidate> {
    let lookups = rows.into_iter().map(|row| async move {
        let url = absolute_url(base_url, &row.href);
        let html = match fetcher.get_text(&url).await {
            Ok(html) => html,
            Err(e) => {
                debug!(provider = provider, url = %url, error = %e, "Detail page unavailable");
                DETAIL_FETCH_FAILURES
                    .with_label_values(&[provider, "unavailable"])
                    .inc();
                return None;
            }
        };

        match extract_magnet(&html) {
            Some(magnet) => Some(Candidate {
                provider: provider.to_string(),
                title: row.title,
                magnet,
                size: normalize_size(&row.size),
                seeders: row.seeders,
            }),
            None => {
                debug!(provider = provider, url = %url, "No magnet on detail page");
                DETAIL_FETCH_FAILURES
                    .with_label_values(&[provider, "no_magnet"])
                    .inc();
                None
            }
        }
    });

    join_all(lookups).await.into_iter().flatten().collect()
}
