//! Request-level glue: id resolution, search, optional debrid.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info};

use crate::debrid::DebridResolver;
use crate::external_catalog::MetadataResolver;
use crate::searcher::{Aggregator, MediaType, SearchRequest, StreamOptions};

use super::{Stream, UserConfig};

/// Answers stream requests for one addon installation.
pub struct StreamService {
    aggregator: Arc<Aggregator>,
    resolver: Arc<dyn MetadataResolver>,
    debrid: Option<Arc<dyn DebridResolver>>,
    max_resolved: usize,
}

impl StreamService {
    pub fn new(aggregator: Arc<Aggregator>, resolver: Arc<dyn MetadataResolver>) -> Self {
        Self {
            aggregator,
            resolver,
            debrid: None,
            max_resolved: 0,
        }
    }

    /// Enable debrid resolution for requests that carry a key.
    pub fn with_debrid(mut self, debrid: Arc<dyn DebridResolver>, max_resolved: usize) -> Self {
        self.debrid = Some(debrid);
        self.max_resolved = max_resolved;
        self
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub fn debrid_enabled(&self) -> bool {
        self.debrid.is_some()
    }

    /// Streams for an addon id, best first. Never fails; an empty list
    /// means nothing was found or every source was down.
    pub async fn streams(
        &self,
        media_type: MediaType,
        raw_id: &str,
        config: &UserConfig,
    ) -> Vec<Stream> {
        let info = self
            .resolver
            .resolve(media_type, raw_id, config.tmdb_key.as_deref())
            .await;
        let request = SearchRequest::new(info.search_query(media_type), media_type);
        debug!(id = %raw_id, query = %request.query, "Resolved stream request");

        let options = StreamOptions {
            no_4k: config.no_4k,
        };
        let mut streams = self.aggregator.get_streams(&request, &options).await;

        if let (Some(debrid), Some(key)) = (&self.debrid, config.rd_key.as_deref()) {
            self.resolve_top(debrid.as_ref(), key, &mut streams).await;
        }

        streams
    }

    /// Resolve the first `max_resolved` streams concurrently, in place.
    async fn resolve_top(&self, debrid: &dyn DebridResolver, key: &str, streams: &mut [Stream]) {
        let count = self.max_resolved.min(streams.len());
        let lookups = streams[..count]
            .iter()
            .map(|stream| debrid.resolve(&stream.magnet, key));
        let urls = join_all(lookups).await;

        let mut resolved = 0;
        for (stream, url) in streams.iter_mut().zip(urls) {
            if url.is_some() {
                resolved += 1;
            }
            stream.url = url;
        }
        info!(
            service = debrid.name(),
            attempted = count,
            resolved = resolved,
            "Debrid resolution finished"
        );
    }
}
