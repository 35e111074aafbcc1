//! Mock provider for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::searcher::{Candidate, FetchError, Provider, ProviderError, ProviderQuery};

/// What the mock does when searched.
#[derive(Debug, Clone)]
enum Behavior {
    Return(Vec<Candidate>),
    Fail,
    Panic,
}

/// Mock implementation of the Provider trait.
///
/// Provides controllable behavior for testing:
/// - Return fixed candidates
/// - Fail like an unreachable source, or panic
/// - Answer after a delay
/// - Record every query for assertions
///
/// # Example
///
/// ```rust,ignore
/// use stremizio_core::testing::{fixtures, MockProvider};
///
/// let provider = Arc::new(MockProvider::with_candidates(
///     "Knaben",
///     vec![fixtures::candidate("Knaben", "Dune ITA 1080p", 1, 10)],
/// ));
///
/// let aggregator = Aggregator::new(vec![provider.clone()], ScoringConfig::default(), "ns");
/// aggregator.search(&SearchRequest::new("Dune", MediaType::Movie)).await;
///
/// let queries = provider.recorded_queries().await;
/// assert_eq!(queries[0].query, "Dune");
/// ```
#[derive(Debug)]
pub struct MockProvider {
    name: String,
    behavior: Behavior,
    delay: Option<Duration>,
    queries: Arc<RwLock<Vec<ProviderQuery>>>,
}

impl MockProvider {
    fn new(name: &str, behavior: Behavior) -> Self {
        Self {
            name: name.to_string(),
            behavior,
            delay: None,
            queries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// A provider returning these candidates for every query.
    pub fn with_candidates(name: &str, candidates: Vec<Candidate>) -> Self {
        Self::new(name, Behavior::Return(candidates))
    }

    /// A provider that finds nothing.
    pub fn empty(name: &str) -> Self {
        Self::new(name, Behavior::Return(Vec::new()))
    }

    /// A provider whose listing is always unavailable.
    pub fn failing(name: &str) -> Self {
        Self::new(name, Behavior::Fail)
    }

    /// A provider that panics mid-search.
    pub fn panicking(name: &str) -> Self {
        Self::new(name, Behavior::Panic)
    }

    /// Answer only after `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get all queries received so far.
    pub async fn recorded_queries(&self) -> Vec<ProviderQuery> {
        self.queries.read().await.clone()
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, query: &ProviderQuery) -> Result<Vec<Candidate>, ProviderError> {
        self.queries.write().await.push(query.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.behavior {
            Behavior::Return(candidates) => Ok(candidates.clone()),
            Behavior::Fail => Err(ProviderError::Unavailable(FetchError::Timeout)),
            Behavior::Panic => panic!("mock provider {} panicked", self.name),
        }
    }
}
