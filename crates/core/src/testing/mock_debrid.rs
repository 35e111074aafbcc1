//! Mock debrid resolver for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::debrid::DebridResolver;
use crate::searcher::normalize::extract_info_hash;

/// Mock implementation of the DebridResolver trait.
///
/// When resolving, the URL is `<prefix><INFO_HASH>` so tests can tell
/// which stream got which link.
#[derive(Debug)]
pub struct MockDebrid {
    prefix: Option<String>,
    magnets: Arc<RwLock<Vec<String>>>,
}

impl MockDebrid {
    /// A resolver that succeeds for every magnet.
    pub fn resolving(prefix: &str) -> Self {
        Self {
            prefix: Some(prefix.to_string()),
            magnets: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// A resolver that never resolves anything.
    pub fn failing() -> Self {
        Self {
            prefix: None,
            magnets: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Number of magnets submitted so far.
    pub async fn call_count(&self) -> usize {
        self.magnets.read().await.len()
    }

    /// Magnets submitted so far, in call order.
    pub async fn recorded_magnets(&self) -> Vec<String> {
        self.magnets.read().await.clone()
    }
}

#[async_trait]
impl DebridResolver for MockDebrid {
    fn name(&self) -> &str {
        "mock"
    }

    async fn resolve(&self, magnet: &str, _api_key: &str) -> Option<String> {
        self.magnets.write().await.push(magnet.to_string());
        let prefix = self.prefix.as_ref()?;
        let hash = extract_info_hash(magnet)?;
        Some(format!("{}{}", prefix, hash))
    }
}
