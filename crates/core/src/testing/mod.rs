//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the provider, metadata
//! and debrid traits, allowing the pipeline and the HTTP surface to be
//! tested without reaching any real source.
//!
//! # Example
//!
//! ```rust,ignore
//! use stremizio_core::testing::{fixtures, MockProvider, MockResolver};
//!
//! let provider = MockProvider::with_candidates(
//!     "Knaben",
//!     vec![fixtures::candidate("Knaben", "Dune ITA 1080p", 1, 10)],
//! );
//! let resolver = MockResolver::new().with_title("tt1160419", "Dune", Some(2021));
//!
//! // Use in a StreamService / AppState...
//! ```

mod mock_debrid;
mod mock_provider;
mod mock_resolver;

pub use mock_debrid::MockDebrid;
pub use mock_provider::MockProvider;
pub use mock_resolver::{MockResolver, RecordedResolve};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::searcher::Candidate;

    /// A deterministic 40-char uppercase hex hash.
    pub fn info_hash(n: u8) -> String {
        format!("{:040X}", n)
    }

    /// A candidate whose magnet carries `info_hash(n)`.
    pub fn candidate(provider: &str, title: &str, n: u8, seeders: u32) -> Candidate {
        Candidate {
            provider: provider.to_string(),
            title: title.to_string(),
            magnet: format!(
                "magnet:?xt=urn:btih:{}&dn={}",
                info_hash(n),
                urlencoding::encode(title)
            ),
            size: "1.50 GB".to_string(),
            seeders,
        }
    }
}
