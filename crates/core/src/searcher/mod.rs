//! Multi-source torrent search.
//!
//! This module provides a `Provider` trait implemented once per listing
//! source, and an `Aggregator` that queries every provider concurrently,
//! deduplicates by content hash, and ranks the survivors.

mod aggregator;
mod dedup;
mod fetcher;
pub mod normalize;
pub mod providers;
mod types;

pub use aggregator::{Aggregator, StreamOptions};
pub use dedup::{deduplicate, rank, score};
pub use fetcher::{FetchError, Fetcher};
pub use normalize::Quality;
pub use providers::build_providers;
pub use types::*;
