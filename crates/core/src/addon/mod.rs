//! Addon surface: what the media client sees.
//!
//! This module provides the manifest and stream shapes, the per-user
//! config blob, and the `StreamService` that answers a stream request by
//! resolving the id, searching, and optionally resolving through debrid.

mod manifest;
mod service;
mod stream;
mod user_config;

pub use manifest::{Manifest, ManifestHints};
pub use service::StreamService;
pub use stream::{BehaviorHints, Stream};
pub use user_config::UserConfig;
