pub mod addon;
pub mod config;
pub mod debrid;
pub mod external_catalog;
pub mod metrics;
pub mod searcher;
pub mod testing;

pub use addon::{Manifest, Stream, StreamService, UserConfig};
pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config, ConfigError,
    SanitizedConfig,
};
pub use searcher::{Aggregator, MediaType, SearchRequest, StreamOptions};
