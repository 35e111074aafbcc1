use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub magnet: MagnetConfig,
    #[serde(default)]
    pub addon: AddonConfig,
    #[serde(default)]
    pub tmdb: Option<TmdbConfig>,
    #[serde(default)]
    pub debrid: DebridConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    7000
}

/// Outbound request settings shared by every provider.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetcherConfig {
    /// Hard deadline for a single request, in milliseconds (default: 4000).
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Pool of user agents; one is picked at random per request.
    #[serde(default = "default_user_agents")]
    pub user_agents: Vec<String>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            user_agents: default_user_agents(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    4000
}

fn default_user_agents() -> Vec<String> {
    vec![
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36".to_string(),
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15".to_string(),
    ]
}

/// Per-source settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Site root (or API endpoint for JSON sources).
    pub base_url: String,
    /// Maximum listing rows kept per search.
    pub max_results: usize,
    /// Keep only titles carrying a localization marker.
    pub language_filter: bool,
}

fn default_true() -> bool {
    true
}

impl ProviderConfig {
    fn new(base_url: &str, max_results: usize, language_filter: bool) -> Self {
        Self {
            enabled: true,
            base_url: base_url.to_string(),
            max_results,
            language_filter,
        }
    }
}

/// Provider table. Dispatch order is fixed: corsaro, leetx, apibay, knaben.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProvidersConfig {
    #[serde(default = "default_corsaro")]
    pub corsaro: ProviderConfig,
    #[serde(default = "default_leetx")]
    pub leetx: ProviderConfig,
    #[serde(default = "default_apibay")]
    pub apibay: ProviderConfig,
    #[serde(default = "default_knaben")]
    pub knaben: ProviderConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            corsaro: default_corsaro(),
            leetx: default_leetx(),
            apibay: default_apibay(),
            knaben: default_knaben(),
        }
    }
}

fn default_corsaro() -> ProviderConfig {
    ProviderConfig::new("https://ilcorsaronero.link", 10, false)
}

fn default_leetx() -> ProviderConfig {
    ProviderConfig::new("https://1337x.to", 8, true)
}

fn default_apibay() -> ProviderConfig {
    ProviderConfig::new("https://apibay.org/q.php", 10, true)
}

fn default_knaben() -> ProviderConfig {
    ProviderConfig::new("https://knaben.org", 10, true)
}

/// Ranking weights.
///
/// Only the relative order matters:
/// `trusted_bonus > uhd_bonus > full_hd_bonus > seeder_cap`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScoringConfig {
    /// Provider name receiving the trust bonus.
    #[serde(default = "default_trusted_provider")]
    pub trusted_provider: String,
    #[serde(default = "default_trusted_bonus")]
    pub trusted_bonus: u32,
    #[serde(default = "default_uhd_bonus")]
    pub uhd_bonus: u32,
    #[serde(default = "default_full_hd_bonus")]
    pub full_hd_bonus: u32,
    /// Seeders count up to this value and no further.
    #[serde(default = "default_seeder_cap")]
    pub seeder_cap: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            trusted_provider: default_trusted_provider(),
            trusted_bonus: default_trusted_bonus(),
            uhd_bonus: default_uhd_bonus(),
            full_hd_bonus: default_full_hd_bonus(),
            seeder_cap: default_seeder_cap(),
        }
    }
}

fn default_trusted_provider() -> String {
    "CorsaroNero".to_string()
}

fn default_trusted_bonus() -> u32 {
    200
}

fn default_uhd_bonus() -> u32 {
    120
}

fn default_full_hd_bonus() -> u32 {
    80
}

fn default_seeder_cap() -> u32 {
    50
}

/// Trackers appended to synthesized magnet links.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MagnetConfig {
    #[serde(default = "default_trackers")]
    pub trackers: Vec<String>,
}

impl Default for MagnetConfig {
    fn default() -> Self {
        Self {
            trackers: default_trackers(),
        }
    }
}

fn default_trackers() -> Vec<String> {
    [
        "udp://tracker.opentrackr.org:1337/announce",
        "udp://open.tracker.cl:1337/announce",
        "udp://9.rarbg.com:2810/announce",
        "udp://tracker.openbittorrent.com:80/announce",
        "udp://opentracker.i2p.rocks:6969/announce",
        "udp://tracker.torrent.eu.org:451/announce",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Addon manifest and output decoration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddonConfig {
    #[serde(default = "default_addon_id")]
    pub id: String,
    #[serde(default = "default_addon_name")]
    pub name: String,
    #[serde(default = "default_addon_description")]
    pub description: String,
    #[serde(default = "default_addon_version")]
    pub version: String,
    /// Prefix of the `bingeGroup` hint.
    #[serde(default = "default_binge_namespace")]
    pub binge_namespace: String,
}

impl Default for AddonConfig {
    fn default() -> Self {
        Self {
            id: default_addon_id(),
            name: default_addon_name(),
            description: default_addon_description(),
            version: default_addon_version(),
            binge_namespace: default_binge_namespace(),
        }
    }
}

fn default_addon_id() -> String {
    "org.stremio.ita.multisource".to_string()
}

fn default_addon_name() -> String {
    "ITA Plus (Multi-Source)".to_string()
}

fn default_addon_description() -> String {
    "Cerca su CorsaroNero, 1337x, APIBay e Knaben. Solo ITA.".to_string()
}

fn default_addon_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_binge_namespace() -> String {
    "stremizio".to_string()
}

/// TMDB metadata lookup configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    /// Server-wide API key. A key in the request config takes precedence.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL (default: https://api.themoviedb.org/3).
    #[serde(default = "default_tmdb_base_url")]
    pub base_url: String,
    /// Language for localized titles (default: it-IT).
    #[serde(default = "default_tmdb_language")]
    pub language: String,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_tmdb_base_url(),
            language: default_tmdb_language(),
        }
    }
}

fn default_tmdb_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_language() -> String {
    "it-IT".to_string()
}

/// Real-Debrid resolution. Off unless enabled here and a key is supplied per request.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DebridConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_debrid_base_url")]
    pub base_url: String,
    /// Only the top N ranked streams are resolved.
    #[serde(default = "default_max_resolved")]
    pub max_resolved: usize,
}

impl Default for DebridConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_debrid_base_url(),
            max_resolved: default_max_resolved(),
        }
    }
}

fn default_debrid_base_url() -> String {
    "https://api.real-debrid.com/rest/1.0".to_string()
}

fn default_max_resolved() -> usize {
    5
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub fetcher: SanitizedFetcherConfig,
    pub providers: ProvidersConfig,
    pub scoring: ScoringConfig,
    pub addon: AddonConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmdb: Option<SanitizedTmdbConfig>,
    pub debrid: DebridConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedFetcherConfig {
    pub timeout_ms: u64,
    pub user_agents_count: usize,
}

/// Sanitized TMDB config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTmdbConfig {
    pub base_url: String,
    pub language: String,
    pub api_key_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            fetcher: SanitizedFetcherConfig {
                timeout_ms: config.fetcher.timeout_ms,
                user_agents_count: config.fetcher.user_agents.len(),
            },
            providers: config.providers.clone(),
            scoring: config.scoring.clone(),
            addon: config.addon.clone(),
            tmdb: config.tmdb.as_ref().map(|t| SanitizedTmdbConfig {
                base_url: t.base_url.clone(),
                language: t.language.clone(),
                api_key_configured: t.api_key.as_deref().is_some_and(|k| !k.is_empty()),
            }),
            debrid: config.debrid.clone(),
        }
    }
}
