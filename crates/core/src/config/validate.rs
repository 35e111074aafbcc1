use super::{types::Config, ConfigError, ProviderConfig};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Fetcher has a deadline and at least one user agent
/// - Enabled providers have a base URL and a non-zero cap
/// - Scoring weights keep trust > 4K > 1080p > seeders
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.fetcher.timeout_ms == 0 {
        return Err(ConfigError::ValidationError(
            "fetcher.timeout_ms cannot be 0".to_string(),
        ));
    }

    if config.fetcher.user_agents.is_empty() {
        return Err(ConfigError::ValidationError(
            "fetcher.user_agents cannot be empty".to_string(),
        ));
    }

    let providers = &config.providers;
    for (name, provider) in [
        ("corsaro", &providers.corsaro),
        ("leetx", &providers.leetx),
        ("apibay", &providers.apibay),
        ("knaben", &providers.knaben),
    ] {
        validate_provider(name, provider)?;
    }

    let s = &config.scoring;
    if !(s.trusted_bonus > s.uhd_bonus && s.uhd_bonus > s.full_hd_bonus && s.full_hd_bonus > s.seeder_cap)
    {
        return Err(ConfigError::ValidationError(format!(
            "scoring weights must satisfy trusted_bonus > uhd_bonus > full_hd_bonus > seeder_cap (got {} > {} > {} > {})",
            s.trusted_bonus, s.uhd_bonus, s.full_hd_bonus, s.seeder_cap
        )));
    }

    Ok(())
}

fn validate_provider(name: &str, provider: &ProviderConfig) -> Result<(), ConfigError> {
    if !provider.enabled {
        return Ok(());
    }
    if provider.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "providers.{}.base_url cannot be empty",
            name
        )));
    }
    if provider.max_results == 0 {
        return Err(ConfigError::ValidationError(format!(
            "providers.{}.max_results cannot be 0",
            name
        )));
    }
    Ok(())
}
