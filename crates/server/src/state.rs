use stremizio_core::{Config, Manifest, SanitizedConfig, StreamService};

/// Shared application state
pub struct AppState {
    config: Config,
    manifest: Manifest,
    service: StreamService,
}

impl AppState {
    pub fn new(config: Config, service: StreamService) -> Self {
        let manifest = Manifest::from(&config.addon);
        Self {
            config,
            manifest,
            service,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn service(&self) -> &StreamService {
        &self.service
    }
}
