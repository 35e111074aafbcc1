use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stremizio_core::debrid::{DebridResolver, RealDebridClient};
use stremizio_core::external_catalog::{MetadataResolver, TmdbResolver};
use stremizio_core::searcher::{build_providers, Fetcher};
use stremizio_core::{
    load_config, load_config_from_env, validate_config, Aggregator, Config, ConfigError,
    StreamService,
};

use stremizio_server::api::create_router;
use stremizio_server::state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load(&config_path())?;
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");

    let fetcher = Arc::new(Fetcher::new(&config.fetcher).context("Failed to build HTTP client")?);

    let providers = build_providers(&config, Arc::clone(&fetcher));
    let aggregator = Aggregator::new(
        providers,
        config.scoring.clone(),
        config.addon.binge_namespace.clone(),
    );

    let tmdb_config = config.tmdb.clone().unwrap_or_default();
    if tmdb_config.api_key.is_none() {
        info!("No server TMDB key, ids resolve only with a per-user key");
    }
    let resolver: Arc<dyn MetadataResolver> =
        Arc::new(TmdbResolver::new(&tmdb_config, fetcher.client().clone()));

    let mut service = StreamService::new(Arc::new(aggregator), resolver);
    if config.debrid.enabled {
        info!(
            max_resolved = config.debrid.max_resolved,
            "Debrid resolution enabled"
        );
        let debrid: Arc<dyn DebridResolver> = Arc::new(RealDebridClient::new(
            &config.debrid,
            fetcher.client().clone(),
        ));
        service = service.with_debrid(debrid, config.debrid.max_resolved);
    }

    info!(
        providers = ?service.aggregator().provider_names(),
        debrid = service.debrid_enabled(),
        "Stream service ready"
    );

    let addr = SocketAddr::new(config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, service));
    let app = create_router(state);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

fn config_path() -> PathBuf {
    std::env::var("STREMIZIO_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"))
}

/// Load the config file, or the environment alone when there is no file.
fn load(path: &Path) -> Result<Config> {
    info!("Loading configuration from {:?}", path);
    match load_config(path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            warn!(
                "No configuration file at {:?}, using defaults and environment",
                path
            );
            load_config_from_env().context("Failed to load config from environment")
        }
        Err(e) => Err(e).with_context(|| format!("Failed to load config from {:?}", path)),
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
