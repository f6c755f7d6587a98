mod config;
mod detector;
mod error;
mod handlers;
mod model_service;
mod routes;
mod state;
mod translate;

#[cfg(test)]
mod test_fixtures;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("arabic_news_detector=debug,tower_http=debug")),
        )
        .init();

    let config_paths = config::config_search_paths();
    let (config, loaded_path) = Config::discover(&config_paths);
    match loaded_path {
        Some(path) => info!("Loaded configuration from: {}", path),
        None => warn!(
            "No config file found (tried {:?}); using built-in defaults",
            config_paths
        ),
    }

    // Artifacts load once, before the listener is bound
    let app_state = AppState::new(config.clone()).await;
    if app_state.artifacts.ready().is_none() {
        warn!("Serving in degraded mode; every prediction will fail until restart");
    }

    let app = routes::app(app_state);

    let system_config = &config.system_config;
    let listener =
        tokio::net::TcpListener::bind((system_config.host.as_str(), system_config.port)).await?;
    info!("Starting server on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
