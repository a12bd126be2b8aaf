use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use moviemine::api::{create_router, AppState, QuerySettings};
use moviemine::catalog::load_snapshot;
use moviemine::config::Config;
use moviemine::db::{create_redis_client, Cache};
use moviemine::services::{MetadataProvider, TmdbProvider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    // Without a catalog there is nothing to serve
    let catalog = load_snapshot(&config.movies_path, &config.similarity_path)
        .context("Failed to load catalog snapshot")?;

    let (cache, cache_handle) = match &config.redis_url {
        Some(url) => {
            let client = create_redis_client(url)?;
            tracing::info!("Movie details cache enabled");
            Cache::new(client)
        }
        None => {
            tracing::info!("REDIS_URL not set, movie details cache disabled");
            Cache::disabled()
        }
    };

    let provider: Arc<dyn MetadataProvider> = Arc::new(TmdbProvider::new(
        cache,
        config.tmdb_token.clone(),
        config.tmdb_api_url.clone(),
        config.tmdb_image_url.clone(),
    ));

    let state = AppState::new(Arc::new(catalog), provider, QuerySettings::from(&config));
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    cache_handle.shutdown().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
