use std::sync::Arc;

use anyhow::Result;
use common::database::{DatabaseConfig, health_check, init_pool};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod credentials;
mod error;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod validation;

use crate::{
    config::{AppConfig, StorageBackend},
    repositories::{InMemoryMarketStore, MarketStore, PgMarketStore},
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting market service");

    let config = AppConfig::load()?;
    let store = init_store(&config).await?;

    let app = routes::create_router(AppState::new(store));

    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Market service listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Market service stopped");
    Ok(())
}

async fn init_store(config: &AppConfig) -> Result<Arc<dyn MarketStore>> {
    match config.storage {
        StorageBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = init_pool(&db_config).await?;

            if health_check(&pool).await? {
                info!("Database connection successful");
            } else {
                anyhow::bail!("Failed to connect to database");
            }

            let store = PgMarketStore::new(pool);
            if config.run_migrations {
                store.run_migrations().await?;
            }

            Ok(Arc::new(store))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data is lost on shutdown");
            Ok(Arc::new(InMemoryMarketStore::new()))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
