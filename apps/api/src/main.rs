mod auth;
mod config;
mod db;
mod documents;
mod errors;
mod extract;
mod models;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::documents::service::DocumentService;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{DocumentStore, MemoryStore, PgStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http=info",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting document API v{}", env!("CARGO_PKG_VERSION"));

    let store = build_store(&config).await?;
    let documents = Arc::new(DocumentService::new(store));

    let state = AppState {
        config: config.clone(),
        documents,
    };

    // TODO: restrict CORS origins once the builder frontend has a fixed host
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// PostgreSQL when `DATABASE_URL` is set, otherwise a process-local store.
async fn build_store(config: &Config) -> Result<Arc<dyn DocumentStore>> {
    match &config.database_url {
        Some(url) => {
            let pool = create_pool(url, config.database_max_connections).await?;
            ensure_schema(&pool).await?;
            info!("Using PostgreSQL document store");
            let store: Arc<dyn DocumentStore> = Arc::new(PgStore::new(pool));
            Ok(store)
        }
        None => {
            info!("DATABASE_URL not set; using in-memory document store");
            let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
            Ok(store)
        }
    }
}
