//! services/portal/src/bin/portal.rs

use portal_lib::{
    adapters::{DbAdapter, HtmlRenderer, MemorySessionStore, PgSessionStore},
    config::{Config, SessionBackend},
    error::StartupError,
    web::{build_router, state::AppState},
};
use gyanganga_core::ports::SessionStore;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await?;
    let db_adapter = Arc::new(DbAdapter::new(db_pool.clone()));
    if config.run_migrations {
        info!("Running database migrations...");
        db_adapter.run_migrations().await?;
        info!("Database migrations complete.");
    }

    // --- 3. Choose the Session Store ---
    let session_store: Arc<dyn SessionStore> = match config.session_backend {
        SessionBackend::Memory => Arc::new(MemorySessionStore::new()),
        SessionBackend::Postgres => Arc::new(PgSessionStore::new(db_pool.clone())),
    };
    info!(
        "Sessions kept in {:?} store, expiring after {} hours",
        config.session_backend,
        config.session_ttl_hours
    );

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState::new(
        config.clone(),
        db_adapter.clone(),
        db_adapter,
        session_store,
        Arc::new(HtmlRenderer::new("GyanGanga")),
    ));

    // --- 5. Create the Web Router ---
    let app = build_router(app_state);

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.bind_address,
            source,
        })?;
    axum::serve(listener, app).await.map_err(StartupError::Serve)?;

    Ok(())
}
