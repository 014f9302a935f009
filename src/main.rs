//! Revenue Intel HTTP server.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use revenue_intel::adapters::http::{revenue_routes, RevenueAppState};
use revenue_intel::adapters::memory::{InMemoryRevenueReader, RevenueSnapshot, SnapshotError};
use revenue_intel::adapters::postgres::PostgresRevenueReader;
use revenue_intel::config::{
    AppConfig, ConfigError, DatabaseConfig, ServerConfig, StorageBackend, ValidationError,
};
use revenue_intel::ports::RevenueReader;

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Failed to load snapshot: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!(error = %err, "Revenue Intel failed");
        eprintln!("revenue-intel: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let reader = build_reader(&config).await?;
    let app = revenue_routes(RevenueAppState::new(reader))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "Revenue Intel listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if server.is_production() {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

async fn build_reader(config: &AppConfig) -> Result<Arc<dyn RevenueReader>, StartupError> {
    match config.storage.backend {
        StorageBackend::Snapshot => {
            let snapshot = RevenueSnapshot::load_dir(&config.storage.snapshot_dir).await?;
            Ok(Arc::new(InMemoryRevenueReader::new(snapshot)))
        }
        StorageBackend::Postgres => {
            let database = config
                .database
                .as_ref()
                .ok_or(ValidationError::MissingRequired("database.url"))?;
            let pool = connect(database).await?;
            Ok(Arc::new(PostgresRevenueReader::new(pool)))
        }
    }
}

async fn connect(database: &DatabaseConfig) -> Result<sqlx::PgPool, StartupError> {
    let pool = PgPoolOptions::new()
        .min_connections(database.min_connections)
        .max_connections(database.max_connections)
        .acquire_timeout(database.acquire_timeout())
        .idle_timeout(database.idle_timeout())
        .max_lifetime(database.max_lifetime())
        .connect(&database.url)
        .await?;

    if database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }
    Ok(pool)
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([axum::http::Method::GET])
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
