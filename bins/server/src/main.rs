//! Tally API Server
//!
//! Main entry point for the Tally backend service.

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tally_api::{AppState, create_router, session::build_store};
use tally_db::{PoolOptions, connect, migration::Migrator, redact_url};
use tally_shared::{AppConfig, config::LoggingConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load()?;

    init_tracing(config.logging);

    // Connect to database
    let db = connect(
        &config.database.url,
        PoolOptions {
            max_connections: config.database.max_connections,
            min_connections: config.database.min_connections,
        },
    )
    .await?;
    info!(url = %redact_url(&config.database.url), "Connected to database");

    Migrator::up(&db, None).await?;
    info!("Migrations applied");

    let sessions = build_store(&config.session, db.clone());
    match sessions.purge_expired().await {
        Ok(purged) => info!(purged, store = ?config.session.store, "Session store ready"),
        Err(e) => warn!(error = %e, "Could not purge expired sessions"),
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        sessions,
        config: Arc::new(config),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(logging: LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tally=debug,tally_api=debug,tally_db=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
