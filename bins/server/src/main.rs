//! Bulletin API Server
//!
//! Main entry point for the bulletin board backend service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bulletin_api::{AppState, create_router};
use bulletin_core::storage::{ObjectStore, StorageConfig, StorageProvider};
use bulletin_db::connect;
use bulletin_shared::{AppConfig, StorageSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bulletin=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("failed to load configuration")?;

    // Connect to database
    let db = connect(&config.database.url, config.database.max_connections).await?;
    info!("Connected to database");

    // Create the file store
    let storage_config = storage_config(&config.storage)?;
    info!(
        provider = storage_config.provider.name(),
        max_file_size = storage_config.max_file_size,
        "File store configured"
    );
    let store = ObjectStore::from_config(storage_config)?;

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        store: Arc::new(store),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Translates the loaded storage settings into a file store configuration.
fn storage_config(settings: &StorageSettings) -> anyhow::Result<StorageConfig> {
    let provider = match settings.provider.as_str() {
        "local" => StorageProvider::local_fs(&settings.root),
        "s3" => StorageProvider::s3(
            &settings.endpoint,
            &settings.bucket,
            &settings.access_key_id,
            &settings.secret_access_key,
            &settings.region,
        ),
        other => anyhow::bail!("unknown storage provider: {other}"),
    };

    Ok(StorageConfig::new(provider).with_max_file_size(settings.max_file_size))
}
