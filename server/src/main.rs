//! `Vivah` Server - Main Entry Point

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use vivah_server::{admin, api, auth, config, db, uploads};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vivah_server=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env()?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting Vivah Server");

    // Initialize database
    let db_pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&db_pool).await?;

    // Initialize S3 client (optional - uploads answer 503 if unavailable)
    let s3 = {
        let client = uploads::S3Client::new(&config);
        match client.health_check().await {
            Ok(()) => {
                info!(bucket = %config.s3_bucket, "S3 storage connected");
                Some(client)
            }
            Err(e) => {
                tracing::warn!("S3 health check failed: {}. Image uploads disabled.", e);
                None
            }
        }
    };

    // Logged-out tokens, evicted once they would have expired anyway
    let revocations = Arc::new(auth::RevocationRegistry::new());
    auth::spawn_purge_task(
        Arc::clone(&revocations),
        Duration::from_secs(config.revocation_sweep_secs),
    );

    admin::spawn_consistency_sweep(
        db_pool.clone(),
        Duration::from_secs(config.consistency_sweep_secs),
    );

    // Build application state
    let bind_address = config.bind_address.clone();
    let state = api::AppState::new(db_pool, config, s3, revocations);

    // Build router
    let app = api::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(address = %bind_address, "Server listening");

    // Graceful shutdown handler
    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
        }
        info!("Received shutdown signal, cleaning up...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shutdown complete");

    Ok(())
}
