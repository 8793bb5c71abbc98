//! HTTP server initialization and startup

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::info;

use studytrack::api::{self, AppState};
use studytrack::cli::initialize_server_database;
use studytrack::config::Config;
use studytrack::storage::UploadStore;

/// Start the JSON API on the configured address
#[tokio::main]
pub async fn start_http(config: Config) -> Result<()> {
    info!("Starting studytrack API (HTTP on port {})", config.port);

    let db = initialize_server_database(&config)?;
    let uploads = UploadStore::open(&config.upload_dir)
        .with_context(|| format!("Could not open {}", config.upload_dir.display()))?;
    info!("Upload directory: {}", uploads.dir().display());
    let lessons = config.load_lessons()?;

    let state = AppState::new(db, uploads, lessons);
    let tasks = state.tasks().clone();
    let router = api::router(state);

    let cancellation_token = CancellationToken::new();
    let shutdown = cancellation_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Shutting down...");
        shutdown.cancel();
    });

    let bind_addr = config.bind_addr();
    info!("Listening on http://{}", bind_addr);

    let tcp_listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Could not bind {}", bind_addr))?;
    axum::serve(tcp_listener, router)
        .with_graceful_shutdown(cancellation_token.cancelled_owned())
        .await?;

    // Let in-flight file removals finish
    tasks.close();
    tasks.wait().await;

    Ok(())
}
