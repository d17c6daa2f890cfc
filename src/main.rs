use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use ota_core::config::{
    frontend_dir_from_env_value, rate_limit_from_env_value, upload_dir_from_env_value,
};
use ota_core::{
    CoreConfig, DEFAULT_GENERAL_RATE_LIMIT, DEFAULT_LISTEN_ADDR, DEFAULT_UPLOAD_RATE_LIMIT,
    RateLimits,
};

/// Main entry point for the OTA firmware repository
///
/// Resolves configuration from the environment once, opens the artifact directory and serves
/// the REST API (and the prebuilt frontend, when present) until Ctrl-C.
///
/// # Environment Variables
/// - `OTA_ADDR`: Server address (default: "0.0.0.0:8000")
/// - `UPLOAD_DIR`: Artifact directory, created if missing (default: "uploads")
/// - `FRONTEND_DIST_DIR`: Prebuilt web frontend (default: "frontend/dist")
/// - `OTA_RATE_LIMIT`: Requests per client per 15 minutes (default: 100)
/// - `OTA_UPLOAD_RATE_LIMIT`: Uploads per client per minute (default: 5)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - a setting is invalid or the artifact directory cannot be created,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ota_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("ota_files=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("OTA_ADDR").unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.into());
    let addr: SocketAddr = addr
        .parse()
        .with_context(|| format!("OTA_ADDR is not a socket address: {}", addr))?;

    let rate_limits = RateLimits {
        general: rate_limit_from_env_value(
            "OTA_RATE_LIMIT",
            std::env::var("OTA_RATE_LIMIT").ok(),
            DEFAULT_GENERAL_RATE_LIMIT,
        )?,
        upload: rate_limit_from_env_value(
            "OTA_UPLOAD_RATE_LIMIT",
            std::env::var("OTA_UPLOAD_RATE_LIMIT").ok(),
            DEFAULT_UPLOAD_RATE_LIMIT,
        )?,
    };

    let frontend_dir = frontend_dir_from_env_value(std::env::var("FRONTEND_DIST_DIR").ok());
    if frontend_dir.is_none() {
        tracing::warn!("frontend build not found, unknown routes will return JSON 404");
    }

    let cfg = Arc::new(CoreConfig::new(
        upload_dir_from_env_value(std::env::var("UPLOAD_DIR").ok()),
        frontend_dir,
        rate_limits,
    )?);

    let state = AppState::new(cfg).context("failed to open the artifact directory")?;
    let app = api_rest::router(state);

    tracing::info!("++ Starting OTA firmware repository on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("-- OTA firmware repository stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
