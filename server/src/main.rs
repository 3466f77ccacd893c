//! GitHub-Feishu Bot - Main Entry Point
//!
//! Relays GitHub webhook events to a Feishu group chat.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use github_feishu_server::{api, config, relay::FeishuClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "github_feishu_server=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting GitHub-Feishu Bot"
    );

    if !config.verification_enabled() {
        warn!("GITHUB_WEBHOOK_SECRET not set, webhook signature verification is DISABLED");
    }

    // Initialize Feishu client
    let feishu = FeishuClient::new(&config)?;
    info!(chat_id = %config.feishu_chat_id, "Feishu client initialized");

    // Build application state and router
    let bind_address = config.bind_address.clone();
    let state = api::AppState::new(config, Arc::new(feishu));
    let app = api::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(address = %bind_address, "Server listening");
    info!(url = %format!("http://{bind_address}/webhook"), "Webhook endpoint");
    info!(url = %format!("http://{bind_address}/health"), "Health check endpoint");

    // Graceful shutdown handler
    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for CTRL+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received shutdown signal, stopping...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shutdown complete");

    Ok(())
}
