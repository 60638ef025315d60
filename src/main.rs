//! iskrad - Iskra anonymous chat daemon.
//!
//! FIFO matchmaking and message relay for anonymous one-to-one Telegram chats.

use anyhow::Context as _;
use iskrad::config::Config;
use iskrad::network::Gateway;
use iskrad::state::Matchmaker;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load_or_default(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    // The token is the only mandatory input; refuse to start without it.
    let token = std::env::var(&config.telegram.token_env).with_context(|| {
        format!(
            "{} environment variable not set",
            config.telegram.token_env
        )
    })?;

    info!(
        api = %config.telegram.api_url,
        poll_timeout = config.telegram.poll_timeout_secs,
        "Starting iskrad"
    );

    let engine = Arc::new(Matchmaker::new());
    let gateway = Gateway::new(&config.telegram, &token, engine)?;

    tokio::select! {
        result = gateway.run() => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
            Ok(())
        }
    }
}
