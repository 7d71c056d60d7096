//! Tiling board analysis server.

use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod data;
mod protocol;
mod server;
mod session;

use config::ServerConfig;
use data::GameData;
use server::ServerState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    info!("Starting tiling analysis server...");

    let data = Arc::new(GameData::load(&config)?);
    let state = Arc::new(ServerState::new(data));

    server::run_server(config.addr, state).await
}
