//! medis server
//!
//! Composition root: parses configuration, creates the one shared store,
//! starts the expiry sweeper and accepts connections until Ctrl+C.

use clap::Parser;
use medis::config::ServerConfig;
use medis::connection::ConnectionStats;
use medis::server::accept_loop;
use medis::storage::{ExpirySweeper, Store};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // Shared by every connection for the life of the process
    let store = Arc::new(Store::new());

    let _sweeper = ExpirySweeper::start(Arc::clone(&store), config.expiry_config());

    let stats = Arc::new(ConnectionStats::new());

    // A bind failure is fatal
    let listener = TcpListener::bind(config.bind_address()).await?;
    info!(version = medis::VERSION, "Server is running on {}", config.bind_address());

    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received, stopping server...");
    };

    tokio::select! {
        _ = accept_loop(listener, Arc::clone(&store), Arc::clone(&stats)) => {}
        _ = shutdown => {}
    }

    let storage = store.stats();
    info!(
        keys = storage.keys,
        expired = storage.expired,
        connections = stats.connections_accepted.load(Ordering::Relaxed),
        commands = stats.commands_processed.load(Ordering::Relaxed),
        "Server shutdown complete"
    );
    Ok(())
}
