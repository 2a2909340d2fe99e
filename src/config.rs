//! Command-line configuration for the server and the interactive client.

use crate::storage::ExpiryConfig;
use crate::{DEFAULT_HOST, DEFAULT_PORT};
use clap::Parser;
use std::time::Duration;

/// Server configuration.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "medis-server", version, about = "A minimal in-memory key-value store")]
pub struct ServerConfig {
    /// Host to bind to
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Seconds between background sweeps of expired keys
    #[arg(long = "sweep-interval", default_value_t = 3, value_parser = clap::value_parser!(u64).range(1..))]
    pub sweep_interval_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            sweep_interval_secs: 3,
        }
    }
}

impl ServerConfig {
    /// Returns the bind address as a string
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn expiry_config(&self) -> ExpiryConfig {
        ExpiryConfig::default().with_interval(Duration::from_secs(self.sweep_interval_secs))
    }
}

/// Interactive client configuration.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "medis-cli", version, about = "A simple CLI for medis")]
pub struct CliConfig {
    /// Server host
    #[arg(short = 'H', long, default_value = "localhost")]
    pub host: String,

    /// Server port
    #[arg(short = 'P', long, default_value_t = DEFAULT_PORT)]
    pub port: u16,
}

impl CliConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
