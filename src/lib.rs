//! # medis - A Minimal In-Memory Key-Value Store
//!
//! medis keeps string keys and values in memory and serves them over a
//! line-oriented text protocol modeled after a small subset of Redis:
//! `SET` (with optional expiry), `GET`, `DEL` and `TTL`.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              medis                                      │
//! │                                                                         │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐                  │
//! │  │ TCP Server  │───>│ Connection  │───>│  Command    │                  │
//! │  │ (Listener)  │    │  Handler    │    │  Handler    │                  │
//! │  └─────────────┘    └─────────────┘    └──────┬──────┘                  │
//! │                                               │                         │
//! │                                               ▼                         │
//! │  ┌─────────────┐    ┌──────────────────────────────────────────────┐    │
//! │  │   Line      │    │                   Store                      │    │
//! │  │   Parser    │    │        RwLock<HashMap<String, Entry>>        │    │
//! │  └─────────────┘    └──────────────────────────────────────────────┘    │
//! │                                               ▲                         │
//! │                     ┌─────────────────────────┴───────────────────────┐ │
//! │                     │           ExpirySweeper                         │ │
//! │                     │      (Background Tokio Task)                    │ │
//! │                     └─────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use medis::server::accept_loop;
//! use medis::storage::{start_expiry_sweeper, Store};
//! use medis::connection::ConnectionStats;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(Store::new());
//!     let _sweeper = start_expiry_sweeper(Arc::clone(&store));
//!     let stats = Arc::new(ConnectionStats::new());
//!
//!     let listener = TcpListener::bind("127.0.0.1:6379").await?;
//!     accept_loop(listener, store, stats).await;
//!     Ok(())
//! }
//! ```
//!
//! ## Protocol
//!
//! | Command              | Reply                                   |
//! |----------------------|-----------------------------------------|
//! | `SET k v`            | `OK`                                    |
//! | `SET k v EX n`       | `OK`, or `ERR invalid expire time`      |
//! | `GET k`              | `$<value>`, or `$-1` if missing         |
//! | `DEL k`              | `OK`                                    |
//! | `TTL k`              | seconds left, `-1` no expiry, `-2` missing |
//! | anything else        | `-ERR unknown command`                  |
//!
//! ## Lazy + Active Expiry
//!
//! Keys with a TTL are expired in two ways:
//! 1. **Lazy**: `GET` and `TTL` remove an expired key when they find it
//! 2. **Active**: a background task removes all expired keys every 3 seconds
//!
//! so memory is reclaimed even for keys that are never read again.

pub mod client;
pub mod commands;
pub mod config;
pub mod connection;
pub mod protocol;
pub mod server;
pub mod storage;

pub use commands::CommandHandler;
pub use connection::{handle_connection, ConnectionStats};
pub use protocol::{Command, CommandError, Reply};
pub use storage::{start_expiry_sweeper, ExpiryConfig, ExpirySweeper, Store};

/// The default port medis listens on (same as Redis)
pub const DEFAULT_PORT: u16 = 6379;

/// The default host medis binds to
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Version of medis
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
