//! Storage Module
//!
//! The in-memory key-value store and its background expiry sweeper.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Store                              │
//! │            RwLock<HashMap<String, Entry>>                   │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                            │ cleanup_expired() every 3s
//!              ┌─────────────┴─────────────┐
//!              │     ExpirySweeper         │
//!              │  (Background Tokio Task)  │
//!              └───────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use medis::storage::Store;
//! use std::time::Duration;
//!
//! let store = Store::new();
//!
//! store.set("name".to_string(), "medis".to_string(), None);
//! assert_eq!(store.get("name"), Some("medis".to_string()));
//!
//! store.set(
//!     "session".to_string(),
//!     "token123".to_string(),
//!     Some(Duration::from_secs(3600)),
//! );
//! ```

pub mod engine;
pub mod expiry;

pub use engine::{Entry, StorageStats, Store, Ttl};
pub use expiry::{start_expiry_sweeper, ExpiryConfig, ExpirySweeper, DEFAULT_SWEEP_INTERVAL};
