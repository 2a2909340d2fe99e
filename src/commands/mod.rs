//! Command Handler Module
//!
//! Receives request lines, executes them against the store, and returns
//! replies.
//!
//! ```text
//! Client Request
//!       │
//!       ▼
//! ┌─────────────────┐
//! │  Line Parser    │  (protocol module)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ CommandHandler  │  (this module)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │     Store       │  (storage module)
//! └─────────────────┘
//! ```
//!
//! ## Supported Commands
//!
//! - `SET key value [EX seconds]`
//! - `GET key`
//! - `DEL key`
//! - `TTL key`

pub mod handler;

pub use handler::CommandHandler;
