//! Command Handler
//!
//! Takes one request line, validates it with the protocol parser, runs the
//! command against the [`Store`] and returns the [`Reply`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     CommandHandler                          │
//! │                                                             │
//! │  ┌──────────────┐    ┌─────────────┐    ┌─────────────┐     │
//! │  │ parse_line() │───>│  dispatch() │───>│    Store    │     │
//! │  └──────────────┘    └─────────────┘    └─────────────┘     │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use crate::protocol::{parse_line, Command, Reply};
use crate::storage::Store;
use std::sync::Arc;
use tracing::{debug, trace};

/// Runs commands against a shared store.
///
/// Cheap to clone; every connection gets its own handle to the same store.
#[derive(Debug, Clone)]
pub struct CommandHandler {
    store: Arc<Store>,
}

impl CommandHandler {
    /// Creates a new command handler over the given store.
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Returns the store this handler runs against.
    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Executes one request line and returns the reply.
    ///
    /// Malformed lines produce an error reply; they never touch the store.
    pub fn execute(&self, line: &str) -> Reply {
        match parse_line(line) {
            Ok(command) => {
                trace!(command = command.name(), "Dispatching");
                self.dispatch(command)
            }
            Err(err) => {
                debug!(error = %err, "Rejected command");
                Reply::Error(err)
            }
        }
    }

    /// Runs a validated command.
    pub fn dispatch(&self, command: Command) -> Reply {
        match command {
            Command::Set { key, value, ttl } => self.cmd_set(key, value, ttl),
            Command::Get { key } => self.cmd_get(&key),
            Command::Del { key } => self.cmd_del(&key),
            Command::Ttl { key } => self.cmd_ttl(&key),
        }
    }

    /// SET key value [EX seconds]
    fn cmd_set(&self, key: String, value: String, ttl: Option<std::time::Duration>) -> Reply {
        self.store.set(key, value, ttl);
        Reply::Ok
    }

    /// GET key
    fn cmd_get(&self, key: &str) -> Reply {
        match self.store.get(key) {
            Some(value) => Reply::Value(value),
            None => Reply::Nil,
        }
    }

    /// DEL key
    ///
    /// Acknowledged whether or not the key existed.
    fn cmd_del(&self, key: &str) -> Reply {
        self.store.delete(key);
        Reply::Ok
    }

    /// TTL key
    fn cmd_ttl(&self, key: &str) -> Reply {
        Reply::Integer(self.store.ttl(key).as_seconds())
    }
}
