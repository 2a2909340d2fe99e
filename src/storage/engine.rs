//! Thread-Safe Key-Value Store with Expiry Support
//!
//! This module implements the core store for medis: a `HashMap` from key to
//! [`Entry`] behind a single `RwLock`, with lazy and active expiration.
//!
//! ## Locking Discipline
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Store                              │
//! │   RwLock<HashMap<String, Entry>>                            │
//! │                                                             │
//! │   write guard:  set / get / delete / ttl / cleanup_expired  │
//! │   read guard:   len / is_empty                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! `get` and `ttl` look like reads but take the write guard: when they find an
//! expired entry they remove it before reporting "not found". Checking and
//! removing under one guard means no writer can slip in between the two.
//!
//! Timestamps come from `tokio::time::Instant`, so a paused tokio clock
//! drives expiry in tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::time::Instant;

/// A stored value with optional expiry time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// The stored value
    pub value: String,
    /// When this entry expires (None = never expires)
    pub expires_at: Option<Instant>,
}

impl Entry {
    /// Creates a new entry without expiry.
    pub fn new(value: String) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    /// Creates a new entry that expires `ttl` from now.
    ///
    /// A zero `ttl`, or one too large to represent as an instant, yields an
    /// entry that never expires.
    pub fn with_ttl(value: String, ttl: Duration) -> Self {
        if ttl.is_zero() {
            return Self::new(value);
        }
        Self {
            value,
            expires_at: Instant::now().checked_add(ttl),
        }
    }

    /// Returns true if the entry is no longer live at `now`.
    ///
    /// An entry is live only while its expiry is strictly in the future.
    #[inline]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }
}

/// Result of a TTL lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    /// The key does not exist (or had expired and was removed)
    Missing,
    /// The key exists and never expires
    Persistent,
    /// The key exists and expires after this much time
    Remaining(Duration),
}

impl Ttl {
    /// The integer reported on the wire: -2 for a missing key, -1 for a key
    /// without expiry, otherwise whole seconds remaining (truncated).
    pub fn as_seconds(&self) -> i64 {
        match self {
            Ttl::Missing => -2,
            Ttl::Persistent => -1,
            Ttl::Remaining(d) => d.as_secs() as i64,
        }
    }

    /// Returns true if the key was found.
    pub fn is_found(&self) -> bool {
        !matches!(self, Ttl::Missing)
    }
}

/// Store statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorageStats {
    pub keys: u64,
    pub get_ops: u64,
    pub set_ops: u64,
    pub del_ops: u64,
    pub expired: u64,
}

/// The in-memory key-value store.
///
/// Construct it once in the composition root, wrap it in an `Arc`, and hand
/// a clone to every connection task and to the expiry sweeper.
///
/// # Example
///
/// ```
/// use medis::storage::Store;
/// use std::time::Duration;
///
/// let store = Store::new();
///
/// store.set("name".to_string(), "medis".to_string(), None);
/// assert_eq!(store.get("name"), Some("medis".to_string()));
///
/// store.set("session".to_string(), "abc".to_string(), Some(Duration::from_secs(60)));
/// assert!(store.ttl("session").as_seconds() > 0);
/// ```
pub struct Store {
    entries: RwLock<HashMap<String, Entry>>,

    get_count: AtomicU64,
    set_count: AtomicU64,
    del_count: AtomicU64,
    expired_count: AtomicU64,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("keys", &self.len())
            .field("get_count", &self.get_count.load(Ordering::Relaxed))
            .field("set_count", &self.set_count.load(Ordering::Relaxed))
            .finish()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            get_count: AtomicU64::new(0),
            set_count: AtomicU64::new(0),
            del_count: AtomicU64::new(0),
            expired_count: AtomicU64::new(0),
        }
    }

    // Every mutation is a single map operation, so a poisoned map is still
    // consistent and safe to keep using.
    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Entry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Entry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts or fully replaces the entry for `key`.
    ///
    /// `None` or a zero `ttl` stores the value without expiry, clearing any
    /// expiry the previous entry had.
    pub fn set(&self, key: String, value: String, ttl: Option<Duration>) {
        self.set_count.fetch_add(1, Ordering::Relaxed);

        let entry = match ttl {
            Some(ttl) => Entry::with_ttl(value, ttl),
            None => Entry::new(value),
        };

        self.write().insert(key, entry);
    }

    /// Gets the value for a key.
    ///
    /// Returns `None` if the key doesn't exist or has expired. An expired key
    /// is removed before returning.
    pub fn get(&self, key: &str) -> Option<String> {
        self.get_count.fetch_add(1, Ordering::Relaxed);

        let mut entries = self.write();
        let entry = entries.get(key)?;

        if entry.is_expired_at(Instant::now()) {
            entries.remove(key);
            self.expired_count.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        Some(entry.value.clone())
    }

    /// Deletes a key.
    ///
    /// Returns `true` if a key was removed. Deleting a missing key is a no-op.
    pub fn delete(&self, key: &str) -> bool {
        self.del_count.fetch_add(1, Ordering::Relaxed);
        self.write().remove(key).is_some()
    }

    /// Gets the remaining time-to-live for a key.
    ///
    /// Like [`Store::get`], an expired key is removed and reported missing.
    pub fn ttl(&self, key: &str) -> Ttl {
        let mut entries = self.write();
        let Some(entry) = entries.get(key) else {
            return Ttl::Missing;
        };

        let Some(expires_at) = entry.expires_at else {
            return Ttl::Persistent;
        };

        let now = Instant::now();
        if expires_at > now {
            return Ttl::Remaining(expires_at - now);
        }

        entries.remove(key);
        self.expired_count.fetch_add(1, Ordering::Relaxed);
        Ttl::Missing
    }

    /// Removes every entry whose expiry is strictly before now.
    ///
    /// One pass under one write-guard acquisition. Called by the background
    /// [`ExpirySweeper`](crate::storage::ExpirySweeper), and directly in tests.
    ///
    /// # Returns
    ///
    /// Returns the number of keys that were removed.
    pub fn cleanup_expired(&self) -> u64 {
        let mut entries = self.write();
        let now = Instant::now();
        let before = entries.len();

        entries.retain(|_, entry| entry.expires_at.map_or(true, |exp| exp >= now));

        let removed = (before - entries.len()) as u64;
        if removed > 0 {
            self.expired_count.fetch_add(removed, Ordering::Relaxed);
        }

        removed
    }

    /// Returns the number of keys held, including expired ones not yet removed.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns true if the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Returns store statistics.
    pub fn stats(&self) -> StorageStats {
        StorageStats {
            keys: self.len() as u64,
            get_ops: self.get_count.load(Ordering::Relaxed),
            set_ops: self.set_count.load(Ordering::Relaxed),
            del_ops: self.del_count.load(Ordering::Relaxed),
            expired: self.expired_count.load(Ordering::Relaxed),
        }
    }
}
