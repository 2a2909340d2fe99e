//! Background Expiry Sweeper
//!
//! Lazy expiry (checking on access) never reclaims a key that is written once
//! and never read again. The sweeper is the "active" half: a Tokio task that
//! wakes on a fixed interval and removes every expired key in one pass.
//!
//! ## Design
//!
//! 1. Ticks on `tokio::time::interval` (default: every 3 seconds)
//! 2. Each tick calls [`Store::cleanup_expired`] once, holding the store's
//!    write guard for the duration of that single pass
//! 3. Stops when the [`ExpirySweeper`] handle is stopped or dropped

use crate::storage::Store;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Default interval between sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(3);

/// Configuration for the expiry sweeper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiryConfig {
    /// Interval between sweeps (default: 3s)
    pub interval: Duration,
}

impl Default for ExpiryConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

impl ExpiryConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// A handle to the running expiry sweeper.
///
/// When this handle is dropped, the sweeper task will be stopped.
#[derive(Debug)]
pub struct ExpirySweeper {
    /// Sender to signal shutdown
    shutdown_tx: watch::Sender<bool>,
}

impl ExpirySweeper {
    /// Starts the expiry sweeper as a background task.
    ///
    /// Must be called from within a Tokio runtime. The first pass runs one
    /// full interval after start.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use medis::storage::{Store, ExpirySweeper, ExpiryConfig};
    /// use std::sync::Arc;
    ///
    /// let store = Arc::new(Store::new());
    /// let sweeper = ExpirySweeper::start(store, ExpiryConfig::default());
    ///
    /// // Dropping the sweeper will stop it
    /// drop(sweeper);
    /// ```
    pub fn start(store: Arc<Store>, config: ExpiryConfig) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        info!(
            interval_ms = config.interval.as_millis() as u64,
            "Background expiry sweeper started"
        );
        tokio::spawn(sweeper_loop(store, config, shutdown_rx));

        Self { shutdown_tx }
    }

    /// Stops the expiry sweeper.
    ///
    /// This is called automatically when the handle is dropped.
    pub fn stop(&self) {
        if !*self.shutdown_tx.borrow() {
            self.shutdown_tx.send_replace(true);
            info!("Background expiry sweeper stopped");
        }
    }
}

impl Drop for ExpirySweeper {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn sweeper_loop(
    store: Arc<Store>,
    config: ExpiryConfig,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            result = shutdown_rx.changed() => {
                if result.is_err() || *shutdown_rx.borrow() {
                    debug!("Expiry sweeper received shutdown signal");
                    return;
                }
                continue;
            }
        }

        let expired = store.cleanup_expired();
        if expired > 0 {
            debug!(
                expired = expired,
                keys_remaining = store.len(),
                "Expired keys cleaned up"
            );
        }
    }
}

/// Starts the expiry sweeper with default configuration.
pub fn start_expiry_sweeper(store: Arc<Store>) -> ExpirySweeper {
    ExpirySweeper::start(store, ExpiryConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(store: &Store, key: &str, ttl: Option<Duration>) {
        store.set(key.to_string(), "value".to_string(), ttl);
    }

    #[test]
    fn test_default_config() {
        assert_eq!(ExpiryConfig::default().interval, Duration::from_secs(3));

        let config = ExpiryConfig::default().with_interval(Duration::from_millis(250));
        assert_eq!(config.interval, Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_cleans_expired_keys() {
        let store = Arc::new(Store::new());

        for i in 0..10 {
            set(&store, &format!("key{}", i), Some(Duration::from_secs(1)));
        }
        set(&store, "persistent", None);
        assert_eq!(store.len(), 11);

        let _sweeper = start_expiry_sweeper(Arc::clone(&store));

        // Expired, but the first pass has not run yet
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(store.len(), 11);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("persistent"), Some("value".to_string()));
        assert_eq!(store.stats().expired, 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_runs_every_interval() {
        let store = Arc::new(Store::new());
        let _sweeper = ExpirySweeper::start(
            Arc::clone(&store),
            ExpiryConfig::default().with_interval(Duration::from_secs(1)),
        );

        set(&store, "a", Some(Duration::from_millis(500)));
        tokio::time::sleep(Duration::from_millis(1_100)).await;
        assert!(store.is_empty());

        set(&store, "b", Some(Duration::from_millis(500)));
        tokio::time::sleep(Duration::from_millis(1_000)).await;
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_stops_on_drop() {
        let store = Arc::new(Store::new());

        {
            let _sweeper = ExpirySweeper::start(
                Arc::clone(&store),
                ExpiryConfig::default().with_interval(Duration::from_secs(1)),
            );
            tokio::time::sleep(Duration::from_millis(1_500)).await;
        }

        set(&store, "key", Some(Duration::from_secs(1)));
        tokio::time::sleep(Duration::from_secs(5)).await;

        // Nothing swept it; only lazy expiry removes it now
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("key"), None);
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent() {
        let store = Arc::new(Store::new());
        let sweeper = start_expiry_sweeper(Arc::clone(&store));

        sweeper.stop();
        sweeper.stop();
        drop(sweeper);

        set(&store, "key", Some(Duration::from_secs(1)));
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(store.len(), 1);
    }
}
