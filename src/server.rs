//! TCP accept loop.

use crate::commands::CommandHandler;
use crate::connection::{handle_connection, ConnectionStats};
use crate::storage::Store;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::error;

/// Accepts connections forever, spawning one task per client.
///
/// Every task gets a handle to the same `store`. A failed `accept` is logged
/// and the loop keeps going.
pub async fn accept_loop(listener: TcpListener, store: Arc<Store>, stats: Arc<ConnectionStats>) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let handler = CommandHandler::new(Arc::clone(&store));
                let stats = Arc::clone(&stats);

                tokio::spawn(async move {
                    handle_connection(stream, addr, handler, stats).await;
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{self, Client};
    use crate::storage::{ExpiryConfig, ExpirySweeper};
    use std::net::SocketAddr;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    async fn create_test_server() -> (SocketAddr, Arc<Store>, Arc<ConnectionStats>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let store = Arc::new(Store::new());
        let stats = Arc::new(ConnectionStats::new());

        tokio::spawn(accept_loop(listener, Arc::clone(&store), Arc::clone(&stats)));

        (addr, store, stats)
    }

    async fn connect(addr: SocketAddr) -> Client {
        client::connect(addr).await.unwrap()
    }

    #[tokio::test]
    async fn test_expiry_scenario() {
        let (addr, _, _) = create_test_server().await;
        let mut client = connect(addr).await;

        assert_eq!(client.run_command("SET foo bar EX 1").await.unwrap(), "OK");
        assert_eq!(client.run_command("GET foo").await.unwrap(), "$bar");

        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(client.run_command("GET foo").await.unwrap(), "$-1");
        assert_eq!(client.run_command("TTL foo").await.unwrap(), "-2");
    }

    #[tokio::test]
    async fn test_persistent_key_scenario() {
        let (addr, _, _) = create_test_server().await;
        let mut client = connect(addr).await;

        assert_eq!(client.run_command("SET a 1").await.unwrap(), "OK");
        assert_eq!(client.run_command("TTL a").await.unwrap(), "-1");
        assert_eq!(client.run_command("DEL a").await.unwrap(), "OK");
        assert_eq!(client.run_command("GET a").await.unwrap(), "$-1");
    }

    #[tokio::test]
    async fn test_error_replies() {
        let (addr, _, _) = create_test_server().await;
        let mut client = connect(addr).await;

        let cases = [
            ("SET a", "ERR wrong number of arguments for 'SET' command"),
            ("SET a b EX x", "ERR invalid expire time"),
            ("SET a b EX 18446744073709551615", "ERR invalid expire time"),
            ("GET", "-ERR wrong number of arguments for 'GET' command"),
            ("DEL", "-ERR wrong number of arguments for 'DEL' command"),
            ("TTL a b", "-ERR wrong number of arguments for 'TTL' command"),
            ("HELLO", "-ERR unknown command"),
            ("", "-ERR unknown command"),
        ];

        for (line, expected) in cases {
            assert_eq!(client.run_command(line).await.unwrap(), expected, "line: {line:?}");
        }

        // Still usable after every error
        assert_eq!(client.run_command("SET a b").await.unwrap(), "OK");
    }

    #[tokio::test]
    async fn test_typed_client() {
        let (addr, _, _) = create_test_server().await;
        let mut client = connect(addr).await;

        client.set("k", "v").await.unwrap();
        assert_eq!(client.get("k").await.unwrap(), Some("v".to_string()));
        assert_eq!(client.ttl("k").await.unwrap(), -1);

        client.set_expires("k", "v2", Duration::from_secs(100)).await.unwrap();
        let ttl = client.ttl("k").await.unwrap();
        assert!(ttl > 0 && ttl <= 100);

        client.del("k").await.unwrap();
        client.del("k").await.unwrap();
        assert_eq!(client.get("k").await.unwrap(), None);
        assert_eq!(client.ttl("k").await.unwrap(), -2);

        // EX 0 stores the key without expiry
        client.set_expires("k", "v", Duration::ZERO).await.unwrap();
        assert_eq!(client.ttl("k").await.unwrap(), -1);
    }

    #[tokio::test]
    async fn test_connections_share_store() {
        let (addr, store, _) = create_test_server().await;
        let mut writer = connect(addr).await;
        let mut reader = connect(addr).await;

        writer.set("shared", "value").await.unwrap();
        assert_eq!(reader.get("shared").await.unwrap(), Some("value".to_string()));

        // Last writer wins
        reader.set("shared", "other").await.unwrap();
        assert_eq!(writer.get("shared").await.unwrap(), Some("other".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_gets() {
        let (addr, _, _) = create_test_server().await;
        connect(addr).await.set("hot", "value").await.unwrap();

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                tokio::spawn(async move {
                    let mut client = client::connect(addr).await.unwrap();
                    for _ in 0..50 {
                        assert_eq!(client.run_command("GET hot").await.unwrap(), "$value");
                    }
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_sweeper_reclaims_unread_keys() {
        let (addr, store, _) = create_test_server().await;
        let _sweeper = ExpirySweeper::start(
            Arc::clone(&store),
            ExpiryConfig::default().with_interval(Duration::from_millis(200)),
        );
        let mut client = connect(addr).await;

        client.set_expires("once", "v", Duration::from_secs(1)).await.unwrap();
        client.set("forever", "v").await.unwrap();
        assert_eq!(store.len(), 2);

        tokio::time::sleep(Duration::from_millis(1_500)).await;

        assert_eq!(store.len(), 1);
        assert_eq!(client.get("forever").await.unwrap(), Some("v".to_string()));
    }

    #[tokio::test]
    async fn test_disconnect_updates_stats() {
        let (addr, _, stats) = create_test_server().await;

        let mut client = connect(addr).await;
        client.set("a", "1").await.unwrap();

        assert_eq!(stats.connections_accepted.load(Ordering::Relaxed), 1);
        assert_eq!(stats.active_connections.load(Ordering::Relaxed), 1);

        drop(client);
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(stats.active_connections.load(Ordering::Relaxed), 0);
        assert_eq!(stats.commands_processed.load(Ordering::Relaxed), 1);
    }
}
