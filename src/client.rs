//! Minimal client for the medis line protocol.
//!
//! [`Client::run_command`] sends a raw line and returns the raw reply line,
//! which is what the interactive `medis-cli` uses. The typed helpers wrap it
//! for programmatic callers and tests.

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufStream};
use tokio::net::{TcpStream, ToSocketAddrs};
use tracing::debug;

/// Errors returned by [`Client`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection closed by server")]
    ConnectionClosed,

    /// The server answered with an error line
    #[error("server error: {0}")]
    Server(String),

    #[error("unexpected reply: {0}")]
    UnexpectedReply(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// A connection to a medis server.
#[derive(Debug)]
pub struct Client {
    stream: BufStream<TcpStream>,
}

/// Opens a connection to the server at `addr`.
pub async fn connect<T: ToSocketAddrs>(addr: T) -> Result<Client> {
    let socket = TcpStream::connect(addr).await?;
    Ok(Client {
        stream: BufStream::new(socket),
    })
}

impl Client {
    /// Sends one command line verbatim and returns the reply line without
    /// its terminator.
    pub async fn run_command(&mut self, line: &str) -> Result<String> {
        debug!(request = %line);

        self.stream.write_all(line.as_bytes()).await?;
        self.stream.write_all(b"\r\n").await?;
        self.stream.flush().await?;

        let mut reply = String::new();
        if self.stream.read_line(&mut reply).await? == 0 {
            return Err(ClientError::ConnectionClosed);
        }

        let trimmed = reply.trim_end_matches(&['\r', '\n'][..]).len();
        reply.truncate(trimmed);

        debug!(reply = %reply);
        Ok(reply)
    }

    /// `GET key`. Returns `None` for a missing key.
    ///
    /// A stored value of `-1` is indistinguishable from a missing key on the
    /// wire and is also reported as `None`.
    pub async fn get(&mut self, key: &str) -> Result<Option<String>> {
        let reply = self.run_command(&format!("GET {}", key)).await?;
        match reply.strip_prefix('$') {
            Some("-1") => Ok(None),
            Some(value) => Ok(Some(value.to_string())),
            None => Err(into_error(reply)),
        }
    }

    /// `SET key value`
    pub async fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let reply = self.run_command(&format!("SET {} {}", key, value)).await?;
        expect_ok(reply)
    }

    /// `SET key value EX seconds`. Sub-second precision is dropped.
    pub async fn set_expires(&mut self, key: &str, value: &str, expires: Duration) -> Result<()> {
        let reply = self
            .run_command(&format!("SET {} {} EX {}", key, value, expires.as_secs()))
            .await?;
        expect_ok(reply)
    }

    /// `DEL key`
    pub async fn del(&mut self, key: &str) -> Result<()> {
        let reply = self.run_command(&format!("DEL {}", key)).await?;
        expect_ok(reply)
    }

    /// `TTL key`. Returns -2 for a missing key and -1 for a key without
    /// expiry.
    pub async fn ttl(&mut self, key: &str) -> Result<i64> {
        let reply = self.run_command(&format!("TTL {}", key)).await?;
        reply.parse().map_err(|_| into_error(reply))
    }
}

fn expect_ok(reply: String) -> Result<()> {
    if reply == "OK" {
        Ok(())
    } else {
        Err(into_error(reply))
    }
}

fn into_error(reply: String) -> ClientError {
    if reply.starts_with("-ERR") || reply.starts_with("ERR") {
        ClientError::Server(reply.trim_start_matches('-').to_string())
    } else {
        ClientError::UnexpectedReply(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_error() {
        assert!(matches!(
            into_error("-ERR unknown command".to_string()),
            ClientError::Server(msg) if msg == "ERR unknown command"
        ));
        assert!(matches!(
            into_error("ERR invalid expire time".to_string()),
            ClientError::Server(msg) if msg == "ERR invalid expire time"
        ));
        assert!(matches!(
            into_error("$value".to_string()),
            ClientError::UnexpectedReply(_)
        ));
    }

    #[test]
    fn test_expect_ok() {
        assert!(expect_ok("OK".to_string()).is_ok());
        assert!(expect_ok("$-1".to_string()).is_err());
    }
}
