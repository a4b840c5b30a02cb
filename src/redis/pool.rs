//! Redis connection pool for the task broker.
//!
//! Provides a lazily established, multiplexed Redis connection shared by
//! every task submission.

use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, RedisResult};
use tokio::sync::RwLock;

/// Redis connection pool for broker operations.
///
/// The connection is created on first use and cleared when Redis reports a
/// dropped connection, so the next call reconnects.
pub struct RedisPool {
    /// Redis client for creating connections
    client: Client,

    /// Multiplexed connection (shared across tasks)
    connection: RwLock<Option<MultiplexedConnection>>,

    url: String,
}

impl std::fmt::Debug for RedisPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisPool").field("url", &self.url).finish()
    }
}

impl RedisPool {
    /// Create a new Redis pool. No connection is made until first use.
    pub fn new(url: &str) -> RedisResult<Self> {
        let client = Client::open(url)?;

        Ok(Self {
            client,
            connection: RwLock::new(None),
            url: url.to_string(),
        })
    }

    /// Get the shared connection, establishing it if needed.
    pub async fn get_connection(&self) -> RedisResult<MultiplexedConnection> {
        {
            let conn = self.connection.read().await;
            if let Some(ref c) = *conn {
                return Ok(c.clone());
            }
        }

        self.connect().await
    }

    async fn connect(&self) -> RedisResult<MultiplexedConnection> {
        let mut conn_guard = self.connection.write().await;

        // Double-check in case another task connected while we waited
        if let Some(ref c) = *conn_guard {
            return Ok(c.clone());
        }

        match self.client.get_multiplexed_async_connection().await {
            Ok(conn) => {
                *conn_guard = Some(conn.clone());
                tracing::info!(url = %self.url, "Redis broker connection established");
                Ok(conn)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to Redis broker");
                Err(e)
            }
        }
    }

    /// Push a value onto the head of a list, returning the new list length.
    pub async fn lpush(&self, key: &str, value: &str) -> RedisResult<usize> {
        let mut conn = self.get_connection().await?;

        match conn.lpush::<_, _, usize>(key, value).await {
            Ok(len) => Ok(len),
            Err(e) => {
                if e.is_connection_dropped() || e.is_io_error() {
                    // Clear the connection so next call will reconnect
                    let mut conn_guard = self.connection.write().await;
                    *conn_guard = None;
                }
                Err(e)
            }
        }
    }

    /// Ping Redis to check connectivity.
    pub async fn ping(&self) -> RedisResult<()> {
        let mut conn = self.get_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    /// Get the Redis URL (for debugging).
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_does_not_connect() {
        let pool = RedisPool::new("redis://localhost:6379").unwrap();
        assert_eq!(pool.url(), "redis://localhost:6379");
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        assert!(RedisPool::new("not a url").is_err());
    }
}
