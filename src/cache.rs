use async_trait::async_trait;
use redis::{aio::ConnectionManager, Client};
use tracing::{debug, warn};

use crate::{db::PING_TIMEOUT, error::BootstrapError};

#[async_trait]
pub trait CacheClient: Send + Sync {
    async fn ping(&self) -> Result<(), redis::RedisError>;
}

/// Shared Redis handle. `ConnectionManager` reconnects on its own and is cheap
/// to clone, so every request works on a clone of the same manager.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    /// Opens the connection manager and checks Redis answers within
    /// [`PING_TIMEOUT`]. On failure the client is dropped before returning.
    pub async fn connect(redis_url: &str) -> Result<Self, BootstrapError> {
        let client = Client::open(redis_url).map_err(BootstrapError::RedisUrl)?;

        let timeout = || BootstrapError::Timeout {
            what: "redis",
            secs: PING_TIMEOUT.as_secs(),
        };

        let conn = tokio::time::timeout(PING_TIMEOUT, ConnectionManager::new(client))
            .await
            .map_err(|_| timeout())?
            .map_err(BootstrapError::RedisPing)?;
        let cache = Self { conn };

        match tokio::time::timeout(PING_TIMEOUT, cache.ping()).await {
            Ok(Ok(())) => {
                debug!("redis connection ready");
                Ok(cache)
            }
            Ok(Err(e)) => {
                warn!(error = %e, "redis ping failed");
                Err(BootstrapError::RedisPing(e))
            }
            Err(_) => Err(timeout()),
        }
    }
}

#[async_trait]
impl CacheClient for RedisCache {
    async fn ping(&self) -> Result<(), redis::RedisError> {
        let mut conn = self.conn.clone();
        let _pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
