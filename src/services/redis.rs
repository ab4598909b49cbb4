//! Redis cache service implementation
//!
//! Public page aggregates are cached in Redis under a key prefix. The cache is
//! optional: when it is disabled or Redis cannot be reached, reads report a
//! miss and writes are skipped, so pages are always served from the database.

use std::time::Duration;

use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, RedisResult};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};
use crate::config::RedisConfig;
use crate::utils::errors::{ConnectHubError, Result};
use crate::utils::logging::log_cache_access;

/// Keys holding public page data share this namespace
pub const PUBLIC_NAMESPACE: &str = "public:";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Redis-backed JSON cache
#[derive(Clone, Debug)]
pub struct CacheService {
    client: Option<Client>,
    prefix: String,
    ttl_seconds: u64,
}

impl CacheService {
    /// Create a cache from configuration; no connection is opened yet
    pub fn new(config: &RedisConfig) -> Result<Self> {
        let client = if config.enabled {
            Some(Client::open(config.url.as_str())?)
        } else {
            None
        };

        Ok(Self {
            client,
            prefix: config.prefix.clone(),
            ttl_seconds: config.ttl_seconds,
        })
    }

    /// A cache that never stores anything
    pub fn disabled() -> Self {
        Self {
            client: None,
            prefix: String::new(),
            ttl_seconds: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Get Redis connection
    async fn get_connection(&self) -> Result<Option<MultiplexedConnection>> {
        let Some(client) = &self.client else {
            return Ok(None);
        };

        let connection = tokio::time::timeout(CONNECT_TIMEOUT, client.get_multiplexed_tokio_connection())
            .await
            .map_err(|_| ConnectHubError::ServiceUnavailable("Redis connection timed out".to_string()))??;

        Ok(Some(connection))
    }

    /// Set a value in Redis with TTL
    pub async fn set<T>(&self, key: &str, value: &T, ttl_seconds: Option<u64>) -> Result<()>
    where
        T: Serialize,
    {
        let Some(mut conn) = self.get_connection().await? else {
            return Ok(());
        };
        let serialized = serde_json::to_string(value)?;
        let full_key = self.full_key(key);
        let ttl = ttl_seconds.unwrap_or(self.ttl_seconds);

        let _: () = conn.set_ex(&full_key, serialized, ttl).await?;

        debug!(key = %full_key, ttl = ttl, "Value set in Redis");
        Ok(())
    }

    /// Get a value from Redis
    pub async fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let Some(mut conn) = self.get_connection().await? else {
            return Ok(None);
        };
        let full_key = self.full_key(key);

        let result: Option<String> = conn.get(&full_key).await?;
        log_cache_access(&full_key, result.is_some());

        match result {
            Some(data) => Ok(Some(serde_json::from_str::<T>(&data)?)),
            None => Ok(None),
        }
    }

    /// Delete a key from Redis
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let Some(mut conn) = self.get_connection().await? else {
            return Ok(false);
        };
        let full_key = self.full_key(key);

        let deleted: i32 = conn.del(&full_key).await?;

        debug!(key = %full_key, deleted = deleted > 0, "Key deletion attempted");
        Ok(deleted > 0)
    }

    /// Delete all keys matching a pattern
    pub async fn delete_pattern(&self, pattern: &str) -> Result<u64> {
        let Some(mut conn) = self.get_connection().await? else {
            return Ok(0);
        };
        let full_pattern = self.full_key(pattern);

        let keys: Vec<String> = conn.keys(&full_pattern).await?;
        if keys.is_empty() {
            return Ok(0);
        }

        let deleted: u64 = conn.del(&keys).await?;

        info!(pattern = %full_pattern, deleted = deleted, "Keys deleted by pattern");
        Ok(deleted)
    }

    /// Read through the cache; any failure counts as a miss
    pub async fn fetch<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        match self.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key = key, error = %e, "Cache read failed, treating as miss");
                None
            }
        }
    }

    /// Store a value, logging instead of failing
    pub async fn store<T>(&self, key: &str, value: &T)
    where
        T: Serialize,
    {
        if let Err(e) = self.set(key, value, None).await {
            warn!(key = key, error = %e, "Cache write failed");
        }
    }

    /// Drop every cached public page
    pub async fn invalidate_public(&self) {
        match self.delete_pattern(&format!("{}*", PUBLIC_NAMESPACE)).await {
            Ok(deleted) => debug!(deleted = deleted, "Public cache invalidated"),
            Err(e) => warn!(error = %e, "Public cache invalidation failed"),
        }
    }

    /// Health check for Redis connection; `None` when the cache is disabled
    pub async fn health_check(&self) -> Option<bool> {
        let mut conn = match self.get_connection().await {
            Ok(Some(conn)) => conn,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Redis connection failed");
                return Some(false);
            }
        };

        let result: RedisResult<String> = redis::cmd("PING").query_async(&mut conn).await;
        match result {
            Ok(response) => {
                debug!(response = %response, "Redis health check successful");
                Some(response == "PONG")
            }
            Err(e) => {
                warn!(error = %e, "Redis health check failed");
                Some(false)
            }
        }
    }
}
