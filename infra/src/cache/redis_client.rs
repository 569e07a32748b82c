//! Redis cache client implementation
//!
//! This module provides a Redis client with a multiplexed connection, retry
//! logic, and the primitive operations the passcode store needs: set with
//! expiry, get, delete, counters and TTL inspection.

use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError, RedisResult};
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use crate::InfrastructureError;

use super::CacheConfig;

/// Upper bound for the exponential backoff between attempts
const MAX_RETRY_DELAY_MS: u64 = 5000;

/// Sets a TTL only when the key exists without one
const EXPIRE_IF_UNSET_SCRIPT: &str = r#"
if redis.call('TTL', KEYS[1]) == -1 then
    return redis.call('EXPIRE', KEYS[1], ARGV[1])
end
return 0
"#;

/// Increments a counter and opens its window in one server-side step
const INCREMENT_IN_WINDOW_SCRIPT: &str = r#"
local count = redis.call('INCR', KEYS[1])
if redis.call('TTL', KEYS[1]) == -1 then
    redis.call('EXPIRE', KEYS[1], ARGV[1])
end
return count
"#;

/// Redis cache client with retry logic
///
/// Cloning is cheap; clones share the same multiplexed connection.
#[derive(Clone)]
pub struct RedisClient {
    /// Redis multiplexed connection for async operations
    connection: MultiplexedConnection,
    /// Maximum number of attempts for operations
    max_retries: u32,
    /// Base delay between retries (exponential backoff)
    retry_delay_ms: u64,
}

impl RedisClient {
    /// Create a new Redis client
    ///
    /// # Arguments
    /// * `config` - Cache configuration settings
    ///
    /// # Returns
    /// * `Result<Self, InfrastructureError>` - Redis client or error
    pub async fn new(config: &CacheConfig) -> Result<Self, InfrastructureError> {
        info!(
            url = %mask_url(&config.url),
            max_retries = config.max_retries,
            "Creating Redis client"
        );

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let max_retries = config.max_retries.max(1);
        let connection = Self::create_connection_with_retry(
            client,
            max_retries,
            config.retry_delay_ms,
            Duration::from_secs(config.connection_timeout.max(1)),
        )
        .await?;

        info!("Redis client created successfully");

        Ok(Self {
            connection,
            max_retries,
            retry_delay_ms: config.retry_delay_ms,
        })
    }

    /// Create multiplexed connection with retry logic
    async fn create_connection_with_retry(
        client: Client,
        max_retries: u32,
        retry_delay_ms: u64,
        connect_timeout: Duration,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            let result = match timeout(connect_timeout, client.get_multiplexed_async_connection()).await {
                Ok(result) => result,
                Err(_) => Err(RedisError::from(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    "connection attempt timed out",
                ))),
            };

            match result {
                Ok(connection) => {
                    info!("Successfully connected to Redis");
                    return Ok(connection);
                }
                Err(e) if attempts < max_retries => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = next_delay(delay);
                }
                Err(e) => {
                    error!(
                        "Failed to connect to Redis after {} attempts: {}",
                        attempts, e
                    );
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    /// Set a value with expiration time
    pub async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        expiry_seconds: u64,
    ) -> Result<(), InfrastructureError> {
        debug!("Setting key '{}' with expiry {}s", key, expiry_seconds);

        self.execute_with_retry(|mut conn| {
            let key = key.to_string();
            let value = value.to_string();
            let expiry = expiry_seconds;
            Box::pin(async move { conn.set_ex::<_, _, ()>(key, value, expiry).await })
        })
        .await
        .map_err(|e| {
            error!("Failed to set key '{}': {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// Get a value, `None` if not found
    pub async fn get(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        debug!("Getting key '{}'", key);

        let value = self
            .execute_with_retry(|mut conn| {
                let key = key.to_string();
                Box::pin(async move { conn.get::<_, Option<String>>(key).await })
            })
            .await
            .map_err(|e| {
                error!("Failed to get key '{}': {}", key, e);
                InfrastructureError::Cache(e)
            })?;

        if value.is_none() {
            debug!("Key '{}' not found", key);
        }
        Ok(value)
    }

    /// Delete a key. True if something was deleted.
    pub async fn delete(&self, key: &str) -> Result<bool, InfrastructureError> {
        debug!("Deleting key '{}'", key);

        let deleted_count = self
            .execute_with_retry(|mut conn| {
                let key = key.to_string();
                Box::pin(async move { conn.del::<_, u32>(key).await })
            })
            .await
            .map_err(|e| {
                error!("Failed to delete key '{}': {}", key, e);
                InfrastructureError::Cache(e)
            })?;

        Ok(deleted_count > 0)
    }

    /// Increment a counter, keeping any TTL it has
    pub async fn increment(&self, key: &str) -> Result<i64, InfrastructureError> {
        debug!("Incrementing counter '{}'", key);

        self.execute_with_retry(|mut conn| {
            let key = key.to_string();
            Box::pin(async move { conn.incr::<_, _, i64>(key, 1).await })
        })
        .await
        .map_err(|e| {
            error!("Failed to increment counter '{}': {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// Increment a counter and set its expiry if it has none, atomically
    pub async fn increment_in_window(
        &self,
        key: &str,
        window_seconds: u64,
    ) -> Result<i64, InfrastructureError> {
        let count = self
            .execute_with_retry(|mut conn| {
                let key = key.to_string();
                let window = window_seconds;
                Box::pin(async move {
                    let script = redis::Script::new(INCREMENT_IN_WINDOW_SCRIPT);
                    let count: i64 = script.key(key).arg(window).invoke_async(&mut conn).await?;
                    Ok(count)
                })
            })
            .await
            .map_err(|e| {
                error!("Failed to increment window counter '{}': {}", key, e);
                InfrastructureError::Cache(e)
            })?;

        debug!("Counter '{}' incremented to {}", key, count);
        Ok(count)
    }

    /// Set an expiry on a key that has none
    pub async fn expire_if_unset(
        &self,
        key: &str,
        expiry_seconds: u64,
    ) -> Result<bool, InfrastructureError> {
        let applied = self
            .execute_with_retry(|mut conn| {
                let key = key.to_string();
                let expiry = expiry_seconds;
                Box::pin(async move {
                    let script = redis::Script::new(EXPIRE_IF_UNSET_SCRIPT);
                    let applied: i64 = script.key(key).arg(expiry).invoke_async(&mut conn).await?;
                    Ok(applied)
                })
            })
            .await
            .map_err(|e| {
                error!("Failed to set expiry on '{}': {}", key, e);
                InfrastructureError::Cache(e)
            })?;

        Ok(applied == 1)
    }

    /// Raw TTL: seconds left, -1 without expiry, -2 when absent
    pub async fn ttl(&self, key: &str) -> Result<i64, InfrastructureError> {
        self.execute_with_retry(|mut conn| {
            let key = key.to_string();
            Box::pin(async move { conn.ttl::<_, i64>(key).await })
        })
        .await
        .map_err(|e| {
            error!("Failed to get TTL for key '{}': {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// Check if the Redis connection is healthy with a PING
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        debug!("Performing Redis health check");

        let result = self
            .execute_with_retry(|mut conn| {
                Box::pin(async move { redis::cmd("PING").query_async::<_, String>(&mut conn).await })
            })
            .await;

        match result {
            Ok(response) if response == "PONG" => Ok(true),
            Ok(response) => {
                warn!("Redis health check returned unexpected response: {}", response);
                Ok(false)
            }
            Err(e) => {
                error!("Redis health check failed: {}", e);
                Err(InfrastructureError::Cache(e))
            }
        }
    }

    /// Execute a Redis operation with exponential backoff on transient errors
    async fn execute_with_retry<F, T>(&self, operation: F) -> RedisResult<T>
    where
        F: Fn(
            MultiplexedConnection,
        ) -> std::pin::Pin<Box<dyn std::future::Future<Output = RedisResult<T>> + Send>>,
    {
        let mut attempts = 0;
        let mut delay = self.retry_delay_ms;

        loop {
            attempts += 1;
            let conn = self.connection.clone();

            match operation(conn).await {
                Ok(result) => return Ok(result),
                Err(e) if attempts < self.max_retries && is_retriable_error(&e) => {
                    warn!(
                        "Redis operation failed (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, self.max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = next_delay(delay);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

pub(crate) fn next_delay(delay_ms: u64) -> u64 {
    delay_ms.saturating_mul(2).min(MAX_RETRY_DELAY_MS)
}

/// Whether an error is transient and the operation should be retried
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Mask credentials in a Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    if let (Some(at_pos), Some(proto_end)) = (url.rfind('@'), url.find("://")) {
        if at_pos > proto_end {
            return format!("{}****{}", &url[..proto_end + 3], &url[at_pos..]);
        }
    }
    url.to_string()
}
