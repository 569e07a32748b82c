//! Redis implementation of the passcode store seam

use async_trait::async_trait;
use passcode_core::{KeyValueStore, StoreResult};

use super::{CacheConfig, RedisClient};
use crate::InfrastructureError;

/// [`KeyValueStore`] over Redis
///
/// Logical keys get the configured namespace prefix. The fixed-window
/// counter runs as one Lua script, so concurrent first hits cannot leave a
/// counter without its expiry.
#[derive(Clone)]
pub struct RedisKeyValueStore {
    client: RedisClient,
    config: CacheConfig,
}

impl RedisKeyValueStore {
    pub fn new(client: RedisClient, config: CacheConfig) -> Self {
        Self { client, config }
    }

    /// Connect using `config`
    pub async fn connect(config: CacheConfig) -> Result<Self, InfrastructureError> {
        let client = RedisClient::new(&config).await?;
        Ok(Self::new(client, config))
    }

    pub fn client(&self) -> &RedisClient {
        &self.client
    }

    fn key(&self, key: &str) -> String {
        self.config.make_key(key)
    }
}

#[async_trait]
impl KeyValueStore for RedisKeyValueStore {
    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> StoreResult<()> {
        Ok(self
            .client
            .set_with_expiry(&self.key(key), value, ttl_seconds)
            .await?)
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.client.get(&self.key(key)).await?)
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        Ok(self.client.delete(&self.key(key)).await?)
    }

    async fn increment(&self, key: &str) -> StoreResult<i64> {
        Ok(self.client.increment(&self.key(key)).await?)
    }

    async fn set_ttl_if_unset(&self, key: &str, ttl_seconds: u64) -> StoreResult<bool> {
        Ok(self
            .client
            .expire_if_unset(&self.key(key), ttl_seconds)
            .await?)
    }

    async fn remaining_ttl(&self, key: &str) -> StoreResult<i64> {
        Ok(self.client.ttl(&self.key(key)).await?)
    }

    async fn increment_in_window(&self, key: &str, window_seconds: u64) -> StoreResult<i64> {
        Ok(self
            .client
            .increment_in_window(&self.key(key), window_seconds)
            .await?)
    }

    async fn health_check(&self) -> StoreResult<bool> {
        Ok(self.client.health_check().await?)
    }
}
