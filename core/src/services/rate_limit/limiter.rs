//! Fixed-window counter on top of the key-value store

use std::sync::Arc;

use crate::errors::{StoreError, StoreResult};
use crate::repositories::store::{keys, KeyValueStore};

/// Counts requests per limit key inside a window opened by the first hit
///
/// Counters are never reset explicitly; the window key simply expires.
/// Bursts across a window boundary are allowed.
pub struct FixedWindowRateLimiter<S: KeyValueStore + ?Sized> {
    store: Arc<S>,
}

impl<S: KeyValueStore + ?Sized> FixedWindowRateLimiter<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Consume one request for `limit_key` if the window has room
    ///
    /// A denied request is not counted.
    pub async fn check_and_consume(
        &self,
        limit_key: &str,
        max_requests: u32,
        window_seconds: u64,
    ) -> StoreResult<bool> {
        let key = keys::rate_limit_key(limit_key);

        let current = match self.store.get(&key).await? {
            Some(raw) => raw.trim().parse::<i64>().map_err(|_| {
                StoreError::Serialization(format!("rate counter {} is not an integer", key))
            })?,
            None => 0,
        };

        if current >= i64::from(max_requests) {
            tracing::warn!(
                limit_key = limit_key,
                count = current,
                limit = max_requests,
                event = "rate_limit_exceeded",
                "Request rate limit exceeded"
            );
            return Ok(false);
        }

        let count = self.store.increment_in_window(&key, window_seconds).await?;
        tracing::debug!(
            limit_key = limit_key,
            count = count,
            limit = max_requests,
            "Rate window incremented"
        );
        Ok(true)
    }
}
