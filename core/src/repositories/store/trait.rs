//! Key-value store seam used by the passcode engine and the rate limiter

use async_trait::async_trait;

use crate::errors::StoreResult;

/// `remaining_ttl` value for a key that exists without an expiry
pub const TTL_NO_EXPIRY: i64 = -1;

/// `remaining_ttl` value for a key that does not exist
pub const TTL_ABSENT: i64 = -2;

/// String-keyed store with per-key TTL
///
/// Every operation is atomic on its own key. Nothing in the engine needs
/// multi-key transactions.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value and TTL
    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> StoreResult<()>;

    /// Fetch the value, `None` when absent or expired
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Remove the key. Returns whether something was deleted.
    async fn delete(&self, key: &str) -> StoreResult<bool>;

    /// Add one to the integer under `key` (absent counts as 0), keeping its TTL
    async fn increment(&self, key: &str) -> StoreResult<i64>;

    /// Attach a TTL only when the key exists and has none. Returns whether it was set.
    async fn set_ttl_if_unset(&self, key: &str, ttl_seconds: u64) -> StoreResult<bool>;

    /// Seconds left, [`TTL_NO_EXPIRY`] or [`TTL_ABSENT`]
    async fn remaining_ttl(&self, key: &str) -> StoreResult<i64>;

    /// Increment a fixed-window counter, opening the window on the first hit
    ///
    /// The default runs two separate commands, so two concurrent first hits
    /// can interleave. Backends with server-side scripting should override it
    /// with a single atomic step.
    async fn increment_in_window(&self, key: &str, window_seconds: u64) -> StoreResult<i64> {
        let count = self.increment(key).await?;
        if count == 1 {
            self.set_ttl_if_unset(key, window_seconds).await?;
        }
        Ok(count)
    }

    /// Check that the backend answers
    async fn health_check(&self) -> StoreResult<bool> {
        Ok(true)
    }
}
