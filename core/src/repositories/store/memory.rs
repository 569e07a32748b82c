//! In-process implementation of [`KeyValueStore`]
//!
//! Expiry follows the injected [`Clock`], so tests can move time forward and
//! watch keys and rate windows lapse. Every call is recorded, which lets tests
//! assert that a code path never touched the store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::errors::{StoreError, StoreResult};
use crate::services::clock::{Clock, SystemClock};

use super::r#trait::{KeyValueStore, TTL_ABSENT, TTL_NO_EXPIRY};

/// A store call as seen by [`InMemoryStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOperation {
    Set { key: String, ttl_seconds: u64 },
    Get { key: String },
    Delete { key: String },
    Increment { key: String },
    IncrementInWindow { key: String, window_seconds: u64 },
    SetTtlIfUnset { key: String, ttl_seconds: u64 },
    RemainingTtl { key: String },
    HealthCheck,
}

impl StoreOperation {
    /// Whether the call can change stored state
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            StoreOperation::Set { .. }
                | StoreOperation::Delete { .. }
                | StoreOperation::Increment { .. }
                | StoreOperation::IncrementInWindow { .. }
                | StoreOperation::SetTtlIfUnset { .. }
        )
    }
}

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl Entry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(false, |at| now >= at)
    }
}

/// TTL-aware map guarded by a mutex
pub struct InMemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
    operations: Mutex<Vec<StoreOperation>>,
    failure: Mutex<Option<StoreError>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            operations: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
            clock,
        }
    }

    /// Make every following call fail with `error` (`None` restores service)
    pub fn fail_with(&self, error: Option<StoreError>) {
        *lock(&self.failure) = error;
    }

    /// Calls recorded so far
    pub fn operations(&self) -> Vec<StoreOperation> {
        lock(&self.operations).clone()
    }

    pub fn operation_count(&self) -> usize {
        lock(&self.operations).len()
    }

    pub fn clear_operations(&self) {
        lock(&self.operations).clear();
    }

    /// Peek at a live key without recording an operation
    pub fn contains_key(&self, key: &str) -> bool {
        let now = self.clock.now();
        lock(&self.entries)
            .get(key)
            .map_or(false, |entry| !entry.is_expired(now))
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        let now = self.clock.now();
        lock(&self.entries)
            .values()
            .filter(|entry| !entry.is_expired(now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn begin(&self, op: StoreOperation) -> StoreResult<()> {
        lock(&self.operations).push(op);
        match lock(&self.failure).as_ref() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Entries with expired keys already purged
    fn live_entries(&self) -> (MutexGuard<'_, HashMap<String, Entry>>, DateTime<Utc>) {
        let now = self.clock.now();
        let mut entries = lock(&self.entries);
        entries.retain(|_, entry| !entry.is_expired(now));
        (entries, now)
    }

    fn increment_locked(entries: &mut HashMap<String, Entry>, key: &str) -> StoreResult<i64> {
        let entry = entries.entry(key.to_string()).or_insert_with(|| Entry {
            value: "0".to_string(),
            expires_at: None,
        });
        let current: i64 = entry
            .value
            .parse()
            .map_err(|_| StoreError::Backend(format!("value at {} is not an integer", key)))?;
        let next = current + 1;
        entry.value = next.to_string();
        Ok(next)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn expiry(now: DateTime<Utc>, ttl_seconds: u64) -> StoreResult<DateTime<Utc>> {
    if ttl_seconds == 0 {
        return Err(StoreError::Backend("invalid expire time".to_string()));
    }
    i64::try_from(ttl_seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| StoreError::Backend("expire time out of range".to_string()))
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> StoreResult<()> {
        self.begin(StoreOperation::Set {
            key: key.to_string(),
            ttl_seconds,
        })?;
        let (mut entries, now) = self.live_entries();
        let expires_at = expiry(now, ttl_seconds)?;
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Some(expires_at),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.begin(StoreOperation::Get {
            key: key.to_string(),
        })?;
        let (entries, _) = self.live_entries();
        Ok(entries.get(key).map(|entry| entry.value.clone()))
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        self.begin(StoreOperation::Delete {
            key: key.to_string(),
        })?;
        let (mut entries, _) = self.live_entries();
        Ok(entries.remove(key).is_some())
    }

    async fn increment(&self, key: &str) -> StoreResult<i64> {
        self.begin(StoreOperation::Increment {
            key: key.to_string(),
        })?;
        let (mut entries, _) = self.live_entries();
        Self::increment_locked(&mut entries, key)
    }

    async fn set_ttl_if_unset(&self, key: &str, ttl_seconds: u64) -> StoreResult<bool> {
        self.begin(StoreOperation::SetTtlIfUnset {
            key: key.to_string(),
            ttl_seconds,
        })?;
        let (mut entries, now) = self.live_entries();
        match entries.get_mut(key) {
            Some(entry) if entry.expires_at.is_none() => {
                entry.expires_at = Some(expiry(now, ttl_seconds)?);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn remaining_ttl(&self, key: &str) -> StoreResult<i64> {
        self.begin(StoreOperation::RemainingTtl {
            key: key.to_string(),
        })?;
        let (entries, now) = self.live_entries();
        Ok(match entries.get(key) {
            None => TTL_ABSENT,
            Some(Entry {
                expires_at: None, ..
            }) => TTL_NO_EXPIRY,
            Some(Entry {
                expires_at: Some(at),
                ..
            }) => (*at - now).num_seconds().max(0),
        })
    }

    // One lock covers both steps, so the window opens atomically here.
    async fn increment_in_window(&self, key: &str, window_seconds: u64) -> StoreResult<i64> {
        self.begin(StoreOperation::IncrementInWindow {
            key: key.to_string(),
            window_seconds,
        })?;
        let (mut entries, now) = self.live_entries();
        let count = Self::increment_locked(&mut entries, key)?;
        if let Some(entry) = entries.get_mut(key) {
            if entry.expires_at.is_none() {
                entry.expires_at = Some(expiry(now, window_seconds)?);
            }
        }
        Ok(count)
    }

    async fn health_check(&self) -> StoreResult<bool> {
        self.begin(StoreOperation::HealthCheck)?;
        Ok(true)
    }
}
