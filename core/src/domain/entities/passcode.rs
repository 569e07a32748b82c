//! Passcode record entity stored under the code index.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One issued passcode
///
/// `used_at` is set exactly when `used` flips to true, and `used` never
/// flips back. Expiry is not stored; it is derived from `expires_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasscodeRecord {
    /// Identity the passcode was issued to
    pub owner_id: String,

    /// Keyword that caused issuance
    pub trigger: String,

    /// Timestamp when the passcode was created
    pub created_at: DateTime<Utc>,

    /// Timestamp after which the passcode is no longer accepted
    pub expires_at: DateTime<Utc>,

    /// Whether the passcode has been consumed
    pub used: bool,

    /// When the passcode was consumed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_at: Option<DateTime<Utc>>,
}

impl PasscodeRecord {
    /// Creates a fresh, unused record valid for `ttl_seconds` from `now`
    ///
    /// A zero TTL is bumped to one second so `expires_at > created_at` holds.
    /// Returns `None` when `now + ttl_seconds` is not a representable time.
    pub fn create(
        owner_id: impl Into<String>,
        trigger: impl Into<String>,
        now: DateTime<Utc>,
        ttl_seconds: u64,
    ) -> Option<Self> {
        let ttl = i64::try_from(ttl_seconds.max(1)).ok()?;
        let expires_at = now.checked_add_signed(Duration::try_seconds(ttl)?)?;
        Some(Self {
            owner_id: owner_id.into(),
            trigger: trigger.into(),
            created_at: now,
            expires_at,
            used: false,
            used_at: None,
        })
    }

    /// Marks the record as consumed. Returns false if it was already used.
    pub fn mark_as_used(&mut self, now: DateTime<Utc>) -> bool {
        if self.used {
            return false;
        }
        self.used = true;
        self.used_at = Some(now);
        true
    }

    /// Strictly after `expires_at`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Neither used nor expired
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        !self.used && !self.is_expired_at(now)
    }

    /// Whole seconds left before expiry, never negative
    pub fn remaining_seconds_at(&self, now: DateTime<Utc>) -> u64 {
        (self.expires_at - now).num_seconds().max(0) as u64
    }
}
