//! Result of a passcode issuance

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Passcode handed to an owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedPasscode {
    /// The passcode text
    pub code: String,

    /// When the passcode stops being accepted
    pub expires_at: DateTime<Utc>,

    /// True when the owner's still-active passcode was returned instead of a new one
    pub reused: bool,
}

impl IssuedPasscode {
    /// Seconds left at `now`, never negative
    pub fn expires_in_at(&self, now: DateTime<Utc>) -> u64 {
        (self.expires_at - now).num_seconds().max(0) as u64
    }
}
