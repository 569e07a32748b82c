//! Outcome of a passcode verification
//!
//! Every failure is a first-class outcome rather than an error, so callers can
//! tell a mistyped code from an expired or replayed one. Store failures are
//! not represented here; they surface as `DomainError::Store`.

use chrono::{DateTime, Utc};
use passcode_shared::error_codes;
use serde::{Deserialize, Serialize};

/// Distinct verification outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyOutcome {
    Verified,
    InvalidFormat,
    NotFound,
    AlreadyUsed,
    Expired,
}

impl VerifyOutcome {
    /// Short user-facing message
    pub fn message(&self) -> &'static str {
        match self {
            VerifyOutcome::Verified => "passcode verified",
            VerifyOutcome::InvalidFormat => "passcode format invalid",
            VerifyOutcome::NotFound => "passcode not found or expired",
            VerifyOutcome::AlreadyUsed => "passcode already used",
            VerifyOutcome::Expired => "passcode expired",
        }
    }

    /// Machine-checkable error code, `None` on success
    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            VerifyOutcome::Verified => None,
            VerifyOutcome::InvalidFormat => Some(error_codes::PASSCODE_FORMAT_INVALID),
            VerifyOutcome::NotFound => Some(error_codes::PASSCODE_NOT_FOUND),
            VerifyOutcome::AlreadyUsed => Some(error_codes::PASSCODE_ALREADY_USED),
            VerifyOutcome::Expired => Some(error_codes::PASSCODE_EXPIRED),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, VerifyOutcome::Verified)
    }
}

/// Result of verifying a passcode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResult {
    /// Whether the passcode was accepted
    pub valid: bool,

    /// Which outcome was reached
    pub outcome: VerifyOutcome,

    /// Human-readable message for the outcome
    pub message: String,

    /// Expiry of the consumed passcode (success only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl VerifyResult {
    /// Successful verification of a passcode that expired at `expires_at`
    pub fn verified(expires_at: DateTime<Utc>) -> Self {
        Self {
            valid: true,
            outcome: VerifyOutcome::Verified,
            message: VerifyOutcome::Verified.message().to_string(),
            expires_at: Some(expires_at),
        }
    }

    /// Failed verification
    pub fn rejected(outcome: VerifyOutcome) -> Self {
        Self {
            valid: outcome.is_success(),
            outcome,
            message: outcome.message().to_string(),
            expires_at: None,
        }
    }
}
