//! Domain-specific error types and error handling.

use std::fmt;

use thiserror::Error;

/// Failures talking to the shared key-value store
///
/// These never describe a passcode outcome; callers surface them as a
/// retryable infrastructure failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("stored value could not be decoded: {0}")]
    Serialization(String),

    #[error("store backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Which identity a rate limit denial applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitScope {
    Ip,
    Owner,
}

impl RateLimitScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateLimitScope::Ip => "ip",
            RateLimitScope::Owner => "user",
        }
    }
}

impl fmt::Display for RateLimitScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core domain errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Too many requests for {scope}: limit {limit} per {window_seconds}s")]
    RateLimited {
        scope: RateLimitScope,
        limit: u32,
        window_seconds: u64,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    /// Whether the caller may retry the same request unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(self, DomainError::Store(_))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Store(StoreError::Serialization(err.to_string()))
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests;
