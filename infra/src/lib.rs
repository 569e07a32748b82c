//! # Infrastructure Layer
//!
//! Concrete implementations of the seams defined in `passcode_core`:
//!
//! - **Cache**: Redis client with retry logic and the Redis-backed
//!   [`KeyValueStore`](passcode_core::KeyValueStore)
//! - **Keywords**: keyword registry refreshed from remote mirrors over HTTP

use passcode_core::StoreError;

/// Cache module - Redis client and store adapter
pub mod cache;

/// Keyword module - remote keyword mapping with mirror fallback
pub mod keywords;

pub use cache::{RedisClient, RedisKeyValueStore};
pub use keywords::KeywordRegistry;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Payload could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Keyword source error
    #[error("Keyword source error: {0}")]
    KeywordSource(String),
}

impl From<InfrastructureError> for StoreError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Cache(e)
                if e.is_io_error()
                    || e.is_connection_refusal()
                    || e.is_connection_dropped()
                    || e.is_timeout() =>
            {
                StoreError::Unavailable(e.to_string())
            }
            InfrastructureError::Cache(e) if e.kind() == redis::ErrorKind::TypeError => {
                StoreError::Serialization(e.to_string())
            }
            InfrastructureError::Serialization(e) => StoreError::Serialization(e.to_string()),
            other => StoreError::Backend(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_failure_maps_to_unavailable() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = InfrastructureError::Cache(redis::RedisError::from(io));
        assert!(matches!(StoreError::from(err), StoreError::Unavailable(_)));
    }

    #[test]
    fn test_type_error_maps_to_serialization() {
        let redis_err = redis::RedisError::from((redis::ErrorKind::TypeError, "not an integer"));
        let err = InfrastructureError::Cache(redis_err);
        assert!(matches!(StoreError::from(err), StoreError::Serialization(_)));
    }

    #[test]
    fn test_config_error_maps_to_backend() {
        let err = InfrastructureError::Config("bad url".to_string());
        assert_eq!(
            StoreError::from(err),
            StoreError::Backend("Configuration error: bad url".to_string())
        );
    }
}
