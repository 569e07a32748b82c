//! Tests for domain error classification

use crate::errors::{DomainError, RateLimitScope, StoreError};

#[test]
fn test_only_store_failures_are_retryable() {
    let store = DomainError::from(StoreError::Unavailable("connection refused".to_string()));
    assert!(store.is_retryable());

    let validation = DomainError::validation("owner id is required");
    assert!(!validation.is_retryable());

    let limited = DomainError::RateLimited {
        scope: RateLimitScope::Ip,
        limit: 10,
        window_seconds: 60,
    };
    assert!(!limited.is_retryable());

    let internal = DomainError::Internal {
        message: "boom".to_string(),
    };
    assert!(!internal.is_retryable());
}

#[test]
fn test_rate_limited_message_names_scope() {
    let err = DomainError::RateLimited {
        scope: RateLimitScope::Owner,
        limit: 3,
        window_seconds: 60,
    };
    assert_eq!(err.to_string(), "Too many requests for user: limit 3 per 60s");
}

#[test]
fn test_store_error_is_transparent() {
    let err = DomainError::from(StoreError::Backend("WRONGTYPE".to_string()));
    assert_eq!(err.to_string(), "store backend error: WRONGTYPE");
}

#[test]
fn test_json_error_maps_to_serialization() {
    let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    match DomainError::from(json_err) {
        DomainError::Store(StoreError::Serialization(_)) => {}
        other => panic!("Expected serialization error, got {:?}", other),
    }
}
