//! Unit tests for message routing

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use crate::errors::{DomainError, StoreError};
use crate::repositories::store::InMemoryStore;
use crate::services::clock::ManualClock;
use crate::services::message::{KeywordLookup, MessageOutcome, MessageRouter, StaticKeywords};
use crate::services::passcode::{PasscodeService, PasscodeServiceConfig};
use crate::services::rate_limit::RateLimitPolicy;

struct Fixture {
    store: Arc<InMemoryStore>,
    clock: Arc<ManualClock>,
    router: MessageRouter<InMemoryStore>,
}

fn fixture(policy: RateLimitPolicy) -> Fixture {
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()));
    let store = Arc::new(InMemoryStore::with_clock(clock.clone()));
    let service = Arc::new(
        PasscodeService::new(store.clone(), PasscodeServiceConfig::default(), policy)
            .with_clock(clock.clone()),
    );
    let keywords = StaticKeywords::new().with_entry("plugin", "Plugin download: https://example.com/plugin");
    let router = MessageRouter::new(
        service,
        Arc::new(keywords),
        vec!["passcode".to_string(), " 口令 ".to_string(), "".to_string()],
    );
    Fixture {
        store,
        clock,
        router,
    }
}

fn generous() -> RateLimitPolicy {
    RateLimitPolicy {
        per_ip: 100,
        per_owner: 100,
        window_seconds: 60,
    }
}

#[tokio::test]
async fn test_trigger_issues_passcode() {
    let f = fixture(generous());

    let outcome = f.router.handle_text("u1", "  passcode ", None).await.unwrap();
    match outcome {
        MessageOutcome::PasscodeIssued { code, ttl_seconds } => {
            assert_eq!(code.len(), 6);
            assert_eq!(ttl_seconds, 300);
        }
        other => panic!("Expected issued passcode, got {:?}", other),
    }
}

#[tokio::test]
async fn test_alternate_trigger() {
    let f = fixture(generous());
    assert!(f.router.is_trigger("口令"));
    assert!(matches!(
        f.router.handle_text("u1", "口令", None).await.unwrap(),
        MessageOutcome::PasscodeIssued { .. }
    ));
}

#[tokio::test]
async fn test_second_trigger_returns_existing() {
    let f = fixture(generous());

    let first = f.router.handle_text("u1", "passcode", None).await.unwrap();
    f.clock.advance_seconds(120);
    let second = f.router.handle_text("u1", "passcode", None).await.unwrap();

    let first_code = match first {
        MessageOutcome::PasscodeIssued { code, .. } => code,
        other => panic!("Expected issued passcode, got {:?}", other),
    };
    match second {
        MessageOutcome::ExistingPasscode { code, ttl_seconds } => {
            assert_eq!(code, first_code);
            assert_eq!(ttl_seconds, 180);
        }
        other => panic!("Expected existing passcode, got {:?}", other),
    }
}

#[tokio::test]
async fn test_keyword_reply() {
    let f = fixture(generous());
    assert_eq!(
        f.router.handle_text("u1", "plugin", None).await.unwrap(),
        MessageOutcome::KeywordReply {
            text: "Plugin download: https://example.com/plugin".to_string()
        }
    );
}

#[tokio::test]
async fn test_help_and_fallback() {
    let f = fixture(generous());

    assert_eq!(
        f.router.handle_text("u1", "HELP me", None).await.unwrap(),
        MessageOutcome::Help {
            trigger: "passcode".to_string()
        }
    );
    assert_eq!(
        f.router.handle_text("u1", "I want a passcode please", None).await.unwrap(),
        MessageOutcome::TriggerHint {
            trigger: "passcode".to_string()
        }
    );
    assert_eq!(
        f.router.handle_text("u1", "hello", None).await.unwrap(),
        MessageOutcome::Unrecognized {
            trigger: "passcode".to_string()
        }
    );
}

#[tokio::test]
async fn test_owner_rate_limit_stops_issuance() {
    let f = fixture(RateLimitPolicy {
        per_ip: 100,
        per_owner: 3,
        window_seconds: 60,
    });

    for _ in 0..3 {
        f.router.handle_text("u1", "hello", None).await.unwrap();
    }
    f.store.clear_operations();

    let outcome = f.router.handle_text("u1", "passcode", None).await.unwrap();
    assert_eq!(outcome, MessageOutcome::RateLimited);
    assert!(f.store.operations().iter().all(|op| !op.is_write()));
    assert!(!f.store.contains_key("user_passcode:u1"));
}

#[tokio::test]
async fn test_ip_rate_limit() {
    let f = fixture(RateLimitPolicy {
        per_ip: 1,
        per_owner: 100,
        window_seconds: 60,
    });

    f.router.handle_text("u1", "hello", Some("10.0.0.1")).await.unwrap();
    assert_eq!(
        f.router.handle_text("u2", "hello", Some("10.0.0.1")).await.unwrap(),
        MessageOutcome::RateLimited
    );
}

#[tokio::test]
async fn test_empty_owner_rejected() {
    let f = fixture(generous());
    assert!(matches!(
        f.router.handle_text(" ", "passcode", None).await,
        Err(DomainError::Validation { .. })
    ));
}

#[tokio::test]
async fn test_store_failure_propagates() {
    let f = fixture(generous());
    f.store.fail_with(Some(StoreError::Unavailable("down".to_string())));
    let err = f.router.handle_text("u1", "passcode", None).await.unwrap_err();
    assert!(err.is_retryable());
}

#[test]
fn test_static_keywords() {
    let keywords = StaticKeywords::new().with_entry("a", "b");
    assert!(keywords.matches("a"));
    assert!(!keywords.matches("A"));
    assert_eq!(keywords.lookup("a"), Some("b".to_string()));
    assert_eq!(keywords.len(), 1);
}

#[test]
fn test_reply_text_mentions_code_and_minutes() {
    let text = MessageOutcome::PasscodeIssued {
        code: "AB12CD".to_string(),
        ttl_seconds: 300,
    }
    .reply_text();
    assert!(text.contains("AB12CD"));
    assert!(text.contains("5 minute"));

    let text = MessageOutcome::ExistingPasscode {
        code: "AB12CD".to_string(),
        ttl_seconds: 30,
    }
    .reply_text();
    assert!(text.contains("1 minute"));
}
