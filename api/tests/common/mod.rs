//! Shared fixtures for HTTP tests
#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use chrono::{DateTime, TimeZone, Utc};

use passcode_api::AppState;
use passcode_core::{
    InMemoryStore, KeyValueStore, ManualClock, PasscodeService, PasscodeServiceConfig,
    RateLimitPolicy, StaticKeywords,
};

pub const MAX_PAYLOAD: usize = 64 * 1024;

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub struct TestContext {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<ManualClock>,
    pub state: web::Data<AppState>,
}

pub fn context() -> TestContext {
    context_with_policy(RateLimitPolicy::default())
}

pub fn context_with_policy(policy: RateLimitPolicy) -> TestContext {
    let clock = Arc::new(ManualClock::new(start_time()));
    let store = Arc::new(InMemoryStore::with_clock(clock.clone()));
    let shared: Arc<dyn KeyValueStore> = store.clone();

    let service = PasscodeService::new(shared, PasscodeServiceConfig::default(), policy)
        .with_clock(clock.clone());
    let keywords = Arc::new(
        StaticKeywords::new().with_entry("hours", "We are open 9:00-18:00 on weekdays."),
    );
    let state = web::Data::new(AppState::from_service(
        service,
        keywords,
        vec!["passcode".to_string()],
    ));

    TestContext {
        store,
        clock,
        state,
    }
}
