//! HTTP tests for the passcode routes

mod common;

use actix_web::{http::header, http::StatusCode, test};
use serde_json::{json, Value};

use passcode_api::create_app;
use passcode_core::{keys, KeyValueStore, PasscodeRecord, RateLimitPolicy, StoreError};
use passcode_shared::CorsConfig;

use common::{context, context_with_policy, MAX_PAYLOAD};

macro_rules! init_app {
    ($ctx:expr) => {
        test::init_service(create_app(
            $ctx.state.clone(),
            &CorsConfig::development(),
            MAX_PAYLOAD,
        ))
        .await
    };
}

#[actix_web::test]
async fn test_issue_then_verify_once() {
    let ctx = context();
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/passcode/issue")
        .set_json(json!({ "owner_id": "user-0001" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("passcode issued"));
    let code = body["data"]["passcode"].as_str().unwrap().to_string();
    assert_eq!(code.len(), 6);
    assert_eq!(body["data"]["expires_in"], json!(300));
    assert_eq!(body["data"]["reused"], json!(false));

    let req = test::TestRequest::post()
        .uri("/api/v1/passcode/verify")
        .insert_header(("X-Request-ID", "req-verify-1"))
        .set_json(json!({ "passcode": code }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["request_id"], json!("req-verify-1"));
    assert_eq!(body["message"], json!("passcode verified"));
    assert_eq!(body["data"]["valid"], json!(true));
    assert!(body["data"]["expires_at"].is_string());

    // consumed: the second attempt fails
    let req = test::TestRequest::post()
        .uri("/api/v1/passcode/verify")
        .set_json(json!({ "passcode": code }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("PASSCODE_NOT_FOUND"));
    assert_eq!(body["details"]["valid"], json!(false));
}

#[actix_web::test]
async fn test_issue_returns_active_code_to_same_owner() {
    let ctx = context();
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/passcode/issue")
        .set_json(json!({ "owner_id": "user-0001", "trigger": "passcode" }))
        .to_request();
    let first: Value = test::read_body_json(test::call_service(&app, req).await).await;

    ctx.clock.advance_seconds(100);

    let req = test::TestRequest::post()
        .uri("/api/v1/passcode/issue")
        .set_json(json!({ "owner_id": "user-0001" }))
        .to_request();
    let second: Value = test::read_body_json(test::call_service(&app, req).await).await;

    assert_eq!(first["data"]["passcode"], second["data"]["passcode"]);
    assert_eq!(second["message"], json!("passcode reused"));
    assert_eq!(second["data"]["reused"], json!(true));
    assert_eq!(second["data"]["expires_in"], json!(200));
}

#[actix_web::test]
async fn test_verify_rejects_malformed_code() {
    let ctx = context();
    let app = init_app!(ctx);

    for bad in ["ab12cd", "AB1", "ABCDEFGHIJK", "AB-12C"] {
        let req = test::TestRequest::post()
            .uri("/api/v1/passcode/verify")
            .set_json(json!({ "passcode": bad }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", bad);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], json!("PASSCODE_FORMAT_INVALID"), "{}", bad);
    }
}

#[actix_web::test]
async fn test_verify_expired_record() {
    let ctx = context();
    let app = init_app!(ctx);

    // record says expired while the store entry is still alive
    let record = PasscodeRecord::create("user-0001", "passcode", common::start_time(), 60).unwrap();
    ctx.store
        .set(
            &keys::passcode_key("EXP123"),
            &serde_json::to_string(&record).unwrap(),
            3600,
        )
        .await
        .unwrap();
    ctx.clock.advance_seconds(61);

    let req = test::TestRequest::post()
        .uri("/api/v1/passcode/verify")
        .set_json(json!({ "passcode": "EXP123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("PASSCODE_EXPIRED"));

    // the stale entry is cleaned up
    assert!(!ctx.store.contains_key(&keys::passcode_key("EXP123")));
}

#[actix_web::test]
async fn test_verify_with_other_owner_still_succeeds() {
    let ctx = context();
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/passcode/issue")
        .set_json(json!({ "owner_id": "user-0001" }))
        .to_request();
    let issued: Value = test::read_body_json(test::call_service(&app, req).await).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/passcode/verify")
        .set_json(json!({ "passcode": issued["data"]["passcode"], "open_id": "user-0002" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_verify_rate_limited_per_ip() {
    let ctx = context_with_policy(RateLimitPolicy {
        per_ip: 2,
        per_owner: 3,
        window_seconds: 60,
    });
    let app = init_app!(ctx);

    let verify = || {
        test::TestRequest::post()
            .uri("/api/v1/passcode/verify")
            .insert_header(("X-Forwarded-For", "203.0.113.7"))
            .set_json(json!({ "passcode": "ZZZZZZ" }))
            .to_request()
    };

    for _ in 0..2 {
        let resp = test::call_service(&app, verify()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    let resp = test::call_service(&app, verify()).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(resp.headers().get(header::RETRY_AFTER).unwrap(), "60");
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("RATE_LIMIT_EXCEEDED"));
    assert_eq!(body["details"]["scope"], json!("ip"));

    // a fresh window admits again
    ctx.clock.advance_seconds(60);
    let resp = test::call_service(&app, verify()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_issue_rate_limited_per_owner() {
    let ctx = context();
    let app = init_app!(ctx);

    for _ in 0..3 {
        let req = test::TestRequest::post()
            .uri("/api/v1/passcode/issue")
            .set_json(json!({ "owner_id": "user-0001" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    let req = test::TestRequest::post()
        .uri("/api/v1/passcode/issue")
        .set_json(json!({ "owner_id": "user-0001" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["details"]["scope"], json!("user"));
}

#[actix_web::test]
async fn test_issue_validation_error() {
    let ctx = context();
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/passcode/issue")
        .set_json(json!({ "owner_id": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("VALIDATION_ERROR"));
    assert!(body["details"]["validation_errors"]["owner_id"].is_array());
}

#[actix_web::test]
async fn test_store_failure_is_503_not_rejection() {
    let ctx = context();
    let app = init_app!(ctx);
    ctx.store
        .fail_with(Some(StoreError::Unavailable("connection refused".to_string())));

    let req = test::TestRequest::post()
        .uri("/api/v1/passcode/verify")
        .set_json(json!({ "passcode": "AB12CD", "open_id": "user-0001" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("STORE_UNAVAILABLE"));
    assert_eq!(body["details"]["retryable"], json!(true));
}

#[actix_web::test]
async fn test_status_reports_without_consuming() {
    let ctx = context();
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/passcode/issue")
        .set_json(json!({ "owner_id": "user-0001" }))
        .to_request();
    let issued: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let code = issued["data"]["passcode"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/passcode/status/{}", code))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert!(body["request_id"].is_string());
    assert_eq!(body["data"]["exists"], json!(true));
    assert_eq!(body["data"]["used"], json!(false));
    assert_eq!(body["data"]["expired"], json!(false));

    // still verifiable afterwards
    let req = test::TestRequest::post()
        .uri("/api/v1/passcode/verify")
        .set_json(json!({ "passcode": code }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_status_unknown_code_is_404() {
    let ctx = context();
    let app = init_app!(ctx);

    for code in ["NOPE42", "bad!"] {
        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/passcode/status/{}", code))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", code);
    }
}

#[actix_web::test]
async fn test_unknown_route_is_404() {
    let ctx = context();
    let app = init_app!(ctx);

    let req = test::TestRequest::get().uri("/api/v2/nothing").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("NOT_FOUND"));
}

#[actix_web::test]
async fn test_health_reflects_store() {
    let ctx = context();
    let app = init_app!(ctx);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["services"]["store"]["status"], json!("healthy"));

    ctx.store
        .fail_with(Some(StoreError::Unavailable("down".to_string())));
    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], json!("unhealthy"));
}
