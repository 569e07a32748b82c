//! Request id propagation for response envelopes

use actix_web::HttpRequest;
use uuid::Uuid;

/// Caller-supplied `X-Request-ID`, or a fresh v4 UUID
pub fn request_id(req: &HttpRequest) -> String {
    req.headers()
        .get("X-Request-ID")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}
