//! Client address resolution for rate gating

use actix_web::HttpRequest;

/// Best-effort client IP for the request
///
/// Looks at the first `X-Forwarded-For` entry, then `X-Real-IP`, then the
/// socket peer. Empty values and `unknown` are skipped; `None` means no
/// usable address, in which case IP gating is bypassed.
pub fn extract_client_ip(req: &HttpRequest) -> Option<String> {
    let forwarded = header_value(req, "X-Forwarded-For")
        .and_then(|value| value.split(',').next().map(str::to_string));

    forwarded
        .and_then(usable)
        .or_else(|| header_value(req, "X-Real-IP").and_then(usable))
        .or_else(|| {
            req.peer_addr()
                .map(|addr| addr.ip().to_string())
                .and_then(usable)
        })
}

fn header_value(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn usable(candidate: String) -> Option<String> {
    let trimmed = candidate.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("unknown") {
        None
    } else {
        Some(trimmed.to_string())
    }
}
