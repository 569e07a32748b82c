use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use passcode_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::{VerifyPasscodeRequest, VerifyPasscodeResponse};
use crate::handlers::ApiError;
use crate::middleware::{extract_client_ip, request_id};

/// Handler for POST /api/v1/passcode/verify
///
/// Consumes a passcode. The client IP is gated first, then `open_id` when
/// present.
///
/// # Request Body
///
/// ```json
/// {
///     "passcode": "AB12CD",
///     "open_id": "optional-owner-id"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "success": true,
///     "message": "passcode verified",
///     "data": {
///         "valid": true,
///         "message": "passcode verified",
///         "expires_at": "2024-05-01T12:05:00Z"
///     },
///     "timestamp": "2024-05-01T12:01:00Z",
///     "request_id": "..."
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: malformed, unknown, used or expired passcode
/// - 429 Too Many Requests: IP or owner over its ceiling
/// - 503 Service Unavailable: store failure, safe to retry
pub async fn verify_passcode(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<VerifyPasscodeRequest>,
) -> Result<HttpResponse, ApiError> {
    request.validate()?;

    let ip = extract_client_ip(&req);
    let owner = request
        .open_id
        .as_deref()
        .map(str::trim)
        .filter(|owner| !owner.is_empty());

    state
        .passcode_service
        .gate()
        .admit(ip.as_deref(), owner)
        .await?;

    let result = state
        .passcode_service
        .verify(request.passcode.trim(), owner)
        .await?;

    if !result.valid {
        return Err(ApiError::Rejected(result.outcome));
    }

    let response = VerifyPasscodeResponse {
        valid: result.valid,
        message: result.message.clone(),
        expires_at: result.expires_at,
    };

    Ok(HttpResponse::Ok().json(
        ApiResponse::success_with_message(result.message, response)
            .with_request_id(request_id(&req)),
    ))
}
