use actix_web::{web, HttpRequest, HttpResponse};

use passcode_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::PasscodeStatusResponse;
use crate::handlers::ApiError;
use crate::middleware::{extract_client_ip, request_id};

/// Handler for GET /api/v1/passcode/status/{code}
///
/// Reports a passcode's state without consuming it.
pub async fn passcode_status(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let ip = extract_client_ip(&req);
    state
        .passcode_service
        .gate()
        .admit(ip.as_deref(), None)
        .await?;

    let code = path.into_inner();
    let record = state
        .passcode_service
        .passcode_info(code.trim())
        .await?
        .ok_or_else(|| ApiError::NotFound("passcode not found".to_string()))?;

    let status = PasscodeStatusResponse {
        exists: true,
        expired: record.is_expired_at(state.passcode_service.now()),
        used: record.used,
        created_at: record.created_at,
        expires_at: record.expires_at,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(status).with_request_id(request_id(&req))))
}
