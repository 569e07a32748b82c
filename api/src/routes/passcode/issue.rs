use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use passcode_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::{IssuePasscodeRequest, IssuePasscodeResponse};
use crate::handlers::ApiError;
use crate::middleware::{extract_client_ip, request_id};

/// Handler for POST /api/v1/passcode/issue
///
/// Issues a passcode for integrations that do not go through the message
/// entry point. An owner who already holds an active passcode gets it back
/// with `reused: true`.
///
/// ## Errors
/// - 400 Bad Request: missing or oversized owner id
/// - 429 Too Many Requests: IP or owner over its ceiling
/// - 503 Service Unavailable: store failure, safe to retry
pub async fn issue_passcode(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<IssuePasscodeRequest>,
) -> Result<HttpResponse, ApiError> {
    request.validate()?;

    let owner_id = request.owner_id.trim();
    let ip = extract_client_ip(&req);
    state
        .passcode_service
        .gate()
        .admit(ip.as_deref(), Some(owner_id))
        .await?;

    let trigger = request
        .trigger
        .as_deref()
        .map(str::trim)
        .filter(|trigger| !trigger.is_empty())
        .unwrap_or(&state.default_trigger);

    let issued = state.passcode_service.issue(owner_id, trigger).await?;
    let expires_in = issued.expires_in_at(state.passcode_service.now());

    let message = if issued.reused {
        "passcode reused"
    } else {
        "passcode issued"
    };
    let response = IssuePasscodeResponse {
        passcode: issued.code,
        expires_in,
        reused: issued.reused,
    };

    Ok(HttpResponse::Ok().json(
        ApiResponse::success_with_message(message, response).with_request_id(request_id(&req)),
    ))
}
