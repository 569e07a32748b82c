use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use passcode_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::{MessageRequest, MessageResponse};
use crate::handlers::ApiError;
use crate::middleware::{extract_client_ip, request_id};

/// Handler for POST /api/v1/message
///
/// Platform-neutral entry point for inbound text messages. Rate denials come
/// back as a `rate_limited` outcome with a reply text, not as a 429, so a
/// messaging bridge can forward the reply unchanged.
///
/// # Request Body
///
/// ```json
/// {
///     "owner_id": "user-open-id",
///     "content": "passcode"
/// }
/// ```
pub async fn handle_message(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<MessageRequest>,
) -> Result<HttpResponse, ApiError> {
    request.validate()?;

    let ip = extract_client_ip(&req);
    let outcome = state
        .message_router
        .handle_text(request.owner_id.trim(), &request.content, ip.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(
        ApiResponse::success(MessageResponse::from(outcome)).with_request_id(request_id(&req)),
    ))
}
