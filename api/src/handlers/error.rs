//! Mapping from domain failures to HTTP responses

use actix_web::{http::header, http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;
use validator::ValidationErrors;

use passcode_core::{DomainError, VerifyOutcome};
use passcode_shared::{error_codes, ErrorResponse, IntoErrorResponse};

/// Every way a handler can fail
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request data: {0}")]
    Validation(#[from] ValidationErrors),

    /// Verification ran and said no
    #[error("passcode rejected: {}", .0.message())]
    Rejected(VerifyOutcome),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ApiError {
    fn retry_after(&self) -> Option<u64> {
        match self {
            ApiError::Domain(DomainError::RateLimited { window_seconds, .. }) => Some(*window_seconds),
            _ => None,
        }
    }
}

impl IntoErrorResponse for ApiError {
    fn to_error_response(&self) -> ErrorResponse {
        match self {
            ApiError::Validation(errors) => {
                ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request data")
                    .add_detail("validation_errors", errors)
            }
            ApiError::Rejected(outcome) => ErrorResponse::new(
                outcome.error_code().unwrap_or(error_codes::BAD_REQUEST),
                outcome.message(),
            )
            .add_detail("valid", false),
            ApiError::NotFound(message) => ErrorResponse::new(error_codes::NOT_FOUND, message.as_str()),
            ApiError::Domain(error) => match error {
                DomainError::Validation { message } => {
                    ErrorResponse::new(error_codes::VALIDATION_ERROR, message.as_str())
                }
                DomainError::RateLimited {
                    scope,
                    limit,
                    window_seconds,
                } => ErrorResponse::new(
                    error_codes::RATE_LIMIT_EXCEEDED,
                    "Too many requests, please try again later",
                )
                .add_detail("scope", scope.as_str())
                .add_detail("limit", limit)
                .add_detail("retry_after", window_seconds),
                DomainError::Store(_) => ErrorResponse::new(
                    error_codes::STORE_UNAVAILABLE,
                    "Service temporarily unavailable, please retry",
                )
                .add_detail("retryable", true),
                DomainError::Internal { .. } => {
                    ErrorResponse::new(error_codes::INTERNAL_ERROR, "An internal error occurred")
                }
            },
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Rejected(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Domain(error) => match error {
                DomainError::Validation { .. } => StatusCode::BAD_REQUEST,
                DomainError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
                DomainError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
                DomainError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let mut builder = HttpResponse::build(status);
        if let Some(seconds) = self.retry_after() {
            builder.insert_header((header::RETRY_AFTER, seconds.to_string()));
        }
        builder.json(self.to_error_response())
    }
}
