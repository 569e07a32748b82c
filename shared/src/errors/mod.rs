//! Shared error types and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Standard error response structure used across all API endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for client identification
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Additional error details (field errors, retry hints, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,

    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Add a detail field to the error response
    pub fn add_detail(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let details = self.details.get_or_insert_with(HashMap::new);
        if let Ok(json_value) = serde_json::to_value(value) {
            details.insert(key.into(), json_value);
        }
        self
    }
}

/// Common error codes used across the application
pub mod error_codes {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const RATE_LIMIT_EXCEEDED: &str = "RATE_LIMIT_EXCEEDED";
    pub const STORE_UNAVAILABLE: &str = "STORE_UNAVAILABLE";
    pub const PASSCODE_FORMAT_INVALID: &str = "PASSCODE_FORMAT_INVALID";
    pub const PASSCODE_NOT_FOUND: &str = "PASSCODE_NOT_FOUND";
    pub const PASSCODE_ALREADY_USED: &str = "PASSCODE_ALREADY_USED";
    pub const PASSCODE_EXPIRED: &str = "PASSCODE_EXPIRED";
}

/// Trait for converting errors to ErrorResponse
pub trait IntoErrorResponse {
    fn to_error_response(&self) -> ErrorResponse;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_details() {
        let response = ErrorResponse::new(error_codes::RATE_LIMIT_EXCEEDED, "slow down")
            .add_detail("retry_after", 60)
            .add_detail("scope", "ip");

        let details = response.details.unwrap();
        assert_eq!(details["retry_after"], serde_json::json!(60));
        assert_eq!(details["scope"], serde_json::json!("ip"));
    }

    #[test]
    fn test_error_response_serialization_skips_empty_details() {
        let response = ErrorResponse::new(error_codes::NOT_FOUND, "missing");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["error"], "NOT_FOUND");
        assert!(json.get("details").is_none());
    }
}
