use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyPasscodeRequest {
    #[validate(length(min = 1, max = 64))]
    pub passcode: String,
    #[validate(length(min = 1, max = 128))]
    pub open_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPasscodeResponse {
    pub valid: bool,
    pub message: String,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct IssuePasscodeRequest {
    #[validate(length(min = 1, max = 128))]
    pub owner_id: String,
    #[validate(length(min = 1, max = 64))]
    pub trigger: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuePasscodeResponse {
    pub passcode: String,
    pub expires_in: u64, // seconds until the passcode stops being accepted
    pub reused: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasscodeStatusResponse {
    pub exists: bool,
    pub expired: bool,
    pub used: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
