use serde::{Deserialize, Serialize};
use validator::Validate;

use passcode_core::MessageOutcome;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MessageRequest {
    #[validate(length(min = 1, max = 128))]
    pub owner_id: String,
    #[validate(length(max = 2048))]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub outcome: MessageOutcome,
    pub reply: String,
}

impl From<MessageOutcome> for MessageResponse {
    fn from(outcome: MessageOutcome) -> Self {
        Self {
            reply: outcome.reply_text(),
            outcome,
        }
    }
}
