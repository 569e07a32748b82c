//! Results of routing a text message

use serde::{Deserialize, Serialize};

/// What the router decided for one message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageOutcome {
    /// Owner or IP is over its request ceiling
    RateLimited,

    /// A new passcode was issued
    PasscodeIssued { code: String, ttl_seconds: u64 },

    /// The owner's still-active passcode was returned
    ExistingPasscode { code: String, ttl_seconds: u64 },

    /// A configured keyword matched
    KeywordReply { text: String },

    /// The message asked for help
    Help { trigger: String },

    /// The message mentions the trigger but is not exactly it
    TriggerHint { trigger: String },

    Unrecognized { trigger: String },
}

impl MessageOutcome {
    /// Plain-text reply for messaging channels
    pub fn reply_text(&self) -> String {
        match self {
            MessageOutcome::RateLimited => {
                "Too many requests, please try again later.".to_string()
            }
            MessageOutcome::PasscodeIssued { code, ttl_seconds } => format!(
                "Your passcode: {}\nValid for {} minute(s), single use only.",
                code,
                minutes(*ttl_seconds)
            ),
            MessageOutcome::ExistingPasscode { code, ttl_seconds } => format!(
                "You already have an active passcode: {}\nUse it within {} minute(s), single use only.",
                code,
                minutes(*ttl_seconds)
            ),
            MessageOutcome::KeywordReply { text } => text.clone(),
            MessageOutcome::Help { trigger } => format!(
                "Send \"{}\" to receive a passcode.\nEach passcode works once and expires after a few minutes.",
                trigger
            ),
            MessageOutcome::TriggerHint { trigger } => format!(
                "To get a passcode send exactly:\n{}\nSend \"help\" for more.",
                trigger
            ),
            MessageOutcome::Unrecognized { trigger } => format!(
                "Hello! Send \"{}\" to get a passcode, or \"help\" for instructions.",
                trigger
            ),
        }
    }
}

// Rounded up so a code with 30s left does not read as "0 minutes".
fn minutes(seconds: u64) -> u64 {
    (seconds + 59) / 60
}
