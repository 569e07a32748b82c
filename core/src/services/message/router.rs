//! Text message router

use std::sync::Arc;

use crate::errors::{DomainError, DomainResult};
use crate::repositories::store::KeyValueStore;
use crate::services::passcode::{mask_owner, PasscodeService};

use super::keywords::KeywordLookup;
use super::types::MessageOutcome;

const HELP_WORDS: &[&str] = &["help", "帮助"];

/// Routes inbound text to passcode issuance or a canned reply
///
/// Order of checks: rate gate, exact trigger keyword, keyword table, help
/// words, trigger mention, fallback.
pub struct MessageRouter<S: KeyValueStore + ?Sized> {
    service: Arc<PasscodeService<S>>,
    keywords: Arc<dyn KeywordLookup>,
    triggers: Vec<String>,
}

impl<S: KeyValueStore + ?Sized> MessageRouter<S> {
    pub fn new(
        service: Arc<PasscodeService<S>>,
        keywords: Arc<dyn KeywordLookup>,
        triggers: Vec<String>,
    ) -> Self {
        let triggers = triggers
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        Self {
            service,
            keywords,
            triggers,
        }
    }

    /// Keyword advertised in help texts
    pub fn primary_trigger(&self) -> &str {
        self.triggers.first().map(String::as_str).unwrap_or_default()
    }

    pub fn is_trigger(&self, text: &str) -> bool {
        self.triggers.iter().any(|t| t == text)
    }

    /// Route one text message from `owner_id`
    ///
    /// Rate denial is an outcome, not an error. Store failures propagate.
    pub async fn handle_text(
        &self,
        owner_id: &str,
        content: &str,
        ip: Option<&str>,
    ) -> DomainResult<MessageOutcome> {
        if owner_id.trim().is_empty() {
            return Err(DomainError::validation("owner id is required"));
        }

        match self.service.gate().admit(ip, Some(owner_id)).await {
            Ok(()) => {}
            Err(DomainError::RateLimited { scope, .. }) => {
                tracing::warn!(
                    owner_id = %mask_owner(owner_id),
                    scope = %scope,
                    event = "message_rate_limited",
                    "Message rejected by rate gate"
                );
                return Ok(MessageOutcome::RateLimited);
            }
            Err(e) => return Err(e),
        }

        let text = content.trim();
        tracing::info!(owner_id = %mask_owner(owner_id), event = "message_received", "Routing text message");

        if self.is_trigger(text) {
            let issued = self.service.issue(owner_id, text).await?;
            return Ok(if issued.reused {
                MessageOutcome::ExistingPasscode {
                    ttl_seconds: issued.expires_in_at(self.service.now()),
                    code: issued.code,
                }
            } else {
                MessageOutcome::PasscodeIssued {
                    code: issued.code,
                    ttl_seconds: self.service.config().ttl_seconds,
                }
            });
        }

        if let Some(reply) = self.keywords.lookup(text) {
            return Ok(MessageOutcome::KeywordReply { text: reply });
        }

        let trigger = self.primary_trigger().to_string();
        let lowered = text.to_lowercase();
        if HELP_WORDS.iter().any(|word| lowered.contains(word)) {
            return Ok(MessageOutcome::Help { trigger });
        }
        if self.triggers.iter().any(|t| text.contains(t.as_str())) {
            return Ok(MessageOutcome::TriggerHint { trigger });
        }

        Ok(MessageOutcome::Unrecognized { trigger })
    }
}
