//! Passcode lifecycle engine

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::entities::PasscodeRecord;
use crate::domain::value_objects::{IssuedPasscode, VerifyOutcome, VerifyResult};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::store::{keys, KeyValueStore};
use crate::services::clock::{Clock, SystemClock};
use crate::services::rate_limit::{RateLimitPolicy, RequestGate};

use super::config::PasscodeServiceConfig;
use super::generator;

/// Issues, verifies and cleans up passcodes over a [`KeyValueStore`]
///
/// Holds no mutable state of its own; every decision is made against the
/// store, so one instance can serve any number of concurrent requests.
pub struct PasscodeService<S: KeyValueStore + ?Sized> {
    store: Arc<S>,
    gate: RequestGate<S>,
    config: PasscodeServiceConfig,
    clock: Arc<dyn Clock>,
}

impl<S: KeyValueStore + ?Sized> PasscodeService<S> {
    /// Create a new passcode service using the system clock
    ///
    /// # Arguments
    ///
    /// * `store` - Backing key-value store
    /// * `config` - Code length, TTL and generation budget
    /// * `policy` - Rate ceilings for the request gate
    pub fn new(store: Arc<S>, config: PasscodeServiceConfig, policy: RateLimitPolicy) -> Self {
        Self {
            gate: RequestGate::new(store.clone(), policy),
            store,
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &PasscodeServiceConfig {
        &self.config
    }

    pub fn gate(&self) -> &RequestGate<S> {
        &self.gate
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Issue a passcode to `owner_id`, or hand back the one they already hold
    ///
    /// This method:
    /// 1. Returns the owner's active passcode unchanged if there is one
    /// 2. Clears stale owner and code entries otherwise
    /// 3. Draws a collision-free passcode (timestamp fallback when the budget runs out)
    /// 4. Writes the code and owner entries with the same TTL
    pub async fn issue(&self, owner_id: &str, trigger: &str) -> DomainResult<IssuedPasscode> {
        if owner_id.trim().is_empty() {
            return Err(DomainError::validation("owner id is required"));
        }

        if let Some((code, record)) = self.active_owner_entry(owner_id).await? {
            tracing::info!(
                owner_id = %mask_owner(owner_id),
                passcode = %mask_code(&code),
                event = "passcode_reused",
                "Owner already holds an active passcode"
            );
            return Ok(IssuedPasscode {
                code,
                expires_at: record.expires_at,
                reused: true,
            });
        }

        let code = self.generate_unique_code().await?;
        let now = self.clock.now();
        let record = PasscodeRecord::create(owner_id, trigger, now, self.config.ttl_seconds)
            .ok_or_else(|| DomainError::Internal {
                message: format!("passcode ttl {}s is out of range", self.config.ttl_seconds),
            })?;
        let payload = serde_json::to_string(&record)?;
        let ttl = self.config.ttl_seconds.max(1);

        self.store
            .set(&keys::passcode_key(&code), &payload, ttl)
            .await
            .map_err(|e| {
                tracing::error!(
                    owner_id = %mask_owner(owner_id),
                    error = %e,
                    event = "passcode_storage_failed",
                    "Failed to store passcode record"
                );
                DomainError::from(e)
            })?;
        self.store.set(&keys::owner_key(owner_id), &code, ttl).await?;

        tracing::info!(
            owner_id = %mask_owner(owner_id),
            passcode = %mask_code(&code),
            ttl_seconds = ttl,
            event = "passcode_issued",
            "Issued new passcode"
        );

        Ok(IssuedPasscode {
            code,
            expires_at: record.expires_at,
            reused: false,
        })
    }

    /// Verify and consume a passcode
    ///
    /// A malformed code is rejected before any store access. `claimed_owner`
    /// is only compared for logging; it does not change the outcome.
    pub async fn verify(&self, code: &str, claimed_owner: Option<&str>) -> DomainResult<VerifyResult> {
        if !generator::is_valid_format(code) {
            tracing::debug!(event = "passcode_verify_failed", reason = "format", "Malformed passcode");
            return Ok(VerifyResult::rejected(VerifyOutcome::InvalidFormat));
        }

        let mut record = match self.load_record(code).await? {
            Some(record) => record,
            None => return Ok(self.reject(code, VerifyOutcome::NotFound)),
        };

        if record.used {
            return Ok(self.reject(code, VerifyOutcome::AlreadyUsed));
        }

        let now = self.clock.now();
        if record.is_expired_at(now) {
            self.cleanup(&record.owner_id, Some(code)).await?;
            return Ok(self.reject(code, VerifyOutcome::Expired));
        }

        if let Some(claimed) = claimed_owner.filter(|claimed| *claimed != record.owner_id) {
            tracing::warn!(
                owner_id = %mask_owner(&record.owner_id),
                claimed_owner = %mask_owner(claimed),
                passcode = %mask_code(code),
                event = "passcode_owner_mismatch",
                "Passcode verified by a different owner than it was issued to"
            );
        }

        record.mark_as_used(now);
        let remaining = record.remaining_seconds_at(now).max(1);
        let payload = serde_json::to_string(&record)?;
        let code_key = keys::passcode_key(code);

        // A racing verifier sees "already used" until the delete lands.
        self.store.set(&code_key, &payload, remaining).await?;
        self.store.delete(&code_key).await?;
        self.store.delete(&keys::owner_key(&record.owner_id)).await?;

        tracing::info!(
            owner_id = %mask_owner(&record.owner_id),
            passcode = %mask_code(code),
            event = "passcode_verified",
            "Passcode verified and consumed"
        );

        Ok(VerifyResult::verified(record.expires_at))
    }

    /// The owner's active passcode, clearing stale entries when there is none
    pub async fn get_active_owner_code(&self, owner_id: &str) -> DomainResult<Option<String>> {
        Ok(self
            .active_owner_entry(owner_id)
            .await?
            .map(|(code, _)| code))
    }

    /// Delete the code and owner entries. Absent keys are fine.
    pub async fn cleanup(&self, owner_id: &str, code: Option<&str>) -> DomainResult<()> {
        if let Some(code) = code {
            self.store.delete(&keys::passcode_key(code)).await?;
        }
        self.store.delete(&keys::owner_key(owner_id)).await?;
        tracing::debug!(owner_id = %mask_owner(owner_id), event = "passcode_cleanup", "Cleared passcode entries");
        Ok(())
    }

    /// Stored record for `code` without consuming it
    pub async fn passcode_info(&self, code: &str) -> DomainResult<Option<PasscodeRecord>> {
        if !generator::is_valid_format(code) {
            return Ok(None);
        }
        self.load_record(code).await
    }

    /// Consume one request for a client IP
    pub async fn check_ip_rate_limit(&self, ip: &str) -> DomainResult<bool> {
        self.gate.allow_ip(ip).await
    }

    /// Consume one request for an owner
    pub async fn check_owner_rate_limit(&self, owner_id: &str) -> DomainResult<bool> {
        self.gate.allow_owner(owner_id).await
    }

    /// Whether the backing store answers
    pub async fn health_check(&self) -> DomainResult<bool> {
        Ok(self.store.health_check().await?)
    }

    async fn active_owner_entry(
        &self,
        owner_id: &str,
    ) -> DomainResult<Option<(String, PasscodeRecord)>> {
        let code = match self.store.get(&keys::owner_key(owner_id)).await? {
            Some(code) => code,
            None => return Ok(None),
        };

        match self.load_record(&code).await? {
            Some(record) if record.is_active_at(self.clock.now()) => Ok(Some((code, record))),
            _ => {
                self.cleanup(owner_id, Some(&code)).await?;
                Ok(None)
            }
        }
    }

    async fn load_record(&self, code: &str) -> DomainResult<Option<PasscodeRecord>> {
        match self.store.get(&keys::passcode_key(code)).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn generate_unique_code(&self) -> DomainResult<String> {
        let length = self.config.code_length;
        for attempt in 1..=self.config.max_generation_attempts {
            let code = generator::generate(length);
            if self.store.get(&keys::passcode_key(&code)).await?.is_none() {
                return Ok(code);
            }
            tracing::debug!(attempt = attempt, "Passcode collision, drawing again");
        }

        tracing::warn!(
            attempts = self.config.max_generation_attempts,
            event = "passcode_generation_fallback",
            "Collision budget exhausted, using timestamp suffix"
        );
        Ok(generator::generate_with_suffix(length, true, self.clock.now()))
    }

    fn reject(&self, code: &str, outcome: VerifyOutcome) -> VerifyResult {
        tracing::info!(
            passcode = %mask_code(code),
            outcome = ?outcome,
            event = "passcode_verify_failed",
            "Passcode verification failed"
        );
        VerifyResult::rejected(outcome)
    }
}

/// Keep the first two characters for log correlation
pub(crate) fn mask_code(code: &str) -> String {
    let visible: String = code.chars().take(2).collect();
    format!("{}****", visible)
}

/// Keep the last four characters of an owner id
pub(crate) fn mask_owner(owner_id: &str) -> String {
    let count = owner_id.chars().count();
    if count <= 4 {
        return "****".to_string();
    }
    let tail: String = owner_id.chars().skip(count - 4).collect();
    format!("****{}", tail)
}
