//! Per-IP and per-owner admission checks

use std::sync::Arc;

use passcode_shared::RateLimitConfig;

use crate::errors::{DomainError, DomainResult, RateLimitScope};
use crate::repositories::store::{keys, KeyValueStore};

use super::limiter::FixedWindowRateLimiter;

/// Ceilings applied at the request boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Max requests per IP per window
    pub per_ip: u32,
    /// Max requests per owner per window
    pub per_owner: u32,
    /// Window length in seconds
    pub window_seconds: u64,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            per_ip: 10,
            per_owner: 3,
            window_seconds: 60,
        }
    }
}

impl From<&RateLimitConfig> for RateLimitPolicy {
    fn from(config: &RateLimitConfig) -> Self {
        Self {
            per_ip: config.per_ip,
            per_owner: config.per_user,
            window_seconds: config.window_seconds,
        }
    }
}

/// Runs the IP and owner limiters in front of the passcode engine
pub struct RequestGate<S: KeyValueStore + ?Sized> {
    limiter: FixedWindowRateLimiter<S>,
    policy: RateLimitPolicy,
}

impl<S: KeyValueStore + ?Sized> RequestGate<S> {
    pub fn new(store: Arc<S>, policy: RateLimitPolicy) -> Self {
        Self {
            limiter: FixedWindowRateLimiter::new(store),
            policy,
        }
    }

    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// Consume one request for `ip`
    pub async fn allow_ip(&self, ip: &str) -> DomainResult<bool> {
        Ok(self
            .limiter
            .check_and_consume(&keys::ip_limit_key(ip), self.policy.per_ip, self.policy.window_seconds)
            .await?)
    }

    /// Consume one request for `owner_id`
    pub async fn allow_owner(&self, owner_id: &str) -> DomainResult<bool> {
        Ok(self
            .limiter
            .check_and_consume(
                &keys::owner_limit_key(owner_id),
                self.policy.per_owner,
                self.policy.window_seconds,
            )
            .await?)
    }

    /// Admit a request only if every known identity is under its ceiling
    ///
    /// The IP is checked first. A denial stops there, so the owner counter
    /// is untouched when the IP is already over its limit.
    pub async fn admit(&self, ip: Option<&str>, owner_id: Option<&str>) -> DomainResult<()> {
        if let Some(ip) = ip.filter(|ip| !ip.is_empty()) {
            if !self.allow_ip(ip).await? {
                return Err(DomainError::RateLimited {
                    scope: RateLimitScope::Ip,
                    limit: self.policy.per_ip,
                    window_seconds: self.policy.window_seconds,
                });
            }
        }

        if let Some(owner_id) = owner_id.filter(|owner| !owner.is_empty()) {
            if !self.allow_owner(owner_id).await? {
                return Err(DomainError::RateLimited {
                    scope: RateLimitScope::Owner,
                    limit: self.policy.per_owner,
                    window_seconds: self.policy.window_seconds,
                });
            }
        }

        Ok(())
    }
}
