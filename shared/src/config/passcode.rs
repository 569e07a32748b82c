//! Passcode lifecycle and rate limiting configuration

use serde::{Deserialize, Serialize};

use super::{env_list, env_or};

/// Shortest passcode accepted by the verification path
pub const MIN_PASSCODE_LENGTH: usize = 4;

/// Longest passcode accepted by the verification path
pub const MAX_PASSCODE_LENGTH: usize = 10;

/// Longest lifetime a passcode may be issued with (one day)
pub const MAX_PASSCODE_TTL_SECONDS: u64 = 86_400;

/// Passcode issuance configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PasscodeConfig {
    /// Number of characters in a generated passcode (4-10)
    #[serde(default = "default_length")]
    pub length: usize,

    /// Seconds a passcode stays valid after issuance
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,

    /// Message texts that request a passcode
    #[serde(default = "default_trigger_keywords")]
    pub trigger_keywords: Vec<String>,

    /// Random draws checked for collisions before the timestamp fallback
    #[serde(default = "default_max_generation_attempts")]
    pub max_generation_attempts: u32,

    /// Request rate ceilings
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

impl Default for PasscodeConfig {
    fn default() -> Self {
        Self {
            length: default_length(),
            ttl_seconds: default_ttl_seconds(),
            trigger_keywords: default_trigger_keywords(),
            max_generation_attempts: default_max_generation_attempts(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl PasscodeConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            length: env_or("PASSCODE_LENGTH", default_length()),
            ttl_seconds: env_or("PASSCODE_TTL_SECONDS", default_ttl_seconds()),
            trigger_keywords: env_list("PASSCODE_TRIGGER_KEYWORDS")
                .unwrap_or_else(default_trigger_keywords),
            max_generation_attempts: env_or(
                "PASSCODE_MAX_GENERATION_ATTEMPTS",
                default_max_generation_attempts(),
            ),
            rate_limit: RateLimitConfig::from_env(),
        }
    }

    /// Check the invariants the passcode core relies on
    pub fn validate(&self) -> Result<(), String> {
        if !(MIN_PASSCODE_LENGTH..=MAX_PASSCODE_LENGTH).contains(&self.length) {
            return Err(format!(
                "passcode length must be between {} and {}, got {}",
                MIN_PASSCODE_LENGTH, MAX_PASSCODE_LENGTH, self.length
            ));
        }
        if self.ttl_seconds == 0 {
            return Err("passcode ttl must be greater than zero".to_string());
        }
        if self.ttl_seconds > MAX_PASSCODE_TTL_SECONDS {
            return Err(format!(
                "passcode ttl must be at most {} seconds, got {}",
                MAX_PASSCODE_TTL_SECONDS, self.ttl_seconds
            ));
        }
        if self.max_generation_attempts == 0 {
            return Err("passcode generation attempts must be greater than zero".to_string());
        }
        if self.trigger_keywords.iter().all(|k| k.trim().is_empty()) {
            return Err("at least one trigger keyword is required".to_string());
        }
        self.rate_limit.validate()
    }

    /// TTL expressed in whole minutes, rounded down
    pub fn ttl_minutes(&self) -> u64 {
        self.ttl_seconds / 60
    }
}

/// Fixed-window rate limiting configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Max requests per IP address per window
    #[serde(default = "default_per_ip")]
    pub per_ip: u32,

    /// Max requests per user per window
    #[serde(default = "default_per_user")]
    pub per_user: u32,

    /// Window length in seconds
    #[serde(default = "default_window_seconds")]
    pub window_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            per_ip: default_per_ip(),
            per_user: default_per_user(),
            window_seconds: default_window_seconds(),
        }
    }
}

impl RateLimitConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            per_ip: env_or("RATE_LIMIT_PER_IP", default_per_ip()),
            per_user: env_or("RATE_LIMIT_PER_USER", default_per_user()),
            window_seconds: env_or("RATE_LIMIT_WINDOW_SECONDS", default_window_seconds()),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.per_ip == 0 || self.per_user == 0 {
            return Err("rate limit ceilings must be greater than zero".to_string());
        }
        if self.window_seconds == 0 {
            return Err("rate limit window must be greater than zero".to_string());
        }
        Ok(())
    }
}

fn default_length() -> usize {
    6
}

fn default_ttl_seconds() -> u64 {
    300 // 5 minutes
}

fn default_trigger_keywords() -> Vec<String> {
    vec!["passcode".to_string()]
}

fn default_max_generation_attempts() -> u32 {
    10
}

fn default_per_ip() -> u32 {
    10
}

fn default_per_user() -> u32 {
    3
}

fn default_window_seconds() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passcode_config_default() {
        let config = PasscodeConfig::default();
        assert_eq!(config.length, 6);
        assert_eq!(config.ttl_seconds, 300);
        assert_eq!(config.ttl_minutes(), 5);
        assert_eq!(config.max_generation_attempts, 10);
        assert_eq!(config.rate_limit.per_ip, 10);
        assert_eq!(config.rate_limit.per_user, 3);
        assert_eq!(config.rate_limit.window_seconds, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_passcode_length_bounds() {
        let mut config = PasscodeConfig::default();
        config.length = 3;
        assert!(config.validate().is_err());
        config.length = 11;
        assert!(config.validate().is_err());
        config.length = 4;
        assert!(config.validate().is_ok());
        config.length = 10;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_values_rejected() {
        let mut config = PasscodeConfig::default();
        config.ttl_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = PasscodeConfig::default();
        config.rate_limit.window_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = PasscodeConfig::default();
        config.rate_limit.per_user = 0;
        assert!(config.validate().is_err());

        let mut config = PasscodeConfig::default();
        config.trigger_keywords = vec!["  ".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ttl_upper_bound() {
        let mut config = PasscodeConfig::default();
        config.ttl_seconds = MAX_PASSCODE_TTL_SECONDS;
        assert!(config.validate().is_ok());

        config.ttl_seconds = MAX_PASSCODE_TTL_SECONDS + 1;
        assert!(config.validate().is_err());

        config.ttl_seconds = 10_000_000_000_000_000;
        let err = config.validate().unwrap_err();
        assert!(err.contains("at most"));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: PasscodeConfig = serde_json::from_str(r#"{"length": 8}"#).unwrap();
        assert_eq!(config.length, 8);
        assert_eq!(config.ttl_seconds, 300);
        assert_eq!(config.rate_limit.per_user, 3);
    }
}
