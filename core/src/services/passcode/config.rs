//! Configuration for the passcode service

use passcode_shared::PasscodeConfig;

/// Parameters the lifecycle engine runs with
#[derive(Debug, Clone)]
pub struct PasscodeServiceConfig {
    /// Characters per generated passcode
    pub code_length: usize,
    /// Seconds a passcode stays valid
    pub ttl_seconds: u64,
    /// Random draws before falling back to the timestamp suffix
    pub max_generation_attempts: u32,
}

impl Default for PasscodeServiceConfig {
    fn default() -> Self {
        Self {
            code_length: 6,
            ttl_seconds: 300,
            max_generation_attempts: 10,
        }
    }
}

impl From<&PasscodeConfig> for PasscodeServiceConfig {
    fn from(config: &PasscodeConfig) -> Self {
        Self {
            code_length: config.length,
            ttl_seconds: config.ttl_seconds,
            max_generation_attempts: config.max_generation_attempts,
        }
    }
}
