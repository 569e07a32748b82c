//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `cache` - Redis connection configuration
//! - `environment` - Environment detection and logging configuration
//! - `keyword` - Remote keyword mapping source
//! - `passcode` - Passcode lifecycle and rate limiting
//! - `server` - HTTP server and CORS configuration

pub mod cache;
pub mod environment;
pub mod keyword;
pub mod passcode;
pub mod server;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

// Re-export commonly used types
pub use cache::CacheConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use keyword::KeywordSourceConfig;
pub use passcode::{PasscodeConfig, RateLimitConfig};
pub use server::{CorsConfig, ServerConfig};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Redis configuration
    pub cache: CacheConfig,

    /// Passcode lifecycle configuration
    pub passcode: PasscodeConfig,

    /// Keyword mapping source
    #[serde(default)]
    pub keywords: KeywordSourceConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            cache: CacheConfig::default(),
            passcode: PasscodeConfig::default(),
            keywords: KeywordSourceConfig::default(),
            cors: CorsConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment
    ///
    /// A `.env` file in the working directory is read first when present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let environment = Environment::from_env();
        let cors = if environment.is_development() {
            CorsConfig::development()
        } else {
            CorsConfig::default()
        };

        Self {
            environment,
            server: ServerConfig::from_env(),
            cache: CacheConfig::from_env(),
            passcode: PasscodeConfig::from_env(),
            keywords: KeywordSourceConfig::from_env(),
            cors,
            logging: LoggingConfig::from_env(environment),
        }
    }

    /// Validate every section that carries invariants
    pub fn validate(&self) -> Result<(), String> {
        self.passcode.validate()?;
        self.keywords.validate()?;
        Ok(())
    }
}

/// Read and parse an environment variable, falling back to `default` when the
/// variable is missing or unparsable
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// Read a comma separated environment variable into trimmed, non-empty items
pub(crate) fn env_list(key: &str) -> Option<Vec<String>> {
    let raw = std::env::var(key).ok()?;
    let items: Vec<String> = raw
        .split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();

    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}
