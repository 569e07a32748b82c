//! Shared utilities and common types for the passcode service
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - Error response structures and error codes
//! - API response wrappers

pub mod config;
pub mod errors;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, CorsConfig, Environment, KeywordSourceConfig, LogFormat,
    LoggingConfig, PasscodeConfig, RateLimitConfig, ServerConfig,
};
pub use errors::{error_codes, ErrorResponse, IntoErrorResponse};
pub use types::{ApiResponse, HealthResponse, HealthStatus};
