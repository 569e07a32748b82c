//! Keyword mapping source configuration

use serde::{Deserialize, Serialize};

use super::{env_list, env_or};

/// Where the keyword → response mapping is fetched from
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KeywordSourceConfig {
    /// Mirror URLs tried in order until one answers with a parsable document
    #[serde(default)]
    pub urls: Vec<String>,

    /// Seconds between scheduled reloads (0 disables the schedule)
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_seconds: u64,

    /// Connect timeout per mirror in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,

    /// Whole-request timeout per mirror in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for KeywordSourceConfig {
    fn default() -> Self {
        Self {
            urls: Vec::new(),
            refresh_interval_seconds: default_refresh_interval(),
            connect_timeout_seconds: default_connect_timeout(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl KeywordSourceConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            urls: env_list("KEYWORD_CONFIG_URLS").unwrap_or_default(),
            refresh_interval_seconds: env_or(
                "KEYWORD_REFRESH_INTERVAL_SECONDS",
                default_refresh_interval(),
            ),
            connect_timeout_seconds: env_or(
                "KEYWORD_CONNECT_TIMEOUT_SECONDS",
                default_connect_timeout(),
            ),
            request_timeout_seconds: env_or(
                "KEYWORD_REQUEST_TIMEOUT_SECONDS",
                default_request_timeout(),
            ),
        }
    }

    /// Whether any remote source is configured
    pub fn is_enabled(&self) -> bool {
        !self.urls.is_empty()
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(bad) = self
            .urls
            .iter()
            .find(|url| !(url.starts_with("http://") || url.starts_with("https://")))
        {
            return Err(format!("keyword source url must be http(s): {}", bad));
        }
        if self.request_timeout_seconds == 0 {
            return Err("keyword request timeout must be greater than zero".to_string());
        }
        Ok(())
    }
}

fn default_refresh_interval() -> u64 {
    86_400 // daily
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_request_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_source_default_disabled() {
        let config = KeywordSourceConfig::default();
        assert!(!config.is_enabled());
        assert_eq!(config.refresh_interval_seconds, 86_400);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_keyword_source_rejects_non_http_urls() {
        let config = KeywordSourceConfig {
            urls: vec![
                "https://mirror-a.example/config.json".to_string(),
                "ftp://mirror-b.example/config.json".to_string(),
            ],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("ftp://mirror-b.example"));
    }
}
