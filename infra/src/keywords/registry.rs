//! Read-mostly keyword registry with scheduled reloads
//!
//! Mirrors are tried in the configured order. The first one that answers
//! with a parsable document replaces the whole table; if none does, the
//! previous table stays in place.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use passcode_core::KeywordLookup;
use passcode_shared::KeywordSourceConfig;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::InfrastructureError;

/// Document served by a keyword mirror
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordDocument {
    pub keywords: HashMap<String, String>,
}

/// Parse a mirror response body
pub fn parse_document(body: &str) -> Result<KeywordDocument, InfrastructureError> {
    Ok(serde_json::from_str(body)?)
}

#[derive(Debug, Default)]
struct Snapshot {
    entries: HashMap<String, String>,
    loaded_at: Option<DateTime<Utc>>,
    source: Option<String>,
}

/// Keyword table shared between request handlers and the refresh task
pub struct KeywordRegistry {
    snapshot: RwLock<Snapshot>,
    http: reqwest::Client,
    config: KeywordSourceConfig,
}

impl KeywordRegistry {
    /// Create an empty registry for `config`
    pub fn new(config: KeywordSourceConfig) -> Result<Self, InfrastructureError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self {
            snapshot: RwLock::new(Snapshot::default()),
            http,
            config,
        })
    }

    /// Replace the table with `entries` without touching the network
    pub fn seed(&self, entries: HashMap<String, String>) {
        self.replace(entries, None);
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// When the table was last replaced
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.read().loaded_at
    }

    /// Mirror the current table came from
    pub fn source(&self) -> Option<String> {
        self.read().source.clone()
    }

    /// Fetch from the first answering mirror and swap the table in
    ///
    /// Returns the number of keywords now loaded. With no mirrors configured
    /// this is a no-op.
    pub async fn reload(&self) -> Result<usize, InfrastructureError> {
        if !self.config.is_enabled() {
            debug!("No keyword sources configured, skipping reload");
            return Ok(self.len());
        }

        for url in &self.config.urls {
            match self.fetch(url).await {
                Ok(document) => {
                    let count = document.keywords.len();
                    self.replace(document.keywords, Some(url.clone()));
                    info!(
                        source = %url,
                        keywords = count,
                        event = "keywords_reloaded",
                        "Keyword table reloaded"
                    );
                    return Ok(count);
                }
                Err(e) => {
                    warn!(source = %url, error = %e, "Keyword mirror failed, trying next");
                }
            }
        }

        error!(
            mirrors = self.config.urls.len(),
            kept = self.len(),
            event = "keyword_reload_failed",
            "All keyword mirrors failed, keeping previous table"
        );
        Err(InfrastructureError::KeywordSource(format!(
            "all {} keyword mirrors failed",
            self.config.urls.len()
        )))
    }

    /// Reload on the configured interval in a background task
    ///
    /// Returns `None` when no mirrors or no interval are configured. The first
    /// tick is skipped; load once at startup before calling this.
    pub fn spawn_refresh(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.is_enabled() || self.config.refresh_interval_seconds == 0 {
            return None;
        }

        let period = Duration::from_secs(self.config.refresh_interval_seconds);
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(e) = self.reload().await {
                    warn!(error = %e, "Scheduled keyword reload failed");
                }
            }
        }))
    }

    async fn fetch(&self, url: &str) -> Result<KeywordDocument, InfrastructureError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(InfrastructureError::KeywordSource(format!(
                "{} answered {}",
                url, status
            )));
        }
        let body = response.text().await?;
        parse_document(&body)
    }

    fn replace(&self, entries: HashMap<String, String>, source: Option<String>) {
        let mut snapshot = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        *snapshot = Snapshot {
            entries,
            loaded_at: Some(Utc::now()),
            source,
        };
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Snapshot> {
        self.snapshot.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeywordLookup for KeywordRegistry {
    fn lookup(&self, keyword: &str) -> Option<String> {
        self.read().entries.get(keyword).cloned()
    }
}
