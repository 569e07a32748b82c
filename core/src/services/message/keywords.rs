//! Keyword to reply-text lookup

use std::collections::HashMap;

/// Read-mostly mapping from keyword to reply text
///
/// Implementations may refresh themselves in the background; callers only read.
pub trait KeywordLookup: Send + Sync {
    /// Reply text for an exact keyword
    fn lookup(&self, keyword: &str) -> Option<String>;

    fn matches(&self, keyword: &str) -> bool {
        self.lookup(keyword).is_some()
    }
}

/// Fixed keyword table
#[derive(Debug, Clone, Default)]
pub struct StaticKeywords {
    entries: HashMap<String, String>,
}

impl StaticKeywords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, keyword: impl Into<String>, reply: impl Into<String>) -> Self {
        self.entries.insert(keyword.into(), reply.into());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<HashMap<String, String>> for StaticKeywords {
    fn from(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }
}

impl KeywordLookup for StaticKeywords {
    fn lookup(&self, keyword: &str) -> Option<String> {
        self.entries.get(keyword).cloned()
    }
}
