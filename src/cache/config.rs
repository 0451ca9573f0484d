//! Cache configuration.
//!
//! Controls the article-list and stats views via the `[cache]` section.

use std::num::NonZeroUsize;
use std::time::Duration;

use serde::Deserialize;

const DEFAULT_ARTICLE_LIST_TTL_SECS: u64 = 60;
const DEFAULT_ARTICLE_LIST_LIMIT: usize = 5;
const DEFAULT_STATS_TTL_SECS: u64 = 300;
const DEFAULT_MAX_ENTRIES: usize = 1000;

/// Upper bound on a recent-articles list, whatever the configuration says.
pub const MAX_ARTICLE_LIST_LIMIT: usize = 5;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// When false every read goes straight to the backing store.
    pub enabled: bool,
    /// Lifetime of a cached recent-articles list.
    pub article_list_ttl_seconds: u64,
    /// Maximum number of articles in a recent-articles list.
    pub article_list_limit: usize,
    /// Lifetime of a cached stats view.
    pub stats_ttl_seconds: u64,
    /// Maximum entries held by the in-memory store before LRU eviction.
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            article_list_ttl_seconds: DEFAULT_ARTICLE_LIST_TTL_SECS,
            article_list_limit: DEFAULT_ARTICLE_LIST_LIMIT,
            stats_ttl_seconds: DEFAULT_STATS_TTL_SECS,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            article_list_ttl_seconds: settings.article_list_ttl.as_secs(),
            article_list_limit: settings.article_list_limit.get(),
            stats_ttl_seconds: settings.stats_ttl.as_secs(),
            max_entries: settings.max_entries.get(),
        }
    }
}

impl CacheConfig {
    pub fn article_list_ttl(&self) -> Duration {
        Duration::from_secs(self.article_list_ttl_seconds)
    }

    pub fn stats_ttl(&self) -> Duration {
        Duration::from_secs(self.stats_ttl_seconds)
    }

    /// Returns the entry limit as NonZeroUsize, clamping to 1 if zero.
    pub fn max_entries_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.max_entries).unwrap_or(NonZeroUsize::MIN)
    }
}
