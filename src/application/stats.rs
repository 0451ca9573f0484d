//! Explicit access to the persisted per-user stats record.
//!
//! Reads go through a cache-aside view keyed by user; writes always replace
//! the whole record and are followed by an explicit `invalidate`.
//!
//! A read that loaded the record before a recompute may store its copy after
//! the recompute invalidated the key. That stale view lives at most
//! `stats_ttl` (300 seconds by default).

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use crate::application::error::AppError;
use crate::application::repos::{UserStatsRepo, bounded};
use crate::cache::{CacheConfig, CacheKey, KeyValueCache, get_json, set_json};
use crate::domain::entities::UserBlogStats;
use crate::domain::types::UserId;

pub struct StatsStore {
    repo: Arc<dyn UserStatsRepo>,
    cache: Arc<dyn KeyValueCache>,
    config: CacheConfig,
    query_timeout: Duration,
}

impl StatsStore {
    pub fn new(
        repo: Arc<dyn UserStatsRepo>,
        cache: Arc<dyn KeyValueCache>,
        config: CacheConfig,
        query_timeout: Duration,
    ) -> Self {
        Self {
            repo,
            cache,
            config,
            query_timeout,
        }
    }

    /// Current stats for the user; a user without a record has created nothing.
    #[instrument(skip(self))]
    pub async fn read(&self, user_id: UserId) -> Result<UserBlogStats, AppError> {
        let key = CacheKey::UserStats(user_id);
        if self.config.enabled
            && let Some(stats) = get_json::<UserBlogStats>(self.cache.as_ref(), &key).await?
        {
            debug!(%user_id, cache = "hit", "Got user stats from cache");
            return Ok(stats);
        }

        debug!(%user_id, cache = "miss", "Got user stats from database");
        let stats = bounded(
            "read_stats",
            self.query_timeout,
            self.repo.read_stats(user_id),
        )
        .await?
        .unwrap_or_else(|| UserBlogStats::empty(user_id));

        if self.config.enabled
            && let Err(err) =
                set_json(self.cache.as_ref(), &key, &stats, self.config.stats_ttl()).await
        {
            warn!(%user_id, error = %err, "Failed to cache user stats");
        }

        Ok(stats)
    }

    pub async fn write(&self, stats: UserBlogStats) -> Result<(), AppError> {
        bounded("write_stats", self.query_timeout, self.repo.write_stats(stats)).await?;
        Ok(())
    }

    pub async fn invalidate(&self, user_id: UserId) -> Result<(), AppError> {
        self.cache
            .delete(&CacheKey::UserStats(user_id).to_string())
            .await?;
        Ok(())
    }
}
