//! Repository traits describing persistence adapters.
//!
//! Page, category-link and user data belong to the content platform and are
//! only read here. The stats record is the one table this crate writes.

use std::future::Future;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use metrics::histogram;
use thiserror::Error;

use crate::domain::entities::{BlogArticleSummary, UserBlogStats, UserRecord};
use crate::domain::types::{Namespace, PageId, UserId};

const METRIC_BACKING_QUERY_MS: &str = "blogstats_backing_query_ms";

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[async_trait]
pub trait CategoryLinksRepo: Send + Sync {
    /// Names of every category the page is currently linked to.
    async fn list_categories(&self, page_id: PageId) -> Result<Vec<String>, RepoError>;

    /// Number of distinct pages in `namespace` linked to `category`.
    async fn count_pages_in_category(
        &self,
        category: &str,
        namespace: Namespace,
    ) -> Result<u64, RepoError>;

    /// Distinct pages in `namespace` linked to `category`, highest page id first.
    async fn list_recent_pages_in_category(
        &self,
        category: &str,
        namespace: Namespace,
        limit: u32,
    ) -> Result<Vec<BlogArticleSummary>, RepoError>;
}

#[async_trait]
pub trait UsersRepo: Send + Sync {
    async fn find_by_name(&self, name: &str) -> Result<Option<UserRecord>, RepoError>;
}

#[async_trait]
pub trait UserStatsRepo: Send + Sync {
    async fn read_stats(&self, user_id: UserId) -> Result<Option<UserBlogStats>, RepoError>;

    /// Create or overwrite the user's record with the given absolute values.
    async fn write_stats(&self, stats: UserBlogStats) -> Result<(), RepoError>;
}

/// Run a backing-store call under a deadline, recording its latency.
pub async fn bounded<T, F>(op: &'static str, timeout: Duration, call: F) -> Result<T, RepoError>
where
    F: Future<Output = Result<T, RepoError>>,
{
    let started_at = Instant::now();
    let result = tokio::time::timeout(timeout, call).await;
    histogram!(METRIC_BACKING_QUERY_MS, "op" => op)
        .record(started_at.elapsed().as_secs_f64() * 1000.0);

    result.map_err(|_| RepoError::Timeout)?
}
