//! Recomputation of the per-user "articles created" count on content saves.
//!
//! The count is always derived again from category membership and written
//! as an absolute value, which makes repeated or duplicated save events
//! harmless and repairs any drift on the next save.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::application::error::AppError;
use crate::application::repos::{CategoryLinksRepo, UsersRepo, bounded};
use crate::application::stats::StatsStore;
use crate::domain::category::CategoryTemplate;
use crate::domain::entities::{ContentSaved, UserBlogStats, UserRecord};
use crate::domain::types::{Namespace, PageId, UserId};

const METRIC_RECOMPUTE: &str = "blogstats_recompute_total";
const METRIC_RECOMPUTE_SKIPPED: &str = "blogstats_recompute_skipped_total";

/// Stats records written while handling one save event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecomputeOutcome {
    pub updated: Vec<UserBlogStats>,
}

impl RecomputeOutcome {
    pub fn is_empty(&self) -> bool {
        self.updated.is_empty()
    }
}

pub struct OpinionCountService {
    categories: Arc<dyn CategoryLinksRepo>,
    users: Arc<dyn UsersRepo>,
    stats: Arc<StatsStore>,
    template: CategoryTemplate,
    query_timeout: Duration,
}

impl OpinionCountService {
    pub fn new(
        categories: Arc<dyn CategoryLinksRepo>,
        users: Arc<dyn UsersRepo>,
        stats: Arc<StatsStore>,
        template: CategoryTemplate,
        query_timeout: Duration,
    ) -> Self {
        Self {
            categories,
            users,
            stats,
            template,
            query_timeout,
        }
    }

    /// Recompute the count of every user whose blog category the saved page is in.
    ///
    /// Failures to match a category to an account are skipped silently.
    /// Backing-store and cache failures are returned; the content save itself
    /// has already happened and is not affected.
    #[instrument(skip(self, event), fields(page_id = ?event.page_id))]
    pub async fn on_content_saved(&self, event: &ContentSaved) -> Result<RecomputeOutcome, AppError> {
        let Some(page_id) = event.page_id else {
            debug!("Skipping recomputation: page has no id yet");
            return Ok(RecomputeOutcome::default());
        };

        if event.author.is_anonymous() {
            counter!(METRIC_RECOMPUTE_SKIPPED, "reason" => "anonymous").increment(1);
            debug!(%page_id, "Skipping recomputation: anonymous editor");
            return Ok(RecomputeOutcome::default());
        }

        let owners = self.resolve_owners(page_id).await?;

        let mut outcome = RecomputeOutcome::default();
        for owner in owners.into_values() {
            let stats = self.recompute(&owner).await?;
            outcome.updated.push(stats);
        }

        Ok(outcome)
    }

    /// Distinct accounts owning a blog category the page is linked to.
    async fn resolve_owners(
        &self,
        page_id: PageId,
    ) -> Result<BTreeMap<UserId, UserRecord>, AppError> {
        let categories = bounded(
            "list_categories",
            self.query_timeout,
            self.categories.list_categories(page_id),
        )
        .await?;

        let mut owners = BTreeMap::new();
        for category in categories {
            let Some(candidate) = self.template.extract_user(&category) else {
                continue;
            };

            let user = bounded(
                "find_user_by_name",
                self.query_timeout,
                self.users.find_by_name(&candidate),
            )
            .await?;

            match user {
                Some(user) if self.template.matches(&category, &user.name) => {
                    owners.entry(user.id).or_insert(user);
                }
                Some(user) => {
                    counter!(METRIC_RECOMPUTE_SKIPPED, "reason" => "ambiguous_owner").increment(1);
                    debug!(
                        %page_id,
                        category = %category,
                        resolved = %user.name,
                        "Skipping category: resolved account does not own it"
                    );
                }
                None => {
                    counter!(METRIC_RECOMPUTE_SKIPPED, "reason" => "unknown_user").increment(1);
                    debug!(
                        %page_id,
                        category = %category,
                        candidate = %candidate,
                        "Skipping category: no account with that name"
                    );
                }
            }
        }

        Ok(owners)
    }

    async fn recompute(&self, owner: &UserRecord) -> Result<UserBlogStats, AppError> {
        let category = self.template.render(&owner.name);
        let articles_created = bounded(
            "count_pages_in_category",
            self.query_timeout,
            self.categories
                .count_pages_in_category(&category, Namespace::BLOG),
        )
        .await?;

        let stats = UserBlogStats {
            user_id: owner.id,
            articles_created,
        };
        self.stats.write(stats).await?;
        self.stats.invalidate(owner.id).await?;

        counter!(METRIC_RECOMPUTE).increment(1);
        info!(
            user_id = %owner.id,
            user_name = %owner.name,
            category = %category,
            articles_created,
            "Recomputed articles created"
        );

        Ok(stats)
    }
}
