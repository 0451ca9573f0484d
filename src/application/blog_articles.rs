//! Cache-aside listing of a user's most recent blog articles.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tracing::{debug, instrument, warn};

use crate::application::error::AppError;
use crate::application::repos::{CategoryLinksRepo, bounded};
use crate::cache::{
    CacheConfig, CacheKey, KeyValueCache, MAX_ARTICLE_LIST_LIMIT, get_json, set_json,
};
use crate::domain::category::CategoryTemplate;
use crate::domain::entities::BlogArticleSummary;
use crate::domain::types::{Namespace, UserId};

const METRIC_LIST_HIT: &str = "blogstats_article_list_hit_total";
const METRIC_LIST_MISS: &str = "blogstats_article_list_miss_total";

pub struct BlogArticleListService {
    categories: Arc<dyn CategoryLinksRepo>,
    cache: Arc<dyn KeyValueCache>,
    template: CategoryTemplate,
    config: CacheConfig,
    query_timeout: Duration,
}

impl BlogArticleListService {
    pub fn new(
        categories: Arc<dyn CategoryLinksRepo>,
        cache: Arc<dyn KeyValueCache>,
        template: CategoryTemplate,
        config: CacheConfig,
        query_timeout: Duration,
    ) -> Self {
        Self {
            categories,
            cache,
            template,
            config,
            query_timeout,
        }
    }

    pub fn limit(&self) -> usize {
        self.config.article_list_limit.min(MAX_ARTICLE_LIST_LIMIT)
    }

    /// Most recent blog articles of the user, highest page id first.
    ///
    /// A cached list is returned as-is until its TTL runs out, so a save made
    /// within that window may not be visible yet. Nothing is cached when the
    /// backing query fails.
    #[instrument(skip(self))]
    pub async fn recent_articles(
        &self,
        user_id: UserId,
        user_name: &str,
    ) -> Result<Vec<BlogArticleSummary>, AppError> {
        let key = CacheKey::ProfileArticles(user_id);

        if self.config.enabled
            && let Some(articles) =
                get_json::<Vec<BlogArticleSummary>>(self.cache.as_ref(), &key).await?
        {
            counter!(METRIC_LIST_HIT).increment(1);
            debug!(%user_id, user_name, cache = "hit", "Got profile articles from cache");
            return Ok(articles);
        }

        counter!(METRIC_LIST_MISS).increment(1);
        debug!(%user_id, user_name, cache = "miss", "Got profile articles from database");

        let articles = self.load(user_name).await?;

        if self.config.enabled
            && let Err(err) = set_json(
                self.cache.as_ref(),
                &key,
                &articles,
                self.config.article_list_ttl(),
            )
            .await
        {
            warn!(%user_id, error = %err, "Failed to cache profile articles");
        }

        Ok(articles)
    }

    async fn load(&self, user_name: &str) -> Result<Vec<BlogArticleSummary>, AppError> {
        let category = self.template.render(user_name);
        let limit = self.limit();
        let fetch_limit = u32::try_from(limit).unwrap_or(u32::MAX);

        let mut articles = bounded(
            "list_recent_pages_in_category",
            self.query_timeout,
            self.categories
                .list_recent_pages_in_category(&category, Namespace::BLOG, fetch_limit),
        )
        .await?;

        articles.retain(|article| article.namespace.is_blog());
        articles.sort_by(|a, b| b.page_id.cmp(&a.page_id));
        articles.dedup_by_key(|article| article.page_id);
        articles.truncate(limit);

        Ok(articles)
    }
}
