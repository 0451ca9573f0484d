//! Data for the "blog articles" section of a user profile.
//!
//! Reads never recompute: the count comes from the persisted stats record.

use std::sync::Arc;

use serde::Serialize;
use tracing::instrument;

use crate::application::blog_articles::BlogArticleListService;
use crate::application::error::AppError;
use crate::application::messages::{Localizer, MessageKey};
use crate::application::stats::StatsStore;
use crate::domain::category::CategoryTemplate;
use crate::domain::entities::BlogArticleSummary;
use crate::domain::types::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileArticles {
    pub heading: String,
    pub articles: Vec<BlogArticleSummary>,
    pub articles_created: u64,
    /// Category listing every article, present when the list above is truncated.
    pub view_all_category: Option<String>,
}

pub struct ProfileArticlesService {
    articles: Arc<BlogArticleListService>,
    stats: Arc<StatsStore>,
    messages: Arc<dyn Localizer>,
    template: CategoryTemplate,
    show_articles: bool,
}

impl ProfileArticlesService {
    pub fn new(
        articles: Arc<BlogArticleListService>,
        stats: Arc<StatsStore>,
        messages: Arc<dyn Localizer>,
        template: CategoryTemplate,
        show_articles: bool,
    ) -> Self {
        Self {
            articles,
            stats,
            messages,
            template,
            show_articles,
        }
    }

    /// `None` when the profile is configured not to show blog articles.
    #[instrument(skip(self))]
    pub async fn load(
        &self,
        user_id: UserId,
        user_name: &str,
    ) -> Result<Option<ProfileArticles>, AppError> {
        if !self.show_articles {
            return Ok(None);
        }

        let articles = self.articles.recent_articles(user_id, user_name).await?;
        let articles_created = self.stats.read(user_id).await?.articles_created;

        let truncated = usize::try_from(articles_created)
            .map(|count| count > self.articles.limit())
            .unwrap_or(true);
        let view_all_category = truncated.then(|| self.template.render(user_name));

        Ok(Some(ProfileArticles {
            heading: self.messages.render(MessageKey::BlogByUser, &[user_name]),
            articles,
            articles_created,
            view_all_category,
        }))
    }
}
