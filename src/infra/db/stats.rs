use async_trait::async_trait;

use crate::{
    application::repos::{RepoError, UserStatsRepo},
    domain::{entities::UserBlogStats, types::UserId},
};

use super::{
    PostgresRepositories,
    util::{convert_count, map_sqlx_error},
};

#[derive(sqlx::FromRow)]
struct UserStatsRow {
    stats_user_id: UserId,
    stats_articles_created: i64,
}

impl TryFrom<UserStatsRow> for UserBlogStats {
    type Error = RepoError;

    fn try_from(row: UserStatsRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: row.stats_user_id,
            articles_created: convert_count(row.stats_articles_created)?,
        })
    }
}

#[async_trait]
impl UserStatsRepo for PostgresRepositories {
    async fn read_stats(&self, user_id: UserId) -> Result<Option<UserBlogStats>, RepoError> {
        let row = sqlx::query_as::<_, UserStatsRow>(
            r#"
            SELECT stats_user_id, stats_articles_created
            FROM user_blog_stats
            WHERE stats_user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(UserBlogStats::try_from).transpose()
    }

    async fn write_stats(&self, stats: UserBlogStats) -> Result<(), RepoError> {
        let articles_created =
            i64::try_from(stats.articles_created).map_err(|_| RepoError::Integrity {
                message: format!(
                    "articles_created `{}` exceeds the column range",
                    stats.articles_created
                ),
            })?;

        sqlx::query(
            r#"
            INSERT INTO user_blog_stats (stats_user_id, stats_articles_created, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (stats_user_id) DO UPDATE
            SET stats_articles_created = EXCLUDED.stats_articles_created,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(stats.user_id)
        .bind(articles_created)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}
