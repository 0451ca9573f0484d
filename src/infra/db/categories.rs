use async_trait::async_trait;

use crate::{
    application::repos::{CategoryLinksRepo, RepoError},
    domain::{
        category::{display_form, to_db_key},
        entities::BlogArticleSummary,
        types::{Namespace, PageId},
    },
};

use super::{
    PostgresRepositories,
    util::{convert_count, map_sqlx_error},
};

#[derive(sqlx::FromRow)]
struct CategoryPageRow {
    page_id: PageId,
    page_title: String,
    page_namespace: Namespace,
}

impl From<CategoryPageRow> for BlogArticleSummary {
    fn from(row: CategoryPageRow) -> Self {
        Self {
            page_id: row.page_id,
            title: display_form(&row.page_title),
            namespace: row.page_namespace,
        }
    }
}

#[async_trait]
impl CategoryLinksRepo for PostgresRepositories {
    async fn list_categories(&self, page_id: PageId) -> Result<Vec<String>, RepoError> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT cl_to
            FROM categorylinks
            WHERE cl_from = $1
            ORDER BY cl_to
            "#,
        )
        .bind(page_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)
    }

    async fn count_pages_in_category(
        &self,
        category: &str,
        namespace: Namespace,
    ) -> Result<u64, RepoError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(DISTINCT p.page_id)
            FROM categorylinks cl
            INNER JOIN page p ON p.page_id = cl.cl_from
            WHERE cl.cl_to = $1 AND p.page_namespace = $2
            "#,
        )
        .bind(to_db_key(category))
        .bind(namespace)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        convert_count(count)
    }

    async fn list_recent_pages_in_category(
        &self,
        category: &str,
        namespace: Namespace,
        limit: u32,
    ) -> Result<Vec<BlogArticleSummary>, RepoError> {
        let rows = sqlx::query_as::<_, CategoryPageRow>(
            r#"
            SELECT DISTINCT p.page_id, p.page_title, p.page_namespace
            FROM categorylinks cl
            INNER JOIN page p ON p.page_id = cl.cl_from
            WHERE cl.cl_to = $1 AND p.page_namespace = $2
            ORDER BY p.page_id DESC
            LIMIT $3
            "#,
        )
        .bind(to_db_key(category))
        .bind(namespace)
        .bind(i64::from(limit))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(BlogArticleSummary::from).collect())
    }
}
