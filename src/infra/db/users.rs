use async_trait::async_trait;

use crate::{
    application::repos::{RepoError, UsersRepo},
    domain::{category::display_form, entities::UserRecord, types::UserId},
};

use super::{PostgresRepositories, util::map_sqlx_error};

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: UserId,
    user_name: String,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.user_id,
            name: row.user_name,
        }
    }
}

#[async_trait]
impl UsersRepo for PostgresRepositories {
    /// User names are stored in display form (`Mary Ann`, never `Mary_Ann`).
    async fn find_by_name(&self, name: &str) -> Result<Option<UserRecord>, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, user_name
            FROM users
            WHERE user_name = $1
            "#,
        )
        .bind(display_form(name))
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(UserRecord::from))
    }
}
