//! User directory over the `users` table.

use async_trait::async_trait;
use domain::models::UserInfo;
use domain::ports::{RepositoryError, UserAuthorizationService};
use sqlx::PgPool;

use crate::entities::UserEntity;
use crate::error::map_sqlx_error;
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserAuthorizationService for PgUserDirectory {
    async fn get_user_by_id(&self, user_id: &str) -> Result<Option<UserInfo>, RepositoryError> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, first_name, last_name, email, role
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        result
            .map(|row| row.map(UserInfo::from))
            .map_err(|e| map_sqlx_error("find_user_by_id", e))
    }

    async fn is_user_admin(&self, user_id: &str) -> Result<bool, RepositoryError> {
        Ok(self
            .get_user_by_id(user_id)
            .await?
            .map(|user| user.is_admin)
            .unwrap_or(false))
    }

    async fn get_user_email(&self, user_id: &str) -> Result<Option<String>, RepositoryError> {
        let timer = QueryTimer::new("find_user_email");
        let result: Result<Option<(String,)>, sqlx::Error> =
            sqlx::query_as("SELECT email FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await;
        timer.record();

        result
            .map(|row| row.map(|(email,)| email))
            .map_err(|e| map_sqlx_error("find_user_email", e))
    }

    async fn get_user_info_batch(
        &self,
        user_ids: &[String],
    ) -> Result<Vec<UserInfo>, RepositoryError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let timer = QueryTimer::new("find_users_by_ids");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, first_name, last_name, email, role
            FROM users
            WHERE id = ANY($1)
            "#,
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();

        result
            .map(|rows| rows.into_iter().map(UserInfo::from).collect())
            .map_err(|e| map_sqlx_error("find_users_by_ids", e))
    }
}
