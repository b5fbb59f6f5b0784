//! Check-in repository.
//!
//! Uniqueness of `(user_id, activity_id)` is enforced by a unique index;
//! a duplicate insert surfaces as `RepositoryError::Conflict`.

use async_trait::async_trait;
use domain::models::CheckIn;
use domain::ports::{CheckInRepository, RepositoryError};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::CheckInEntity;
use crate::error::map_sqlx_error;
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct PgCheckInRepository {
    pool: PgPool,
}

impl PgCheckInRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CheckInRepository for PgCheckInRepository {
    async fn save(&self, check_in: &CheckIn) -> Result<(), RepositoryError> {
        let timer = QueryTimer::new("save_check_in");
        let result = sqlx::query(
            r#"
            INSERT INTO check_ins (id, user_id, activity_id, checked_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(check_in.id)
        .bind(&check_in.user_id)
        .bind(check_in.activity_id)
        .bind(check_in.checked_at)
        .execute(&self.pool)
        .await;
        timer.record();

        result
            .map(|_| ())
            .map_err(|e| map_sqlx_error("save_check_in", e))
    }

    async fn find_by_user_and_activity(
        &self,
        user_id: &str,
        activity_id: Uuid,
    ) -> Result<Option<CheckIn>, RepositoryError> {
        let timer = QueryTimer::new("find_check_in_by_user_and_activity");
        let result = sqlx::query_as::<_, CheckInEntity>(
            r#"
            SELECT id, user_id, activity_id, checked_at
            FROM check_ins
            WHERE user_id = $1 AND activity_id = $2
            "#,
        )
        .bind(user_id)
        .bind(activity_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        result
            .map(|row| row.map(CheckIn::from))
            .map_err(|e| map_sqlx_error("find_check_in_by_user_and_activity", e))
    }

    async fn find_by_activity_ids(
        &self,
        activity_ids: &[Uuid],
    ) -> Result<Vec<CheckIn>, RepositoryError> {
        let timer = QueryTimer::new("find_check_ins_by_activity_ids");
        let result = sqlx::query_as::<_, CheckInEntity>(
            r#"
            SELECT id, user_id, activity_id, checked_at
            FROM check_ins
            WHERE activity_id = ANY($1)
            ORDER BY checked_at ASC
            "#,
        )
        .bind(activity_ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();

        result
            .map(|rows| rows.into_iter().map(CheckIn::from).collect())
            .map_err(|e| map_sqlx_error("find_check_ins_by_activity_ids", e))
    }

    async fn find_by_user_id(&self, user_id: &str) -> Result<Vec<CheckIn>, RepositoryError> {
        let timer = QueryTimer::new("find_check_ins_by_user_id");
        let result = sqlx::query_as::<_, CheckInEntity>(
            r#"
            SELECT id, user_id, activity_id, checked_at
            FROM check_ins
            WHERE user_id = $1
            ORDER BY checked_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();

        result
            .map(|rows| rows.into_iter().map(CheckIn::from).collect())
            .map_err(|e| map_sqlx_error("find_check_ins_by_user_id", e))
    }
}
