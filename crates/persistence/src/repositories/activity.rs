//! Activity repository.

use async_trait::async_trait;
use domain::models::Activity;
use domain::ports::{ActivityRepository, RepositoryError};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ActivityEntity;
use crate::error::map_sqlx_error;
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct PgActivityRepository {
    pool: PgPool,
}

impl PgActivityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityRepository for PgActivityRepository {
    async fn save_all(&self, activities: &[Activity]) -> Result<(), RepositoryError> {
        let timer = QueryTimer::new("save_activities");
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("save_activities", e))?;

        for activity in activities {
            sqlx::query(
                r#"
                INSERT INTO activities (id, event_id, name, description, start_date, end_date,
                                        created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(activity.id)
            .bind(activity.event_id)
            .bind(&activity.name)
            .bind(&activity.description)
            .bind(activity.start_date)
            .bind(activity.end_date)
            .bind(activity.created_at)
            .bind(activity.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("save_activities", e))?;
        }

        let result = tx.commit().await;
        timer.record();
        result.map_err(|e| map_sqlx_error("save_activities", e))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Activity>, RepositoryError> {
        let timer = QueryTimer::new("find_activity_by_id");
        let result = sqlx::query_as::<_, ActivityEntity>(
            r#"
            SELECT id, event_id, name, description, start_date, end_date, created_at, updated_at
            FROM activities
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        result
            .map(|row| row.map(Activity::from))
            .map_err(|e| map_sqlx_error("find_activity_by_id", e))
    }

    async fn find_by_event_id(&self, event_id: Uuid) -> Result<Vec<Activity>, RepositoryError> {
        let timer = QueryTimer::new("find_activities_by_event_id");
        let result = sqlx::query_as::<_, ActivityEntity>(
            r#"
            SELECT id, event_id, name, description, start_date, end_date, created_at, updated_at
            FROM activities
            WHERE event_id = $1
            ORDER BY start_date ASC, name ASC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();

        result
            .map(|rows| rows.into_iter().map(Activity::from).collect())
            .map_err(|e| map_sqlx_error("find_activities_by_event_id", e))
    }

    async fn find_by_event_id_and_names(
        &self,
        event_id: Uuid,
        names: &[String],
    ) -> Result<Vec<Activity>, RepositoryError> {
        let timer = QueryTimer::new("find_activities_by_names");
        let result = sqlx::query_as::<_, ActivityEntity>(
            r#"
            SELECT id, event_id, name, description, start_date, end_date, created_at, updated_at
            FROM activities
            WHERE event_id = $1 AND name = ANY($2)
            "#,
        )
        .bind(event_id)
        .bind(names)
        .fetch_all(&self.pool)
        .await;
        timer.record();

        result
            .map(|rows| rows.into_iter().map(Activity::from).collect())
            .map_err(|e| map_sqlx_error("find_activities_by_names", e))
    }
}
