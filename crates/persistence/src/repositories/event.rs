//! Event repository.

use async_trait::async_trait;
use domain::models::Event;
use domain::ports::{EventRepository, RepositoryError};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::EventEntity;
use crate::error::map_sqlx_error;
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn save(&self, event: &Event) -> Result<(), RepositoryError> {
        let timer = QueryTimer::new("save_event");
        let result = sqlx::query(
            r#"
            INSERT INTO events (id, name, allowed_domains, description, start_date, end_date,
                                status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(event.id)
        .bind(&event.name)
        .bind(&event.allowed_domains)
        .bind(&event.description)
        .bind(event.start_date)
        .bind(event.end_date)
        .bind(event.status.as_str())
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await;
        timer.record();

        result
            .map(|_| ())
            .map_err(|e| map_sqlx_error("save_event", e))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, RepositoryError> {
        let timer = QueryTimer::new("find_event_by_id");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT id, name, allowed_domains, description, start_date, end_date,
                   status, created_at, updated_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        result
            .map_err(|e| map_sqlx_error("find_event_by_id", e))?
            .map(Event::try_from)
            .transpose()
    }
}
