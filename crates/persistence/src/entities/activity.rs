//! Activity entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::Activity;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the activities table.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityEntity {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<ActivityEntity> for Activity {
    fn from(entity: ActivityEntity) -> Self {
        Self {
            id: entity.id,
            event_id: entity.event_id,
            name: entity.name,
            description: entity.description,
            start_date: entity.start_date,
            end_date: entity.end_date,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
