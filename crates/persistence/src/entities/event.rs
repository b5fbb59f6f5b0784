//! Event entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Event, EventStatus};
use domain::ports::RepositoryError;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the events table.
#[derive(Debug, Clone, FromRow)]
pub struct EventEntity {
    pub id: Uuid,
    pub name: String,
    pub allowed_domains: Vec<String>,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<EventEntity> for Event {
    type Error = RepositoryError;

    fn try_from(entity: EventEntity) -> Result<Self, Self::Error> {
        let status: EventStatus = entity.status.parse().map_err(|_| {
            RepositoryError::Backend(format!(
                "event {} has unknown status '{}'",
                entity.id, entity.status
            ))
        })?;

        Ok(Self {
            id: entity.id,
            name: entity.name,
            allowed_domains: entity.allowed_domains,
            description: entity.description,
            start_date: entity.start_date,
            end_date: entity.end_date,
            status,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}
