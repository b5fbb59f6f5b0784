//! Check-in entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::CheckIn;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the check_ins table.
#[derive(Debug, Clone, FromRow)]
pub struct CheckInEntity {
    pub id: Uuid,
    pub user_id: String,
    pub activity_id: Uuid,
    pub checked_at: DateTime<Utc>,
}

impl From<CheckInEntity> for CheckIn {
    fn from(entity: CheckInEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            activity_id: entity.activity_id,
            checked_at: entity.checked_at,
        }
    }
}
