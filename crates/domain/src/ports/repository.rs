//! Repository contracts for events, activities and check-ins.
//!
//! Lookups return `Ok(None)` or an empty vector for "not found"; `Err` is
//! reserved for infrastructure failures.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Activity, CheckIn, Event};

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A uniqueness constraint rejected the write.
    #[error("repository conflict: {0}")]
    Conflict(String),

    #[error("repository backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn save(&self, event: &Event) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, RepositoryError>;
}

#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Persists all activities or none of them.
    async fn save_all(&self, activities: &[Activity]) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Activity>, RepositoryError>;

    /// Activities of an event ordered by start date.
    async fn find_by_event_id(&self, event_id: Uuid) -> Result<Vec<Activity>, RepositoryError>;

    async fn find_by_event_id_and_names(
        &self,
        event_id: Uuid,
        names: &[String],
    ) -> Result<Vec<Activity>, RepositoryError>;
}

#[async_trait]
pub trait CheckInRepository: Send + Sync {
    /// Inserts a check-in. A second check-in for the same user and activity
    /// fails with [`RepositoryError::Conflict`].
    async fn save(&self, check_in: &CheckIn) -> Result<(), RepositoryError>;

    async fn find_by_user_and_activity(
        &self,
        user_id: &str,
        activity_id: Uuid,
    ) -> Result<Option<CheckIn>, RepositoryError>;

    async fn find_by_activity_ids(
        &self,
        activity_ids: &[Uuid],
    ) -> Result<Vec<CheckIn>, RepositoryError>;

    /// Check-ins of a user, newest first.
    async fn find_by_user_id(&self, user_id: &str) -> Result<Vec<CheckIn>, RepositoryError>;
}
