use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::errors::{DomainError, ResultExt};
use crate::models::{Activity, NewActivity, MAX_ACTIVITIES_PER_REQUEST};
use crate::ports::{ActivityRepository, EventRepository, RepositoryError, UserAuthorizationService};

/// Adds a batch of activities to an existing event.
pub struct CreateActivities {
    events: Arc<dyn EventRepository>,
    activities: Arc<dyn ActivityRepository>,
    users: Arc<dyn UserAuthorizationService>,
}

impl CreateActivities {
    pub fn new(
        events: Arc<dyn EventRepository>,
        activities: Arc<dyn ActivityRepository>,
        users: Arc<dyn UserAuthorizationService>,
    ) -> Self {
        Self {
            events,
            activities,
            users,
        }
    }

    pub async fn execute(
        &self,
        user_id: &str,
        event_id: Uuid,
        items: Vec<NewActivity>,
    ) -> Result<Vec<Activity>, DomainError> {
        if items.is_empty() {
            return Err(DomainError::Validation("at least one activity is required".into()));
        }
        if items.len() > MAX_ACTIVITIES_PER_REQUEST {
            return Err(DomainError::Validation(format!(
                "at most {} activities may be created per request",
                MAX_ACTIVITIES_PER_REQUEST
            )));
        }

        let is_admin = self
            .users
            .is_user_admin(user_id)
            .await
            .context("failed to check admin role")?;
        if !is_admin {
            return Err(DomainError::Forbidden(
                "only admins can create activities".into(),
            ));
        }

        let event = self
            .events
            .find_by_id(event_id)
            .await
            .context("failed to find event")?
            .ok_or_else(|| DomainError::NotFound("event".into()))?;

        let activities = items
            .into_iter()
            .map(|item| Activity::new(event.id, item))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(outside) = activities
            .iter()
            .find(|a| !event.contains_window(a.start_date, a.end_date))
        {
            return Err(DomainError::Validation(format!(
                "activity '{}' must take place within the event dates",
                outside.name
            )));
        }

        let mut names = HashSet::new();
        if let Some(duplicate) = activities.iter().find(|a| !names.insert(a.name.as_str())) {
            return Err(DomainError::Validation(format!(
                "duplicate activity name '{}' in request",
                duplicate.name
            )));
        }

        let requested: Vec<String> = activities.iter().map(|a| a.name.clone()).collect();
        let existing = self
            .activities
            .find_by_event_id_and_names(event_id, &requested)
            .await
            .context("failed to check existing activity names")?;
        if let Some(taken) = existing.first() {
            return Err(DomainError::Conflict(format!(
                "activity '{}' already exists for this event",
                taken.name
            )));
        }

        match self.activities.save_all(&activities).await {
            Ok(()) => {}
            Err(RepositoryError::Conflict(message)) => return Err(DomainError::Conflict(message)),
            Err(source) => {
                return Err(DomainError::Repository {
                    context: "failed to save activities",
                    source,
                })
            }
        }

        tracing::info!(%event_id, count = activities.len(), "Activities created");
        Ok(activities)
    }
}
