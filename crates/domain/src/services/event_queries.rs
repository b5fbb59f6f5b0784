//! Read-side use cases over events.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::errors::{DomainError, ResultExt};
use crate::models::{ActivityWithCheckIns, CheckIn, EventDetails, EventWithActivities};
use crate::ports::{ActivityRepository, CheckInRepository, EventRepository};

/// Roles allowed to read event details.
const DETAIL_ROLES: [&str; 2] = ["admin", "user"];

pub struct EventQueries {
    events: Arc<dyn EventRepository>,
    activities: Arc<dyn ActivityRepository>,
    check_ins: Arc<dyn CheckInRepository>,
}

impl EventQueries {
    pub fn new(
        events: Arc<dyn EventRepository>,
        activities: Arc<dyn ActivityRepository>,
        check_ins: Arc<dyn CheckInRepository>,
    ) -> Self {
        Self {
            events,
            activities,
            check_ins,
        }
    }

    pub async fn get_event_with_activities(
        &self,
        event_id: Uuid,
    ) -> Result<EventWithActivities, DomainError> {
        let (event, activities) = tokio::try_join!(
            async {
                self.events
                    .find_by_id(event_id)
                    .await
                    .context("failed to find event")
            },
            async {
                self.activities
                    .find_by_event_id(event_id)
                    .await
                    .context("failed to find activities")
            },
        )?;

        let event = event.ok_or_else(|| DomainError::NotFound("event".into()))?;
        Ok(EventWithActivities { event, activities })
    }

    /// Event, activities and the check-ins of each activity.
    pub async fn get_event_details(
        &self,
        role: &str,
        event_id: Uuid,
    ) -> Result<EventDetails, DomainError> {
        if !DETAIL_ROLES.contains(&role) {
            return Err(DomainError::Forbidden(format!(
                "role '{}' cannot view event details",
                role
            )));
        }

        let EventWithActivities { event, activities } =
            self.get_event_with_activities(event_id).await?;

        let activity_ids: Vec<Uuid> = activities.iter().map(|a| a.id).collect();
        let check_ins = if activity_ids.is_empty() {
            Vec::new()
        } else {
            self.check_ins
                .find_by_activity_ids(&activity_ids)
                .await
                .context("failed to find check-ins")?
        };

        let mut by_activity: HashMap<Uuid, Vec<CheckIn>> = HashMap::new();
        for check_in in check_ins {
            by_activity
                .entry(check_in.activity_id)
                .or_default()
                .push(check_in);
        }

        let activities = activities
            .into_iter()
            .map(|a| ActivityWithCheckIns {
                check_ins: by_activity.remove(&a.id).unwrap_or_default(),
                activity_id: a.id,
                activity_name: a.name,
            })
            .collect();

        Ok(EventDetails { event, activities })
    }
}
