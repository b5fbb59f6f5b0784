use std::sync::Arc;

use crate::errors::{DomainError, ResultExt};
use crate::models::{Event, NewEvent};
use crate::ports::{EventRepository, UserAuthorizationService};

/// Creates a draft event on behalf of an admin.
pub struct CreateEvent {
    events: Arc<dyn EventRepository>,
    users: Arc<dyn UserAuthorizationService>,
}

impl CreateEvent {
    pub fn new(events: Arc<dyn EventRepository>, users: Arc<dyn UserAuthorizationService>) -> Self {
        Self { events, users }
    }

    pub async fn execute(&self, user_id: &str, params: NewEvent) -> Result<Event, DomainError> {
        let caller = self
            .users
            .get_user_by_id(user_id)
            .await
            .context("failed to find user")?
            .ok_or_else(|| DomainError::NotFound("user".into()))?;
        if !caller.is_admin {
            return Err(DomainError::Forbidden("only admins can create events".into()));
        }

        let event = Event::new(params)?;
        self.events
            .save(&event)
            .await
            .context("failed to save event")?;

        tracing::info!(event_id = %event.id, name = %event.name, "Event created");
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventStatus, UserInfo};
    use crate::ports::memory::{InMemoryEventRepository, InMemoryUserDirectory};
    use chrono::{Duration, Utc};

    fn use_case() -> (CreateEvent, Arc<InMemoryEventRepository>) {
        let events = Arc::new(InMemoryEventRepository::new());
        let users = Arc::new(InMemoryUserDirectory::with_users(vec![
            UserInfo {
                id: "admin".into(),
                first_name: "Grace".into(),
                last_name: "Hopper".into(),
                email: "admin@acme.com".into(),
                is_admin: true,
            },
            UserInfo {
                id: "u1".into(),
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                email: "u1@acme.com".into(),
                is_admin: false,
            },
        ]));
        (CreateEvent::new(events.clone(), users), events)
    }

    fn params() -> NewEvent {
        let start = Utc::now() + Duration::days(7);
        NewEvent {
            name: "Conf2024".into(),
            allowed_domains: vec!["@ACME.com".into()],
            description: Some("Annual conference".into()),
            start_date: start,
            end_date: start + Duration::days(2),
        }
    }

    #[tokio::test]
    async fn test_admin_creates_draft_event() {
        let (use_case, events) = use_case();
        let event = use_case.execute("admin", params()).await.unwrap();

        assert_eq!(event.status, EventStatus::Draft);
        assert_eq!(event.allowed_domains, vec!["acme.com".to_string()]);
        assert_eq!(events.find_by_id(event.id).await.unwrap(), Some(event));
    }

    #[tokio::test]
    async fn test_non_admin_is_forbidden() {
        let (use_case, _) = use_case();
        let result = use_case.execute("u1", params()).await;
        assert!(matches!(result, Err(DomainError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_invalid_window_is_rejected() {
        let (use_case, _) = use_case();
        let mut p = params();
        p.end_date = p.start_date - Duration::hours(1);
        let result = use_case.execute("admin", p).await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
