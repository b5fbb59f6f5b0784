//! Check-in admission.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::errors::{DomainError, ResultExt};
use crate::models::CheckIn;
use crate::ports::{
    ActivityRepository, CheckInRepository, EventRepository, RepositoryError,
    UserAuthorizationService,
};

/// Tunable admission rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckInPolicy {
    /// Reject check-ins outside the activity's start/end window.
    pub enforce_activity_window: bool,
}

/// Admits or rejects a single check-in.
pub struct CheckInActivity {
    events: Arc<dyn EventRepository>,
    activities: Arc<dyn ActivityRepository>,
    check_ins: Arc<dyn CheckInRepository>,
    users: Arc<dyn UserAuthorizationService>,
    policy: CheckInPolicy,
}

impl CheckInActivity {
    pub fn new(
        events: Arc<dyn EventRepository>,
        activities: Arc<dyn ActivityRepository>,
        check_ins: Arc<dyn CheckInRepository>,
        users: Arc<dyn UserAuthorizationService>,
        policy: CheckInPolicy,
    ) -> Self {
        Self {
            events,
            activities,
            check_ins,
            users,
            policy,
        }
    }

    pub async fn execute(&self, user_id: &str, activity_id: Uuid) -> Result<CheckIn, DomainError> {
        let (activity, existing) = tokio::try_join!(
            async {
                self.activities
                    .find_by_id(activity_id)
                    .await
                    .context("failed to find activity")
            },
            async {
                self.check_ins
                    .find_by_user_and_activity(user_id, activity_id)
                    .await
                    .context("failed to look up existing check-in")
            },
        )?;

        let activity = activity.ok_or_else(|| DomainError::NotFound("activity".into()))?;

        if existing.is_some() {
            tracing::info!(user_id, %activity_id, "Rejected duplicate check-in");
            return Err(DomainError::AlreadyCheckedIn);
        }

        if self.policy.enforce_activity_window && !activity.is_open_at(Utc::now()) {
            tracing::info!(user_id, %activity_id, "Rejected check-in outside activity window");
            return Err(DomainError::ActivityNotOpen { activity_id });
        }

        let (event, email) = tokio::try_join!(
            async {
                self.events
                    .find_by_id(activity.event_id)
                    .await
                    .context("failed to find event")
            },
            async {
                self.users
                    .get_user_email(user_id)
                    .await
                    .context("failed to resolve user email")
            },
        )?;

        let event = event.ok_or_else(|| DomainError::NotFound("event".into()))?;
        let email = email.ok_or_else(|| {
            DomainError::Unauthenticated("user email could not be resolved".into())
        })?;

        if !event.is_allowed_email(&email) {
            let domain = shared::email::extract_domain(&email).unwrap_or_default();
            tracing::warn!(
                user_id,
                event_id = %event.id,
                domain = %domain,
                "Rejected check-in from disallowed email domain"
            );
            return Err(DomainError::DomainNotAllowed { domain });
        }

        let check_in = CheckIn::new(user_id, activity_id);
        match self.check_ins.save(&check_in).await {
            Ok(()) => {}
            Err(RepositoryError::Conflict(_)) => return Err(DomainError::AlreadyCheckedIn),
            Err(source) => {
                return Err(DomainError::Repository {
                    context: "failed to save check-in",
                    source,
                })
            }
        }

        tracing::info!(
            user_id,
            %activity_id,
            check_in_id = %check_in.id,
            "Check-in recorded"
        );

        Ok(check_in)
    }
}
