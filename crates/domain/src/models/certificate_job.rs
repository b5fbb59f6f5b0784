//! Certificate job: the self-contained message carried by the certificate queue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::activity::Activity;
use super::check_in::CheckIn;
use super::event::Event;
use super::user::UserInfo;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventInfo {
    pub event_id: Uuid,
    pub event_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobUserInfo {
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityInfo {
    pub activity_id: Uuid,
    pub activity_name: String,
    pub activity_date: DateTime<Utc>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// One certificate to render and send.
///
/// Jobs are immutable snapshots; the worker never looks the event, user or
/// activity up again. `CertificateJob::new` is the only constructor, so
/// every job carries a fresh `job_id` and the time it was built as
/// `enqueued_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateJob {
    job_id: Uuid,
    event_info: EventInfo,
    user_info: JobUserInfo,
    activity_info: ActivityInfo,
    checked_at: DateTime<Utc>,
    enqueued_at: DateTime<Utc>,
}

impl CertificateJob {
    pub fn new(event: &Event, user: &UserInfo, activity: &Activity, check_in: &CheckIn) -> Self {
        Self {
            job_id: Uuid::new_v4(),
            event_info: EventInfo {
                event_id: event.id,
                event_name: event.name.clone(),
            },
            user_info: JobUserInfo {
                user_id: user.id.clone(),
                user_name: user.full_name(),
                user_email: user.email.clone(),
            },
            activity_info: ActivityInfo {
                activity_id: activity.id,
                activity_name: activity.name.clone(),
                activity_date: activity.start_date,
                start_time: activity.start_date,
                end_time: activity.end_date,
            },
            checked_at: check_in.checked_at,
            enqueued_at: Utc::now(),
        }
    }

    pub fn job_id(&self) -> Uuid {
        self.job_id
    }

    pub fn event_info(&self) -> &EventInfo {
        &self.event_info
    }

    pub fn user_info(&self) -> &JobUserInfo {
        &self.user_info
    }

    pub fn activity_info(&self) -> &ActivityInfo {
        &self.activity_info
    }

    pub fn checked_at(&self) -> DateTime<Utc> {
        self.checked_at
    }

    pub fn enqueued_at(&self) -> DateTime<Utc> {
        self.enqueued_at
    }
}
