//! Event domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::activity::Activity;
use super::check_in::CheckIn;
use crate::errors::DomainError;

/// Lifecycle status of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Draft,
    Published,
    Cancelled,
    Completed,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Draft => "draft",
            EventStatus::Published => "published",
            EventStatus::Cancelled => "cancelled",
            EventStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(EventStatus::Draft),
            "published" => Ok(EventStatus::Published),
            "cancelled" => Ok(EventStatus::Cancelled),
            "completed" => Ok(EventStatus::Completed),
            other => Err(DomainError::Validation(format!(
                "unknown event status: {}",
                other
            ))),
        }
    }
}

/// A time-boxed organizational unit containing activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    /// Email domains permitted to check in. Empty means unrestricted.
    pub allowed_domains: Vec<String>,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Parameters for building a new event.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub name: String,
    pub allowed_domains: Vec<String>,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl Event {
    /// Builds a draft event, normalizing the domain allow-list.
    pub fn new(params: NewEvent) -> Result<Self, DomainError> {
        let name = params.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::Validation("event name must not be blank".into()));
        }
        if params.start_date >= params.end_date {
            return Err(DomainError::Validation(
                "start date must be before end date".into(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            allowed_domains: shared::email::normalize_domains(&params.allowed_domains),
            description: params.description,
            start_date: params.start_date,
            end_date: params.end_date,
            status: EventStatus::Draft,
            created_at: Utc::now(),
            updated_at: None,
        })
    }

    pub fn restricts_domains(&self) -> bool {
        !self.allowed_domains.is_empty()
    }

    /// Whether a user with this email may check in to the event's activities.
    pub fn is_allowed_email(&self, email: &str) -> bool {
        if !self.restricts_domains() {
            return true;
        }
        match shared::email::extract_domain(email) {
            Some(domain) => self.allowed_domains.iter().any(|d| *d == domain),
            None => false,
        }
    }

    /// Whether `[start, end]` lies inside the event window.
    pub fn contains_window(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start >= self.start_date && end <= self.end_date
    }
}

/// Request to create a new event.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200, message = "name must be between 1 and 200 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,

    #[validate(custom(function = "shared::validation::validate_allowed_domains"))]
    pub allowed_domains: Option<Vec<String>>,

    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: Option<String>,

    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl From<CreateEventRequest> for NewEvent {
    fn from(request: CreateEventRequest) -> Self {
        Self {
            name: request.name,
            allowed_domains: request.allowed_domains.unwrap_or_default(),
            description: request.description,
            start_date: request.start_date,
            end_date: request.end_date,
        }
    }
}

/// An event together with its activities.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EventWithActivities {
    pub event: Event,
    pub activities: Vec<Activity>,
}

/// An activity together with the check-ins recorded for it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ActivityWithCheckIns {
    pub activity_id: Uuid,
    pub activity_name: String,
    pub check_ins: Vec<CheckIn>,
}

/// Full event details: activities and their check-ins.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EventDetails {
    pub event: Event,
    pub activities: Vec<ActivityWithCheckIns>,
}
