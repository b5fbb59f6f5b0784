//! Activity domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::errors::DomainError;

/// Maximum number of activities accepted in a single create request.
pub const MAX_ACTIVITIES_PER_REQUEST: usize = 10;

/// A scheduled sub-session of an event that attendees check into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Activity {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Parameters for building a new activity.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub name: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl Activity {
    pub fn new(event_id: Uuid, params: NewActivity) -> Result<Self, DomainError> {
        let name = params.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::Validation(
                "activity name must not be blank".into(),
            ));
        }
        if params.start_date >= params.end_date {
            return Err(DomainError::Validation(format!(
                "activity '{}': start date must be before end date",
                name
            )));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            event_id,
            name,
            description: params.description,
            start_date: params.start_date,
            end_date: params.end_date,
            created_at: Utc::now(),
            updated_at: None,
        })
    }

    pub fn has_started_at(&self, at: DateTime<Utc>) -> bool {
        self.start_date <= at
    }

    /// An activity has ended once its end date is strictly in the past.
    pub fn has_ended_at(&self, at: DateTime<Utc>) -> bool {
        self.end_date < at
    }

    pub fn is_open_at(&self, at: DateTime<Utc>) -> bool {
        self.has_started_at(at) && !self.has_ended_at(at)
    }
}

/// One activity in a create request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateActivityItem {
    #[validate(length(min = 1, max = 200, message = "name must be between 1 and 200 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,

    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: Option<String>,

    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl From<CreateActivityItem> for NewActivity {
    fn from(item: CreateActivityItem) -> Self {
        Self {
            name: item.name,
            description: item.description,
            start_date: item.start_date,
            end_date: item.end_date,
        }
    }
}

/// Request to create a batch of activities under one event.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateActivitiesRequest {
    #[validate(length(
        min = 1,
        max = 10,
        message = "between 1 and 10 activities may be created per request"
    ))]
    #[validate(nested)]
    pub activities: Vec<CreateActivityItem>,
}
