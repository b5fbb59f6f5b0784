//! Domain error taxonomy.
//!
//! Business-rule variants are expected, caller-facing outcomes. The
//! `Repository` and `Queue` variants wrap infrastructure failures with the
//! operation that failed.

use thiserror::Error;
use uuid::Uuid;

use crate::ports::queue::QueueError;
use crate::ports::repository::RepositoryError;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("user already checked in to this activity")]
    AlreadyCheckedIn,

    #[error("email domain '{domain}' is not allowed for this event")]
    DomainNotAllowed { domain: String },

    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("event has no activities")]
    NoActivities,

    #[error("activity {activity_id} has not ended yet")]
    ActivityNotEnded { activity_id: Uuid },

    #[error("activity {activity_id} is not open for check-in")]
    ActivityNotOpen { activity_id: Uuid },

    #[error("no check-ins found for the event's activities")]
    NoCheckIns,

    #[error("no users could be resolved for the event's check-ins")]
    NoUsers,

    #[error("validation error: {0}")]
    Validation(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal consistency error: {0}")]
    Inconsistent(String),

    #[error("{context}: {source}")]
    Repository {
        context: &'static str,
        #[source]
        source: RepositoryError,
    },

    #[error("{context}: {source}")]
    Queue {
        context: &'static str,
        #[source]
        source: QueueError,
    },
}

impl DomainError {
    /// Whether this error is an expected business outcome rather than an
    /// infrastructure or consistency failure.
    pub fn is_business_rule(&self) -> bool {
        !matches!(
            self,
            DomainError::Inconsistent(_)
                | DomainError::Repository { .. }
                | DomainError::Queue { .. }
        )
    }
}

/// Attaches operation context to port errors.
pub(crate) trait ResultExt<T> {
    fn context(self, context: &'static str) -> Result<T, DomainError>;
}

impl<T> ResultExt<T> for Result<T, RepositoryError> {
    fn context(self, context: &'static str) -> Result<T, DomainError> {
        self.map_err(|source| DomainError::Repository { context, source })
    }
}

impl<T> ResultExt<T> for Result<T, QueueError> {
    fn context(self, context: &'static str) -> Result<T, DomainError> {
        self.map_err(|source| DomainError::Queue { context, source })
    }
}
