use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::ports::QueueError;
use domain::DomainError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The request is well-formed but the resource is not in a state that
    /// allows it (e.g. finishing an event that is still running).
    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<ValidationDetail>>,
}

#[derive(Debug, Serialize)]
pub struct ValidationDetail {
    pub field: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            ApiError::Unprocessable(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "unprocessable",
                msg.clone(),
            ),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
            ApiError::ServiceUnavailable(msg) => {
                tracing::error!("Service unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "service_unavailable",
                    "A required service is unavailable".into(),
                )
            }
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let message = err.to_string();
        match err {
            DomainError::NotFound(_) => ApiError::NotFound(message),
            DomainError::AlreadyCheckedIn | DomainError::Conflict(_) => ApiError::Conflict(message),
            DomainError::DomainNotAllowed { .. } | DomainError::Forbidden(_) => {
                ApiError::Forbidden(message)
            }
            DomainError::Unauthenticated(_) => ApiError::Unauthorized(message),
            DomainError::Validation(_) => ApiError::Validation(message),
            DomainError::NoActivities
            | DomainError::ActivityNotEnded { .. }
            | DomainError::ActivityNotOpen { .. }
            | DomainError::NoCheckIns
            | DomainError::NoUsers => ApiError::Unprocessable(message),
            DomainError::Queue {
                source: QueueError::Transport(_),
                ..
            } => ApiError::ServiceUnavailable(message),
            DomainError::Inconsistent(_)
            | DomainError::Repository { .. }
            | DomainError::Queue { .. } => ApiError::Internal(message),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: Vec<ValidationDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| ValidationDetail {
                    field: field.to_string(),
                    message: e
                        .message
                        .clone()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();

        let message = match details.as_slice() {
            [] => errors.to_string(),
            [single] => single.message.clone(),
            many => format!("{} validation errors", many.len()),
        };

        ApiError::Validation(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use domain::ports::RepositoryError;
    use uuid::Uuid;

    fn status_of(err: DomainError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn test_api_error_status_codes() {
        let cases = [
            (ApiError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("x".into()), StatusCode::CONFLICT),
            (ApiError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::Unprocessable("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (ApiError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (ApiError::ServiceUnavailable("x".into()), StatusCode::SERVICE_UNAVAILABLE),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            format!("{}", ApiError::Unauthorized("test".to_string())),
            "Unauthorized: test"
        );
        assert_eq!(
            format!("{}", ApiError::Unprocessable("test".to_string())),
            "Unprocessable: test"
        );
    }

    #[test]
    fn test_business_rule_mapping() {
        assert_eq!(status_of(DomainError::NotFound("activity".into())), StatusCode::NOT_FOUND);
        assert_eq!(status_of(DomainError::AlreadyCheckedIn), StatusCode::CONFLICT);
        assert_eq!(
            status_of(DomainError::DomainNotAllowed {
                domain: "other.com".into()
            }),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(DomainError::Unauthenticated("no email".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(DomainError::ActivityNotEnded {
                activity_id: Uuid::new_v4()
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status_of(DomainError::NoCheckIns), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status_of(DomainError::Validation("bad".into())), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_infrastructure_mapping() {
        assert_eq!(
            status_of(DomainError::Repository {
                context: "failed to find event",
                source: RepositoryError::Backend("timeout".into()),
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(DomainError::Queue {
                context: "failed to enqueue certificate jobs",
                source: QueueError::Transport("connection refused".into()),
            }),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(DomainError::Inconsistent("missing user".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_are_not_leaked() {
        let err = ApiError::from(DomainError::Repository {
            context: "failed to find event",
            source: RepositoryError::Backend("password authentication failed".into()),
        });
        assert!(matches!(err, ApiError::Internal(ref msg) if msg.contains("failed to find event")));
    }
}
