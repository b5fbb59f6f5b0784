//! Event endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{
    Activity, CreateActivitiesRequest, CreateEventRequest, Event, EventDetails,
    EventWithActivities, NewActivity, NewEvent,
};
use domain::services::FinishEventOutcome;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::record_jobs_enqueued;

/// Create an event. Admin only.
///
/// POST /api/v1/events
pub async fn create_event(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    request.validate()?;

    let event = state
        .create_event
        .execute(&user_auth.user_id, NewEvent::from(request))
        .await?;

    tracing::info!(event_id = %event.id, user_id = %user_auth.user_id, "Event created");
    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /api/v1/events/:event_id
pub async fn get_event(
    State(state): State<AppState>,
    _user_auth: UserAuth,
    Path(event_id): Path<Uuid>,
) -> Result<Json<EventWithActivities>, ApiError> {
    let event = state.event_queries.get_event_with_activities(event_id).await?;
    Ok(Json(event))
}

/// Event with every activity and its check-ins.
///
/// GET /api/v1/events/:event_id/details
pub async fn get_event_details(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(event_id): Path<Uuid>,
) -> Result<Json<EventDetails>, ApiError> {
    let details = state
        .event_queries
        .get_event_details(user_auth.role.as_str(), event_id)
        .await?;
    Ok(Json(details))
}

/// Create up to ten activities under an event. Admin only.
///
/// POST /api/v1/events/:event_id/activities
pub async fn create_activities(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(event_id): Path<Uuid>,
    Json(request): Json<CreateActivitiesRequest>,
) -> Result<(StatusCode, Json<Vec<Activity>>), ApiError> {
    request.validate()?;

    let items = request.activities.into_iter().map(NewActivity::from).collect();
    let activities = state
        .create_activities
        .execute(&user_auth.user_id, event_id, items)
        .await?;

    tracing::info!(
        event_id = %event_id,
        count = activities.len(),
        "Activities created"
    );
    Ok((StatusCode::CREATED, Json(activities)))
}

/// Finish an event and queue one certificate per check-in. Admin only.
///
/// Certificates are delivered asynchronously, hence 202.
///
/// POST /api/v1/events/:event_id/finish
pub async fn finish_event(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(event_id): Path<Uuid>,
) -> Result<(StatusCode, Json<FinishEventOutcome>), ApiError> {
    let outcome = state
        .finish_event
        .execute(&user_auth.user_id, event_id)
        .await?;

    record_jobs_enqueued(outcome.jobs_enqueued);
    tracing::info!(
        event_id = %event_id,
        jobs_enqueued = outcome.jobs_enqueued,
        "Event finished, certificate jobs queued"
    );
    Ok((StatusCode::ACCEPTED, Json(outcome)))
}
