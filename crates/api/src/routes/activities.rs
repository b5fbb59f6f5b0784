//! Activity endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::CheckIn;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// Check the caller in to an activity.
///
/// POST /api/v1/activities/:activity_id/check-in
pub async fn check_in(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(activity_id): Path<Uuid>,
) -> Result<(StatusCode, Json<CheckIn>), ApiError> {
    let check_in = state
        .check_in_activity
        .execute(&user_auth.user_id, activity_id)
        .await?;

    tracing::info!(
        check_in_id = %check_in.id,
        activity_id = %activity_id,
        user_id = %user_auth.user_id,
        "User checked in"
    );
    Ok((StatusCode::CREATED, Json(check_in)))
}
