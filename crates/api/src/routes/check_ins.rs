//! Check-in history of the current user.

use axum::{extract::State, Json};
use domain::models::CheckIn;
use serde::Serialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

#[derive(Debug, Serialize)]
pub struct CheckInsResponse {
    pub check_ins: Vec<CheckIn>,
}

/// GET /api/v1/me/check-ins
pub async fn list_my_check_ins(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<CheckInsResponse>, ApiError> {
    let check_ins = state.list_user_check_ins.execute(&user_auth.user_id).await?;
    Ok(Json(CheckInsResponse { check_ins }))
}
