use axum::Json;
use axum::extract::{Extension, State};
use gatehouse_application::Session;

use crate::dto::{ProfileResponse, UpdateProfileRequest};
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /profile
pub async fn profile_handler(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = state
        .auth_gate_service
        .profile(session.account_id())
        .await?;

    Ok(Json(ProfileResponse::from(profile)))
}

/// PUT /profile - Rename the profile owner.
pub async fn update_profile_handler(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = state
        .auth_gate_service
        .update_profile_names(
            session.account_id(),
            &payload.first_name,
            &payload.last_name,
        )
        .await?;

    Ok(Json(ProfileResponse::from(profile)))
}
