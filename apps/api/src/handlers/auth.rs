use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use gatehouse_application::Session;
use gatehouse_domain::RegistrationForm;

use crate::dto::{
    ChangePasswordRequest, GenericMessageResponse, PasswordResetRequest, RegisterResponse,
    SessionResponse, SignInRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

/// POST /auth/register - Create an account and its profile.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegistrationForm>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let account_id = state.auth_gate_service.register(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            account_id: account_id.to_string(),
        }),
    ))
}

/// POST /auth/sign-in - Exchange credentials for a bearer token.
pub async fn sign_in_handler(
    State(state): State<AppState>,
    Json(payload): Json<SignInRequest>,
) -> ApiResult<Json<SessionResponse>> {
    let session = state
        .auth_gate_service
        .sign_in(&payload.email, &payload.password)
        .await?;

    Ok(Json(SessionResponse::from(session)))
}

/// POST /auth/sign-out - End the current session.
pub async fn sign_out_handler(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<StatusCode> {
    state.auth_gate_service.sign_out(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /auth/password-reset - Email a reset link.
pub async fn password_reset_handler(
    State(state): State<AppState>,
    Json(payload): Json<PasswordResetRequest>,
) -> ApiResult<(StatusCode, Json<GenericMessageResponse>)> {
    state
        .auth_gate_service
        .request_password_reset(&payload.email)
        .await?;

    // Same answer whether or not the address is registered.
    Ok((
        StatusCode::ACCEPTED,
        Json(GenericMessageResponse {
            message: "if an account exists for this address, a reset link has been sent"
                .to_owned(),
        }),
    ))
}

/// PUT /auth/password - Change the password of the signed-in account.
pub async fn change_password_handler(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<StatusCode> {
    state
        .auth_gate_service
        .change_password(&session, &payload.new_password, &payload.confirm_password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
