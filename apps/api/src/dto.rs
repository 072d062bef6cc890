use chrono::{DateTime, Utc};
use gatehouse_application::Session;
use gatehouse_domain::UserProfile;
use serde::{Deserialize, Serialize};

/// Health response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Generic message response.
#[derive(Debug, Serialize)]
pub struct GenericMessageResponse {
    pub message: String,
}

/// Response for a created account.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub account_id: String,
}

/// Incoming payload for sign-in. Missing fields read as empty.
#[derive(Debug, Default, Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Session handed to the client after sign-in.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub token: String,
    pub account_id: String,
    pub authenticated_at: DateTime<Utc>,
}

impl From<Session> for SessionResponse {
    fn from(value: Session) -> Self {
        Self {
            token: value.token().to_owned(),
            account_id: value.account_id().to_string(),
            authenticated_at: value.authenticated_at(),
        }
    }
}

/// Incoming payload for a password reset email.
#[derive(Debug, Default, Deserialize)]
pub struct PasswordResetRequest {
    #[serde(default)]
    pub email: String,
}

/// Incoming payload for a password change.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirm_password: String,
}

/// Incoming payload for renaming the profile owner.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// API representation of a stored profile.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserProfile> for ProfileResponse {
    fn from(value: UserProfile) -> Self {
        Self {
            first_name: value.first_name().to_owned(),
            last_name: value.last_name().to_owned(),
            username: value.username().to_owned(),
            email: value.email().to_owned(),
            created_at: value.created_at(),
        }
    }
}
