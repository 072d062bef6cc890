use gatehouse_core::{AppError, AppResult, FieldError, ValidationErrorKind};
use gatehouse_domain::{FormField, validate_email};

use crate::{SIGN_IN_ACTION, Session};

use super::{AuthGateService, collect_field_errors};

impl AuthGateService {
    /// Signs in with email and password.
    ///
    /// Only the email format is checked locally; the password only has to be
    /// present, since accounts may predate the current password rules.
    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<Session> {
        let password_check = if password.is_empty() {
            Err(FieldError::new(
                ValidationErrorKind::TooShort,
                "Password is required",
            ))
        } else {
            Ok(())
        };
        collect_field_errors([
            (FormField::Email, validate_email(email)),
            (FormField::Password, password_check),
        ])?;

        self.rate_limits.require_admission(SIGN_IN_ACTION, email)?;

        let session = self.backend.sign_in(email, password).await?;

        self.rate_limits.reset(SIGN_IN_ACTION, email)?;

        Ok(session)
    }

    /// Ends a session. Not rate limited.
    pub async fn sign_out(&self, session: &Session) -> AppResult<()> {
        self.backend.sign_out(session).await
    }

    /// Resolves a bearer token, failing with `Unauthorized` when it is unknown.
    pub async fn authenticate(&self, token: &str) -> AppResult<Session> {
        self.backend
            .session(token)
            .await?
            .ok_or_else(|| AppError::Unauthorized("session is missing or expired".to_owned()))
    }
}
