use gatehouse_core::{AppError, AppResult, BackendError};
use gatehouse_domain::{FormField, confirm_matches, validate_email, validate_password};

use crate::{PASSWORD_RESET_ACTION, PASSWORD_UPDATE_ACTION, Session};

use super::{AuthGateService, collect_field_errors};

impl AuthGateService {
    /// Requests a password reset email.
    ///
    /// Succeeds whether or not the address is registered. The limiter entry
    /// is kept after success so reset emails stay throttled.
    pub async fn request_password_reset(&self, email: &str) -> AppResult<()> {
        collect_field_errors([(FormField::Email, validate_email(email))])?;

        self.rate_limits
            .require_admission(PASSWORD_RESET_ACTION, email)?;

        match self.backend.send_password_reset_email(email).await {
            Ok(()) | Err(AppError::Backend(BackendError::AccountNotFound)) => Ok(()),
            Err(error) => Err(error),
        }
    }

    /// Changes the password of the signed-in account.
    ///
    /// Attempts are limited per account. A stale session surfaces as
    /// `BackendError::RequiresRecentLogin`.
    pub async fn change_password(
        &self,
        session: &Session,
        new_password: &str,
        confirm_password: &str,
    ) -> AppResult<()> {
        collect_field_errors([
            (FormField::Password, validate_password(new_password)),
            (
                FormField::ConfirmPassword,
                confirm_matches(new_password, confirm_password),
            ),
        ])?;

        let identifier = session.account_id().to_string();
        self.rate_limits
            .require_admission(PASSWORD_UPDATE_ACTION, &identifier)?;

        self.backend.update_password(session, new_password).await?;

        self.rate_limits.reset(PASSWORD_UPDATE_ACTION, &identifier)?;

        Ok(())
    }
}
