use chrono::Utc;
use gatehouse_core::{AppError, AppResult};
use gatehouse_domain::{AccountId, ProfileField, RegistrationForm, UserProfile};

use crate::REGISTRATION_ACTION;

use super::AuthGateService;

impl AuthGateService {
    /// Creates an account and its profile from a registration form.
    ///
    /// The limiter key is the email exactly as entered, while the username is
    /// lower-cased before the uniqueness check and storage.
    pub async fn register(&self, form: RegistrationForm) -> AppResult<AccountId> {
        let profile = UserProfile::from_registration(&form, Utc::now())?;
        let Some(password) = form.password.as_str() else {
            return Err(AppError::Internal(
                "validated password is not text".to_owned(),
            ));
        };
        let email = profile.email();

        self.rate_limits
            .require_admission(REGISTRATION_ACTION, email)?;

        if self
            .backend
            .find_profile_by_field(ProfileField::Username, profile.username())
            .await?
        {
            return Err(AppError::Conflict("username is already taken".to_owned()));
        }

        let account_id = self.backend.create_account(email, password).await?;
        self.backend.write_profile(account_id, &profile).await?;

        self.rate_limits.reset(REGISTRATION_ACTION, email)?;

        Ok(account_id)
    }
}
