use gatehouse_core::{AppError, AppResult};
use gatehouse_domain::{AccountId, UserProfile};

use super::AuthGateService;

impl AuthGateService {
    /// Reads the profile of an account.
    pub async fn profile(&self, account_id: AccountId) -> AppResult<UserProfile> {
        self.backend
            .read_profile(account_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("profile for account '{account_id}'")))
    }

    /// Replaces the first and last name on a profile.
    pub async fn update_profile_names(
        &self,
        account_id: AccountId,
        first_name: &str,
        last_name: &str,
    ) -> AppResult<UserProfile> {
        let updated = self
            .profile(account_id)
            .await?
            .with_names(first_name, last_name)?;

        self.backend.write_profile(account_id, &updated).await?;

        Ok(updated)
    }
}
