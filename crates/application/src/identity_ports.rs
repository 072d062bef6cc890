//! Ports for the external identity and profile backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use gatehouse_core::AppResult;
use gatehouse_domain::{AccountId, ProfileField, UserProfile};

/// Authenticated session issued by the identity backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    account_id: AccountId,
    token: String,
    authenticated_at: DateTime<Utc>,
}

impl Session {
    /// Creates a session value.
    #[must_use]
    pub fn new(
        account_id: AccountId,
        token: impl Into<String>,
        authenticated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            account_id,
            token: token.into(),
            authenticated_at,
        }
    }

    /// Account the session belongs to.
    #[must_use]
    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// Opaque bearer token.
    #[must_use]
    pub fn token(&self) -> &str {
        self.token.as_str()
    }

    /// Time the credentials were last verified.
    #[must_use]
    pub fn authenticated_at(&self) -> DateTime<Utc> {
        self.authenticated_at
    }
}

/// External identity/data service.
///
/// Failures are reported as `AppError::Backend`. Implementations enforce
/// their own rules server-side; nothing here replaces that enforcement.
#[async_trait]
pub trait IdentityBackend: Send + Sync {
    /// Creates an account. Fails with `EmailInUse` or `WeakPassword`.
    async fn create_account(&self, email: &str, password: &str) -> AppResult<AccountId>;

    /// Verifies credentials. Fails with `InvalidCredentials` or
    /// `TooManyRequests`.
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<Session>;

    /// Ends a session.
    async fn sign_out(&self, session: &Session) -> AppResult<()>;

    /// Resolves a bearer token to its live session.
    async fn session(&self, token: &str) -> AppResult<Option<Session>>;

    /// Sends a reset link. The outward result must not reveal whether the
    /// address is registered.
    async fn send_password_reset_email(&self, email: &str) -> AppResult<()>;

    /// Changes the password. Fails with `RequiresRecentLogin` for stale
    /// sessions.
    async fn update_password(&self, session: &Session, new_password: &str) -> AppResult<()>;

    /// Returns whether any profile stores `value` in `field`.
    async fn find_profile_by_field(&self, field: ProfileField, value: &str) -> AppResult<bool>;

    /// Reads the profile of an account.
    async fn read_profile(&self, account_id: AccountId) -> AppResult<Option<UserProfile>>;

    /// Creates or replaces the profile of an account.
    async fn write_profile(&self, account_id: AccountId, profile: &UserProfile) -> AppResult<()>;
}

/// Port for password hashing operations. Keeps application code free of
/// direct cryptographic library coupling.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}
