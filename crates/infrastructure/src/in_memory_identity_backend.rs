use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::TimeDelta;
use gatehouse_application::{Clock, IdentityBackend, PasswordHasher, Session};
use gatehouse_core::{AppError, AppResult, BackendError};
use gatehouse_domain::{AccountId, ProfileField, UserProfile};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

const MIN_BACKEND_PASSWORD_CHARS: usize = 6;

#[derive(Debug, Clone)]
struct StoredAccount {
    id: AccountId,
    password_hash: String,
}

/// Identity backend held entirely in process memory, for development and
/// tests.
///
/// Emails are matched case-insensitively. Sessions are opaque UUID tokens
/// that end at sign-out or once they outlive the session lifetime; expired
/// sessions are pruned whenever a new one is opened.
pub struct InMemoryIdentityBackend {
    accounts: RwLock<HashMap<String, StoredAccount>>,
    sessions: RwLock<HashMap<String, Session>>,
    profiles: RwLock<HashMap<AccountId, UserProfile>>,
    password_hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
    recent_login_window: TimeDelta,
    session_lifetime: TimeDelta,
}

impl InMemoryIdentityBackend {
    /// Creates an empty backend. Sensitive operations require a sign-in
    /// within the last five minutes and sessions last one day.
    #[must_use]
    pub fn new(password_hasher: Arc<dyn PasswordHasher>, clock: Arc<dyn Clock>) -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            sessions: RwLock::new(HashMap::new()),
            profiles: RwLock::new(HashMap::new()),
            password_hasher,
            clock,
            recent_login_window: TimeDelta::minutes(5),
            session_lifetime: TimeDelta::days(1),
        }
    }

    /// Overrides how long a session stays valid after sign-in.
    #[must_use]
    pub fn with_session_lifetime(mut self, lifetime: TimeDelta) -> Self {
        self.session_lifetime = lifetime;
        self
    }

    /// Overrides how long a sign-in counts as recent.
    #[must_use]
    pub fn with_recent_login_window(mut self, window: TimeDelta) -> Self {
        self.recent_login_window = window;
        self
    }

    /// Number of stored sessions, expired ones not yet pruned included.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn is_live(&self, session: &Session) -> bool {
        self.clock.now() - session.authenticated_at() < self.session_lifetime
    }
}

fn account_key(email: &str) -> String {
    email.trim().to_lowercase()
}

fn check_backend_password(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_BACKEND_PASSWORD_CHARS {
        return Err(BackendError::WeakPassword.into());
    }

    Ok(())
}

#[async_trait]
impl IdentityBackend for InMemoryIdentityBackend {
    async fn create_account(&self, email: &str, password: &str) -> AppResult<AccountId> {
        check_backend_password(password)?;

        let key = account_key(email);
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&key) {
            return Err(BackendError::EmailInUse.into());
        }

        let account = StoredAccount {
            id: AccountId::new(),
            password_hash: self.password_hasher.hash_password(password)?,
        };
        let account_id = account.id;
        accounts.insert(key, account);

        info!(account_id = %account_id, "account created");
        Ok(account_id)
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<Session> {
        let account = self
            .accounts
            .read()
            .await
            .get(&account_key(email))
            .cloned()
            .ok_or(BackendError::InvalidCredentials)?;

        if !self
            .password_hasher
            .verify_password(password, &account.password_hash)?
        {
            debug!(account_id = %account.id, "password did not match");
            return Err(BackendError::InvalidCredentials.into());
        }

        let session = Session::new(account.id, Uuid::new_v4().to_string(), self.clock.now());
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, stored| self.is_live(stored));
        let pruned = before - sessions.len();
        if pruned > 0 {
            debug!(pruned, "pruned expired sessions");
        }
        sessions.insert(session.token().to_owned(), session.clone());
        drop(sessions);

        info!(account_id = %account.id, "session opened");
        Ok(session)
    }

    async fn sign_out(&self, session: &Session) -> AppResult<()> {
        if self.sessions.write().await.remove(session.token()).is_some() {
            info!(account_id = %session.account_id(), "session closed");
        }

        Ok(())
    }

    async fn session(&self, token: &str) -> AppResult<Option<Session>> {
        Ok(self
            .sessions
            .read()
            .await
            .get(token)
            .filter(|session| self.is_live(session))
            .cloned())
    }

    async fn send_password_reset_email(&self, email: &str) -> AppResult<()> {
        match self.accounts.read().await.get(&account_key(email)) {
            Some(account) => info!(account_id = %account.id, "password reset email sent"),
            None => debug!(email, "password reset requested for unknown address"),
        }

        Ok(())
    }

    async fn update_password(&self, session: &Session, new_password: &str) -> AppResult<()> {
        let live = self
            .sessions
            .read()
            .await
            .get(session.token())
            .filter(|stored| self.is_live(stored))
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("session is no longer valid".to_owned()))?;

        if self.clock.now() - live.authenticated_at() > self.recent_login_window {
            return Err(BackendError::RequiresRecentLogin.into());
        }

        check_backend_password(new_password)?;

        let password_hash = self.password_hasher.hash_password(new_password)?;
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .values_mut()
            .find(|account| account.id == live.account_id())
            .ok_or(BackendError::AccountNotFound)?;
        account.password_hash = password_hash;

        info!(account_id = %live.account_id(), "password updated");
        Ok(())
    }

    async fn find_profile_by_field(&self, field: ProfileField, value: &str) -> AppResult<bool> {
        Ok(self
            .profiles
            .read()
            .await
            .values()
            .any(|profile| profile.field(field) == value))
    }

    async fn read_profile(&self, account_id: AccountId) -> AppResult<Option<UserProfile>> {
        Ok(self.profiles.read().await.get(&account_id).cloned())
    }

    async fn write_profile(&self, account_id: AccountId, profile: &UserProfile) -> AppResult<()> {
        self.profiles
            .write()
            .await
            .insert(account_id, profile.clone());

        Ok(())
    }
}

#[cfg(test)]
mod tests;
