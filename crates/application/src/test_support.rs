use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use gatehouse_core::{AppError, AppResult, BackendError};
use gatehouse_domain::{AccountId, ProfileField, UserProfile};

use crate::{Clock, IdentityBackend, RateLimitKey, RateLimitRepository, Session, WindowEntry};

fn poisoned(error: impl std::fmt::Display) -> AppError {
    AppError::Internal(format!("failed to lock test state: {error}"))
}

pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        let start = Utc
            .with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, delta: TimeDelta) {
        if let Ok(mut now) = self.now.lock() {
            *now += delta;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.lock().map(|now| *now).unwrap_or_else(|_| Utc::now())
    }
}

#[derive(Default)]
pub struct TestWindowStore {
    entries: Mutex<HashMap<RateLimitKey, WindowEntry>>,
}

impl TestWindowStore {
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn get(&self, key: &RateLimitKey) -> Option<WindowEntry> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).copied())
    }
}

impl RateLimitRepository for TestWindowStore {
    fn record_attempt(
        &self,
        key: &RateLimitKey,
        now: DateTime<Utc>,
        window: TimeDelta,
    ) -> AppResult<WindowEntry> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        let entry = WindowEntry::record_attempt(entries.get(key).copied(), now, window)?;
        entries.insert(key.clone(), entry);
        Ok(entry)
    }

    fn remove(&self, key: &RateLimitKey) -> AppResult<bool> {
        Ok(self.entries.lock().map_err(poisoned)?.remove(key).is_some())
    }

    fn remove_expired(&self, now: DateTime<Utc>) -> AppResult<usize> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        Ok(before - entries.len())
    }

    fn clear(&self) -> AppResult<usize> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        let removed = entries.len();
        entries.clear();
        Ok(removed)
    }
}

#[derive(Default)]
pub struct FakeIdentityBackend {
    pub accounts: Mutex<HashMap<String, (AccountId, String)>>,
    pub profiles: Mutex<HashMap<AccountId, UserProfile>>,
    pub reset_emails: Mutex<Vec<String>>,
    pub password_updates: Mutex<Vec<(AccountId, String)>>,
    pub calls: Mutex<Vec<&'static str>>,
    pub fail_next: Mutex<Option<BackendError>>,
}

impl FakeIdentityBackend {
    pub fn with_account(email: &str, password: &str) -> (Self, AccountId) {
        let backend = Self::default();
        let account_id = AccountId::new();
        if let Ok(mut accounts) = backend.accounts.lock() {
            accounts.insert(email.to_owned(), (account_id, password.to_owned()));
        }
        (backend, account_id)
    }

    pub fn fail_next(&self, error: BackendError) {
        if let Ok(mut slot) = self.fail_next.lock() {
            *slot = Some(error);
        }
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls
            .lock()
            .map(|calls| calls.iter().filter(|call| **call == name).count())
            .unwrap_or(0)
    }

    fn enter(&self, name: &'static str) -> AppResult<()> {
        self.calls.lock().map_err(poisoned)?.push(name);
        match self.fail_next.lock().map_err(poisoned)?.take() {
            Some(error) => Err(AppError::Backend(error)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl IdentityBackend for FakeIdentityBackend {
    async fn create_account(&self, email: &str, password: &str) -> AppResult<AccountId> {
        self.enter("create_account")?;
        let mut accounts = self.accounts.lock().map_err(poisoned)?;
        if accounts.contains_key(email) {
            return Err(AppError::Backend(BackendError::EmailInUse));
        }
        let account_id = AccountId::new();
        accounts.insert(email.to_owned(), (account_id, password.to_owned()));
        Ok(account_id)
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<Session> {
        self.enter("sign_in")?;
        let accounts = self.accounts.lock().map_err(poisoned)?;
        match accounts.get(email) {
            Some((account_id, stored)) if stored == password => Ok(Session::new(
                *account_id,
                format!("token-{account_id}"),
                Utc::now(),
            )),
            _ => Err(AppError::Backend(BackendError::InvalidCredentials)),
        }
    }

    async fn sign_out(&self, _session: &Session) -> AppResult<()> {
        self.enter("sign_out")
    }

    async fn session(&self, token: &str) -> AppResult<Option<Session>> {
        self.enter("session")?;
        let accounts = self.accounts.lock().map_err(poisoned)?;
        Ok(accounts
            .values()
            .find(|(account_id, _)| format!("token-{account_id}") == token)
            .map(|(account_id, _)| Session::new(*account_id, token, Utc::now())))
    }

    async fn send_password_reset_email(&self, email: &str) -> AppResult<()> {
        self.enter("send_password_reset_email")?;
        if !self.accounts.lock().map_err(poisoned)?.contains_key(email) {
            return Err(AppError::Backend(BackendError::AccountNotFound));
        }
        self.reset_emails
            .lock()
            .map_err(poisoned)?
            .push(email.to_owned());
        Ok(())
    }

    async fn update_password(&self, session: &Session, new_password: &str) -> AppResult<()> {
        self.enter("update_password")?;
        self.password_updates
            .lock()
            .map_err(poisoned)?
            .push((session.account_id(), new_password.to_owned()));
        Ok(())
    }

    async fn find_profile_by_field(&self, field: ProfileField, value: &str) -> AppResult<bool> {
        self.enter("find_profile_by_field")?;
        Ok(self
            .profiles
            .lock()
            .map_err(poisoned)?
            .values()
            .any(|profile| profile.field(field) == value))
    }

    async fn read_profile(&self, account_id: AccountId) -> AppResult<Option<UserProfile>> {
        self.enter("read_profile")?;
        Ok(self
            .profiles
            .lock()
            .map_err(poisoned)?
            .get(&account_id)
            .cloned())
    }

    async fn write_profile(&self, account_id: AccountId, profile: &UserProfile) -> AppResult<()> {
        self.enter("write_profile")?;
        self.profiles
            .lock()
            .map_err(poisoned)?
            .insert(account_id, profile.clone());
        Ok(())
    }
}
