//! Process-local rate limit window store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, TimeDelta, Utc};
use gatehouse_application::{RateLimitKey, RateLimitRepository, WindowEntry};
use gatehouse_core::{AppError, AppResult};

/// In-memory implementation of the rate limit repository port.
///
/// One mutex guards the whole map, so the read-check-increment of an attempt
/// is atomic even when several threads share the store.
#[derive(Debug, Default)]
pub struct InMemoryRateLimitRepository {
    entries: Mutex<HashMap<RateLimitKey, WindowEntry>>,
}

impl InMemoryRateLimitRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked windows, expired ones included.
    pub fn len(&self) -> AppResult<usize> {
        Ok(self.lock()?.len())
    }

    /// Returns true when no window is tracked.
    pub fn is_empty(&self) -> AppResult<bool> {
        Ok(self.lock()?.is_empty())
    }

    /// Returns the window tracked for `key`.
    pub fn entry(&self, key: &RateLimitKey) -> AppResult<Option<WindowEntry>> {
        Ok(self.lock()?.get(key).copied())
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, HashMap<RateLimitKey, WindowEntry>>> {
        self.entries.lock().map_err(|error| {
            AppError::Internal(format!("failed to lock rate limit store: {error}"))
        })
    }
}

impl RateLimitRepository for InMemoryRateLimitRepository {
    fn record_attempt(
        &self,
        key: &RateLimitKey,
        now: DateTime<Utc>,
        window: TimeDelta,
    ) -> AppResult<WindowEntry> {
        let mut entries = self.lock()?;
        let entry = WindowEntry::record_attempt(entries.get(key).copied(), now, window)?;
        entries.insert(key.clone(), entry);
        Ok(entry)
    }

    fn remove(&self, key: &RateLimitKey) -> AppResult<bool> {
        Ok(self.lock()?.remove(key).is_some())
    }

    fn remove_expired(&self, now: DateTime<Utc>) -> AppResult<usize> {
        let mut entries = self.lock()?;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        Ok(before - entries.len())
    }

    fn clear(&self) -> AppResult<usize> {
        let mut entries = self.lock()?;
        let removed = entries.len();
        entries.clear();
        Ok(removed)
    }
}
