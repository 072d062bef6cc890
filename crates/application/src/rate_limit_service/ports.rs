use chrono::{DateTime, TimeDelta, Utc};

use gatehouse_core::{AppError, AppResult};

/// Composite key of a rate limit window.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RateLimitKey {
    action: String,
    identifier: String,
}

impl RateLimitKey {
    /// Creates a key. The identifier is used verbatim, without case folding.
    #[must_use]
    pub fn new(action: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            identifier: identifier.into(),
        }
    }

    /// Action name the key belongs to.
    #[must_use]
    pub fn action(&self) -> &str {
        self.action.as_str()
    }

    /// Opaque per-user identifier.
    #[must_use]
    pub fn identifier(&self) -> &str {
        self.identifier.as_str()
    }
}

/// Counter state of one fixed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowEntry {
    /// Attempts counted since the window started, including denied ones.
    pub count: u32,
    /// Instant at which the window closes.
    pub window_expires_at: DateTime<Utc>,
}

impl WindowEntry {
    /// Returns true once `now` has reached the end of the window.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.window_expires_at
    }

    /// Applies one attempt to the current state of a key.
    ///
    /// A missing or expired entry is replaced by a fresh window starting at
    /// `now`; the count is then incremented. Fails without side effects when
    /// the window end is not representable.
    pub fn record_attempt(
        current: Option<Self>,
        now: DateTime<Utc>,
        window: TimeDelta,
    ) -> AppResult<Self> {
        let mut entry = match current {
            Some(entry) if !entry.is_expired(now) => entry,
            _ => Self {
                count: 0,
                window_expires_at: now.checked_add_signed(window).ok_or_else(|| {
                    AppError::Internal(format!(
                        "rate limit window of {} ms overflows the clock",
                        window.num_milliseconds()
                    ))
                })?,
            },
        };
        entry.count = entry.count.saturating_add(1);
        Ok(entry)
    }
}

/// Storage port for rate limit windows.
///
/// Implementations must run [`RateLimitRepository::record_attempt`] as one
/// atomic read-check-increment step; concurrent callers must not lose
/// updates.
pub trait RateLimitRepository: Send + Sync {
    /// Counts an attempt for `key` and returns the updated window, following
    /// [`WindowEntry::record_attempt`].
    fn record_attempt(
        &self,
        key: &RateLimitKey,
        now: DateTime<Utc>,
        window: TimeDelta,
    ) -> AppResult<WindowEntry>;

    /// Deletes the entry for `key`. Returns whether one existed.
    fn remove(&self, key: &RateLimitKey) -> AppResult<bool>;

    /// Deletes every entry expired at `now`. Returns how many were removed.
    fn remove_expired(&self, now: DateTime<Utc>) -> AppResult<usize>;

    /// Deletes every entry. Returns how many were removed.
    fn clear(&self) -> AppResult<usize>;
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}
