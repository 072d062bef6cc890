use std::sync::Arc;

use gatehouse_core::{AppError, AppResult};

use super::config::RateLimitPolicies;
use super::ports::{Clock, RateLimitKey, RateLimitRepository};

/// Admission decision for one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// The attempt may proceed.
    Admitted {
        /// Position of this attempt in the current window, starting at 1.
        attempt: u32,
        /// Attempts still admitted before the window closes.
        remaining: u32,
    },
    /// The attempt exceeded the policy.
    Denied {
        /// Seconds until the window closes, rounded up.
        retry_after_seconds: u64,
        /// Wait notice stated in whole minutes, rounded up.
        message: String,
    },
}

impl RateLimitDecision {
    /// Returns true for [`RateLimitDecision::Admitted`].
    #[must_use]
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted { .. })
    }
}

/// Application service for rate limiting.
#[derive(Clone)]
pub struct RateLimitService {
    repository: Arc<dyn RateLimitRepository>,
    clock: Arc<dyn Clock>,
    policies: Arc<RateLimitPolicies>,
}

impl RateLimitService {
    /// Creates a new rate limit service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn RateLimitRepository>,
        clock: Arc<dyn Clock>,
        policies: RateLimitPolicies,
    ) -> Self {
        Self {
            repository,
            clock,
            policies: Arc::new(policies),
        }
    }

    /// Returns the policy table in effect.
    #[must_use]
    pub fn policies(&self) -> &RateLimitPolicies {
        &self.policies
    }

    /// Counts an attempt of `action` by `identifier` and decides admission.
    ///
    /// The attempt is recorded whether or not it is admitted.
    pub fn check_limit(&self, action: &str, identifier: &str) -> AppResult<RateLimitDecision> {
        let policy = self.policies.policy_for(action);
        let now = self.clock.now();
        let entry = self.repository.record_attempt(
            &RateLimitKey::new(action, identifier),
            now,
            policy.window(),
        )?;

        if entry.count > policy.max_attempts() {
            let remaining_ms = (entry.window_expires_at - now).num_milliseconds();
            let retry_after_seconds = u64::try_from(remaining_ms).unwrap_or(0).div_ceil(1000);
            return Ok(RateLimitDecision::Denied {
                retry_after_seconds,
                message: wait_message(retry_after_seconds),
            });
        }

        Ok(RateLimitDecision::Admitted {
            attempt: entry.count,
            remaining: policy.max_attempts() - entry.count,
        })
    }

    /// Like [`RateLimitService::check_limit`], but reports a denial as
    /// `Err(AppError::RateLimited)`.
    pub fn require_admission(&self, action: &str, identifier: &str) -> AppResult<()> {
        match self.check_limit(action, identifier)? {
            RateLimitDecision::Admitted { .. } => Ok(()),
            RateLimitDecision::Denied {
                retry_after_seconds,
                message,
            } => Err(AppError::RateLimited {
                retry_after_seconds,
                message,
            }),
        }
    }

    /// Forgets the window for a key so the next attempt starts fresh.
    ///
    /// Call only after the gated operation succeeded.
    pub fn reset(&self, action: &str, identifier: &str) -> AppResult<()> {
        self.repository
            .remove(&RateLimitKey::new(action, identifier))
            .map(|_| ())
    }

    /// Removes expired windows. Intended for periodic cleanup.
    pub fn cleanup(&self) -> AppResult<usize> {
        self.repository.remove_expired(self.clock.now())
    }

    /// Removes every window.
    pub fn clear_all(&self) -> AppResult<usize> {
        self.repository.clear()
    }
}

fn wait_message(retry_after_seconds: u64) -> String {
    let minutes = retry_after_seconds.div_ceil(60);
    let unit = if minutes == 1 { "minute" } else { "minutes" };
    format!("Too many attempts. Please try again in {minutes} {unit}.")
}
