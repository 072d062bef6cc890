use std::collections::HashMap;

use chrono::TimeDelta;
use gatehouse_core::{AppError, AppResult};
use serde::Deserialize;

/// Action name for sign-in attempts.
pub const SIGN_IN_ACTION: &str = "login";
/// Action name for account creation.
pub const REGISTRATION_ACTION: &str = "register";
/// Action name for password reset emails.
pub const PASSWORD_RESET_ACTION: &str = "passwordReset";
/// Action name for password changes. Not listed in the standard table, so it
/// uses the default policy.
pub const PASSWORD_UPDATE_ACTION: &str = "passwordUpdate";
/// Key of the mandatory fallback entry in a policy table.
pub const DEFAULT_POLICY_KEY: &str = "default";

const MINUTE_MS: i64 = 60 * 1000;
/// Longest accepted window, one year.
pub const MAX_WINDOW_DURATION_MS: i64 = 365 * 24 * 60 * MINUTE_MS;

/// Attempt budget for one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    max_attempts: u32,
    window_duration_ms: i64,
}

impl RateLimitPolicy {
    /// Creates a policy. Both values must be greater than zero and the window
    /// may not exceed [`MAX_WINDOW_DURATION_MS`].
    pub fn new(max_attempts: u32, window_duration_ms: i64) -> AppResult<Self> {
        if max_attempts == 0 {
            return Err(AppError::Validation(
                "max_attempts must be greater than zero".to_owned(),
            ));
        }

        if window_duration_ms <= 0 {
            return Err(AppError::Validation(
                "window_duration_ms must be greater than zero".to_owned(),
            ));
        }

        if window_duration_ms > MAX_WINDOW_DURATION_MS {
            return Err(AppError::Validation(format!(
                "window_duration_ms must not exceed {MAX_WINDOW_DURATION_MS}"
            )));
        }

        Ok(Self {
            max_attempts,
            window_duration_ms,
        })
    }

    const fn fixed(max_attempts: u32, window_duration_ms: i64) -> Self {
        Self {
            max_attempts,
            window_duration_ms,
        }
    }

    /// Attempts admitted per window.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Window length in milliseconds.
    #[must_use]
    pub fn window_duration_ms(&self) -> i64 {
        self.window_duration_ms
    }

    /// Window length as a duration.
    #[must_use]
    pub fn window(&self) -> TimeDelta {
        TimeDelta::milliseconds(self.window_duration_ms)
    }
}

/// Read-only policy table with a mandatory default entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitPolicies {
    default_policy: RateLimitPolicy,
    actions: HashMap<String, RateLimitPolicy>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct PolicyEntry {
    max_attempts: i64,
    window_duration_ms: i64,
}

impl RateLimitPolicies {
    /// Creates a table holding only the fallback policy.
    #[must_use]
    pub fn new(default_policy: RateLimitPolicy) -> Self {
        Self {
            default_policy,
            actions: HashMap::new(),
        }
    }

    /// Adds or replaces the policy for an action.
    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>, policy: RateLimitPolicy) -> Self {
        self.actions.insert(action.into(), policy);
        self
    }

    /// Built-in table: sign-in 5 per 15 minutes, registration and password
    /// reset 3 per hour, anything else 10 per 15 minutes.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(RateLimitPolicy::fixed(10, 15 * MINUTE_MS))
            .with_action(SIGN_IN_ACTION, RateLimitPolicy::fixed(5, 15 * MINUTE_MS))
            .with_action(REGISTRATION_ACTION, RateLimitPolicy::fixed(3, 60 * MINUTE_MS))
            .with_action(
                PASSWORD_RESET_ACTION,
                RateLimitPolicy::fixed(3, 60 * MINUTE_MS),
            )
    }

    /// Parses a table of the form
    /// `{"login": {"maxAttempts": 5, "windowDurationMs": 900000}, "default": {...}}`.
    pub fn from_json(json: &str) -> AppResult<Self> {
        let mut entries: HashMap<String, PolicyEntry> = serde_json::from_str(json)
            .map_err(|error| AppError::Validation(format!("invalid rate limit policies: {error}")))?;

        let default_entry = entries.remove(DEFAULT_POLICY_KEY).ok_or_else(|| {
            AppError::Validation(format!(
                "rate limit policies must include a '{DEFAULT_POLICY_KEY}' entry"
            ))
        })?;

        let mut policies = Self::new(default_entry.into_policy(DEFAULT_POLICY_KEY)?);
        for (action, entry) in entries {
            let policy = entry.into_policy(action.as_str())?;
            policies.actions.insert(action, policy);
        }

        Ok(policies)
    }

    /// Returns the policy for `action`, or the default for unlisted actions.
    #[must_use]
    pub fn policy_for(&self, action: &str) -> RateLimitPolicy {
        self.actions
            .get(action)
            .copied()
            .unwrap_or(self.default_policy)
    }

    /// Returns the fallback policy.
    #[must_use]
    pub fn default_policy(&self) -> RateLimitPolicy {
        self.default_policy
    }
}

impl Default for RateLimitPolicies {
    fn default() -> Self {
        Self::standard()
    }
}

impl PolicyEntry {
    fn into_policy(self, action: &str) -> AppResult<RateLimitPolicy> {
        let max_attempts = u32::try_from(self.max_attempts).map_err(|_| {
            AppError::Validation(format!(
                "rate limit policy '{action}' has invalid maxAttempts {}",
                self.max_attempts
            ))
        })?;

        RateLimitPolicy::new(max_attempts, self.window_duration_ms).map_err(|error| {
            AppError::Validation(format!("rate limit policy '{action}': {error}"))
        })
    }
}
