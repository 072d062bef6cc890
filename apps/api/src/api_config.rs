use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use chrono::TimeDelta;
use gatehouse_application::RateLimitPolicies;
use gatehouse_core::AppError;
use tracing_subscriber::EnvFilter;

const DEFAULT_CLEANUP_INTERVAL_MS: u64 = 300_000;
const DEFAULT_RECENT_LOGIN_SECONDS: u64 = 300;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_host: String,
    pub api_port: u16,
    pub frontend_url: String,
    pub rate_limit_policies: RateLimitPolicies,
    pub rate_limit_cleanup_interval: Duration,
    pub session_recent_login_window: TimeDelta,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = match lookup("API_PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|error| AppError::Validation(format!("invalid API_PORT: {error}")))?,
            None => 3001,
        };
        let frontend_url =
            lookup("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".to_owned());

        let rate_limit_policies = match lookup("RATE_LIMIT_POLICIES") {
            Some(json) if !json.trim().is_empty() => RateLimitPolicies::from_json(&json)?,
            _ => RateLimitPolicies::standard(),
        };

        let cleanup_interval_ms = positive_u64(
            &lookup,
            "RATE_LIMIT_CLEANUP_INTERVAL_MS",
            DEFAULT_CLEANUP_INTERVAL_MS,
        )?;
        let recent_login_seconds = positive_u64(
            &lookup,
            "SESSION_RECENT_LOGIN_SECONDS",
            DEFAULT_RECENT_LOGIN_SECONDS,
        )?;
        let session_recent_login_window = i64::try_from(recent_login_seconds)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .ok_or_else(|| {
                AppError::Validation("SESSION_RECENT_LOGIN_SECONDS is too large".to_owned())
            })?;

        Ok(Self {
            api_host,
            api_port,
            frontend_url,
            rate_limit_policies,
            rate_limit_cleanup_interval: Duration::from_millis(cleanup_interval_ms),
            session_recent_login_window,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn positive_u64(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: u64,
) -> Result<u64, AppError> {
    let Some(raw) = lookup(name) else {
        return Ok(default);
    };

    let value = raw
        .trim()
        .parse::<u64>()
        .map_err(|error| AppError::Validation(format!("invalid {name}: {error}")))?;
    if value == 0 {
        return Err(AppError::Validation(format!(
            "{name} must be greater than zero"
        )));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use gatehouse_application::{REGISTRATION_ACTION, SIGN_IN_ACTION};

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ApiConfig, AppError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        ApiConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() -> Result<(), AppError> {
        let config = config_from(&[])?;

        assert_eq!(config.socket_address()?.to_string(), "127.0.0.1:3001");
        assert_eq!(config.frontend_url, "http://localhost:3000");
        assert_eq!(
            config.rate_limit_cleanup_interval,
            Duration::from_millis(300_000)
        );
        assert_eq!(config.session_recent_login_window, TimeDelta::minutes(5));
        assert_eq!(
            config.rate_limit_policies.policy_for(SIGN_IN_ACTION).max_attempts(),
            5
        );
        Ok(())
    }

    #[test]
    fn policy_table_is_read_from_json() -> Result<(), AppError> {
        let config = config_from(&[(
            "RATE_LIMIT_POLICIES",
            r#"{"register":{"maxAttempts":2,"windowDurationMs":1000},"default":{"maxAttempts":4,"windowDurationMs":2000}}"#,
        )])?;

        let register = config.rate_limit_policies.policy_for(REGISTRATION_ACTION);
        assert_eq!(register.max_attempts(), 2);
        assert_eq!(register.window_duration_ms(), 1000);
        assert_eq!(
            config.rate_limit_policies.policy_for(SIGN_IN_ACTION).max_attempts(),
            4
        );
        Ok(())
    }

    #[test]
    fn zero_cleanup_interval_is_rejected() {
        assert!(matches!(
            config_from(&[("RATE_LIMIT_CLEANUP_INTERVAL_MS", "0")]),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn malformed_port_is_rejected() {
        assert!(matches!(
            config_from(&[("API_PORT", "http")]),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn policy_table_without_default_is_rejected() {
        assert!(matches!(
            config_from(&[(
                "RATE_LIMIT_POLICIES",
                r#"{"login":{"maxAttempts":2,"windowDurationMs":1000}}"#,
            )]),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn invalid_host_fails_at_bind_time() -> Result<(), AppError> {
        let config = config_from(&[("API_HOST", "not-an-ip")])?;

        assert!(matches!(
            config.socket_address(),
            Err(AppError::Internal(_))
        ));
        Ok(())
    }
}
