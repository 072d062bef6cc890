//! Application services and ports.

#![forbid(unsafe_code)]

mod auth_gate_service;
mod identity_ports;
mod rate_limit_service;

#[cfg(test)]
mod test_support;

pub use auth_gate_service::AuthGateService;
pub use identity_ports::{IdentityBackend, PasswordHasher, Session};
pub use rate_limit_service::{
    Clock, DEFAULT_POLICY_KEY, MAX_WINDOW_DURATION_MS, PASSWORD_RESET_ACTION, PASSWORD_UPDATE_ACTION,
    REGISTRATION_ACTION, RateLimitDecision, RateLimitKey, RateLimitPolicies, RateLimitPolicy,
    RateLimitRepository, RateLimitService, SIGN_IN_ACTION, WindowEntry,
};
