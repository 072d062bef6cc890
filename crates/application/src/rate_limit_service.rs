//! Fixed-window rate limiting ports and application service.
//!
//! Each `(action, identifier)` pair owns one counter whose window is fixed at
//! the first attempt. Every check counts, including denied ones, so repeated
//! denials never extend the window. Entries are dropped on caller-signalled
//! success ([`RateLimitService::reset`]) or by the periodic sweep
//! ([`RateLimitService::cleanup`]).

mod config;
mod ports;
mod service;


pub use config::{
    DEFAULT_POLICY_KEY, MAX_WINDOW_DURATION_MS, PASSWORD_RESET_ACTION, PASSWORD_UPDATE_ACTION, REGISTRATION_ACTION,
    RateLimitPolicies, RateLimitPolicy, SIGN_IN_ACTION,
};
pub use ports::{Clock, RateLimitKey, RateLimitRepository, WindowEntry};
pub use service::{RateLimitDecision, RateLimitService};
