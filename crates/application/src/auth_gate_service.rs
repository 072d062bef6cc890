//! Request gate in front of the identity backend.
//!
//! Every sensitive operation runs the same sequence: validate input, ask the
//! rate limiter for admission, call the backend, and reset the limiter entry
//! once the backend reports success. Nothing is retried here; each failure is
//! the final result of that attempt.

use std::sync::Arc;

use gatehouse_core::{AppError, AppResult, FieldErrors};
use gatehouse_domain::{FieldResult, FormField};

use crate::{IdentityBackend, RateLimitService};

mod password;
mod profile;
mod registration;
mod sign_in;


/// Application service gating authentication and profile operations.
#[derive(Clone)]
pub struct AuthGateService {
    rate_limits: RateLimitService,
    backend: Arc<dyn IdentityBackend>,
}

impl AuthGateService {
    /// Creates a new gate service.
    #[must_use]
    pub fn new(rate_limits: RateLimitService, backend: Arc<dyn IdentityBackend>) -> Self {
        Self {
            rate_limits,
            backend,
        }
    }

    /// Returns the rate limiter the gate consults.
    #[must_use]
    pub fn rate_limits(&self) -> &RateLimitService {
        &self.rate_limits
    }
}

fn collect_field_errors<const N: usize>(checks: [(FormField, FieldResult); N]) -> AppResult<()> {
    let mut errors = FieldErrors::new();
    for (field, outcome) in checks {
        if let Err(error) = outcome {
            errors.insert(field.as_str(), error);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::InvalidInput(errors))
    }
}
