//! Shared primitives for all Rust crates in Gatehouse.

#![forbid(unsafe_code)]

/// Identity backend failure categories.
pub mod backend;
/// Field-level validation error taxonomy.
pub mod validation;

use thiserror::Error;

pub use backend::BackendError;
pub use validation::{FieldError, FieldErrors, ValidationErrorKind};

/// Result type used across Gatehouse crates.
pub type AppResult<T> = Result<T, AppError>;

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid configuration or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// One or more submitted fields failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(FieldErrors),

    /// The action is throttled for this identifier until the window closes.
    #[error("rate limited: {message}")]
    RateLimited {
        /// Advisory wait before the next attempt can be admitted.
        retry_after_seconds: u64,
        /// Human-readable wait notice.
        message: String,
    },

    /// The identity backend rejected the operation.
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Caller is not authenticated.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Builds an input error for a single field.
    #[must_use]
    pub fn invalid_field(field: impl Into<String>, error: FieldError) -> Self {
        Self::InvalidInput(FieldErrors::single(field, error))
    }
}
