use thiserror::Error;

/// Failure reported by the external identity/data backend.
///
/// Display strings are stable and safe to show to end users. Unrecognized
/// backend codes collapse into [`BackendError::Unknown`], whose message never
/// includes the raw code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// An account already exists for the email address.
    #[error("an account already exists for this email address")]
    EmailInUse,

    /// The backend rejected the password as too weak.
    #[error("the password does not meet the account requirements")]
    WeakPassword,

    /// Email and password do not match an account.
    #[error("the email or password is incorrect")]
    InvalidCredentials,

    /// The backend's own throttle rejected the request.
    #[error("too many attempts, please try again later")]
    TooManyRequests,

    /// The session is too old for a sensitive change.
    #[error("please sign in again before changing your password")]
    RequiresRecentLogin,

    /// No account matches. Presented like bad credentials.
    #[error("the email or password is incorrect")]
    AccountNotFound,

    /// Any other backend failure, carrying the raw code for logs.
    #[error("something went wrong, please try again")]
    Unknown(String),
}

impl BackendError {
    /// Maps a backend error code onto a known category.
    ///
    /// Adapters for a hosted identity service translate its `auth/...`
    /// codes through here; the in-memory backend raises variants directly.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "auth/email-already-in-use" => Self::EmailInUse,
            "auth/weak-password" => Self::WeakPassword,
            "auth/invalid-credential"
            | "auth/invalid-login-credentials"
            | "auth/wrong-password" => Self::InvalidCredentials,
            "auth/user-not-found" => Self::AccountNotFound,
            "auth/too-many-requests" => Self::TooManyRequests,
            "auth/requires-recent-login" => Self::RequiresRecentLogin,
            other => Self::Unknown(other.to_owned()),
        }
    }

    /// Returns the canonical backend code of this error, for adapter logging.
    /// [`BackendError::from_code`] maps it back to the same variant.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::EmailInUse => "auth/email-already-in-use",
            Self::WeakPassword => "auth/weak-password",
            Self::InvalidCredentials => "auth/invalid-credential",
            Self::TooManyRequests => "auth/too-many-requests",
            Self::RequiresRecentLogin => "auth/requires-recent-login",
            Self::AccountNotFound => "auth/user-not-found",
            Self::Unknown(code) => code.as_str(),
        }
    }
}
