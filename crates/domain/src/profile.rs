//! Account identity and the stored profile record.

use chrono::{DateTime, Utc};
use gatehouse_core::{AppError, AppResult, FieldErrors};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::form::{FormField, RegistrationForm, validate_form};
use crate::sanitize::sanitize;
use crate::validation::validate_name;

/// Unique identifier for an account in the identity backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Creates a new random account identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an account identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Profile fields the backend can be queried by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    /// Lower-cased username.
    Username,
    /// Email as stored on the profile.
    Email,
}

impl ProfileField {
    /// Returns the stored field name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
        }
    }
}

/// The small profile record kept per account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    first_name: String,
    last_name: String,
    username: String,
    email: String,
    created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Builds a profile from a registration form.
    ///
    /// The form must validate. Names are stored sanitized and the username is
    /// lower-cased so uniqueness checks are case-insensitive. The email is
    /// kept exactly as entered.
    pub fn from_registration(
        form: &RegistrationForm,
        created_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        validate_form(form).into_result()?;

        Ok(Self {
            first_name: sanitize(&form.first_name),
            last_name: sanitize(&form.last_name),
            username: normalize_username(&sanitize(&form.username)),
            email: sanitize(&form.email),
            created_at,
        })
    }

    /// Returns a copy with validated, sanitized names.
    pub fn with_names(&self, first_name: &str, last_name: &str) -> AppResult<Self> {
        let mut errors = FieldErrors::new();
        if let Err(error) = validate_name(first_name, "First name") {
            errors.insert(FormField::FirstName.as_str(), error);
        }
        if let Err(error) = validate_name(last_name, "Last name") {
            errors.insert(FormField::LastName.as_str(), error);
        }
        if !errors.is_empty() {
            return Err(AppError::InvalidInput(errors));
        }

        Ok(Self {
            first_name: sanitize(first_name),
            last_name: sanitize(last_name),
            ..self.clone()
        })
    }

    /// Given name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    /// Family name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        self.last_name.as_str()
    }

    /// Lower-cased username.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Email as entered at registration.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Time the profile was first written.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the stored value of a queryable field.
    #[must_use]
    pub fn field(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::Username => self.username(),
            ProfileField::Email => self.email(),
        }
    }
}

/// Canonical form of a username for storage and uniqueness lookups.
#[must_use]
pub fn normalize_username(username: &str) -> String {
    username.to_lowercase()
}
