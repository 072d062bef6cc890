//! Whole-form validation for account registration.

use gatehouse_core::{AppError, AppResult, FieldError, FieldErrors, ValidationErrorKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::{
    FieldInput, validate_email, validate_name, validate_password, validate_username,
};

/// Fields of the registration form, keyed the way the UI submits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormField {
    /// Given name.
    FirstName,
    /// Family name.
    LastName,
    /// Public handle.
    Username,
    /// Sign-in email.
    Email,
    /// Chosen password.
    Password,
    /// Repeated password.
    ConfirmPassword,
}

impl FormField {
    /// Returns the submitted field key.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Username => "username",
            Self::Email => "email",
            Self::Password => "password",
            Self::ConfirmPassword => "confirmPassword",
        }
    }
}

/// Raw registration input as gathered by the UI.
///
/// Fields stay untyped JSON so that a missing or non-string value is reported
/// as `InvalidType` instead of failing deserialization as a whole.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    /// Given name.
    #[serde(default)]
    pub first_name: Value,
    /// Family name.
    #[serde(default)]
    pub last_name: Value,
    /// Public handle.
    #[serde(default)]
    pub username: Value,
    /// Sign-in email.
    #[serde(default)]
    pub email: Value,
    /// Chosen password.
    #[serde(default)]
    pub password: Value,
    /// Repeated password.
    #[serde(default)]
    pub confirm_password: Value,
}

impl RegistrationForm {
    /// Creates a form from text values.
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            first_name: Value::String(first_name.into()),
            last_name: Value::String(last_name.into()),
            username: Value::String(username.into()),
            email: Value::String(email.into()),
            password: Value::String(password.into()),
            confirm_password: Value::String(confirm_password.into()),
        }
    }
}

/// Aggregated result of validating a whole form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormValidation {
    valid: bool,
    errors: FieldErrors,
}

impl FormValidation {
    fn from_errors(errors: FieldErrors) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Returns true when no field failed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns the errors of the failing fields only.
    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Returns the error for one field, if it failed.
    #[must_use]
    pub fn error_for(&self, field: FormField) -> Option<&FieldError> {
        self.errors.get(field.as_str())
    }

    /// Converts a failed validation into [`AppError::InvalidInput`].
    pub fn into_result(self) -> AppResult<()> {
        if self.valid {
            Ok(())
        } else {
            Err(AppError::InvalidInput(self.errors))
        }
    }
}

/// Validates every registration field and collects all failures.
#[must_use]
pub fn validate_form(form: &RegistrationForm) -> FormValidation {
    let checks = [
        (
            FormField::FirstName,
            validate_name(&form.first_name, "First name"),
        ),
        (
            FormField::LastName,
            validate_name(&form.last_name, "Last name"),
        ),
        (FormField::Username, validate_username(&form.username)),
        (FormField::Email, validate_email(&form.email)),
        (FormField::Password, validate_password(&form.password)),
        (
            FormField::ConfirmPassword,
            confirm_matches(&form.password, &form.confirm_password),
        ),
    ];

    let mut errors = FieldErrors::new();
    for (field, outcome) in checks {
        if let Err(error) = outcome {
            errors.insert(field.as_str(), error);
        }
    }

    FormValidation::from_errors(errors)
}

/// Checks that a confirmation value equals the password it repeats.
pub fn confirm_matches<P, C>(password: &P, confirmation: &C) -> Result<(), FieldError>
where
    P: FieldInput + ?Sized,
    C: FieldInput + ?Sized,
{
    if password.as_text() == confirmation.as_text() {
        return Ok(());
    }

    Err(FieldError::new(
        ValidationErrorKind::PasswordMismatch,
        "Passwords do not match",
    ))
}
