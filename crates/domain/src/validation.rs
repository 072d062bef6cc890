//! Field validators for registration and sign-in input.
//!
//! Validators are total: they never panic and never mutate their input. Each
//! returns `Ok(())` or a [`FieldError`] tagged with a [`ValidationErrorKind`].

use gatehouse_core::{FieldError, ValidationErrorKind};
use serde_json::Value;

use crate::field_schema::{
    EMAIL_SCHEMA, FieldSchema, NAME_SCHEMA, PASSWORD_SCHEMA, USERNAME_SCHEMA,
    is_email_domain_char, is_email_local_char,
};

/// Outcome of a single field check.
pub type FieldResult = Result<(), FieldError>;

/// A candidate value that may or may not be text.
///
/// Values gathered from a form can arrive as JSON of any shape or be missing
/// entirely; validators treat anything without a text view as `InvalidType`.
pub trait FieldInput {
    /// Returns the value as text, if it is text.
    fn as_text(&self) -> Option<&str>;
}

impl FieldInput for str {
    fn as_text(&self) -> Option<&str> {
        Some(self)
    }
}

impl FieldInput for String {
    fn as_text(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl<T: FieldInput + ?Sized> FieldInput for &T {
    fn as_text(&self) -> Option<&str> {
        (**self).as_text()
    }
}

impl<T: FieldInput> FieldInput for Option<T> {
    fn as_text(&self) -> Option<&str> {
        self.as_ref().and_then(FieldInput::as_text)
    }
}

impl FieldInput for Value {
    fn as_text(&self) -> Option<&str> {
        self.as_str()
    }
}

/// Validates a username: 3 to 20 characters from `[A-Za-z_]`.
pub fn validate_username<V: FieldInput + ?Sized>(value: &V) -> FieldResult {
    let text = require_text(value, "Username")?;
    check_length(&USERNAME_SCHEMA, text, "Username")?;

    if !USERNAME_SCHEMA.allows_all(text) {
        return Err(FieldError::new(
            ValidationErrorKind::InvalidCharacters,
            "Username can only contain letters and underscores",
        ));
    }

    Ok(())
}

/// Validates a password: 8 to 20 letters, digits, or allowed punctuation.
///
/// There is no composition rule; a password made only of letters passes.
pub fn validate_password<V: FieldInput + ?Sized>(value: &V) -> FieldResult {
    let text = require_text(value, "Password")?;
    check_length(&PASSWORD_SCHEMA, text, "Password")?;

    if !PASSWORD_SCHEMA.allows_all(text) {
        return Err(FieldError::new(
            ValidationErrorKind::InvalidCharacters,
            "Password contains characters that are not allowed",
        ));
    }

    Ok(())
}

/// Validates an email address of the form `local@domain.tld`.
///
/// The format check runs before the length check, so an over-long malformed
/// address reports `InvalidFormat`.
pub fn validate_email<V: FieldInput + ?Sized>(value: &V) -> FieldResult {
    let text = require_text(value, "Email")?;

    if !is_well_formed_email(text) {
        return Err(FieldError::new(
            ValidationErrorKind::InvalidFormat,
            "Please enter a valid email address",
        ));
    }

    // Any well-formed address already meets the minimum.
    check_length(&EMAIL_SCHEMA, text, "Email")
}

/// Validates a person name after trimming surrounding whitespace.
///
/// `field_label` names the field in messages, e.g. `"First name"`.
pub fn validate_name<V: FieldInput + ?Sized>(value: &V, field_label: &str) -> FieldResult {
    let text = require_text(value, field_label)?.trim();
    check_length(&NAME_SCHEMA, text, field_label)?;

    if !NAME_SCHEMA.allows_all(text) {
        return Err(FieldError::new(
            ValidationErrorKind::InvalidCharacters,
            format!("{field_label} can only contain letters and spaces"),
        ));
    }

    Ok(())
}

fn require_text<'a, V: FieldInput + ?Sized>(
    value: &'a V,
    label: &str,
) -> Result<&'a str, FieldError> {
    value.as_text().ok_or_else(|| {
        FieldError::new(
            ValidationErrorKind::InvalidType,
            format!("{label} must be text"),
        )
    })
}

fn check_length(schema: &FieldSchema, text: &str, label: &str) -> FieldResult {
    match schema.length_violation(text) {
        Some(ValidationErrorKind::TooShort) => Err(FieldError::new(
            ValidationErrorKind::TooShort,
            format!("{label} must be at least {} characters", schema.min_length()),
        )),
        Some(kind) => Err(FieldError::new(
            kind,
            format!("{label} must be at most {} characters", schema.max_length()),
        )),
        None => Ok(()),
    }
}

// local@labels.tld where the TLD is the part after the last dot.
fn is_well_formed_email(text: &str) -> bool {
    if !EMAIL_SCHEMA.allows_all(text) {
        return false;
    }
    let Some((local, domain)) = text.split_once('@') else {
        return false;
    };
    let Some((labels, tld)) = domain.rsplit_once('.') else {
        return false;
    };

    !local.is_empty()
        && local.chars().all(is_email_local_char)
        && !labels.is_empty()
        && labels.chars().all(is_email_domain_char)
        && tld.chars().count() >= 2
        && tld.chars().all(|character| character.is_ascii_alphabetic())
}
