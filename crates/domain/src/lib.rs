//! Input validation, sanitization, and the profile record.

#![forbid(unsafe_code)]

mod field_schema;
mod form;
mod profile;
mod sanitize;
mod validation;

pub use field_schema::{
    EMAIL_SCHEMA, FieldSchema, NAME_SCHEMA, PASSWORD_SCHEMA, PASSWORD_SYMBOLS, USERNAME_SCHEMA,
};
pub use form::{FormField, FormValidation, RegistrationForm, confirm_matches, validate_form};
pub use profile::{AccountId, ProfileField, UserProfile, normalize_username};
pub use sanitize::sanitize;
pub use validation::{
    FieldInput, FieldResult, validate_email, validate_name, validate_password,
    validate_username,
};
