//! Per-field length bounds and character whitelists.
//!
//! Every check is a whitelist: a character is accepted only when the schema
//! predicate says so, so unexpected input fails closed.

use gatehouse_core::ValidationErrorKind;

/// Punctuation accepted in passwords in addition to ASCII letters and digits.
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";

/// Immutable length bounds and allowed-character predicate for one field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSchema {
    min_length: usize,
    max_length: usize,
    allows: fn(char) -> bool,
}

/// Usernames: 3 to 20 ASCII letters or underscores.
pub const USERNAME_SCHEMA: FieldSchema = FieldSchema::new(3, 20, is_username_char);

/// Passwords: 8 to 20 letters, digits, or [`PASSWORD_SYMBOLS`].
pub const PASSWORD_SCHEMA: FieldSchema = FieldSchema::new(8, 20, is_password_char);

/// Email addresses: at most 254 characters. The shortest address the format
/// accepts (`a@b.co`) is six characters long.
pub const EMAIL_SCHEMA: FieldSchema = FieldSchema::new(6, 254, is_email_char);

/// Person names: 2 to 20 Latin letters (accented forms included) and spaces.
pub const NAME_SCHEMA: FieldSchema = FieldSchema::new(2, 20, is_name_char);

impl FieldSchema {
    /// Creates a schema descriptor.
    #[must_use]
    pub const fn new(min_length: usize, max_length: usize, allows: fn(char) -> bool) -> Self {
        Self {
            min_length,
            max_length,
            allows,
        }
    }

    /// Smallest accepted length in characters.
    #[must_use]
    pub const fn min_length(&self) -> usize {
        self.min_length
    }

    /// Largest accepted length in characters.
    #[must_use]
    pub const fn max_length(&self) -> usize {
        self.max_length
    }

    /// Returns the length violation for `value`, if any.
    #[must_use]
    pub fn length_violation(&self, value: &str) -> Option<ValidationErrorKind> {
        let length = value.chars().count();
        if length < self.min_length {
            Some(ValidationErrorKind::TooShort)
        } else if length > self.max_length {
            Some(ValidationErrorKind::TooLong)
        } else {
            None
        }
    }

    /// Returns true when every character of `value` is whitelisted.
    #[must_use]
    pub fn allows_all(&self, value: &str) -> bool {
        value.chars().all(self.allows)
    }

    /// Returns true when `character` is whitelisted.
    #[must_use]
    pub fn allows(&self, character: char) -> bool {
        (self.allows)(character)
    }
}

fn is_username_char(character: char) -> bool {
    character.is_ascii_alphabetic() || character == '_'
}

fn is_password_char(character: char) -> bool {
    character.is_ascii_alphanumeric() || PASSWORD_SYMBOLS.contains(character)
}

pub(crate) fn is_email_local_char(character: char) -> bool {
    character.is_ascii_alphanumeric() || matches!(character, '.' | '_' | '%' | '+' | '-')
}

pub(crate) fn is_email_domain_char(character: char) -> bool {
    character.is_ascii_alphanumeric() || matches!(character, '.' | '-')
}

fn is_email_char(character: char) -> bool {
    character == '@' || is_email_local_char(character) || is_email_domain_char(character)
}

// Latin-1 letters: U+00C0..=U+00FF minus the two arithmetic signs.
fn is_name_char(character: char) -> bool {
    character.is_ascii_alphabetic()
        || character == ' '
        || (('\u{C0}'..='\u{FF}').contains(&character) && !matches!(character, '×' | '÷'))
}
