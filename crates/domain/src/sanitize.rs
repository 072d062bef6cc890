//! Markup stripping for free-text input.

use std::sync::LazyLock;

use regex::Regex;

use crate::validation::FieldInput;

static SCRIPT_BLOCK_REGEX: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>"));

static TAG_REGEX: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"<[^>]*>"));

/// Removes `<script>` blocks and every remaining tag, then trims.
///
/// Non-text input yields an empty string. Applying the function to its own
/// output returns that output unchanged.
pub fn sanitize<V: FieldInput + ?Sized>(value: &V) -> String {
    let Some(text) = value.as_text() else {
        return String::new();
    };

    let (Ok(script_block), Ok(tag)) = (SCRIPT_BLOCK_REGEX.as_ref(), TAG_REGEX.as_ref()) else {
        // Fail closed: nothing is better than unsanitized markup.
        return String::new();
    };

    let without_scripts = script_block.replace_all(text, "");
    let without_tags = tag.replace_all(&without_scripts, "");

    without_tags.trim().to_owned()
}
