//! Email normalization and shape validation.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Basic `local@domain.tld` shape: no whitespace, exactly one `@`, and a dot
/// somewhere after it.
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid regex"));

/// Trim and lowercase an email address.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalize `raw` and check it has the `local@domain.tld` shape.
///
/// Returns the normalized address.
pub fn validate_email(raw: &str) -> Result<String, CoreError> {
    let email = normalize_email(raw);
    if !EMAIL_RE.is_match(&email) {
        return Err(CoreError::Validation("Ingrese un correo válido".into()));
    }
    Ok(email)
}
