//! Client-side form validation and submission.
//!
//! DESIGN
//! ======
//! Each form is a plain struct deriving `validator::Validate`. `submit`
//! validates first and returns a `Validation` error without touching the
//! network when any field fails. Server failures come back as the
//! `ApiError` the auth layer already notified, with form-specific field
//! messages attached where the server message identifies a field.
//!
//! Field keys in `ApiError::fields` are the struct field names.

pub mod account;
pub mod auth;
pub mod storefront;


use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use validator::{Validate, ValidationError, ValidationErrors};

use crate::net::error::{ApiError, FieldErrors};

pub const MSG_EMAIL_REQUIRED: &str = "Email é obrigatório";
pub const MSG_EMAIL_FORMAT: &str = "Email deve ter formato válido";
pub const MSG_EMAIL_MAX: &str = "Email deve ter no máximo 255 caracteres";
pub const MSG_PASSWORD_REQUIRED: &str = "Senha é obrigatória";
pub const MSG_PASSWORD_MIN: &str = "Senha deve ter pelo menos 8 caracteres";
pub const MSG_PASSWORD_RULE: &str = "Senha deve ter pelo menos 8 caracteres, 1 letra, 1 número e 1 caractere especial";
pub const MSG_CONFIRM_MISMATCH: &str = "Senhas devem ser iguais";
pub const MSG_PHONE_FORMAT: &str = "Telefone deve ter formato válido";

/// Characters that satisfy the "special character" half of the password
/// rule. No other symbols are accepted.
pub const PASSWORD_SPECIALS: &str = "@$!%*#?&";

/// Validate `form`, mapping failures to a `Validation` error.
///
/// # Errors
///
/// Returns `ErrorKind::Validation` with one message per failing field.
pub fn check<T: Validate>(form: &T) -> Result<(), ApiError> {
    form.validate().map_err(|errors| ApiError::validation(field_errors(&errors)))
}

/// First message per failing field.
#[must_use]
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, list)| {
            // A missing value also trips format rules; report it as missing.
            let first = list.iter().find(|e| e.code == "required").or_else(|| list.first())?;
            let message = first.message.as_ref().map_or_else(|| first.code.to_string(), ToString::to_string);
            Some((field.to_string(), message))
        })
        .collect()
}

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

// =============================================================================
// CUSTOM RULES
// =============================================================================

pub(crate) fn required_email(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() { Err(rule("required", MSG_EMAIL_REQUIRED)) } else { Ok(()) }
}

pub(crate) fn required_password(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() { Err(rule("required", MSG_PASSWORD_REQUIRED)) } else { Ok(()) }
}

/// At least 8 characters drawn only from ASCII letters, digits and
/// [`PASSWORD_SPECIALS`], with at least one of each class.
pub(crate) fn strong_password(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(rule("required", MSG_PASSWORD_REQUIRED));
    }
    if value.chars().count() < 8 {
        return Err(rule("length", MSG_PASSWORD_MIN));
    }
    let is_special = |c: char| PASSWORD_SPECIALS.contains(c);
    let allowed = value.chars().all(|c| c.is_ascii_alphanumeric() || is_special(c));
    let letter = value.chars().any(|c| c.is_ascii_alphabetic());
    let digit = value.chars().any(|c| c.is_ascii_digit());
    let special = value.chars().any(is_special);
    if allowed && letter && digit && special { Ok(()) } else { Err(rule("password", MSG_PASSWORD_RULE)) }
}

/// Brazilian phone as the backend accepts it: `(DD) DDDD-DDDD` or
/// `(DD) DDDDD-DDDD`, with optional parentheses, one optional ASCII
/// whitespace and an optional dash. Digits and whitespace are ASCII-only.
pub(crate) static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\(?[0-9]{2}\)?[ \t\n\x0B\x0C\r]?[0-9]{4,5}-?[0-9]{4}$").expect("phone pattern is valid")
});

/// Trimmed value, or `None` when the input is missing or blank.
pub(crate) fn non_blank(field: Option<&str>) -> Option<String> {
    field.map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned)
}
