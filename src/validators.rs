//! Pure field validators.
//!
//! Every validator is total: it returns `None` on success and a
//! [`ValidationError`] otherwise. None of them panic.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::types::ValidationError;

pub const PASSWORD_MIN_LENGTH: usize = 8;

static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// A validator registered for one field of a form.
pub type Validator = Arc<dyn Fn(&str) -> Option<ValidationError> + Send + Sync>;

pub fn validate_email(email: &str) -> Option<ValidationError> {
    if email.is_empty() {
        return Some(ValidationError::new("email", "Email is required"));
    }

    let matches = EMAIL_RE.as_ref().is_some_and(|re| re.is_match(email));
    if !matches {
        return Some(ValidationError::new(
            "email",
            "Please enter a valid email address",
        ));
    }

    None
}

pub fn validate_password(password: &str) -> Option<ValidationError> {
    if password.is_empty() {
        return Some(ValidationError::new("password", "Password is required"));
    }

    if password.chars().count() < PASSWORD_MIN_LENGTH {
        return Some(ValidationError::new(
            "password",
            format!("Password must be at least {PASSWORD_MIN_LENGTH} characters"),
        ));
    }

    None
}

pub fn validate_required(value: &str, field_name: &str) -> Option<ValidationError> {
    if value.trim().is_empty() {
        return Some(ValidationError::new(
            field_name,
            format!("{field_name} is required"),
        ));
    }

    None
}

/// A bound of zero counts as no bound.
pub fn validate_length(
    value: &str,
    field_name: &str,
    min: Option<usize>,
    max: Option<usize>,
) -> Option<ValidationError> {
    let len = value.chars().count();

    if let Some(min) = min.filter(|min| *min > 0)
        && len < min
    {
        return Some(ValidationError::new(
            field_name,
            format!("{field_name} must be at least {min} characters"),
        ));
    }

    if let Some(max) = max.filter(|max| *max > 0)
        && len > max
    {
        return Some(ValidationError::new(
            field_name,
            format!("{field_name} must be no more than {max} characters"),
        ));
    }

    None
}

pub fn email() -> Validator {
    Arc::new(validate_email)
}

pub fn password() -> Validator {
    Arc::new(validate_password)
}

pub fn required(field_name: impl Into<String>) -> Validator {
    let field_name = field_name.into();
    Arc::new(move |value: &str| validate_required(value, &field_name))
}

pub fn min_length(field_name: impl Into<String>, min: usize) -> Validator {
    let field_name = field_name.into();
    Arc::new(move |value: &str| validate_length(value, &field_name, Some(min), None))
}

pub fn max_length(field_name: impl Into<String>, max: usize) -> Validator {
    let field_name = field_name.into();
    Arc::new(move |value: &str| validate_length(value, &field_name, None, Some(max)))
}

pub fn length(field_name: impl Into<String>, min: usize, max: usize) -> Validator {
    let field_name = field_name.into();
    Arc::new(move |value: &str| validate_length(value, &field_name, Some(min), Some(max)))
}

/// Run validators in order and report the first failure.
pub fn all_of(validators: Vec<Validator>) -> Validator {
    Arc::new(move |value: &str| validators.iter().find_map(|validator| validator(value)))
}
