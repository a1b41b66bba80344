//! Error taxonomy helpers: construction, provider-error parsing and
//! classification of [`AppError`] records.

use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};

use crate::{
    provider::ProviderError,
    types::{AppError, ErrorCode},
};

pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// A raw failure reported by something outside this crate.
pub trait ExternalError {
    fn message(&self) -> Option<&str>;
}

impl ExternalError for str {
    fn message(&self) -> Option<&str> {
        Some(self)
    }
}

impl ExternalError for String {
    fn message(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

pub fn create_error(
    code: ErrorCode,
    message: impl Into<String>,
    details: Option<BTreeMap<String, String>>,
) -> AppError {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    AppError::new(code, message, details, timestamp)
}

pub mod auth_errors {
    use super::create_error;
    use crate::types::{AppError, ErrorCode};

    pub fn invalid_credentials() -> AppError {
        create_error(ErrorCode::InvalidCredentials, "Invalid email or password", None)
    }

    pub fn email_exists() -> AppError {
        create_error(
            ErrorCode::EmailAlreadyExists,
            "An account with this email already exists",
            None,
        )
    }

    pub fn weak_password() -> AppError {
        create_error(
            ErrorCode::WeakPassword,
            "Password must be at least 8 characters long",
            None,
        )
    }

    pub fn invalid_email() -> AppError {
        create_error(
            ErrorCode::InvalidEmail,
            "Please enter a valid email address",
            None,
        )
    }

    pub fn unauthorized() -> AppError {
        create_error(
            ErrorCode::Unauthorized,
            "You must be logged in to access this resource",
            None,
        )
    }

    pub fn session_expired() -> AppError {
        create_error(
            ErrorCode::SessionExpired,
            "Your session has expired. Please log in again",
            None,
        )
    }
}

pub mod validation_errors {
    use super::create_error;
    use crate::types::{AppError, ErrorCode};

    pub fn required(field: &str) -> AppError {
        create_error(ErrorCode::RequiredField, format!("{field} is required"), None)
    }

    pub fn too_short(field: &str, min: usize) -> AppError {
        create_error(
            ErrorCode::TooShort,
            format!("{field} must be at least {min} characters"),
            None,
        )
    }

    pub fn too_long(field: &str, max: usize) -> AppError {
        create_error(
            ErrorCode::TooLong,
            format!("{field} must be no more than {max} characters"),
            None,
        )
    }

    pub fn invalid_format(field: &str) -> AppError {
        create_error(
            ErrorCode::InvalidFormat,
            format!("{field} format is invalid"),
            None,
        )
    }
}

pub mod network_errors {
    use super::create_error;
    use crate::types::{AppError, ErrorCode};

    pub fn timeout() -> AppError {
        create_error(ErrorCode::Timeout, "Request timed out. Please try again", None)
    }

    pub fn server_error() -> AppError {
        create_error(
            ErrorCode::ServerError,
            "Server error. Please try again later",
            None,
        )
    }

    pub fn network_error() -> AppError {
        create_error(
            ErrorCode::NetworkError,
            "Network error. Please check your connection",
            None,
        )
    }
}

/// Phrases checked against a lower-cased provider message. Order matters:
/// the first phrase found wins, so a credentials failure is recognised
/// before the broader "password" and "email" phrases get a chance.
const KNOWN_PHRASES: [(&str, fn() -> AppError); 4] = [
    ("invalid login credentials", auth_errors::invalid_credentials),
    ("user already registered", auth_errors::email_exists),
    ("password", auth_errors::weak_password),
    ("email", auth_errors::invalid_email),
];

/// Map a raw provider error onto the closed [`ErrorCode`] set.
///
/// Classification is a case-insensitive substring match on the message,
/// which is coarse: any message mentioning "password" becomes
/// `WEAK_PASSWORD` unless an earlier phrase matched.
pub fn parse_external_error<E>(raw: Option<&E>) -> AppError
where
    E: ExternalError + ?Sized,
{
    let Some(raw) = raw else {
        return create_error(ErrorCode::UnknownError, UNKNOWN_ERROR_MESSAGE, None);
    };

    let message = raw.message().unwrap_or_default();
    let lowered = message.to_lowercase();
    for (phrase, build) in KNOWN_PHRASES {
        if lowered.contains(phrase) {
            return build();
        }
    }

    let message = if message.is_empty() {
        UNEXPECTED_ERROR_MESSAGE
    } else {
        message
    };
    create_error(ErrorCode::UnknownError, message, None)
}

/// Normalize a [`ProviderError`], mapping transport failures to network
/// codes before falling back to message sniffing.
pub fn normalize_provider_error(err: &ProviderError) -> AppError {
    match err {
        ProviderError::Timeout => network_errors::timeout(),
        ProviderError::Connection(_) => network_errors::network_error(),
        ProviderError::Rejected { status, .. } if *status >= 500 => network_errors::server_error(),
        ProviderError::Rejected { status: 401, .. } => auth_errors::session_expired(),
        ProviderError::Rejected { status: 403, .. } => create_error(
            ErrorCode::Forbidden,
            "You do not have permission to perform this action",
            None,
        ),
        _ => parse_external_error(Some(err)),
    }
}

pub fn error_message(error: &AppError) -> &str {
    if error.message().trim().is_empty() {
        UNEXPECTED_ERROR_MESSAGE
    } else {
        error.message()
    }
}

pub fn is_network_error(error: &AppError) -> bool {
    matches!(
        error.code(),
        ErrorCode::NetworkError | ErrorCode::Timeout | ErrorCode::ServerError
    )
}

pub fn is_auth_error(error: &AppError) -> bool {
    matches!(
        error.code(),
        ErrorCode::InvalidCredentials
            | ErrorCode::Unauthorized
            | ErrorCode::SessionExpired
            | ErrorCode::EmailAlreadyExists
    )
}
