use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use specta::Type;

/// Closed set of error codes shared with the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Authentication
    InvalidCredentials,
    UserNotFound,
    EmailAlreadyExists,
    WeakPassword,
    InvalidEmail,

    // Authorization
    Unauthorized,
    Forbidden,
    SessionExpired,

    // Validation
    RequiredField,
    InvalidFormat,
    TooShort,
    TooLong,

    // Network
    NetworkError,
    ServerError,
    Timeout,

    UnknownError,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::WeakPassword => "WEAK_PASSWORD",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::SessionExpired => "SESSION_EXPIRED",
            Self::RequiredField => "REQUIRED_FIELD",
            Self::InvalidFormat => "INVALID_FORMAT",
            Self::TooShort => "TOO_SHORT",
            Self::TooLong => "TOO_LONG",
            Self::NetworkError => "NETWORK_ERROR",
            Self::ServerError => "SERVER_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized operation error.
///
/// Built once where a failure is recognized and never mutated afterwards,
/// so the fields are only reachable through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Type)]
pub struct AppError {
    code: ErrorCode,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<BTreeMap<String, String>>,
    /// RFC 3339 UTC timestamp of when the error was created.
    timestamp: String,
}

impl AppError {
    pub fn new(
        code: ErrorCode,
        message: impl Into<String>,
        details: Option<BTreeMap<String, String>>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            timestamp: timestamp.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&BTreeMap<String, String>> {
        self.details.as_ref()
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

/// Icon family used when rendering an [`AppError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Network,
    Auth,
    Generic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Type)]
pub struct ErrorDisplay {
    pub category: ErrorCategory,
    pub message: String,
}
