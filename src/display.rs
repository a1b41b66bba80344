use crate::{
    errors::{error_message, is_auth_error, is_network_error},
    types::{AppError, ErrorCategory, ErrorDisplay},
};

/// Network failures take precedence over auth failures.
pub fn category(error: &AppError) -> ErrorCategory {
    if is_network_error(error) {
        ErrorCategory::Network
    } else if is_auth_error(error) {
        ErrorCategory::Auth
    } else {
        ErrorCategory::Generic
    }
}

impl ErrorDisplay {
    pub fn from_app_error(error: &AppError) -> Self {
        Self {
            category: category(error),
            message: error_message(error).to_string(),
        }
    }

    /// Bare strings carry no code, so they always render as generic.
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            category: ErrorCategory::Generic,
            message: message.into(),
        }
    }
}

impl From<&AppError> for ErrorDisplay {
    fn from(error: &AppError) -> Self {
        Self::from_app_error(error)
    }
}
