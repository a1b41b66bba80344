use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    errors::{auth_errors, create_error},
    form::SubmitError,
    types::{ApiResponse, AppError, ErrorCode, ErrorDisplay, FormRejection},
};

#[derive(Debug)]
pub enum ApiError {
    /// Field-level validation failed; the user can correct the input.
    Validation(FormRejection),
    /// An operation failed and was normalized for display.
    Operation(AppError),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Operation(create_error(ErrorCode::InvalidFormat, message, None))
    }

    pub fn unauthorized() -> Self {
        Self::Operation(auth_errors::unauthorized())
    }

    pub fn from_submit(err: SubmitError, rejection: FormRejection) -> Self {
        match err {
            SubmitError::Refused(_) => Self::Validation(rejection),
            SubmitError::Operation(error) => Self::Operation(error),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::Operation(err)
    }
}

pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidCredentials | ErrorCode::Unauthorized | ErrorCode::SessionExpired => {
            StatusCode::UNAUTHORIZED
        }
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::UserNotFound => StatusCode::NOT_FOUND,
        ErrorCode::EmailAlreadyExists => StatusCode::CONFLICT,
        ErrorCode::WeakPassword
        | ErrorCode::InvalidEmail
        | ErrorCode::RequiredField
        | ErrorCode::InvalidFormat
        | ErrorCode::TooShort
        | ErrorCode::TooLong => StatusCode::BAD_REQUEST,
        ErrorCode::Timeout => StatusCode::GATEWAY_TIMEOUT,
        ErrorCode::NetworkError | ErrorCode::ServerError => StatusCode::BAD_GATEWAY,
        ErrorCode::UnknownError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(rejection) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(rejection)).into_response()
            }
            ApiError::Operation(error) => {
                let status = status_for(error.code());
                let display = ErrorDisplay::from_app_error(&error);
                (status, Json(ApiResponse::<()>::failure(error, display))).into_response()
            }
        }
    }
}
