use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use specta::Type;
use uuid::Uuid;

use crate::types::{AppError, ErrorDisplay};

/// Envelope returned by every page endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Type)]
pub struct ApiResponse<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<AppError>,
    /// How a client should render `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<ErrorDisplay>,
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            display: None,
            success: true,
        }
    }

    pub fn failure(error: AppError, display: ErrorDisplay) -> Self {
        Self {
            data: None,
            error: Some(error),
            display: Some(display),
            success: false,
        }
    }
}

/// Field-level errors of a form that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "camelCase")]
pub struct FormRejection {
    pub errors: BTreeMap<String, String>,
    pub is_valid: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    Google,
    Apple,
}

impl OAuthProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Apple => "apple",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Type)]
pub struct OAuthRedirect {
    pub provider: OAuthProvider,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Type)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    /// Absent when the provider requires email confirmation first.
    pub session: Option<crate::types::Session>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Type)]
#[serde(rename_all = "camelCase")]
pub struct ContactReceipt {
    pub id: Uuid,
    pub received_at: String,
}
