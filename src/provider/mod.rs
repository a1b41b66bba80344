//! External authentication provider.
//!
//! Pages treat the provider as an opaque fallible call. Whatever it
//! reports goes through [`crate::errors::normalize_provider_error`].

mod gotrue;
mod memory;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::{
    errors::ExternalError,
    types::{OAuthProvider, Session},
};

pub use gotrue::GoTrueProvider;
pub use memory::MemoryProvider;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The provider answered with an error status.
    #[error("provider rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("provider request timed out")]
    Timeout,
    #[error("could not reach provider: {0}")]
    Connection(String),
    #[error("unexpected provider response: {0}")]
    Decode(String),
}

impl ExternalError for ProviderError {
    fn message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } | Self::Connection(message) | Self::Decode(message) => {
                Some(message.as_str())
            }
            Self::Timeout => None,
        }
    }
}

/// Profile data attached to a new account.
pub type SignupMetadata = BTreeMap<String, String>;

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, ProviderError>;

    /// Returns `None` when the account must be confirmed before a session
    /// is issued.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: SignupMetadata,
    ) -> Result<Option<Session>, ProviderError>;

    /// URL the browser should follow to start the OAuth flow.
    async fn sign_in_with_oauth(
        &self,
        provider: OAuthProvider,
        redirect_to: &str,
    ) -> Result<String, ProviderError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError>;
}
