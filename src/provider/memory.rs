use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use tracing::info;
use url::Url;
use uuid::Uuid;

use super::{AuthProvider, ProviderError, SignupMetadata};
use crate::types::{OAuthProvider, Session, User};

/// Shortest password the provider itself accepts; the form demands more.
const PROVIDER_MIN_PASSWORD: usize = 6;
const SESSION_TTL_SECS: i64 = 3600;

#[derive(Debug)]
struct Account {
    user: User,
    password: String,
}

#[derive(Debug, Default)]
struct Accounts {
    by_email: HashMap<String, Account>,
    /// access token -> email
    sessions: HashMap<String, String>,
}

/// In-process provider for local development and tests. Accounts are
/// confirmed immediately and live as long as the process.
#[derive(Debug)]
pub struct MemoryProvider {
    authorize_url: Url,
    accounts: Mutex<Accounts>,
}

impl MemoryProvider {
    pub fn new(authorize_url: Url) -> Self {
        Self {
            authorize_url,
            accounts: Mutex::new(Accounts::default()),
        }
    }

    fn accounts(&self) -> MutexGuard<'_, Accounts> {
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn active_sessions(&self) -> usize {
        self.accounts().sessions.len()
    }

    fn open_session(accounts: &mut Accounts, user: &User) -> Session {
        let access_token = Uuid::new_v4().simple().to_string();
        accounts
            .sessions
            .insert(access_token.clone(), user.email.clone());
        Session {
            access_token,
            refresh_token: Some(Uuid::new_v4().simple().to_string()),
            expires_in: Some(SESSION_TTL_SECS),
            user: user.clone(),
        }
    }
}

fn rejected(status: u16, message: &str) -> ProviderError {
    ProviderError::Rejected {
        status,
        message: message.to_string(),
    }
}

fn metadata_value(metadata: &SignupMetadata, key: &str) -> Option<String> {
    metadata
        .get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl AuthProvider for MemoryProvider {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, ProviderError> {
        let key = email.trim().to_lowercase();
        let mut accounts = self.accounts();

        let user = match accounts.by_email.get(&key) {
            Some(account) if account.password == password => account.user.clone(),
            _ => return Err(rejected(400, "Invalid login credentials")),
        };

        Ok(Self::open_session(&mut accounts, &user))
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: SignupMetadata,
    ) -> Result<Option<Session>, ProviderError> {
        let key = email.trim().to_lowercase();
        if !key.contains('@') {
            return Err(rejected(
                400,
                "Unable to validate email address: invalid format",
            ));
        }
        if password.chars().count() < PROVIDER_MIN_PASSWORD {
            return Err(rejected(
                422,
                "Password should be at least 6 characters",
            ));
        }

        let mut accounts = self.accounts();
        if accounts.by_email.contains_key(&key) {
            return Err(rejected(422, "User already registered"));
        }

        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let user = User {
            id: Uuid::new_v4(),
            email: key.clone(),
            first_name: metadata_value(&metadata, "first_name"),
            last_name: metadata_value(&metadata, "last_name"),
            avatar: metadata_value(&metadata, "avatar_url"),
            created_at: now.clone(),
            updated_at: now,
        };
        info!(user_id = %user.id, "registered account");

        accounts.by_email.insert(
            key,
            Account {
                user: user.clone(),
                password: password.to_string(),
            },
        );

        Ok(Some(Self::open_session(&mut accounts, &user)))
    }

    async fn sign_in_with_oauth(
        &self,
        provider: OAuthProvider,
        redirect_to: &str,
    ) -> Result<String, ProviderError> {
        let mut url = self.authorize_url.clone();
        url.query_pairs_mut()
            .append_pair("provider", provider.as_str())
            .append_pair("redirect_to", redirect_to);
        Ok(url.into())
    }

    /// Unknown tokens are ignored so signing out twice is harmless.
    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError> {
        self.accounts().sessions.remove(access_token);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn provider() -> MemoryProvider {
        MemoryProvider::new(Url::parse("http://localhost:9999/auth/v1/authorize").unwrap())
    }

    #[tokio::test]
    async fn sign_up_then_sign_in() {
        let provider = provider();
        let metadata = SignupMetadata::from([("first_name".to_string(), "Ada".to_string())]);
        let session = provider
            .sign_up("Ada@Example.com", "password123", metadata)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.user.email, "ada@example.com");
        assert_eq!(session.user.first_name.as_deref(), Some("Ada"));

        let session = provider
            .sign_in_with_password("ada@example.com", "password123")
            .await
            .unwrap();
        assert_eq!(session.expires_in, Some(SESSION_TTL_SECS));
        assert_eq!(provider.active_sessions(), 2);

        provider.sign_out(&session.access_token).await.unwrap();
        assert_eq!(provider.active_sessions(), 1);
    }

    #[tokio::test]
    async fn rejections_use_provider_wording() {
        let provider = provider();
        provider
            .sign_up("ada@example.com", "password123", SignupMetadata::new())
            .await
            .unwrap();

        let err = provider
            .sign_up("ada@example.com", "password123", SignupMetadata::new())
            .await
            .unwrap_err();
        assert_eq!(err, rejected(422, "User already registered"));

        let err = provider
            .sign_in_with_password("ada@example.com", "wrong-password")
            .await
            .unwrap_err();
        assert_eq!(err, rejected(400, "Invalid login credentials"));
    }

    #[tokio::test]
    async fn oauth_url_carries_provider_and_redirect() {
        let url = provider()
            .sign_in_with_oauth(OAuthProvider::Apple, "http://localhost:3000/")
            .await
            .unwrap();
        let parsed = Url::parse(&url).unwrap();
        let pairs: HashMap<_, _> = parsed.query_pairs().into_owned().collect();
        assert_eq!(pairs["provider"], "apple");
        assert_eq!(pairs["redirect_to"], "http://localhost:3000/");
    }
}
