use std::{collections::BTreeMap, time::Duration};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use super::{AuthProvider, ProviderError, SignupMetadata};
use crate::types::{OAuthProvider, Session, User};

/// Client for a GoTrue-compatible auth server (the Supabase auth API).
#[derive(Debug, Clone)]
pub struct GoTrueProvider {
    client: Client,
    base: Url,
    anon_key: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    msg: Option<String>,
    error_description: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    id: Uuid,
    email: Option<String>,
    #[serde(default)]
    user_metadata: BTreeMap<String, Value>,
    created_at: Option<String>,
    updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireSession {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    user: WireUser,
}

/// Signup answers with a session when auto-confirm is on, otherwise with
/// the bare user record.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignupReply {
    Session(WireSession),
    User(#[allow(dead_code)] WireUser),
}

impl GoTrueProvider {
    pub fn new(
        mut base: Url,
        anon_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ProviderError::Connection(err.to_string()))?;

        Ok(Self {
            client,
            base,
            anon_key: anon_key.into(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ProviderError> {
        self.base
            .join(path)
            .map_err(|err| ProviderError::Decode(format!("invalid endpoint {path}: {err}")))
    }

    async fn dispatch(&self, request: RequestBuilder) -> Result<Response, ProviderError> {
        let response = request
            .header("apikey", &self.anon_key)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = rejected(status.as_u16(), &body);
        warn!(status = status.as_u16(), error = %err, "auth provider rejected request");
        Err(err)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ProviderError> {
        self.dispatch(request)
            .await?
            .json::<T>()
            .await
            .map_err(|err| ProviderError::Decode(err.to_string()))
    }
}

#[async_trait]
impl AuthProvider for GoTrueProvider {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, ProviderError> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        debug!(%email, "signing in with password");
        let session: WireSession = self
            .send_json(
                self.client
                    .post(url)
                    .json(&json!({ "email": email, "password": password })),
            )
            .await?;

        Ok(session.into())
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: SignupMetadata,
    ) -> Result<Option<Session>, ProviderError> {
        let url = self.endpoint("auth/v1/signup")?;

        debug!(%email, "signing up");
        let reply: SignupReply = self
            .send_json(self.client.post(url).json(&json!({
                "email": email,
                "password": password,
                "data": metadata,
            })))
            .await?;

        Ok(match reply {
            SignupReply::Session(session) => Some(session.into()),
            SignupReply::User(_) => None,
        })
    }

    async fn sign_in_with_oauth(
        &self,
        provider: OAuthProvider,
        redirect_to: &str,
    ) -> Result<String, ProviderError> {
        let mut url = self.endpoint("auth/v1/authorize")?;
        url.query_pairs_mut()
            .append_pair("provider", provider.as_str())
            .append_pair("redirect_to", redirect_to);
        Ok(url.into())
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError> {
        let url = self.endpoint("auth/v1/logout")?;
        self.dispatch(self.client.post(url).bearer_auth(access_token))
            .await?;
        Ok(())
    }
}

fn transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else if err.is_decode() {
        ProviderError::Decode(err.to_string())
    } else {
        ProviderError::Connection(err.to_string())
    }
}

fn rejected(status: u16, body: &str) -> ProviderError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .msg
        .or(parsed.error_description)
        .or(parsed.message)
        .or(parsed.error)
        .unwrap_or_else(|| body.trim().to_string());
    ProviderError::Rejected { status, message }
}

fn metadata_str(metadata: &BTreeMap<String, Value>, key: &str) -> Option<String> {
    metadata
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

impl From<WireUser> for User {
    fn from(user: WireUser) -> Self {
        let now = || Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        Self {
            id: user.id,
            email: user.email.unwrap_or_default(),
            first_name: metadata_str(&user.user_metadata, "first_name"),
            last_name: metadata_str(&user.user_metadata, "last_name"),
            avatar: metadata_str(&user.user_metadata, "avatar_url"),
            created_at: user.created_at.unwrap_or_else(now),
            updated_at: user.updated_at.unwrap_or_else(now),
        }
    }
}

impl From<WireSession> for Session {
    fn from(session: WireSession) -> Self {
        Self {
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            expires_in: session.expires_in,
            user: session.user.into(),
        }
    }
}
