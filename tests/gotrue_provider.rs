#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::{collections::HashMap, net::SocketAddr, time::Duration};

use axum::{
    Json, Router,
    extract::Query,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::{Value, json};
use starter::{
    errors::normalize_provider_error,
    provider::{AuthProvider, GoTrueProvider, ProviderError, SignupMetadata},
    types::{ErrorCode, OAuthProvider},
};
use url::Url;

const ANON_KEY: &str = "anon-key";
const USER_ID: &str = "6f1c1a2e-9a8b-4c5d-8e7f-0a1b2c3d4e5f";

fn user_json(email: &str) -> Value {
    json!({
        "id": USER_ID,
        "email": email,
        "user_metadata": { "first_name": "Ada", "last_name": "Lovelace" },
        "created_at": "2026-01-01T00:00:00Z",
        "updated_at": "2026-01-02T00:00:00Z",
    })
}

fn session_json(email: &str) -> Value {
    json!({
        "access_token": "access-1",
        "refresh_token": "refresh-1",
        "expires_in": 3600,
        "token_type": "bearer",
        "user": user_json(email),
    })
}

fn has_api_key(headers: &HeaderMap) -> bool {
    headers.get("apikey").and_then(|v| v.to_str().ok()) == Some(ANON_KEY)
}

async fn token(
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    if !has_api_key(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "No API key found in request" })))
            .into_response();
    }
    if query.get("grant_type").map(String::as_str) != Some("password") {
        return (StatusCode::BAD_REQUEST, "unsupported grant type").into_response();
    }

    let email = body["email"].as_str().unwrap_or_default();
    match email {
        "slow@example.com" => {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Json(session_json(email)).into_response()
        }
        "down@example.com" => (StatusCode::SERVICE_UNAVAILABLE, "upstream unavailable").into_response(),
        _ if body["password"] == "password123" => Json(session_json(email)).into_response(),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid login credentials",
            })),
        )
            .into_response(),
    }
}

async fn signup(Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    match email {
        "taken@example.com" => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "code": 422, "msg": "User already registered" })),
        )
            .into_response(),
        "confirm@example.com" => Json(user_json(email)).into_response(),
        _ => {
            assert_eq!(body["data"]["full_name"], "Ada Lovelace");
            Json(session_json(email)).into_response()
        }
    }
}

async fn logout(headers: HeaderMap) -> StatusCode {
    match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some("Bearer access-1") => StatusCode::NO_CONTENT,
        _ => StatusCode::UNAUTHORIZED,
    }
}

async fn spawn_auth_server() -> SocketAddr {
    let app = Router::new()
        .route("/auth/v1/token", post(token))
        .route("/auth/v1/signup", post(signup))
        .route("/auth/v1/logout", post(logout));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn provider_for(addr: SocketAddr, timeout: Duration) -> GoTrueProvider {
    let base = Url::parse(&format!("http://{addr}")).unwrap();
    GoTrueProvider::new(base, ANON_KEY, timeout).unwrap()
}

#[tokio::test]
async fn password_sign_in_maps_session() {
    let addr = spawn_auth_server().await;
    let provider = provider_for(addr, Duration::from_secs(5));

    let session = provider
        .sign_in_with_password("ada@example.com", "password123")
        .await
        .unwrap();

    assert_eq!(session.access_token, "access-1");
    assert_eq!(session.refresh_token.as_deref(), Some("refresh-1"));
    assert_eq!(session.expires_in, Some(3600));
    assert_eq!(session.user.id.to_string(), USER_ID);
    assert_eq!(session.user.first_name.as_deref(), Some("Ada"));
    assert_eq!(session.user.created_at, "2026-01-01T00:00:00Z");
}

#[tokio::test]
async fn wrong_password_normalizes_to_invalid_credentials() {
    let addr = spawn_auth_server().await;
    let provider = provider_for(addr, Duration::from_secs(5));

    let err = provider
        .sign_in_with_password("ada@example.com", "nope")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ProviderError::Rejected {
            status: 400,
            message: "Invalid login credentials".to_string(),
        }
    );
    assert_eq!(
        normalize_provider_error(&err).code(),
        ErrorCode::InvalidCredentials
    );
}

#[tokio::test]
async fn upstream_failure_is_a_server_error() {
    let addr = spawn_auth_server().await;
    let provider = provider_for(addr, Duration::from_secs(5));

    let err = provider
        .sign_in_with_password("down@example.com", "password123")
        .await
        .unwrap_err();

    assert_eq!(normalize_provider_error(&err).code(), ErrorCode::ServerError);
}

#[tokio::test]
async fn slow_provider_times_out() {
    let addr = spawn_auth_server().await;
    let provider = provider_for(addr, Duration::from_millis(50));

    let err = provider
        .sign_in_with_password("slow@example.com", "password123")
        .await
        .unwrap_err();

    assert_eq!(err, ProviderError::Timeout);
    assert_eq!(normalize_provider_error(&err).code(), ErrorCode::Timeout);
}

#[tokio::test]
async fn unreachable_provider_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let provider = provider_for(addr, Duration::from_secs(5));

    let err = provider
        .sign_in_with_password("ada@example.com", "password123")
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Connection(_)), "{err:?}");
    assert_eq!(normalize_provider_error(&err).code(), ErrorCode::NetworkError);
}

#[tokio::test]
async fn sign_up_variants() {
    let addr = spawn_auth_server().await;
    let provider = provider_for(addr, Duration::from_secs(5));
    let metadata = SignupMetadata::from([
        ("first_name".to_string(), "Ada".to_string()),
        ("last_name".to_string(), "Lovelace".to_string()),
        ("full_name".to_string(), "Ada Lovelace".to_string()),
    ]);

    let session = provider
        .sign_up("ada@example.com", "password123", metadata.clone())
        .await
        .unwrap();
    assert!(session.is_some());

    let pending = provider
        .sign_up("confirm@example.com", "password123", metadata.clone())
        .await
        .unwrap();
    assert!(pending.is_none());

    let err = provider
        .sign_up("taken@example.com", "password123", metadata)
        .await
        .unwrap_err();
    assert_eq!(
        normalize_provider_error(&err).code(),
        ErrorCode::EmailAlreadyExists
    );
}

#[tokio::test]
async fn sign_out_sends_bearer_token() {
    let addr = spawn_auth_server().await;
    let provider = provider_for(addr, Duration::from_secs(5));

    provider.sign_out("access-1").await.unwrap();
    let err = provider.sign_out("stale").await.unwrap_err();
    assert!(matches!(err, ProviderError::Rejected { status: 401, .. }));
    assert_eq!(
        normalize_provider_error(&err).code(),
        ErrorCode::SessionExpired
    );
}

#[tokio::test]
async fn oauth_url_points_at_authorize_endpoint() {
    let addr = spawn_auth_server().await;
    let provider = provider_for(addr, Duration::from_secs(5));

    let url = provider
        .sign_in_with_oauth(OAuthProvider::Google, "http://localhost:3000/")
        .await
        .unwrap();

    let url = Url::parse(&url).unwrap();
    assert_eq!(url.path(), "/auth/v1/authorize");
    let pairs: HashMap<String, String> = url.query_pairs().into_owned().collect();
    assert_eq!(pairs["provider"], "google");
    assert_eq!(pairs["redirect_to"], "http://localhost:3000/");
}
