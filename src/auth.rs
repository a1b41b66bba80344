use axum::{
    body::Body,
    http::{HeaderMap, Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;

/// Access token taken from a `Bearer` Authorization header.
#[derive(Debug, Clone)]
pub struct AccessToken(pub String);

/// Reject requests without a bearer token and expose the token to the
/// handler as an [`AccessToken`] extension. Checking the token is left to
/// the auth provider.
pub async fn require_bearer(mut req: Request<Body>, next: Next) -> Result<Response, ApiError> {
    let Some(token) = bearer_token(req.headers()) else {
        return Err(ApiError::unauthorized());
    };

    let token = AccessToken(token.to_string());
    req.extensions_mut().insert(token);
    Ok(next.run(req).await)
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|value| {
            let trimmed = value.trim_start();
            if trimmed.len() >= 7 && trimmed[..7].eq_ignore_ascii_case("bearer ") {
                Some(trimmed[7..].trim())
            } else {
                None
            }
        })
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn accepts_case_insensitive_scheme() {
        assert_eq!(bearer_token(&headers("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers("  bearer   abc ")), Some("abc"));
    }

    #[test]
    fn rejects_other_schemes_and_blank_tokens() {
        assert_eq!(bearer_token(&headers("Basic abc")), None);
        assert_eq!(bearer_token(&headers("Bearer   ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
