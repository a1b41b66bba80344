use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{
    auth::require_bearer,
    handlers::{
        auth::{login_handler, logout_handler, oauth_handler, signup_handler},
        contact::contact_handler,
        health_handler,
    },
    state::AppState,
};

pub fn router(state: AppState) -> Router {
    let session_routes = Router::new()
        .route("/logout", post(logout_handler))
        .layer(middleware::from_fn(require_bearer));

    let auth_routes = Router::new()
        .route("/login", post(login_handler))
        .route("/signup", post(signup_handler))
        .route("/oauth/:provider", post(oauth_handler))
        .merge(session_routes);

    Router::new()
        .route("/healthz", get(health_handler))
        .route("/api/contact", post(contact_handler))
        .nest("/api/auth", auth_routes)
        .with_state(state)
}
