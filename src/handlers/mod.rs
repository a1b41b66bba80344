pub mod auth;
pub mod contact;

pub async fn health_handler() -> &'static str {
    "ok"
}
