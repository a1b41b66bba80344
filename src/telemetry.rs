use tracing_subscriber::{EnvFilter, fmt};

pub type InitError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Install the global JSON subscriber, filtered by `RUST_LOG`.
pub fn init() -> Result<(), InitError> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
}
