use std::{net::SocketAddr, sync::Arc};

use starter::{
    app::router,
    config::AppConfig,
    provider::{AuthProvider, GoTrueProvider, MemoryProvider},
    state::AppState,
    telemetry,
};
use tracing::{info, warn};
use url::Url;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    telemetry::init()?;

    let config = AppConfig::from_env();

    let provider: Arc<dyn AuthProvider> = match &config.auth_url {
        Some(auth_url) => {
            let base = Url::parse(auth_url)?;
            info!(auth_url = %base, "using remote auth provider");
            Arc::new(GoTrueProvider::new(
                base,
                config.auth_anon_key.clone(),
                config.auth_timeout(),
            )?)
        }
        None => {
            warn!("STARTER_AUTH_URL not set; accounts are kept in memory");
            let authorize_url = Url::parse(&config.site_url)?.join("auth/v1/authorize")?;
            Arc::new(MemoryProvider::new(authorize_url))
        }
    };

    let addr: SocketAddr = config.bind_addr.parse()?;
    let state = AppState {
        provider,
        config: Arc::new(config),
    };
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
