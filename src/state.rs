use std::sync::Arc;

use crate::{config::AppConfig, provider::AuthProvider};

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn AuthProvider>,
    pub config: Arc<AppConfig>,
}
