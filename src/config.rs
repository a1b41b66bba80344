use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Base URL of the GoTrue-compatible auth server. When unset the
    /// in-memory provider is used.
    pub auth_url: Option<String>,
    pub auth_anon_key: String,
    /// Public origin of the site; OAuth flows redirect back to its root.
    pub site_url: String,
    pub auth_timeout_ms: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(value) = std::env::var("STARTER_BIND_ADDR")
            && !value.trim().is_empty()
        {
            config.bind_addr = value.trim().to_string();
        }
        if let Ok(value) = std::env::var("STARTER_AUTH_URL")
            && !value.trim().is_empty()
        {
            config.auth_url = Some(value.trim().to_string());
        }
        if let Ok(value) = std::env::var("STARTER_AUTH_ANON_KEY") {
            config.auth_anon_key = value.trim().to_string();
        }
        if let Ok(value) = std::env::var("STARTER_SITE_URL")
            && !value.trim().is_empty()
        {
            config.site_url = value.trim().trim_end_matches('/').to_string();
        }
        if let Ok(value) = std::env::var("STARTER_AUTH_TIMEOUT_MS")
            && let Ok(parsed) = value.parse::<u64>()
        {
            config.auth_timeout_ms = parsed.max(1);
        }

        config
    }

    pub fn auth_timeout(&self) -> Duration {
        Duration::from_millis(self.auth_timeout_ms)
    }

    /// Where OAuth providers send the browser once the flow completes.
    pub fn oauth_redirect(&self) -> String {
        format!("{}/", self.site_url)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            auth_url: None,
            auth_anon_key: String::new(),
            site_url: "http://localhost:3000".to_string(),
            auth_timeout_ms: 10_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_targets_site_root() {
        let config = AppConfig {
            site_url: "https://example.com".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.oauth_redirect(), "https://example.com/");
        assert_eq!(config.auth_timeout(), Duration::from_secs(10));
    }
}
