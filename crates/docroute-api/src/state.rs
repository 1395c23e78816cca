//! # Application State
//!
//! Shared state for the Axum application, passed to route handlers via the
//! `State` extractor. Everything here is built once at startup and
//! read-only afterwards, apart from the metrics counters.

use std::sync::Arc;

use docroute_pipeline::Pipeline;

use crate::auth::SecretToken;
use crate::middleware::metrics::ApiMetrics;

pub const PORT_VAR: &str = "PORT";
pub const AUTH_TOKEN_VAR: &str = "AUTH_TOKEN";

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Static bearer token for `/v1/*`. `None` disables authentication.
    pub auth_token: Option<SecretToken>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            auth_token: None,
        }
    }
}

impl AppConfig {
    /// Read `PORT` and `AUTH_TOKEN`. An unparsable port falls back to 8080.
    pub fn from_env() -> Self {
        Self::load(|name| std::env::var(name).ok())
    }

    pub fn load(env: impl Fn(&str) -> Option<String>) -> Self {
        let port = env(PORT_VAR)
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let auth_token = env(AUTH_TOKEN_VAR)
            .filter(|t| !t.is_empty())
            .map(SecretToken::new);
        Self { port, auth_token }
    }

    /// Flat configuration items, raw. Masking happens at the status route.
    pub fn items(&self) -> Vec<(&'static str, String)> {
        let mut items = vec![("api.port", self.port.to_string())];
        if let Some(token) = &self.auth_token {
            items.push(("api.auth_token", token.expose().to_string()));
        }
        items
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub config: AppConfig,
    /// Every configuration item in reporting order.
    pub settings: Arc<Vec<(&'static str, String)>>,
    pub metrics: ApiMetrics,
}

impl AppState {
    /// `pipeline_items` are the pipeline's configuration items; the server's
    /// own items are appended.
    pub fn new(
        pipeline: Pipeline,
        config: AppConfig,
        pipeline_items: Vec<(&'static str, String)>,
    ) -> Self {
        let mut settings = pipeline_items;
        settings.extend(config.items());
        Self {
            pipeline: Arc::new(pipeline),
            config,
            settings: Arc::new(settings),
            metrics: ApiMetrics::new(),
        }
    }
}
